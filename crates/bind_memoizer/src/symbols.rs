use ahash::AHashSet;
use swc_atoms::Atom;
use swc_ecma_ast::{Ident, Program};
use swc_ecma_visit::{Visit, VisitWith};

use crate::ast_builders;

/// Names taken in one module, used to hand out collision-free identifiers.
///
/// A table lives exactly as long as the pass over its module, so generated
/// names depend only on that module's contents.
#[derive(Debug, Default)]
pub struct SymbolTable {
    taken: AHashSet<Atom>,
}

impl SymbolTable {
    /// Seeds the table with every identifier that appears in `program`.
    pub fn from_program(program: &Program) -> Self {
        let mut collector = NameCollector {
            taken: AHashSet::default(),
        };
        program.visit_with(&mut collector);
        Self {
            taken: collector.taken,
        }
    }

    #[cfg(test)]
    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(&Atom::from(name))
    }

    /// Reserves and returns a fresh identifier derived from `base`.
    ///
    /// Candidates are `_base`, `_base2`, `_base3`, ... and the first one not
    /// already taken wins.
    pub fn generate(&mut self, base: &str) -> Ident {
        let mut suffix = 1usize;
        loop {
            let candidate = if suffix > 1 {
                format!("_{base}{suffix}")
            } else {
                format!("_{base}")
            };
            let atom = Atom::from(candidate);
            if !self.taken.contains(&atom) {
                self.taken.insert(atom.clone());
                return ast_builders::ident(atom);
            }
            suffix += 1;
        }
    }
}

struct NameCollector {
    taken: AHashSet<Atom>,
}

impl Visit for NameCollector {
    fn visit_ident(&mut self, node: &Ident) {
        self.taken.insert(node.sym.clone());
    }
}
