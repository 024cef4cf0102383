use logger::{debug_logf, SrcFileLogger};
use swc_ecma_ast::{Decl, ModuleItem, Program, Stmt};
use swc_ecma_visit::VisitMutWith;

use crate::cfg::BindMemoizerConfig;
use crate::context::ModuleContext;
use crate::injector::{binder_declaration, prepend_memoize_import, ImportPlacement};
use crate::report::MemoizeReport;
use crate::rewriter::RenderFunctionVisitor;
use crate::symbols::SymbolTable;

/// A top-level statement of either a module or a script.
trait ProgramItem: Sized {
    fn from_stmt(stmt: Stmt) -> Self;
    fn visit_render_functions(&mut self, visitor: &mut RenderFunctionVisitor<'_, '_>);
}

impl ProgramItem for ModuleItem {
    fn from_stmt(stmt: Stmt) -> Self {
        ModuleItem::Stmt(stmt)
    }

    fn visit_render_functions(&mut self, visitor: &mut RenderFunctionVisitor<'_, '_>) {
        self.visit_mut_with(visitor);
    }
}

impl ProgramItem for Stmt {
    fn from_stmt(stmt: Stmt) -> Self {
        stmt
    }

    fn visit_render_functions(&mut self, visitor: &mut RenderFunctionVisitor<'_, '_>) {
        self.visit_mut_with(visitor);
    }
}

struct ModulePass<'a, 'c, TLogger: SrcFileLogger> {
    module: ModuleContext<'c>,
    logger: &'a TLogger,
    report: MemoizeReport,
}

impl<'c, TLogger: SrcFileLogger> ModulePass<'_, 'c, TLogger> {
    fn process_items<T: ProgramItem>(&mut self, items: Vec<T>) -> Vec<T> {
        let mut out = Vec::with_capacity(items.len());
        for (insertion_point, item) in items.into_iter().enumerate() {
            self.process_item(item, insertion_point, &mut out);
        }
        out
    }

    /// Rewrites the render functions inside `item`, then pushes their
    /// binders and hoisted closures, followed by `item` itself, onto `out`.
    fn process_item<T: ProgramItem>(&mut self, mut item: T, insertion_point: usize, out: &mut Vec<T>) {
        let mut visitor = RenderFunctionVisitor::new(&mut self.module, insertion_point);
        item.visit_render_functions(&mut visitor);
        let (detected, rewritten) = visitor.into_parts();
        self.report.render_functions += detected;

        for done in rewritten {
            self.logger.src_debug(
                &done.span,
                format!(
                    "render function bound through {} ({} bind calls, {} hoisted closures)",
                    done.binder_ident.sym,
                    done.bind_sites,
                    done.hoisted_decls.len()
                ),
            );
            self.report.rewritten_functions += 1;
            self.report.bind_sites += done.bind_sites;
            self.report.hoisted_closures += done.hoisted_decls.len();

            out.push(T::from_stmt(binder_declaration(
                &done.binder_ident,
                &self.module.memoize_ident,
                self.module.config.cache_size,
            )));
            // hoisted closures are top-level function declarations from here
            // on, so they are searched for render functions like any other
            for hoisted in done.hoisted_decls {
                let hoisted_item = T::from_stmt(Stmt::Decl(Decl::Fn(hoisted)));
                self.process_item(hoisted_item, done.insertion_point, out);
            }
        }

        out.push(item);
    }
}

/// Replaces `.bind()` calls and arrow closures inside every render function
/// of `program` with calls to a memoized, per-function binder.
///
/// The program is mutated in place. If nothing is rewritten, it is left
/// exactly as it was.
pub fn memoize_render_binds(
    program: &mut Program,
    config: &BindMemoizerConfig,
    logger: &impl SrcFileLogger,
) -> MemoizeReport {
    let symbols = SymbolTable::from_program(program);
    let mut pass = ModulePass {
        module: ModuleContext::new(config, symbols),
        logger,
        report: MemoizeReport::default(),
    };

    match program {
        Program::Module(module) => {
            let items = std::mem::take(&mut module.body);
            module.body = pass.process_items(items);
        }
        Program::Script(script) => {
            let stmts = std::mem::take(&mut script.body);
            script.body = pass.process_items(stmts);
        }
    }

    if pass.module.has_any_rewrite {
        let placement = prepend_memoize_import(program, &pass.module.memoize_ident, config);
        if placement == ImportPlacement::RequireFallback {
            logger.warn(format!(
                "scripts cannot use import declarations, loading {} with require instead",
                config.memoize_module
            ));
        }
        pass.report.import_inserted = true;
    }

    debug_logf!(logger, "{}", pass.report);
    pass.report
}
