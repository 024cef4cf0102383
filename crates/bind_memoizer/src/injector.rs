use std::num::NonZeroUsize;

use swc_ecma_ast::{Expr, Ident, Lit, ModuleItem, Program, Stmt};

use crate::ast_builders::{
    arg, arrow, binding_pat, call, const_decl, default_import, ident, member, num_lit, rest_pat,
    spread_arg, str_lit,
};
use crate::cfg::{BindMemoizerConfig, ImportStyle};

/// `const <binder> = <memoize>(<cache_size>)((func, context, ...args) => func.bind(context, ...args));`
pub fn binder_declaration(
    binder_ident: &Ident,
    memoize_ident: &Ident,
    cache_size: NonZeroUsize,
) -> Stmt {
    let bind_all = arrow(
        vec![
            binding_pat(ident("func")),
            binding_pat(ident("context")),
            rest_pat(ident("args")),
        ],
        call(
            member(Expr::Ident(ident("func")), "bind"),
            vec![
                arg(Expr::Ident(ident("context"))),
                spread_arg(Expr::Ident(ident("args"))),
            ],
        ),
    );
    let memoizer = call(
        Expr::Ident(memoize_ident.clone()),
        vec![arg(num_lit(cache_size.get() as f64))],
    );
    const_decl(binder_ident.clone(), call(memoizer, vec![arg(bind_all)]))
}

/// `const <memoize> = require("<module>");`
pub fn require_declaration(memoize_ident: &Ident, memoize_module: &str) -> Stmt {
    const_decl(
        memoize_ident.clone(),
        call(
            Expr::Ident(ident("require")),
            vec![arg(Expr::Lit(Lit::Str(str_lit(memoize_module))))],
        ),
    )
}

/// Whether the import had to fall back to `require` because the program is a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPlacement {
    AsConfigured,
    RequireFallback,
}

/// Makes the memoize import the very first statement of `program`.
pub fn prepend_memoize_import(
    program: &mut Program,
    memoize_ident: &Ident,
    config: &BindMemoizerConfig,
) -> ImportPlacement {
    match program {
        Program::Module(module) => {
            let item = match config.import_style {
                ImportStyle::Require => ModuleItem::Stmt(require_declaration(
                    memoize_ident,
                    &config.memoize_module,
                )),
                ImportStyle::EsModule => ModuleItem::ModuleDecl(default_import(
                    memoize_ident.clone(),
                    &config.memoize_module,
                )),
            };
            module.body.insert(0, item);
            ImportPlacement::AsConfigured
        }
        Program::Script(script) => {
            script.body.insert(
                0,
                require_declaration(memoize_ident, &config.memoize_module),
            );
            match config.import_style {
                ImportStyle::Require => ImportPlacement::AsConfigured,
                ImportStyle::EsModule => ImportPlacement::RequireFallback,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::num::NonZeroUsize;

    use pretty_assertions::assert_eq;
    use swc_common::DUMMY_SP;
    use swc_ecma_ast::{Module, ModuleDecl, ModuleItem, Program, Script};

    use super::{prepend_memoize_import, ImportPlacement};
    use crate::ast_builders::ident;
    use crate::cfg::{BindMemoizerConfig, ImportStyle};

    fn empty_module() -> Program {
        Program::Module(Module {
            span: DUMMY_SP,
            body: Vec::new(),
            shebang: None,
        })
    }

    fn empty_script() -> Program {
        Program::Script(Script {
            span: DUMMY_SP,
            body: Vec::new(),
            shebang: None,
        })
    }

    #[test]
    fn es_module_style_emits_an_import_declaration() {
        let config = BindMemoizerConfig {
            import_style: ImportStyle::EsModule,
            ..Default::default()
        };
        let mut program = empty_module();
        let placement = prepend_memoize_import(&mut program, &ident("_memoize"), &config);

        assert_eq!(placement, ImportPlacement::AsConfigured);
        let Program::Module(module) = program else {
            unreachable!()
        };
        match &module.body[0] {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                assert_eq!(&*import.src.value, "lru-memoize");
                assert_eq!(import.specifiers.len(), 1);
            }
            _ => panic!("expected an import declaration"),
        }
    }

    #[test]
    fn scripts_fall_back_to_require() {
        let config = BindMemoizerConfig {
            import_style: ImportStyle::EsModule,
            cache_size: NonZeroUsize::new(3).unwrap(),
            ..Default::default()
        };
        let mut program = empty_script();
        let placement = prepend_memoize_import(&mut program, &ident("_memoize"), &config);

        assert_eq!(placement, ImportPlacement::RequireFallback);
        let Program::Script(script) = program else {
            unreachable!()
        };
        assert_eq!(script.body.len(), 1);
    }
}
