use swc_common::Span;
use swc_ecma_ast::{FnDecl, Ident};

use crate::cfg::BindMemoizerConfig;
use crate::symbols::SymbolTable;

/// State for one pass over one module.
pub struct ModuleContext<'a> {
    pub config: &'a BindMemoizerConfig,
    /// Local name the memoize module is bound to. Generated up front, but only
    /// declared when `has_any_rewrite` ends up true.
    pub memoize_ident: Ident,
    pub has_any_rewrite: bool,
    pub symbols: SymbolTable,
}

impl<'a> ModuleContext<'a> {
    pub fn new(config: &'a BindMemoizerConfig, mut symbols: SymbolTable) -> Self {
        let memoize_ident = symbols.generate("memoize");
        Self {
            config,
            memoize_ident,
            has_any_rewrite: false,
            symbols,
        }
    }
}

/// State for one render function while its body is being rewritten.
///
/// Owned by the rewrite of that function, and consumed by [`RenderContext::finish`].
pub struct RenderContext {
    pub binder_ident: Ident,
    pub has_rewrite: bool,
    pub hoisted_decls: Vec<FnDecl>,
    /// Index of the top-level statement the function is nested in.
    pub insertion_point: usize,
    pub span: Span,
    pub bind_sites: usize,
}

/// What a finished render function hands to the injector.
pub enum RenderOutcome {
    /// Nothing was rewritten; the binder name stays reserved but is never declared.
    NoRewrite,
    Rewritten(RewrittenRender),
}

pub struct RewrittenRender {
    pub binder_ident: Ident,
    pub hoisted_decls: Vec<FnDecl>,
    pub insertion_point: usize,
    pub span: Span,
    pub bind_sites: usize,
}

impl RenderContext {
    pub fn new(binder_ident: Ident, insertion_point: usize, span: Span) -> Self {
        Self {
            binder_ident,
            has_rewrite: false,
            hoisted_decls: Vec::new(),
            insertion_point,
            span,
            bind_sites: 0,
        }
    }

    pub fn finish(self) -> RenderOutcome {
        if !self.has_rewrite {
            return RenderOutcome::NoRewrite;
        }
        RenderOutcome::Rewritten(RewrittenRender {
            binder_ident: self.binder_ident,
            hoisted_decls: self.hoisted_decls,
            insertion_point: self.insertion_point,
            span: self.span,
            bind_sites: self.bind_sites,
        })
    }
}

#[cfg(test)]
mod test {
    use swc_common::DUMMY_SP;

    use super::{ModuleContext, RenderContext, RenderOutcome};
    use crate::ast_builders::ident;
    use crate::cfg::BindMemoizerConfig;
    use crate::symbols::SymbolTable;

    #[test]
    fn untouched_render_function_produces_nothing() {
        let ctx = RenderContext::new(ident("_bindRenderFunc"), 0, DUMMY_SP);
        assert!(matches!(ctx.finish(), RenderOutcome::NoRewrite));
    }

    #[test]
    fn rewritten_render_function_keeps_its_binder() {
        let mut ctx = RenderContext::new(ident("_bindRenderFunc"), 3, DUMMY_SP);
        ctx.has_rewrite = true;
        match ctx.finish() {
            RenderOutcome::Rewritten(done) => {
                assert_eq!(&*done.binder_ident.sym, "_bindRenderFunc");
                assert_eq!(done.insertion_point, 3);
            }
            RenderOutcome::NoRewrite => panic!("expected a rewrite"),
        }
    }

    #[test]
    fn module_context_reserves_the_memoize_name_first() {
        let config = BindMemoizerConfig::default();
        let mut module = ModuleContext::new(&config, SymbolTable::default());
        assert_eq!(&*module.memoize_ident.sym, "_memoize");
        assert!(!module.has_any_rewrite);
        assert_eq!(&*module.symbols.generate("memoize").sym, "_memoize2");
    }
}
