use swc_common::{util::take::Take, Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, CallExpr, Callee, ClassMethod, Expr, ExprOrSpread, FnDecl, FnExpr, MemberProp,
    MethodProp,
};
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::ast_builders;
use crate::context::{ModuleContext, RenderContext, RenderOutcome, RewrittenRender};
use crate::detector::{is_render_arrow, is_render_fn_decl, is_render_fn_expr, is_render_method};
use crate::free_vars::{captured_variables, dedupe_captures};
use crate::hoister::hoist_closure;

/// Rewrites the body of a single render function.
///
/// `.bind()` calls become calls to the function's binder, and arrow closures
/// are hoisted into top-level declarations collected on the [`RenderContext`].
pub struct BindingRewriter<'r, 'm, 'c> {
    render: &'r mut RenderContext,
    module: &'m mut ModuleContext<'c>,
}

impl<'r, 'm, 'c> BindingRewriter<'r, 'm, 'c> {
    pub fn new(render: &'r mut RenderContext, module: &'m mut ModuleContext<'c>) -> Self {
        Self { render, module }
    }

    fn mark_rewritten(&mut self) {
        self.render.has_rewrite = true;
        self.module.has_any_rewrite = true;
    }

    /// `target.bind(ctx, a, b)` becomes `binder(target, ctx, a, b)`.
    ///
    /// Returns false, leaving `call` alone, if it is not a `.bind()` call.
    fn rewrite_bind_call(&mut self, call: &mut CallExpr) -> bool {
        let Callee::Expr(callee) = &mut call.callee else {
            return false;
        };
        let Expr::Member(member) = &mut **callee else {
            return false;
        };
        if !matches!(&member.prop, MemberProp::Ident(prop) if &*prop.sym == "bind") {
            return false;
        }

        let bound_target = member.obj.take();
        call.args.insert(
            0,
            ExprOrSpread {
                spread: None,
                expr: bound_target,
            },
        );
        call.callee = ast_builders::callee(Expr::Ident(self.render.binder_ident.clone()));

        self.render.bind_sites += 1;
        self.mark_rewritten();
        true
    }

    fn hoist_arrow(&mut self, arrow: ArrowExpr) -> Expr {
        let mut captured = captured_variables(&arrow.params, &arrow.body);
        if self.module.config.dedupe_captures {
            captured = dedupe_captures(captured);
        }
        let name = self.module.symbols.generate("hoistedFunc");

        let hoisted = hoist_closure(arrow, name, captured, &self.render.binder_ident);
        self.render.hoisted_decls.push(hoisted.decl);
        self.mark_rewritten();
        hoisted.call
    }
}

impl VisitMut for BindingRewriter<'_, '_, '_> {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if let Expr::Arrow(_) = expr {
            // the closure body moves to the hoisted declaration untouched
            if let Expr::Arrow(arrow) = expr.take() {
                *expr = self.hoist_arrow(arrow);
            }
            return;
        }

        if let Expr::Call(call) = expr {
            self.rewrite_bind_call(call);
        }
        expr.visit_mut_children_with(self);
    }
}

/// Finds render functions within one top-level statement and rewrites each
/// of them with its own [`RenderContext`].
///
/// Detection is pre-order, so an enclosing render function is rewritten
/// before the render functions nested in it.
pub struct RenderFunctionVisitor<'m, 'c> {
    module: &'m mut ModuleContext<'c>,
    insertion_point: usize,
    detected: usize,
    rewritten: Vec<RewrittenRender>,
}

impl<'m, 'c> RenderFunctionVisitor<'m, 'c> {
    pub fn new(module: &'m mut ModuleContext<'c>, insertion_point: usize) -> Self {
        Self {
            module,
            insertion_point,
            detected: 0,
            rewritten: Vec::new(),
        }
    }

    /// Number of render functions seen, and the ones that were rewritten, in
    /// detection order.
    pub fn into_parts(self) -> (usize, Vec<RewrittenRender>) {
        (self.detected, self.rewritten)
    }

    fn rewrite_render_function(
        &mut self,
        span: Span,
        rewrite_body: impl FnOnce(&mut BindingRewriter<'_, '_, 'c>),
    ) {
        self.detected += 1;
        // reserved even if the function ends up with nothing to rewrite
        let binder_ident = self.module.symbols.generate("bindRenderFunc");
        let mut render = RenderContext::new(binder_ident, self.insertion_point, span);

        rewrite_body(&mut BindingRewriter::new(&mut render, self.module));

        match render.finish() {
            RenderOutcome::NoRewrite => {}
            RenderOutcome::Rewritten(done) => self.rewritten.push(done),
        }
    }
}

impl VisitMut for RenderFunctionVisitor<'_, '_> {
    fn visit_mut_class_method(&mut self, node: &mut ClassMethod) {
        if is_render_method(&node.key, &node.function) {
            if let Some(body) = &mut node.function.body {
                self.rewrite_render_function(node.span, |rewriter| body.visit_mut_with(rewriter));
            }
        }
        node.visit_mut_children_with(self);
    }

    fn visit_mut_method_prop(&mut self, node: &mut MethodProp) {
        if is_render_method(&node.key, &node.function) {
            let span = node.function.span;
            if let Some(body) = &mut node.function.body {
                self.rewrite_render_function(span, |rewriter| body.visit_mut_with(rewriter));
            }
        }
        node.visit_mut_children_with(self);
    }

    fn visit_mut_fn_decl(&mut self, node: &mut FnDecl) {
        if is_render_fn_decl(node) {
            let span = node.span();
            if let Some(body) = &mut node.function.body {
                self.rewrite_render_function(span, |rewriter| body.visit_mut_with(rewriter));
            }
        }
        node.visit_mut_children_with(self);
    }

    fn visit_mut_fn_expr(&mut self, node: &mut FnExpr) {
        if is_render_fn_expr(node) {
            let span = node.function.span;
            if let Some(body) = &mut node.function.body {
                self.rewrite_render_function(span, |rewriter| body.visit_mut_with(rewriter));
            }
        }
        node.visit_mut_children_with(self);
    }

    fn visit_mut_arrow_expr(&mut self, node: &mut ArrowExpr) {
        if is_render_arrow(node) {
            let span = node.span;
            let body = &mut node.body;
            self.rewrite_render_function(span, |rewriter| body.visit_mut_with(rewriter));
        }
        node.visit_mut_children_with(self);
    }
}
