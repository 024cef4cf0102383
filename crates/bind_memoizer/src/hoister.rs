use std::iter;

use swc_ecma_ast::{ArrowExpr, BlockStmtOrExpr, Expr, FnDecl, Ident};

use crate::ast_builders::{arg, binding_pat, call_at, fn_decl, param, return_block, this_expr};

/// A closure lifted out of a render function.
pub struct HoistedClosure {
    /// `function <name>(<captured...>, <params...>) { ... }`
    pub decl: FnDecl,
    /// `<binder>(<name>, this, <captured...>)`, to put where the closure was.
    pub call: Expr,
}

/// Turns `arrow` into a standalone function declaration named `name`, whose
/// leading parameters are the `captured` variables.
///
/// The returned call passes the captured variables in the same order, so the
/// binder can pre-apply them.
pub fn hoist_closure(
    arrow: ArrowExpr,
    name: Ident,
    captured: Vec<Ident>,
    binder_ident: &Ident,
) -> HoistedClosure {
    let ArrowExpr {
        span,
        params,
        body,
        is_async,
        type_params,
        return_type,
        ..
    } = arrow;

    let body = match *body {
        BlockStmtOrExpr::BlockStmt(block) => block,
        BlockStmtOrExpr::Expr(expr) => return_block(expr),
    };

    let fn_params = captured
        .iter()
        .cloned()
        .map(binding_pat)
        .chain(params)
        .map(param)
        .collect();
    let mut decl = fn_decl(name.clone(), fn_params, body, is_async);
    decl.function.type_params = type_params;
    decl.function.return_type = return_type;

    let args = iter::once(arg(Expr::Ident(name)))
        .chain(iter::once(arg(this_expr())))
        .chain(captured.into_iter().map(|ident| arg(Expr::Ident(ident))))
        .collect();
    let call = call_at(span, Expr::Ident(binder_ident.clone()), args);

    HoistedClosure { decl, call }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use swc_common::DUMMY_SP;
    use swc_ecma_ast::{ArrowExpr, Expr, Pat, Stmt};

    use super::hoist_closure;
    use crate::ast_builders::{arg, arrow, binding_pat, call, ident, member, this_expr};

    fn param_names(pats: impl Iterator<Item = Pat>) -> Vec<String> {
        pats.map(|pat| match pat {
            Pat::Ident(binding) => binding.id.sym.to_string(),
            _ => panic!("expected identifier params"),
        })
        .collect()
    }

    fn this_on_click(x: &str) -> ArrowExpr {
        // (event) => this.onClick(x, event)
        let body = call(
            member(this_expr(), "onClick"),
            vec![arg(Expr::Ident(ident(x))), arg(Expr::Ident(ident("event")))],
        );
        match arrow(vec![binding_pat(ident("event"))], body) {
            Expr::Arrow(arrow) => arrow,
            _ => unreachable!(),
        }
    }

    #[test]
    fn captured_variables_come_before_own_params() {
        let hoisted = hoist_closure(
            this_on_click("x"),
            ident("_hoistedFunc"),
            vec![ident("x"), ident("x")],
            &ident("_bindRenderFunc"),
        );

        assert_eq!(&*hoisted.decl.ident.sym, "_hoistedFunc");
        assert_eq!(
            param_names(hoisted.decl.function.params.clone().into_iter().map(|p| p.pat)),
            vec!["x", "x", "event"]
        );

        let Expr::Call(call) = hoisted.call else {
            panic!("expected a call");
        };
        assert_eq!(call.span, DUMMY_SP);
        let arg_names: Vec<String> = call
            .args
            .iter()
            .map(|a| match &*a.expr {
                Expr::Ident(ident) => ident.sym.to_string(),
                Expr::This(_) => "this".to_string(),
                _ => panic!("unexpected argument"),
            })
            .collect();
        assert_eq!(arg_names, vec!["_hoistedFunc", "this", "x", "x"]);
        // one argument per captured param, plus the function and its context
        assert_eq!(
            call.args.len(),
            2 + hoisted.decl.function.params.len() - 1
        );
    }

    #[test]
    fn expression_bodies_become_a_return_statement() {
        let hoisted = hoist_closure(
            this_on_click("x"),
            ident("_hoistedFunc"),
            vec![ident("x")],
            &ident("_bindRenderFunc"),
        );
        let body = hoisted.decl.function.body.unwrap();
        assert_eq!(body.stmts.len(), 1);
        assert!(matches!(&body.stmts[0], Stmt::Return(ret) if ret.arg.is_some()));
    }
}
