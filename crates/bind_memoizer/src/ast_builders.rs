//! Typed constructors for the handful of node shapes the transform emits.

use swc_atoms::Atom;
use swc_common::{Span, SyntaxContext, DUMMY_SP};
use swc_ecma_ast::{
    ArrowExpr, BindingIdent, BlockStmt, BlockStmtOrExpr, CallExpr, Callee, Decl, Expr,
    ExprOrSpread, FnDecl, Function, Ident, IdentName, ImportDecl, ImportDefaultSpecifier,
    ImportPhase, ImportSpecifier, Lit, MemberExpr, MemberProp, ModuleDecl, Number, Param, Pat,
    RestPat, ReturnStmt, Stmt, Str, ThisExpr, VarDecl, VarDeclKind, VarDeclarator,
};

pub fn ident(sym: impl Into<Atom>) -> Ident {
    Ident::new(sym.into(), DUMMY_SP, SyntaxContext::empty())
}

pub fn this_expr() -> Expr {
    Expr::This(ThisExpr { span: DUMMY_SP })
}

pub fn num_lit(value: f64) -> Expr {
    Expr::Lit(Lit::Num(Number {
        span: DUMMY_SP,
        value,
        raw: None,
    }))
}

pub fn str_lit(value: &str) -> Str {
    Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }
}

pub fn arg(expr: Expr) -> ExprOrSpread {
    ExprOrSpread {
        spread: None,
        expr: Box::new(expr),
    }
}

pub fn spread_arg(expr: Expr) -> ExprOrSpread {
    ExprOrSpread {
        spread: Some(DUMMY_SP),
        expr: Box::new(expr),
    }
}

pub fn callee(expr: Expr) -> Callee {
    Callee::Expr(Box::new(expr))
}

pub fn call(callee_expr: Expr, args: Vec<ExprOrSpread>) -> Expr {
    call_at(DUMMY_SP, callee_expr, args)
}

/// A call that takes over the source location of the node it replaces.
pub fn call_at(span: Span, callee_expr: Expr, args: Vec<ExprOrSpread>) -> Expr {
    Expr::Call(CallExpr {
        span,
        ctxt: SyntaxContext::empty(),
        callee: callee(callee_expr),
        args,
        type_args: None,
    })
}

/// `obj.prop`
pub fn member(obj: Expr, prop: &str) -> Expr {
    Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: MemberProp::Ident(IdentName::new(prop.into(), DUMMY_SP)),
    })
}

pub fn binding_pat(id: Ident) -> Pat {
    Pat::Ident(BindingIdent { id, type_ann: None })
}

pub fn rest_pat(id: Ident) -> Pat {
    Pat::Rest(RestPat {
        span: DUMMY_SP,
        dot3_token: DUMMY_SP,
        arg: Box::new(binding_pat(id)),
        type_ann: None,
    })
}

pub fn param(pat: Pat) -> Param {
    Param {
        span: DUMMY_SP,
        decorators: Vec::new(),
        pat,
    }
}

/// `(params) => body` with an expression body.
pub fn arrow(params: Vec<Pat>, body: Expr) -> Expr {
    Expr::Arrow(ArrowExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        params,
        body: Box::new(BlockStmtOrExpr::Expr(Box::new(body))),
        is_async: false,
        is_generator: false,
        type_params: None,
        return_type: None,
    })
}

pub fn return_block(expr: Box<Expr>) -> BlockStmt {
    BlockStmt {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        stmts: vec![Stmt::Return(ReturnStmt {
            span: DUMMY_SP,
            arg: Some(expr),
        })],
    }
}

/// `function <name>(<params>) <body>`
pub fn fn_decl(name: Ident, params: Vec<Param>, body: BlockStmt, is_async: bool) -> FnDecl {
    FnDecl {
        ident: name,
        declare: false,
        function: Box::new(Function {
            params,
            decorators: Vec::new(),
            span: DUMMY_SP,
            ctxt: SyntaxContext::empty(),
            body: Some(body),
            is_generator: false,
            is_async,
            type_params: None,
            return_type: None,
        }),
    }
}

/// `const <name> = <init>;`
pub fn const_decl(name: Ident, init: Expr) -> Stmt {
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        kind: VarDeclKind::Const,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: binding_pat(name),
            init: Some(Box::new(init)),
            definite: false,
        }],
    })))
}

/// `import <local> from "<src>";`
pub fn default_import(local: Ident, src: &str) -> ModuleDecl {
    ModuleDecl::Import(ImportDecl {
        span: DUMMY_SP,
        specifiers: vec![ImportSpecifier::Default(ImportDefaultSpecifier {
            span: DUMMY_SP,
            local,
        })],
        src: Box::new(str_lit(src)),
        type_only: false,
        with: None,
        phase: ImportPhase::Evaluation,
    })
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use swc_ecma_ast::{Decl, Expr, Lit, MemberProp, Pat, Stmt};

    use super::{const_decl, ident, member, num_lit, rest_pat, this_expr};

    #[test]
    fn member_uses_an_identifier_property() {
        let Expr::Member(member) = member(this_expr(), "bind") else {
            panic!("expected a member expression");
        };
        assert!(matches!(*member.obj, Expr::This(_)));
        match member.prop {
            MemberProp::Ident(prop) => assert_eq!(&*prop.sym, "bind"),
            _ => panic!("expected an identifier property"),
        }
    }

    #[test]
    fn const_decl_binds_a_single_name() {
        let Stmt::Decl(Decl::Var(var)) = const_decl(ident("_memoize"), num_lit(1.0)) else {
            panic!("expected a var decl");
        };
        assert_eq!(var.decls.len(), 1);
        match &var.decls[0].name {
            Pat::Ident(binding) => assert_eq!(&*binding.id.sym, "_memoize"),
            _ => panic!("expected an identifier binding"),
        }
        assert!(matches!(
            var.decls[0].init.as_deref(),
            Some(Expr::Lit(Lit::Num(num))) if num.value == 1.0
        ));
    }

    #[test]
    fn rest_pat_wraps_an_identifier() {
        match rest_pat(ident("args")) {
            Pat::Rest(rest) => assert!(matches!(*rest.arg, Pat::Ident(_))),
            _ => panic!("expected a rest pattern"),
        }
    }
}
