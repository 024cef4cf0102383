use serde::Serialize;
use swc_atoms::Atom;
use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, ClassMethod, Expr, FnDecl, FnExpr, Function, JSXElement, JSXFragment, MethodProp,
    Program, PropName, Stmt,
};
use swc_ecma_visit::{Visit, VisitWith};

/// The function shapes that can own a binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderFunctionKind {
    /// `render() { ... }` in a class body or an object literal
    RenderMethod,
    FnDecl,
    FnExpr,
    Arrow,
}

/// A function that produces markup, as found in the untransformed module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFunction {
    pub kind: RenderFunctionKind,
    pub name: Option<String>,
    #[serde(skip)]
    pub span: Span,
    /// Index of the top-level statement the function is nested in.
    pub insertion_point: usize,
}

/// Depth-first search for a JSX element or fragment, stopping at the first hit.
pub struct UiElementFinder {
    found: bool,
}

impl Visit for UiElementFinder {
    fn visit_jsx_element(&mut self, _node: &JSXElement) {
        self.found = true;
    }

    fn visit_jsx_fragment(&mut self, _node: &JSXFragment) {
        self.found = true;
    }

    fn visit_expr(&mut self, node: &Expr) {
        if !self.found {
            node.visit_children_with(self);
        }
    }

    fn visit_stmt(&mut self, node: &Stmt) {
        if !self.found {
            node.visit_children_with(self);
        }
    }
}

pub fn contains_ui_element<N: VisitWith<UiElementFinder>>(node: &N) -> bool {
    let mut finder = UiElementFinder { found: false };
    node.visit_with(&mut finder);
    finder.found
}

fn is_render_key(key: &PropName) -> bool {
    matches!(key, PropName::Ident(name) if &*name.sym == "render")
}

/// A method qualifies only when it is literally named `render`.
pub fn is_render_method(key: &PropName, function: &Function) -> bool {
    is_render_key(key) && contains_ui_element(function)
}

pub fn is_render_fn_decl(node: &FnDecl) -> bool {
    contains_ui_element(&*node.function)
}

pub fn is_render_fn_expr(node: &FnExpr) -> bool {
    contains_ui_element(&*node.function)
}

pub fn is_render_arrow(node: &ArrowExpr) -> bool {
    contains_ui_element(&*node.body)
}

/// Lists every render function in `program`, in source order.
///
/// Functions nested inside other render functions are listed as well; the
/// transform processes each of them independently.
pub fn find_render_functions(program: &Program) -> Vec<RenderFunction> {
    let mut found = Vec::new();
    match program {
        Program::Module(module) => {
            for (insertion_point, item) in module.body.iter().enumerate() {
                item.visit_with(&mut RenderFunctionCollector {
                    insertion_point,
                    found: &mut found,
                });
            }
        }
        Program::Script(script) => {
            for (insertion_point, stmt) in script.body.iter().enumerate() {
                stmt.visit_with(&mut RenderFunctionCollector {
                    insertion_point,
                    found: &mut found,
                });
            }
        }
    }
    found
}

struct RenderFunctionCollector<'a> {
    insertion_point: usize,
    found: &'a mut Vec<RenderFunction>,
}

impl RenderFunctionCollector<'_> {
    fn push(&mut self, kind: RenderFunctionKind, name: Option<&Atom>, span: Span) {
        self.found.push(RenderFunction {
            kind,
            name: name.map(|n| n.to_string()),
            span,
            insertion_point: self.insertion_point,
        });
    }
}

impl Visit for RenderFunctionCollector<'_> {
    fn visit_class_method(&mut self, node: &ClassMethod) {
        if is_render_method(&node.key, &node.function) {
            let name = Atom::from("render");
            self.push(RenderFunctionKind::RenderMethod, Some(&name), node.span);
        }
        node.visit_children_with(self);
    }

    fn visit_method_prop(&mut self, node: &MethodProp) {
        if is_render_method(&node.key, &node.function) {
            let name = Atom::from("render");
            self.push(RenderFunctionKind::RenderMethod, Some(&name), node.function.span);
        }
        node.visit_children_with(self);
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        if is_render_fn_decl(node) {
            self.push(RenderFunctionKind::FnDecl, Some(&node.ident.sym), node.span());
        }
        node.visit_children_with(self);
    }

    fn visit_fn_expr(&mut self, node: &FnExpr) {
        if is_render_fn_expr(node) {
            let name = node.ident.as_ref().map(|ident| &ident.sym);
            self.push(RenderFunctionKind::FnExpr, name, node.function.span);
        }
        node.visit_children_with(self);
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        if is_render_arrow(node) {
            self.push(RenderFunctionKind::Arrow, None, node.span);
        }
        node.visit_children_with(self);
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use swc_utils_parse::parse_ecma_src;

    use super::{find_render_functions, RenderFunctionKind};

    fn detect(src: &str) -> Vec<(RenderFunctionKind, Option<String>, usize)> {
        let (_cm, program) = parse_ecma_src("test.jsx", src);
        find_render_functions(&program)
            .into_iter()
            .map(|f| (f.kind, f.name, f.insertion_point))
            .collect()
    }

    #[test]
    fn class_render_method_with_jsx() {
        assert_eq!(
            detect(
                r#"
                import React from "react";
                class App extends React.Component {
                    render() { return <div />; }
                }
                "#
            ),
            vec![(RenderFunctionKind::RenderMethod, Some("render".to_string()), 1)]
        );
    }

    #[test]
    fn render_method_without_jsx_is_ignored() {
        assert_eq!(
            detect("class App { render() { return this.f.bind(this); } }"),
            vec![]
        );
    }

    #[test]
    fn other_methods_are_ignored_even_with_jsx() {
        assert_eq!(
            detect("class App { renderRow() { return <li />; } }"),
            vec![]
        );
    }

    #[test]
    fn object_literal_render_method() {
        assert_eq!(
            detect("const view = { render() { return <p />; } };"),
            vec![(RenderFunctionKind::RenderMethod, Some("render".to_string()), 0)]
        );
    }

    #[test]
    fn function_shapes_anywhere_in_the_module() {
        assert_eq!(
            detect(
                r#"
                function Decl() { return <a />; }
                const Expr = function Named() { return <b />; };
                export default () => <c />;
                function plain() { return 1; }
                "#
            ),
            vec![
                (RenderFunctionKind::FnDecl, Some("Decl".to_string()), 0),
                (RenderFunctionKind::FnExpr, Some("Named".to_string()), 1),
                (RenderFunctionKind::Arrow, None, 2),
            ]
        );
    }

    #[test]
    fn fragments_count_as_markup() {
        assert_eq!(
            detect("const List = () => <></>;"),
            vec![(RenderFunctionKind::Arrow, None, 0)]
        );
    }

    #[test]
    fn nested_render_functions_are_listed_at_both_levels() {
        assert_eq!(
            detect(
                r#"
                function List({ items }) {
                    return <ul>{items.map((item) => <li>{item}</li>)}</ul>;
                }
                "#
            ),
            vec![
                (RenderFunctionKind::FnDecl, Some("List".to_string()), 0),
                (RenderFunctionKind::Arrow, None, 0),
            ]
        );
    }

    #[test]
    fn modules_without_markup_have_no_render_functions() {
        assert_eq!(
            detect("export function add(a, b) { return [a, b].map((x) => x.bind(this)); }"),
            vec![]
        );
    }
}
