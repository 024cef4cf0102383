use ahash::AHashSet;
use swc_atoms::Atom;
use swc_ecma_ast::{
    ArrowExpr, BlockStmtOrExpr, BreakStmt, CatchClause, ClassDecl, ClassExpr, ContinueStmt,
    FnDecl, FnExpr, Id, Ident, JSXClosingElement, JSXElementName, LabeledStmt, MemberExpr, MemberProp, ObjectPatProp,
    Param, Pat, SetterProp, SuperProp, SuperPropExpr, TsType, TsTypeParamDecl,
    TsTypeParamInstantiation, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

/// Computes the identifiers a closure must be handed when it is hoisted out
/// of its enclosing function.
///
/// References are returned in pre-order source order, parameter defaults
/// first. A variable referenced several times appears once per reference.
pub fn captured_variables(params: &[Pat], body: &BlockStmtOrExpr) -> Vec<Ident> {
    let mut param_names = AHashSet::default();
    for param in params {
        bound_names(param, &mut |ident| {
            param_names.insert(ident.sym.clone());
        });
    }

    let mut locals = LocalDeclarations::default();
    for param in params {
        param.visit_with(&mut locals);
    }
    body.visit_with(&mut locals);

    // binding names in the patterns are all parameter names, so walking the
    // whole pattern only picks up references in default values
    let mut collector = CaptureCollector {
        param_names: &param_names,
        locals: &locals.ids,
        captured: Vec::new(),
    };
    for param in params {
        param.visit_with(&mut collector);
    }
    body.visit_with(&mut collector);
    collector.captured
}

/// Drops repeated captures of the same binding, keeping the first occurrence.
pub fn dedupe_captures(captured: Vec<Ident>) -> Vec<Ident> {
    let mut seen = AHashSet::default();
    captured
        .into_iter()
        .filter(|ident| seen.insert(ident.to_id()))
        .collect()
}

/// Calls `on_binding` for every identifier a binding pattern declares.
fn bound_names(pattern: &Pat, on_binding: &mut impl FnMut(&Ident)) {
    match pattern {
        Pat::Ident(binding) => on_binding(&binding.id),
        Pat::Array(array_pat) => {
            for element in array_pat.elems.iter().flatten() {
                bound_names(element, on_binding);
            }
        }
        Pat::Object(object_pat) => {
            for prop in &object_pat.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => bound_names(&kv.value, on_binding),
                    // `let { a = fallback } = obj`
                    ObjectPatProp::Assign(assign) => on_binding(&assign.key.id),
                    ObjectPatProp::Rest(rest) => bound_names(&rest.arg, on_binding),
                }
            }
        }
        Pat::Rest(rest) => bound_names(&rest.arg, on_binding),
        Pat::Assign(assign) => bound_names(&assign.left, on_binding),
        Pat::Expr(_) | Pat::Invalid(_) => {}
    }
}

/// Every binding introduced anywhere inside a closure body, at any depth.
#[derive(Default)]
struct LocalDeclarations {
    ids: AHashSet<Id>,
}

impl LocalDeclarations {
    fn declare_pat(&mut self, pattern: &Pat) {
        bound_names(pattern, &mut |ident| {
            self.ids.insert(ident.to_id());
        });
    }

    fn declare(&mut self, ident: &Ident) {
        self.ids.insert(ident.to_id());
    }
}

impl Visit for LocalDeclarations {
    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        self.declare_pat(&node.name);
        node.visit_children_with(self);
    }

    fn visit_param(&mut self, node: &Param) {
        self.declare_pat(&node.pat);
        node.visit_children_with(self);
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        for param in &node.params {
            self.declare_pat(param);
        }
        node.visit_children_with(self);
    }

    fn visit_setter_prop(&mut self, node: &SetterProp) {
        self.declare_pat(&node.param);
        node.visit_children_with(self);
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        if let Some(param) = &node.param {
            self.declare_pat(param);
        }
        node.visit_children_with(self);
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.declare(&node.ident);
        node.visit_children_with(self);
    }

    fn visit_fn_expr(&mut self, node: &FnExpr) {
        if let Some(ident) = &node.ident {
            self.declare(ident);
        }
        node.visit_children_with(self);
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.declare(&node.ident);
        node.visit_children_with(self);
    }

    fn visit_class_expr(&mut self, node: &ClassExpr) {
        if let Some(ident) = &node.ident {
            self.declare(ident);
        }
        node.visit_children_with(self);
    }
}

struct CaptureCollector<'a> {
    param_names: &'a AHashSet<Atom>,
    locals: &'a AHashSet<Id>,
    captured: Vec<Ident>,
}

/// `<div>` and `<my-element>` name host elements, not variables.
fn is_intrinsic_tag(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase()) || name.contains('-')
}

impl Visit for CaptureCollector<'_> {
    fn visit_ident(&mut self, node: &Ident) {
        if self.param_names.contains(&node.sym) {
            return;
        }
        // cannot be passed as a parameter; inside the hoisted function it
        // names that function's own arguments object
        if &*node.sym == "arguments" {
            return;
        }
        if self.locals.contains(&node.to_id()) {
            return;
        }
        self.captured.push(node.clone());
    }

    // only the object of a member access is a variable reference; the
    // property is one too when it is computed
    fn visit_member_expr(&mut self, node: &MemberExpr) {
        node.obj.visit_with(self);
        if let MemberProp::Computed(computed) = &node.prop {
            computed.visit_with(self);
        }
    }

    fn visit_super_prop_expr(&mut self, node: &SuperPropExpr) {
        if let SuperProp::Computed(computed) = &node.prop {
            computed.visit_with(self);
        }
    }

    fn visit_jsx_element_name(&mut self, node: &JSXElementName) {
        match node {
            JSXElementName::Ident(ident) if is_intrinsic_tag(&ident.sym) => {}
            _ => node.visit_children_with(self),
        }
    }

    // always repeats the opening tag's name
    fn visit_jsx_closing_element(&mut self, _node: &JSXClosingElement) {}

    fn visit_labeled_stmt(&mut self, node: &LabeledStmt) {
        node.body.visit_with(self);
    }

    fn visit_break_stmt(&mut self, _node: &BreakStmt) {}

    fn visit_continue_stmt(&mut self, _node: &ContinueStmt) {}

    fn visit_ts_type(&mut self, _node: &TsType) {}

    fn visit_ts_type_param_decl(&mut self, _node: &TsTypeParamDecl) {}

    fn visit_ts_type_param_instantiation(&mut self, _node: &TsTypeParamInstantiation) {}
}
