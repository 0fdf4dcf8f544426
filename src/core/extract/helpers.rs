//! Helper functions for AST node extraction.
//!
//! Pure functions with no state dependencies.

use swc_ecma_ast::{
    ArrowExpr, BlockStmtOrExpr, Expr, Function, JSXAttrName, JSXAttrOrSpread, JSXAttrValue,
    JSXExpr, JSXOpeningElement, Lit, MemberProp, ModuleExportName, ObjectPatProp, Pat, PropName,
};

/// Unwrap parentheses and TypeScript-specific expression wrappers to get the inner expression.
pub fn unwrap_ts_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::TsAs(ts_as) => unwrap_ts_expr(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_ts_expr(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_ts_expr(&ts_sat.expr),
        Expr::TsNonNull(non_null) => unwrap_ts_expr(&non_null.expr),
        Expr::TsTypeAssertion(assertion) => unwrap_ts_expr(&assertion.expr),
        Expr::Paren(paren) => unwrap_ts_expr(&paren.expr),
        _ => expr,
    }
}

/// Extract all identifier names from a pattern (handles destructuring).
/// Supports: simple ident, object destructuring, array destructuring,
/// default values, rest patterns, and renamed destructuring.
pub fn extract_binding_names(pat: &Pat) -> Vec<String> {
    match pat {
        Pat::Ident(ident) => vec![ident.id.sym.to_string()],
        Pat::Object(obj) => obj
            .props
            .iter()
            .flat_map(|prop| match prop {
                ObjectPatProp::KeyValue(kv) => extract_binding_names(&kv.value),
                ObjectPatProp::Assign(assign) => vec![assign.key.sym.to_string()],
                ObjectPatProp::Rest(rest) => extract_binding_names(&rest.arg),
            })
            .collect(),
        Pat::Array(arr) => arr
            .elems
            .iter()
            .flatten()
            .flat_map(extract_binding_names)
            .collect(),
        Pat::Assign(assign) => extract_binding_names(&assign.left),
        Pat::Rest(rest) => extract_binding_names(&rest.arg),
        _ => vec![],
    }
}

/// Extract property name from a PropName node.
pub fn extract_prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(|s| s.to_string()),
        _ => None,
    }
}

/// Static property name of a member access: `a.b` or `a["b"]`.
pub fn extract_member_name(prop: &MemberProp) -> Option<String> {
    match prop {
        MemberProp::Ident(ident) => Some(ident.sym.to_string()),
        MemberProp::Computed(computed) => match unwrap_ts_expr(&computed.expr) {
            Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| s.to_string()),
            _ => None,
        },
        MemberProp::PrivateName(_) => None,
    }
}

pub fn export_name(name: &ModuleExportName) -> Option<String> {
    match name {
        ModuleExportName::Ident(ident) => Some(ident.sym.to_string()),
        ModuleExportName::Str(s) => s.value.as_str().map(|s| s.to_string()),
    }
}

/// Look up a JSX attribute by name on an opening element.
pub fn jsx_attr<'j>(opening: &'j JSXOpeningElement, name: &str) -> Option<&'j JSXAttrValue> {
    opening.attrs.iter().find_map(|attr| match attr {
        JSXAttrOrSpread::JSXAttr(attr) => match &attr.name {
            JSXAttrName::Ident(ident) if ident.sym == name => attr.value.as_ref(),
            _ => None,
        },
        JSXAttrOrSpread::SpreadElement(_) => None,
    })
}

/// The expression inside `attr={...}`, if any.
pub fn jsx_attr_expr(value: &JSXAttrValue) -> Option<&Expr> {
    match value {
        JSXAttrValue::JSXExprContainer(container) => match &container.expr {
            JSXExpr::Expr(expr) => Some(expr),
            JSXExpr::JSXEmptyExpr(_) => None,
        },
        _ => None,
    }
}

/// An arrow function or a `function` declaration/expression.
#[derive(Debug, Clone, Copy)]
pub enum FnLike<'a> {
    Arrow(&'a ArrowExpr),
    Function(&'a Function),
}

impl<'a> FnLike<'a> {
    pub fn from_expr(expr: &'a Expr) -> Option<Self> {
        match unwrap_ts_expr(expr) {
            Expr::Arrow(arrow) => Some(Self::Arrow(arrow)),
            Expr::Fn(fn_expr) => Some(Self::Function(&fn_expr.function)),
            _ => None,
        }
    }

    pub fn params(&self) -> Vec<&'a Pat> {
        match self {
            Self::Arrow(arrow) => arrow.params.iter().collect(),
            Self::Function(function) => function.params.iter().map(|param| &param.pat).collect(),
        }
    }

    /// The expression body of a concise arrow, `() => expr`.
    pub fn expr_body(&self) -> Option<&'a Expr> {
        match self {
            Self::Arrow(arrow) => match &*arrow.body {
                BlockStmtOrExpr::Expr(expr) => Some(expr),
                BlockStmtOrExpr::BlockStmt(_) => None,
            },
            Self::Function(_) => None,
        }
    }
}
