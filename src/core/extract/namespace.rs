//! Namespace resolution.
//!
//! Precedence, highest first: the call-site `ns` option, the JSX `ns`
//! attribute, the namespace carried by the translator binding (hook or HOC
//! argument, or the member's default), then [`DEFAULT_NAMESPACE`].

use swc_ecma_ast::{Expr, Prop, PropOrSpread};

use super::{
    helpers::{extract_prop_name, unwrap_ts_expr},
    translator::TranslatorBinding,
    value_analyzer::ValueAnalyzer,
};
use crate::core::DEFAULT_NAMESPACE;

/// Evaluate a namespace argument. For an array of namespaces only the first
/// entry is active.
pub fn eval_namespace(expr: &Expr, analyzer: &ValueAnalyzer<'_>) -> Option<String> {
    match unwrap_ts_expr(expr) {
        Expr::Array(arr) => {
            let first = arr.elems.first()?.as_ref()?;
            if first.spread.is_some() {
                return None;
            }
            analyzer.analyze_expr(&first.expr)
        }
        other => analyzer.analyze_expr(other).or_else(|| {
            analyzer
                .analyze_string_array(other)
                .and_then(|values| values.into_iter().next())
        }),
    }
}

/// The `ns` entry of a translator call's options object.
pub fn options_namespace(options: &Expr, analyzer: &ValueAnalyzer<'_>) -> Option<String> {
    let Expr::Object(obj) = unwrap_ts_expr(options) else {
        return None;
    };
    // Later properties win, as in an object literal.
    obj.props.iter().rev().find_map(|prop| {
        let PropOrSpread::Prop(prop) = prop else {
            return None;
        };
        match &**prop {
            Prop::KeyValue(kv) if extract_prop_name(&kv.key).as_deref() == Some("ns") => {
                eval_namespace(&kv.value, analyzer)
            }
            Prop::Shorthand(ident) if ident.sym == "ns" => {
                eval_namespace(&Expr::Ident(ident.clone()), analyzer)
            }
            _ => None,
        }
    })
}

pub fn resolve_namespace(
    call_site: Option<String>,
    jsx: Option<String>,
    binding: &TranslatorBinding,
) -> String {
    call_site
        .or(jsx)
        .or_else(|| binding.namespace.clone())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
}
