//! Value analyzer for translation key expressions.
//!
//! A fail-closed constant folder over a tiny grammar: string literals,
//! template literals, `+` concatenation and identifiers looked up through an
//! [`Env`]. Anything else yields `None`; the analyzer never guesses.

use std::collections::{BTreeSet, HashMap};

use swc_ecma_ast::{BinExpr, BinaryOp, Expr, Ident, Lit, Tpl};
use swc_ecma_visit::{Visit, VisitWith};

use super::helpers::unwrap_ts_expr;

/// Array methods whose callback receives the array elements.
pub const ITERATOR_METHODS: &[&str] = &[
    "map", "forEach", "filter", "find", "some", "every", "flatMap",
];

/// Upper bound on iteration-variable combinations evaluated for one call.
pub const MAX_COMBINATIONS: usize = 256;

/// Name lookup for the value analyzer.
pub trait Env {
    /// The string value bound to `name`, if statically known.
    fn string(&self, name: &str) -> Option<String>;

    /// The literal string array bound to `name`, if statically known.
    fn string_array(&self, _name: &str) -> Option<Vec<String>> {
        None
    }
}

/// One evaluated operand. Numbers may take part in concatenation but are
/// never keys on their own.
struct Part {
    text: String,
    is_string: bool,
}

impl Part {
    fn string(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_string: true,
        }
    }

    fn number(text: String) -> Self {
        Self {
            text,
            is_string: false,
        }
    }
}

pub struct ValueAnalyzer<'e> {
    env: &'e dyn Env,
}

impl<'e> ValueAnalyzer<'e> {
    pub fn new(env: &'e dyn Env) -> Self {
        Self { env }
    }

    /// Main entry point: fold `expr` to a string.
    pub fn analyze_expr(&self, expr: &Expr) -> Option<String> {
        self.analyze_part(expr)
            .filter(|part| part.is_string)
            .map(|part| part.text)
    }

    fn analyze_part(&self, expr: &Expr) -> Option<Part> {
        match unwrap_ts_expr(expr) {
            Expr::Lit(Lit::Str(s)) => s.value.as_str().map(Part::string),
            Expr::Lit(Lit::Num(n)) => format_integer(n.value).map(Part::number),
            Expr::Tpl(tpl) => self.analyze_template(tpl).map(Part::string),
            Expr::Bin(bin) => self.analyze_binary(bin),
            Expr::Ident(ident) => self.analyze_ident(ident).map(Part::string),
            _ => None,
        }
    }

    /// Every interpolation must resolve, otherwise the whole template fails.
    fn analyze_template(&self, tpl: &Tpl) -> Option<String> {
        let mut out = String::new();
        for (index, quasi) in tpl.quasis.iter().enumerate() {
            out.push_str(quasi.cooked.as_ref().and_then(|s| s.as_str())?);
            if let Some(expr) = tpl.exprs.get(index) {
                out.push_str(&self.analyze_part(expr)?.text);
            }
        }
        Some(out)
    }

    fn analyze_binary(&self, bin: &BinExpr) -> Option<Part> {
        if bin.op != BinaryOp::Add {
            return None;
        }
        let left = self.analyze_part(&bin.left)?;
        let right = self.analyze_part(&bin.right)?;
        // `1 + 2` is arithmetic, not concatenation.
        if !left.is_string && !right.is_string {
            return None;
        }
        Some(Part::string(left.text + right.text.as_str()))
    }

    fn analyze_ident(&self, ident: &Ident) -> Option<String> {
        self.env.string(ident.sym.as_str())
    }

    /// Fold `expr` to a literal string array: inline, or bound by name.
    pub fn analyze_string_array(&self, expr: &Expr) -> Option<Vec<String>> {
        match unwrap_ts_expr(expr) {
            Expr::Array(arr) => arr
                .elems
                .iter()
                .map(|elem| {
                    let elem = elem.as_ref()?;
                    if elem.spread.is_some() {
                        return None;
                    }
                    self.analyze_expr(&elem.expr)
                })
                .collect(),
            Expr::Ident(ident) => self.env.string_array(ident.sym.as_str()),
            _ => None,
        }
    }
}

fn format_integer(value: f64) -> Option<String> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15)
        .then(|| format!("{}", value as i64))
}

struct IdentCollector {
    names: BTreeSet<String>,
}

impl Visit for IdentCollector {
    fn visit_ident(&mut self, ident: &Ident) {
        self.names.insert(ident.sym.to_string());
    }
}

/// Identifiers read by `expr`. Property names are not references.
pub fn referenced_idents(expr: &Expr) -> BTreeSet<String> {
    let mut collector = IdentCollector {
        names: BTreeSet::new(),
    };
    expr.visit_with(&mut collector);
    collector.names
}

/// Every assignment of the given iteration variables to one of their values.
///
/// With no variables this is a single empty assignment. The result is cut off
/// at [`MAX_COMBINATIONS`].
pub fn combinations(vars: &[(String, Vec<String>)]) -> Vec<HashMap<String, String>> {
    let mut assignments = vec![HashMap::new()];
    for (name, values) in vars {
        let mut next = Vec::new();
        'outer: for assignment in &assignments {
            for value in values {
                if next.len() >= MAX_COMBINATIONS {
                    tracing::debug!(variable = %name, "iteration combinations truncated");
                    break 'outer;
                }
                let mut extended = assignment.clone();
                extended.insert(name.clone(), value.clone());
                next.push(extended);
            }
        }
        assignments = next;
    }
    assignments
}
