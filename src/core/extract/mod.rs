//! Call-site extraction.
//!
//! Walks one module at a time and classifies translator calls, `<Trans>`
//! elements and the indirections between them (aliases, wrappers, derived
//! hooks, HOC props, render props) into `(namespace, key)` occurrences.

pub mod binding_context;
pub mod expansion;
pub mod file_analyzer;
pub mod helpers;
pub mod namespace;
pub mod translator;
pub mod value_analyzer;

pub use binding_context::BindingContext;
pub use file_analyzer::FileAnalyzer;
pub use translator::{ScopeBinding, TranslatorBinding, TranslatorRole};
pub use value_analyzer::ValueAnalyzer;
