//! Memoized call-site expansion of local functions.
//!
//! Key wrappers (`const tk = (k) => t(k)`) and derived hooks
//! (`const useFeT = () => useTranslation('fe')`) are analyzed once per
//! distinct argument tuple and the result is shared across files and threads.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use super::translator::{FunctionRef, ScopeBinding, TranslatorBinding};
use crate::core::KeyOccurrence;

/// A statically known argument of an expanded call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgValue {
    Literal(String),
    Translator(TranslatorBinding),
    TranslatorObject(TranslatorBinding),
    Unknown,
}

impl ArgValue {
    pub fn from_binding(binding: ScopeBinding) -> Self {
        match binding {
            ScopeBinding::Literal(value) => Self::Literal(value),
            ScopeBinding::Translator(binding) => Self::Translator(binding),
            ScopeBinding::TranslatorObject(binding) => Self::TranslatorObject(binding),
            _ => Self::Unknown,
        }
    }

    pub fn into_binding(self) -> Option<ScopeBinding> {
        match self {
            Self::Literal(value) => Some(ScopeBinding::Literal(value)),
            Self::Translator(binding) => Some(ScopeBinding::Translator(binding)),
            Self::TranslatorObject(binding) => Some(ScopeBinding::TranslatorObject(binding)),
            Self::Unknown => None,
        }
    }
}

/// What one expansion of a function body produced.
#[derive(Debug)]
pub struct Expansion {
    pub occurrences: Vec<KeyOccurrence>,
    /// The translator-like value the function returns, if any.
    pub returned: Option<ScopeBinding>,
}

type ExpansionKey = (FunctionRef, Vec<ArgValue>);

#[derive(Default)]
pub struct ExpansionCache {
    memo: Mutex<HashMap<ExpansionKey, Arc<Expansion>>>,
}

impl ExpansionCache {
    pub fn get(&self, function: &FunctionRef, args: &[ArgValue]) -> Option<Arc<Expansion>> {
        self.memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(function.clone(), args.to_vec()))
            .cloned()
    }

    pub fn insert(&self, function: FunctionRef, args: Vec<ArgValue>, expansion: Arc<Expansion>) {
        self.memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((function, args), expansion);
    }
}
