//! Merging of key occurrences into the final inventory.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::{KeyOccurrence, loader::ParseFailure};

/// `namespace → set of keys`, ordered for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanResult(BTreeMap<String, BTreeSet<String>>);

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the pair was already present.
    pub fn insert(&mut self, namespace: impl Into<String>, key: impl Into<String>) -> bool {
        self.0.entry(namespace.into()).or_default().insert(key.into())
    }

    pub fn get(&self, namespace: &str) -> Option<&BTreeSet<String>> {
        self.0.get(namespace)
    }

    pub fn contains(&self, namespace: &str, key: &str) -> bool {
        self.get(namespace).is_some_and(|keys| keys.contains(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.0.iter()
    }

    pub fn namespace_count(&self) -> usize {
        self.0.len()
    }

    pub fn key_count(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, BTreeSet<String>> {
        self.0
    }
}

impl FromIterator<KeyOccurrence> for ScanResult {
    fn from_iter<I: IntoIterator<Item = KeyOccurrence>>(iter: I) -> Self {
        let mut result = Self::new();
        for occurrence in iter {
            result.insert(occurrence.namespace, occurrence.key);
        }
        result
    }
}

/// Collects per-module occurrences into one [`ScanResult`].
///
/// Merging is a set union, so the result does not depend on the order in
/// which modules are analyzed.
#[derive(Debug, Default)]
pub struct Aggregator {
    result: ScanResult,
    modules: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, occurrences: impl IntoIterator<Item = KeyOccurrence>) {
        self.modules += 1;
        for occurrence in occurrences {
            self.result.insert(occurrence.namespace, occurrence.key);
        }
    }

    pub fn finish(self, parse_failures: Vec<ParseFailure>) -> ScanReport {
        ScanReport {
            result: self.result,
            modules_visited: self.modules,
            parse_failures,
        }
    }
}

/// Outcome of a scan: the inventory plus what was skipped along the way.
#[derive(Debug)]
pub struct ScanReport {
    pub result: ScanResult,
    pub modules_visited: usize,
    pub parse_failures: Vec<ParseFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_deduplicates() {
        let mut result = ScanResult::new();
        assert!(result.insert("default", "A"));
        assert!(!result.insert("default", "A"));
        assert!(result.insert("ns", "A"));
        assert_eq!(result.key_count(), 2);
        assert_eq!(result.namespace_count(), 2);
        assert!(result.contains("ns", "A"));
        assert!(!result.contains("ns", "B"));
    }

    #[test]
    fn test_merge_order_does_not_matter() {
        let a = vec![KeyOccurrence::new("default", "B"), KeyOccurrence::new("ns", "X")];
        let b = vec![KeyOccurrence::new("default", "A"), KeyOccurrence::new("default", "B")];

        let mut forward = Aggregator::new();
        forward.add_module(a.clone());
        forward.add_module(b.clone());
        let mut backward = Aggregator::new();
        backward.add_module(b);
        backward.add_module(a);

        let forward = forward.finish(Vec::new());
        let backward = backward.finish(Vec::new());
        assert_eq!(forward.result, backward.result);
        assert_eq!(forward.modules_visited, 2);
    }

    #[test]
    fn test_serializes_as_sorted_map() {
        let result: ScanResult = vec![
            KeyOccurrence::new("ns", "Z"),
            KeyOccurrence::new("default", "B"),
            KeyOccurrence::new("default", "A"),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"default":["A","B"],"ns":["Z"]}"#);
        let back: ScanResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
