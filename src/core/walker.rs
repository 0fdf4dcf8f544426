//! Module graph traversal.
//!
//! Breadth-first from the entries over local imports. Each frontier is
//! analyzed in parallel with rayon, then merged sequentially; a module is
//! analyzed at most once however many importers reach it.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::core::{
    KeyOccurrence, ModuleId, aggregate::Aggregator, aggregate::ScanReport, context::ScanContext,
    extract::FileAnalyzer,
};

/// What analyzing one module produced.
struct ModuleOutcome {
    occurrences: Vec<KeyOccurrence>,
    dependencies: Vec<ModuleId>,
}

pub fn walk(ctx: &ScanContext, entries: &[ModuleId]) -> ScanReport {
    let mut visited: HashSet<ModuleId> = HashSet::new();
    let mut frontier: Vec<ModuleId> = entries
        .iter()
        .filter(|id| visited.insert((*id).clone()))
        .cloned()
        .collect();
    let mut aggregator = Aggregator::new();

    while !frontier.is_empty() {
        tracing::debug!(modules = frontier.len(), "analyzing frontier");

        let outcomes: Vec<Option<ModuleOutcome>> =
            frontier.par_iter().map(|id| analyze_module(ctx, id)).collect();

        // Sequential merge keeps the visited set lock-free.
        let mut next = Vec::new();
        for outcome in outcomes.into_iter().flatten() {
            aggregator.add_module(outcome.occurrences);
            for dependency in outcome.dependencies {
                if visited.insert(dependency.clone()) {
                    next.push(dependency);
                }
            }
        }
        frontier = next;
    }

    aggregator.finish(ctx.loader.parse_failures())
}

fn analyze_module(ctx: &ScanContext, id: &ModuleId) -> Option<ModuleOutcome> {
    let module = ctx.loader.module(id)?;
    let occurrences = FileAnalyzer::new(ctx, &module).analyze();
    tracing::debug!(path = %id, keys = occurrences.len(), "analyzed module");

    Some(ModuleOutcome {
        occurrences,
        dependencies: module.table.local_dependencies().to_vec(),
    })
}
