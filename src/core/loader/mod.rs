//! Module loading.
//!
//! Resolves import specifiers (see `resolver`), parses local files once and
//! builds their `BindingTable`. Concurrent requests for the same module share
//! one parse.

pub mod resolver;
pub mod tsconfig;

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use anyhow::{Context, Result};
use swc_common::SourceMap;
use swc_ecma_ast::Module;

pub use resolver::{ImportTarget, Resolver};

use crate::core::{ModuleId, bindings::BindingTable, parsers::jsx::parse_module_source};

/// A parsed local module and its top-level bindings.
#[derive(Debug)]
pub struct ParsedModule {
    pub id: ModuleId,
    pub module: Module,
    pub table: BindingTable,
}

/// A file that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of loading an import specifier.
#[derive(Debug, Clone)]
pub enum LoadResult {
    Resolved(Arc<ParsedModule>),
    External(String),
    NotFound,
}

type ModuleCell = Arc<OnceLock<Option<Arc<ParsedModule>>>>;

pub struct ModuleLoader {
    resolver: Resolver,
    cache: Mutex<HashMap<ModuleId, ModuleCell>>,
    failures: Mutex<Vec<ParseFailure>>,
}

impl ModuleLoader {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            cache: Mutex::new(HashMap::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    pub fn resolve(&self, specifier: &str, from_dir: &Path) -> ImportTarget {
        self.resolver.resolve(specifier, from_dir)
    }

    /// Resolve `specifier` from `from` and parse the target if it is local.
    pub fn load(&self, specifier: &str, from: &ModuleId) -> LoadResult {
        match self.resolve(specifier, from.dir()) {
            ImportTarget::Local(id) => match self.module(&id) {
                Some(module) => LoadResult::Resolved(module),
                None => LoadResult::NotFound,
            },
            ImportTarget::External(package) => LoadResult::External(package),
            ImportTarget::NotFound => LoadResult::NotFound,
        }
    }

    /// The parsed module for `id`, or `None` if it failed to load.
    ///
    /// Each id is parsed at most once; callers racing on the same id block on
    /// the same cell.
    pub fn module(&self, id: &ModuleId) -> Option<Arc<ParsedModule>> {
        let cell = {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cache.entry(id.clone()).or_default())
        };

        cell.get_or_init(|| match self.parse(id) {
            Ok(module) => Some(Arc::new(module)),
            Err(err) => {
                tracing::warn!(path = %id, "skipping module: {:#}", err);
                self.failures
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(ParseFailure {
                        path: id.path().to_path_buf(),
                        error: format!("{:#}", err),
                    });
                None
            }
        })
        .clone()
    }

    fn parse(&self, id: &ModuleId) -> Result<ParsedModule> {
        let code = fs::read_to_string(id.path())
            .with_context(|| format!("Failed to read {}", id.path().display()))?;
        let module = parse_module_source(code, id.path(), Arc::new(SourceMap::default()))?;
        let table = BindingTable::build(&module, |specifier| self.resolve(specifier, id.dir()));
        tracing::trace!(path = %id, "parsed module");

        Ok(ParsedModule {
            id: id.clone(),
            module,
            table,
        })
    }

    /// Files that failed to load so far, sorted by path.
    pub fn parse_failures(&self) -> Vec<ParseFailure> {
        let mut failures = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        failures.sort_by(|a, b| a.path.cmp(&b.path));
        failures
    }
}
