//! Extraction engine.
//!
//! Turns a set of entry files into a `namespace → keys` inventory:
//!
//! 1. **Loading**: `loader` resolves import specifiers (relative paths and
//!    tsconfig aliases), parses each local module once and builds its
//!    `BindingTable`.
//! 2. **Recognition**: `registry` maps `(package, exported name)` to an i18n role;
//!    `symbols` follows imports, re-exports and aliases across modules.
//! 3. **Extraction**: `extract::FileAnalyzer` walks a module, tracks translator
//!    bindings per scope and evaluates key/namespace expressions.
//! 4. **Aggregation**: `walker` visits every reachable module once and merges
//!    occurrences into the `aggregate::Aggregator`.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};

pub mod aggregate;
pub mod bindings;
pub mod context;
pub mod extract;
pub mod loader;
pub mod parsers;
pub mod registry;
pub mod symbols;
pub mod walker;

pub use aggregate::{Aggregator, ScanReport, ScanResult};
pub use context::ScanContext;
pub use registry::{I18nMember, I18nPackage, RecognizerRegistry, Role};

/// Namespace used when neither the call site nor the binding names one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Canonical identity of a source file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(PathBuf);

impl ModuleId {
    /// Canonicalizes the path when it exists, so two spellings of the same
    /// file share one id.
    pub fn new(path: &Path) -> Self {
        Self(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Directory relative specifiers are resolved against.
    pub fn dir(&self) -> &Path {
        self.0.parent().unwrap_or_else(|| Path::new(""))
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One statically resolved `(namespace, key)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyOccurrence {
    pub namespace: String,
    pub key: String,
}

impl KeyOccurrence {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }
}

/// Everything a scan needs, already resolved to concrete paths.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub entry_paths: Vec<PathBuf>,
    pub tsconfig_path: Option<PathBuf>,
    pub externals: Vec<String>,
    pub extend_i18n_packages: Vec<I18nPackage>,
}

/// Scan the module graph reachable from `options.entry_paths`.
///
/// Only configuration problems are errors: no entries, a missing entry file,
/// or an unreadable tsconfig. Unresolvable imports, files that fail to parse
/// and keys that cannot be evaluated statically are skipped.
pub fn scan(options: &ScanOptions) -> Result<ScanReport> {
    if options.entry_paths.is_empty() {
        bail!("No entry paths provided");
    }

    let mut entries = Vec::with_capacity(options.entry_paths.len());
    for path in &options.entry_paths {
        if !path.is_file() {
            bail!("Entry file not found: {}", path.display());
        }
        entries.push(ModuleId::new(path));
    }

    let ctx = ScanContext::new(options)?;
    Ok(walker::walk(&ctx, &entries))
}
