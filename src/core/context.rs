use std::path::Path;

use anyhow::Result;

use crate::core::{
    ModuleId, ScanOptions,
    extract::expansion::ExpansionCache,
    loader::{ModuleLoader, Resolver, tsconfig::load_tsconfig},
    registry::RecognizerRegistry,
    symbols::SymbolTable,
};

/// Shared, read-mostly state of one scan.
///
/// The registry is immutable. The loader cache, the symbol table and the
/// expansion cache fill lazily and are shared by the walker's worker threads.
pub struct ScanContext {
    pub registry: RecognizerRegistry,
    pub loader: ModuleLoader,
    pub(crate) symbols: SymbolTable,
    pub(crate) expansions: ExpansionCache,
}

impl ScanContext {
    /// Build the context from scan options.
    ///
    /// Fails only when the tsconfig cannot be read or an externals pattern is invalid.
    pub fn new(options: &ScanOptions) -> Result<Self> {
        let tsconfig = options
            .tsconfig_path
            .as_deref()
            .map(load_tsconfig)
            .transpose()?;

        let registry = RecognizerRegistry::with_extensions(&options.extend_i18n_packages);
        let mut resolver = Resolver::new(&options.externals, tsconfig)?;

        // Package paths resolve relative to the first entry, like an import from it.
        let anchor = options
            .entry_paths
            .first()
            .map(|entry| ModuleId::new(entry).dir().to_path_buf())
            .unwrap_or_else(|| Path::new(".").to_path_buf());
        resolver.register_i18n_packages(registry.packages(), &anchor);

        Ok(Self {
            registry,
            loader: ModuleLoader::new(resolver),
            symbols: SymbolTable::default(),
            expansions: ExpansionCache::default(),
        })
    }
}
