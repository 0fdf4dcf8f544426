//! i18n-scan - static extraction of i18next / react-i18next translation keys
//!
//! Walks the module graph of a TypeScript/JSX project from its entry files
//! and reports every translation key that can be resolved without running
//! the code, grouped by namespace.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (loader, symbol resolution, classifier, walker)
//! - `logging`: `tracing` subscriber setup for the CLI
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! let options = i18n_scan::ScanOptions {
//!     entry_paths: vec![PathBuf::from("src/index.tsx")],
//!     ..Default::default()
//! };
//! let report = i18n_scan::scan(&options)?;
//! for (namespace, keys) in report.result.iter() {
//!     println!("{namespace}: {}", keys.len());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod logging;

pub use crate::core::{
    DEFAULT_NAMESPACE, I18nMember, I18nPackage, KeyOccurrence, Role, ScanOptions, ScanReport,
    ScanResult, scan,
};
