//! Import specifier resolution.
//!
//! Maps `(specifier, importing directory)` to a local file, an opaque external
//! package, or nothing.

use std::{
    collections::{HashMap, HashSet},
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use regex::Regex;

use super::tsconfig::TsConfigPaths;
use crate::core::ModuleId;

/// Extensions probed for extensionless specifiers, in order.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Extensions accepted when a specifier names a file directly.
const PARSEABLE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mts", "cts", "mjs", "cjs"];

/// Where an import specifier leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportTarget {
    /// A source file that the loader parses.
    Local(ModuleId),
    /// An opaque package, known only through the recognizer registry.
    /// Carries the package name used for registry lookups.
    External(String),
    /// Relative or aliased specifier with no file behind it.
    NotFound,
}

enum Lookup {
    Found(PathBuf),
    Missing,
    Unmapped,
}

pub struct Resolver {
    externals: Vec<Regex>,
    i18n_packages: HashSet<String>,
    /// Local files that are registered i18n packages, keyed back to the package name.
    package_files: HashMap<ModuleId, String>,
    tsconfig: Option<TsConfigPaths>,
}

impl Resolver {
    pub fn new(externals: &[String], tsconfig: Option<TsConfigPaths>) -> Result<Self> {
        let externals = externals
            .iter()
            .map(|external| {
                let pattern = format!("^{}((!?/).*)?$", regex::escape(external));
                Regex::new(&pattern)
                    .with_context(|| format!("Invalid external specifier: \"{}\"", external))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            externals,
            i18n_packages: HashSet::new(),
            package_files: HashMap::new(),
            tsconfig,
        })
    }

    /// Mark registry packages as external.
    ///
    /// A package that resolves to a local file from `anchor_dir` (for example an
    /// alias such as `@app/i18n`) also claims that file, so relative imports of
    /// it are recognized under the package name.
    pub fn register_i18n_packages<'p>(
        &mut self,
        packages: impl IntoIterator<Item = &'p str>,
        anchor_dir: &Path,
    ) {
        for package in packages {
            if let Lookup::Found(path) = self.lookup(package, anchor_dir) {
                self.package_files
                    .insert(ModuleId::new(&path), package.to_string());
            }
            self.i18n_packages.insert(package.to_string());
        }
    }

    pub fn is_external(&self, specifier: &str) -> bool {
        self.externals.iter().any(|re| re.is_match(specifier))
    }

    pub fn resolve(&self, specifier: &str, from_dir: &Path) -> ImportTarget {
        if self.is_external(specifier) || self.i18n_packages.contains(specifier) {
            return ImportTarget::External(specifier.to_string());
        }

        match self.lookup(specifier, from_dir) {
            Lookup::Found(path) => {
                let id = ModuleId::new(&path);
                match self.package_files.get(&id) {
                    Some(package) => ImportTarget::External(package.clone()),
                    None => ImportTarget::Local(id),
                }
            }
            Lookup::Missing => {
                tracing::debug!(specifier, from = %from_dir.display(), "unresolved import");
                ImportTarget::NotFound
            }
            Lookup::Unmapped => ImportTarget::External(specifier.to_string()),
        }
    }

    fn lookup(&self, specifier: &str, from_dir: &Path) -> Lookup {
        if is_relative(specifier) {
            return found_or_missing(try_file_or_directory(&from_dir.join(specifier)));
        }
        if Path::new(specifier).is_absolute() {
            return found_or_missing(try_file_or_directory(Path::new(specifier)));
        }

        let Some(tsconfig) = &self.tsconfig else {
            return Lookup::Unmapped;
        };

        let mut attempted = false;
        for mapping in &tsconfig.mappings {
            let Some(star_match) = mapping.match_specifier(specifier) else {
                continue;
            };
            attempted = true;
            for target in mapping.substitute(&star_match) {
                if let Some(found) = try_file_or_directory(&tsconfig.paths_base.join(target)) {
                    return Lookup::Found(found);
                }
            }
        }

        if let Some(base_url) = &tsconfig.base_url
            && let Some(found) = try_file_or_directory(&base_url.join(specifier))
        {
            return Lookup::Found(found);
        }

        if attempted {
            Lookup::Missing
        } else {
            Lookup::Unmapped
        }
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

fn found_or_missing(path: Option<PathBuf>) -> Lookup {
    match path {
        Some(path) => Lookup::Found(path),
        None => Lookup::Missing,
    }
}

fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(".");
    raw.push(ext);
    PathBuf::from(raw)
}

fn is_parseable(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PARSEABLE_EXTENSIONS.contains(&ext))
}

/// Try `path` itself, then `path.<ext>`, then `path/index.<ext>`.
pub fn try_file_or_directory(path: &Path) -> Option<PathBuf> {
    if path.is_file() && is_parseable(path) {
        return Some(path.to_path_buf());
    }

    for ext in SOURCE_EXTENSIONS {
        let with_ext = with_appended_extension(path, ext);
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }

    if path.is_dir() {
        for ext in SOURCE_EXTENSIONS {
            let index_path = path.join(format!("index.{}", ext));
            if index_path.is_file() {
                return Some(index_path);
            }
        }
    }

    None
}
