use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{I18nPackage, ScanOptions};

pub const CONFIG_FILE_NAME: &str = ".i18nscanrc.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Entry files; glob patterns are expanded.
    #[serde(default = "default_entry_paths")]
    pub entry_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsconfig_path: Option<String>,
    /// Module specifiers that are never parsed.
    #[serde(default)]
    pub externals: Vec<String>,
    #[serde(
        default,
        rename = "extendI18NPackages",
        alias = "extendI18nPackages"
    )]
    pub extend_i18n_packages: Vec<I18nPackage>,
}

fn default_entry_paths() -> Vec<String> {
    vec!["src/index.tsx".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry_paths: default_entry_paths(),
            tsconfig_path: None,
            externals: Vec::new(),
            extend_i18n_packages: Vec::new(),
        }
    }
}

/// Patterns without `*` or `?` are literal paths, so `app/[locale]` needs no escaping.
fn is_glob(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

impl Config {
    /// Validate configuration values.
    ///
    /// Rejects invalid glob patterns in `entryPaths` and package descriptors
    /// with an empty path or member name.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.entry_paths {
            if is_glob(pattern) {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'entryPaths': \"{}\"", pattern)
                })?;
            }
        }

        for package in &self.extend_i18n_packages {
            if package.package_path.trim().is_empty() {
                bail!("Empty 'packagePath' in 'extendI18NPackages'");
            }
            if package.members.iter().any(|member| member.name.trim().is_empty()) {
                bail!(
                    "Empty member name in 'extendI18NPackages' entry \"{}\"",
                    package.package_path
                );
            }
        }

        Ok(())
    }

    /// Resolve paths against `base_dir` and expand entry globs.
    pub fn to_scan_options(&self, base_dir: &Path) -> Result<ScanOptions> {
        Ok(ScanOptions {
            entry_paths: expand_entries(&self.entry_paths, base_dir)?,
            tsconfig_path: self
                .tsconfig_path
                .as_deref()
                .map(|path| base_dir.join(path)),
            externals: self.externals.clone(),
            extend_i18n_packages: self.extend_i18n_packages.clone(),
        })
    }
}

/// Expand entry patterns relative to `base_dir`.
///
/// Literal paths are kept even when missing, so the scan reports them; a glob
/// that matches no file is an error.
pub fn expand_entries(patterns: &[String], base_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for pattern in patterns {
        let full = base_dir.join(pattern);
        if !is_glob(pattern) {
            entries.push(full);
            continue;
        }

        let full = full.to_string_lossy().into_owned();
        let mut matched: Vec<PathBuf> = glob::glob(&full)
            .with_context(|| format!("Invalid entry pattern: \"{}\"", pattern))?
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();
        if matched.is_empty() {
            bail!("Entry pattern matched no files: \"{}\"", pattern);
        }
        matched.sort();
        entries.append(&mut matched);
    }
    entries.dedup();
    Ok(entries)
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory relative config paths resolve against.
    pub base_dir: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config_file(path: &Path) -> Result<ConfigLoadResult> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    config.validate()?;

    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(ConfigLoadResult {
        config,
        base_dir,
        from_file: true,
    })
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => load_config_file(&path),
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            base_dir: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}
