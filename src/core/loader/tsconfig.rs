//! `tsconfig.json` reading for path alias resolution.
//!
//! Only `compilerOptions.baseUrl` and `compilerOptions.paths` matter to the
//! scanner. The file is JSONC (comments and trailing commas are allowed) and
//! may `extends` one or more configs, either by relative path or by package
//! name through `node_modules`. Relative locations are made absolute against
//! the config file that declares them.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTsConfig {
    pub extends: Option<Extends>,
    pub compiler_options: Option<RawCompilerOptions>,
}

/// `"extends": "./base.json"` or, since TypeScript 5, a list merged in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Extends {
    One(String),
    Many(Vec<String>),
}

impl Extends {
    pub fn specifiers(&self) -> &[String] {
        match self {
            Self::One(specifier) => std::slice::from_ref(specifier),
            Self::Many(specifiers) => specifiers,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompilerOptions {
    pub base_url: Option<String>,
    pub paths: Option<HashMap<String, Vec<String>>>,
}

/// A single `paths` entry such as `"@/*": ["src/*"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapping {
    pattern: String,
    prefix: String,
    suffix: String,
    targets: Vec<String>,
}

impl PathMapping {
    pub fn new(pattern: &str, targets: Vec<String>) -> Self {
        let (prefix, suffix) = match pattern.split_once('*') {
            Some((prefix, suffix)) => (prefix.to_string(), suffix.to_string()),
            None => (pattern.to_string(), String::new()),
        };
        Self {
            pattern: pattern.to_string(),
            prefix,
            suffix,
            targets,
        }
    }

    /// Returns the text matched by `*`, or an empty string for exact patterns.
    pub fn match_specifier(&self, specifier: &str) -> Option<String> {
        if !self.pattern.contains('*') {
            return (self.pattern == specifier).then(String::new);
        }

        if !specifier.starts_with(&self.prefix) || !specifier.ends_with(&self.suffix) {
            return None;
        }

        let start = self.prefix.len();
        let end = specifier.len().saturating_sub(self.suffix.len());
        if end < start {
            return None;
        }

        Some(specifier[start..end].to_string())
    }

    pub fn specificity(&self) -> usize {
        self.prefix.len() + self.suffix.len()
    }

    /// Target paths with `*` replaced by the captured text.
    pub fn substitute<'a>(&'a self, star_match: &'a str) -> impl Iterator<Item = String> + 'a {
        self.targets.iter().map(move |target| {
            if target.contains('*') {
                target.replace('*', star_match)
            } else {
                target.clone()
            }
        })
    }
}

/// Alias configuration after `extends` has been applied.
#[derive(Debug, Clone, Default)]
pub struct TsConfigPaths {
    /// Absolute `baseUrl`, if any layer declared one.
    pub base_url: Option<PathBuf>,
    /// Directory `paths` targets are relative to.
    pub paths_base: PathBuf,
    /// Mappings sorted most specific first.
    pub mappings: Vec<PathMapping>,
}

/// The settings one config contributes, with its bases already applied.
#[derive(Debug, Default)]
struct Layer {
    base_url: Option<PathBuf>,
    /// Mappings with the directory of the config that declared them.
    paths: Option<(PathBuf, Vec<PathMapping>)>,
}

impl Layer {
    fn overlay(&mut self, other: Layer) {
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.paths.is_some() {
            self.paths = other.paths;
        }
    }
}

pub fn parse_tsconfig(source: &str) -> Result<RawTsConfig> {
    json5::from_str(source).context("failed to parse tsconfig JSON")
}

/// Load a tsconfig file and every config it extends.
pub fn load_tsconfig(path: &Path) -> Result<TsConfigPaths> {
    let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let config_dir = config_dir(&canonical)?;
    let layer = load_layer(path, &mut HashSet::new())?;

    let (paths_dir, mappings) = layer.paths.unwrap_or((config_dir, Vec::new()));
    Ok(TsConfigPaths {
        paths_base: layer.base_url.clone().unwrap_or(paths_dir),
        base_url: layer.base_url,
        mappings,
    })
}

fn config_dir(canonical: &Path) -> Result<PathBuf> {
    canonical
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("tsconfig has no parent directory"))
}

fn load_layer(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Layer> {
    let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        bail!("tsconfig extends cycle detected at {}", canonical.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read tsconfig: {}", path.display()))?;
    let config = parse_tsconfig(&source)
        .with_context(|| format!("failed to parse tsconfig: {}", path.display()))?;
    let config_dir = config_dir(&canonical)?;

    let mut layer = Layer::default();
    for specifier in config.extends.iter().flat_map(Extends::specifiers) {
        let base_path = resolve_extends_path(&config_dir, specifier)?;
        tracing::debug!(config = %path.display(), base = %base_path.display(), "tsconfig extends");
        layer.overlay(load_layer(&base_path, visited)?);
    }

    let options = config.compiler_options.unwrap_or_default();
    let mut own = Layer {
        base_url: options.base_url.map(|base_url| config_dir.join(base_url)),
        paths: None,
    };
    if let Some(paths) = options.paths {
        let mut mappings: Vec<PathMapping> = paths
            .into_iter()
            .map(|(pattern, targets)| PathMapping::new(&pattern, targets))
            .collect();
        mappings.sort_by(|a, b| {
            b.specificity()
                .cmp(&a.specificity())
                .then_with(|| a.pattern.cmp(&b.pattern))
        });
        own.paths = Some((config_dir, mappings));
    }
    layer.overlay(own);

    visited.remove(&canonical);
    Ok(layer)
}

/// Locate the config named by one `extends` entry. Relative and absolute
/// paths are taken from `config_dir`; anything else is a package looked up
/// in `node_modules` from `config_dir` upwards.
fn resolve_extends_path(config_dir: &Path, specifier: &str) -> Result<PathBuf> {
    let is_path = specifier.starts_with("./")
        || specifier.starts_with("../")
        || Path::new(specifier).is_absolute();
    if is_path {
        let candidate = config_dir.join(specifier);
        return Ok(config_file(&candidate).unwrap_or(candidate));
    }

    config_dir
        .ancestors()
        .map(|dir| dir.join("node_modules").join(specifier))
        .find_map(|candidate| {
            config_file(&candidate).or_else(|| config_file(&candidate.join("tsconfig.json")))
        })
        .ok_or_else(|| {
            anyhow!(
                "cannot find tsconfig \"{}\" extended from {}",
                specifier,
                config_dir.display()
            )
        })
}

/// `path` itself, or `path` with `.json` appended, whichever is a file.
fn config_file(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    let with_json = with_json_extension(path);
    with_json.is_file().then_some(with_json)
}

fn with_json_extension(path: &Path) -> PathBuf {
    let mut file = path.as_os_str().to_os_string();
    file.push(".json");
    PathBuf::from(file)
}
