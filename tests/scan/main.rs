use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use i18n_scan::{I18nPackage, KeyOccurrence, ScanOptions, ScanReport, ScanResult, scan};
use tempfile::TempDir;

mod fixture;
mod properties;

pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fake-project")
}

/// Build the expected inventory from `(namespace, keys)` rows.
pub fn expected(rows: &[(&str, &[&str])]) -> ScanResult {
    rows.iter()
        .flat_map(|(namespace, keys)| {
            keys.iter()
                .map(move |key| KeyOccurrence::new(*namespace, *key))
        })
        .collect()
}

/// Scan fixture files, relative to the fixture root, with its tsconfig.
pub fn scan_fixture(entries: &[&str], externals: &[&str]) -> Result<ScanReport> {
    let root = fixture_root();
    scan(&ScanOptions {
        entry_paths: entries.iter().map(|entry| root.join(entry)).collect(),
        tsconfig_path: Some(root.join("tsconfig.json")),
        externals: externals.iter().map(|s| s.to_string()).collect(),
        extend_i18n_packages: Vec::new(),
    })
}

/// A throwaway project on disk.
pub struct Project {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Project {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().canonicalize()?;
        Ok(Self {
            _temp_dir: temp_dir,
            root,
        })
    }

    pub fn with_files(files: &[(&str, &str)]) -> Result<Self> {
        let project = Self::new()?;
        for (path, content) in files {
            project.write_file(path, content)?;
        }
        Ok(project)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.root.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))
    }

    /// Copy `dir` into the project, rewriting every file with `edit`.
    pub fn copy_dir(&self, dir: &Path, edit: &dyn Fn(&str) -> String) -> Result<()> {
        copy_tree(dir, dir, &self.root, edit)
    }

    pub fn path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    pub fn scan(&self, entry: &str) -> Result<ScanResult> {
        self.scan_with(entry, Vec::new())
    }

    pub fn scan_with(&self, entry: &str, packages: Vec<I18nPackage>) -> Result<ScanResult> {
        let report = scan(&ScanOptions {
            entry_paths: vec![self.path(entry)],
            extend_i18n_packages: packages,
            ..Default::default()
        })?;
        Ok(report.result)
    }
}

fn copy_tree(base: &Path, dir: &Path, dest: &Path, edit: &dyn Fn(&str) -> String) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            copy_tree(base, &path, dest, edit)?;
            continue;
        }
        let relative = path.strip_prefix(base)?;
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        fs::write(&target, edit(&content))?;
    }
    Ok(())
}
