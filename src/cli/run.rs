//! Command dispatch.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};

use super::args::{Arguments, Command, OutputFormat, ScanCommand};
use crate::{
    config::{CONFIG_FILE_NAME, default_config_json, load_config, load_config_file},
    core::{ScanReport, scan},
};

/// What a command produced, for the reporter.
#[derive(Debug)]
pub enum CommandOutput {
    Scan {
        report: ScanReport,
        format: OutputFormat,
    },
    Init {
        path: PathBuf,
    },
}

pub fn run(Arguments { command }: Arguments) -> Result<CommandOutput> {
    match command {
        Some(Command::Scan(cmd)) => run_scan(cmd),
        Some(Command::Init) => init(),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}

fn run_scan(cmd: ScanCommand) -> Result<CommandOutput> {
    let cwd = env::current_dir().context("Failed to read the working directory")?;
    let loaded = match &cmd.config {
        Some(path) => load_config_file(&cwd.join(path))?,
        None => load_config(&cwd)?,
    };
    if loaded.from_file {
        tracing::debug!(dir = %loaded.base_dir.display(), "loaded {}", CONFIG_FILE_NAME);
    }

    // Command-line values are relative to the working directory, config
    // values to the config file.
    let mut config = loaded.config;
    if !cmd.entries.is_empty() {
        config.entry_paths = cmd.entries.iter().map(|entry| absolute(&cwd, entry)).collect();
    }
    if let Some(tsconfig) = &cmd.tsconfig {
        config.tsconfig_path = Some(cwd.join(tsconfig).to_string_lossy().into_owned());
    }
    if !cmd.externals.is_empty() {
        config.externals = cmd.externals;
    }
    config.validate()?;

    let options = config.to_scan_options(&loaded.base_dir)?;
    let report = scan(&options)?;
    tracing::debug!(
        modules = report.modules_visited,
        keys = report.result.key_count(),
        "scan finished"
    );

    Ok(CommandOutput::Scan {
        report,
        format: cmd.format,
    })
}

fn absolute(cwd: &Path, path: &str) -> String {
    cwd.join(path).to_string_lossy().into_owned()
}

fn init() -> Result<CommandOutput> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(config_path, default_config_json()?)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;
    Ok(CommandOutput::Init {
        path: config_path.to_path_buf(),
    })
}
