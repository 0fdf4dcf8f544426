//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `scan`: Extract translation keys reachable from the entry files
//! - `init`: Write a default configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Scan(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `{ "namespace": ["key", ...] }`
    #[default]
    Json,
    /// Keys grouped by namespace, with a summary
    Text,
}

#[derive(Debug, Args)]
pub struct ScanCommand {
    /// Entry files or glob patterns (overrides `entryPaths`)
    pub entries: Vec<String>,

    /// tsconfig.json used for path aliases (overrides `tsconfigPath`)
    #[arg(long, env = "I18N_SCAN_TSCONFIG")]
    pub tsconfig: Option<PathBuf>,

    /// Module specifier that is never parsed; repeatable (overrides `externals`)
    #[arg(long = "external", value_name = "SPEC")]
    pub externals: Vec<String>,

    /// Configuration file (default: nearest .i18nscanrc.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translation keys, grouped by namespace
    Scan(ScanCommand),
    /// Initialize a new .i18nscanrc.json configuration file
    Init,
}
