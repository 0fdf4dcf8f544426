//! Diagnostics output for the CLI.
//!
//! The engine emits `tracing` events; this installs the subscriber that
//! prints them to stderr. `RUST_LOG` takes precedence over `--verbose`.

use std::{io::IsTerminal, sync::OnceLock};

use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt};

/// Level used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    static INITIALISED: OnceLock<()> = OnceLock::new();

    INITIALISED.get_or_init(|| {
        let use_ansi = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

        let subscriber = fmt::fmt()
            .with_env_filter(filter)
            .with_ansi(use_ansi)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .compact()
            .finish();
        // An embedding application may already own the global subscriber.
        if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("{} diagnostics disabled: {}", "warning:".bold().yellow(), err);
        }
    });
}
