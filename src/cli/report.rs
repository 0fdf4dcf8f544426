//! Output formatting.
//!
//! Separate from the engine so the crate can be used as a library.

use std::io::{self, Write};

use anyhow::{Context, Result};
use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::{args::OutputFormat, run::CommandOutput};
use crate::{
    config::CONFIG_FILE_NAME,
    core::{ScanReport, ScanResult},
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Warning mark for skipped files.
pub const WARNING_MARK: &str = "\u{26a0}"; // ⚠

pub fn print(output: &CommandOutput) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match output {
        CommandOutput::Scan {
            report,
            format: OutputFormat::Json,
        } => {
            writeln!(stdout, "{}", render_json(&report.result)?)?;
        }
        CommandOutput::Scan {
            report,
            format: OutputFormat::Text,
        } => write_text(report, &mut stdout)?,
        CommandOutput::Init { .. } => {
            writeln!(
                stdout,
                "{} {}",
                SUCCESS_MARK.green(),
                format!("Created {}", CONFIG_FILE_NAME).green()
            )?;
        }
    }
    Ok(())
}

/// Pretty JSON with namespaces and keys in sorted order.
pub fn render_json(result: &ScanResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize scan result")
}

/// Keys grouped under their namespace, then an aligned per-namespace summary.
pub fn write_text<W: Write>(report: &ScanReport, writer: &mut W) -> io::Result<()> {
    for (namespace, keys) in report.result.iter() {
        writeln!(writer, "{}", namespace.bold())?;
        for key in keys {
            writeln!(writer, "  {}", key)?;
        }
        writeln!(writer)?;
    }

    let name_width = report
        .result
        .iter()
        .map(|(namespace, _)| UnicodeWidthStr::width(namespace.as_str()))
        .max()
        .unwrap_or(0);
    for (namespace, keys) in report.result.iter() {
        // `{:<width$}` pads by chars, not display columns.
        let padding = name_width - UnicodeWidthStr::width(namespace.as_str());
        writeln!(
            writer,
            "  {}{:padding$}  {}",
            namespace.cyan(),
            "",
            keys.len(),
            padding = padding
        )?;
    }

    writeln!(
        writer,
        "\n{} {} {} in {} {} from {} {}",
        SUCCESS_MARK.green(),
        report.result.key_count(),
        plural(report.result.key_count(), "key", "keys"),
        report.result.namespace_count(),
        plural(report.result.namespace_count(), "namespace", "namespaces"),
        report.modules_visited,
        plural(report.modules_visited, "module", "modules"),
    )?;

    if !report.parse_failures.is_empty() {
        writeln!(
            writer,
            "{} {} skipped (failed to parse)",
            WARNING_MARK.yellow(),
            format!(
                "{} {}",
                report.parse_failures.len(),
                plural(report.parse_failures.len(), "file", "files")
            )
            .yellow()
        )?;
        for failure in &report.parse_failures {
            writeln!(writer, "  {}", failure.path.display())?;
        }
    }
    Ok(())
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
