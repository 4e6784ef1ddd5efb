//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// authlens -- summarize SSH and sudo authentication activity from an auth log.
///
/// Reads the log once, counts failed and accepted SSH password logins and
/// sudo authentication failures, and ranks the noisiest IPs and usernames.
#[derive(Parser, Debug)]
#[command(name = "authlens", version, about, long_about = None)]
#[command(after_help = "Examples:\n  \
    authlens /var/log/auth.log\n  \
    authlens /var/log/auth.log --alert 3\n  \
    authlens /var/log/auth.log --json --alert 2 --out report.json")]
pub struct Cli {
    /// Path to the auth log to analyze.
    #[arg(value_name = "LOG_PATH")]
    pub path: PathBuf,

    /// Emit the report as JSON.
    #[arg(long, overrides_with = "pretty")]
    pub json: bool,

    /// Emit the human-readable report (default).
    #[arg(long, overrides_with = "json")]
    pub pretty: bool,

    /// Number of entries in each ranking (default: 10).
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub top: Option<u64>,

    /// Report every IP/username seen at least N times (default: disabled).
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub alert: Option<u64>,

    /// Write the report to PATH instead of stdout (truncates the file).
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Path to an authlens.toml configuration file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Output format chosen on the command line, if any.
    pub fn output_format(&self) -> Option<OutputFormat> {
        if self.json {
            Some(OutputFormat::Json)
        } else if self.pretty {
            Some(OutputFormat::Pretty)
        } else {
            None
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text report.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}
