//! Analyze command handler
//!
//! Resolves the effective options (CLI > env > config file > defaults),
//! runs the analyzer over the input log and renders the report.

use tracing::{debug, info};

use authlens_analyzer::{AnalyzerConfig, LogAnalyzer, Report, ReportOptions};
use authlens_core::config::AuthlensConfig;

use crate::cli::{Cli, OutputFormat};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Apply command-line overrides on top of the loaded configuration.
///
/// The caller re-validates the result.
pub fn apply_cli_overrides(cli: &Cli, config: &mut AuthlensConfig) {
    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(format) = cli.output_format() {
        config.report.format = format.as_str().to_owned();
    }
    if let Some(top) = cli.top {
        config.report.top = usize::try_from(top).unwrap_or(usize::MAX);
    }
    if let Some(threshold) = cli.alert {
        config.report.alert_threshold = threshold;
    }
}

/// Parse the configured report format.
pub fn output_format(config: &AuthlensConfig) -> Result<OutputFormat, CliError> {
    <OutputFormat as clap::ValueEnum>::from_str(&config.report.format, true).map_err(|_| {
        CliError::Config(format!(
            "invalid report format '{}', expected 'pretty' or 'json'",
            config.report.format
        ))
    })
}

/// Execute the analysis and write the report.
pub async fn execute(cli: &Cli, config: &AuthlensConfig) -> Result<(), CliError> {
    let format = output_format(config)?;
    let options = ReportOptions::from_core(&config.report);
    let analyzer = LogAnalyzer::new(AnalyzerConfig::from_core(&config.analysis))?;

    info!(
        path = %cli.path.display(),
        format = format.as_str(),
        top = options.top,
        alert_threshold = options.alert_threshold,
        "starting analysis"
    );

    let findings = analyzer.analyze_path(&cli.path).await?;
    let report = Report::build(&findings, &options, cli.path.display().to_string());

    let writer = OutputWriter::new(format, cli.out.clone());
    writer.render(&report)?;

    debug!(
        out = ?cli.out,
        total_lines = report.total_lines(),
        "report written"
    );
    Ok(())
}
