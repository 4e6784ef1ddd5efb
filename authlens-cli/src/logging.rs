//! Logging initialization for the authlens CLI.
//!
//! Configures `tracing-subscriber` based on the `[general]` section
//! of `AuthlensConfig`. Log records go to stderr so they never mix
//! with a report written to stdout.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use authlens_core::config::GeneralConfig;

use crate::error::CliError;

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
/// `RUST_LOG` takes precedence over `config.log_level`.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines
/// * `"pretty"` - Human-readable multi-line output
pub fn init_tracing(config: &GeneralConfig) -> Result<(), CliError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| {
                    CliError::Config(format!("failed to initialize JSON tracing subscriber: {e}"))
                })?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| {
                    CliError::Config(format!(
                        "failed to initialize pretty tracing subscriber: {e}"
                    ))
                })?;
        }
        other => {
            return Err(CliError::Config(format!(
                "unknown log format '{other}', expected 'json' or 'pretty'"
            )));
        }
    }

    Ok(())
}
