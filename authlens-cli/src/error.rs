//! CLI-specific error types and exit code mapping

use authlens_analyzer::AnalyzerError;
use authlens_core::error::AuthlensError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration or option resolution failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// Analysis of the input log failed.
    #[error("{0}")]
    Analysis(#[from] AnalyzerError),

    /// The report destination could not be created or written.
    #[error("could not write to output file: {path}: {source}")]
    Output {
        path: String,
        source: std::io::Error,
    },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from authlens-core.
    #[error("{0}")]
    Core(#[from] AuthlensError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                          |
    /// |------|----------------------------------|
    /// | 0    | Success                          |
    /// | 1    | General / analysis error         |
    /// | 2    | Configuration or usage error     |
    /// | 10   | IO error (input or output)       |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Analysis(e) => match e {
                AnalyzerError::Input { .. } | AnalyzerError::Read { .. } => 10,
                AnalyzerError::Config { .. } => 2,
                AnalyzerError::Worker(_) => 1,
            },
            Self::Output { .. } | Self::Io(_) => 10,
            Self::Core(e) => match e {
                AuthlensError::Config(_) => 2,
                AuthlensError::Io(_) => 10,
                AuthlensError::Analysis(_) => 1,
            },
            Self::JsonSerialize(_) => 1,
        }
    }
}
