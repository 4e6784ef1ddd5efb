//! Output formatting abstraction for pretty vs JSON rendering
//!
//! Report output flows through [`OutputWriter`], which owns the format switch
//! and the destination (stdout or a file). Command handlers never touch
//! format-specific logic.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Writes a payload in the selected format to stdout or a file.
pub struct OutputWriter {
    format: OutputFormat,
    destination: Option<PathBuf>,
}

impl OutputWriter {
    /// Create a writer. `destination == None` means stdout.
    pub fn new(format: OutputFormat, destination: Option<PathBuf>) -> Self {
        Self {
            format,
            destination,
        }
    }

    /// Render a payload to the configured destination.
    ///
    /// A file destination is created (or truncated) here and never colored.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        match &self.destination {
            Some(path) => {
                let output_err = |source| CliError::Output {
                    path: path.display().to_string(),
                    source,
                };
                let file = File::create(path).map_err(output_err)?;
                colored::control::set_override(false);
                let mut out = BufWriter::new(file);
                self.write_to(payload, &mut out)?;
                out.flush().map_err(output_err)?;
            }
            None => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                self.write_to(payload, &mut handle)?;
                handle.flush()?;
            }
        }
        Ok(())
    }

    /// Render a payload to an arbitrary writer.
    ///
    /// For `Pretty`, delegates to `Render::render_text()`.
    /// For `Json`, serialises via `serde_json` followed by a newline.
    pub fn write_to<T: Render + Serialize>(
        &self,
        payload: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Pretty => {
                payload.render_text(w)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

/// Trait for human-readable text rendering.
///
/// Implemented by every CLI output payload alongside `serde::Serialize`.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}
