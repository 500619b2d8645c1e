//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use ptrwrap_edits::EditsError;
use ptrwrap_syntax::SyntaxError;
use thiserror::Error;

use crate::compile_db::CompileDbError;
use crate::telemetry::TelemetryError;

/// Exit status for command-line and configuration errors.
pub(crate) const USAGE_EXIT_STATUS: u8 = 2;

/// Exit status for failures once the run has started.
pub(crate) const FAILURE_EXIT_STATUS: u8 = 1;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    CompileDatabase(#[from] CompileDbError),
    #[error("failed to read field filter file {path}: {source}")]
    FieldFilter { path: Utf8PathBuf, source: io::Error },
    #[error("failed to resolve the working directory: {0}")]
    WorkingDirectory(io::Error),
    #[error("failed to read {path}: {source}")]
    ReadSource { path: Utf8PathBuf, source: io::Error },
    #[error("no compile command for {0}")]
    MissingCompileCommand(Utf8PathBuf),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("failed to emit edits: {0}")]
    EmitEdits(#[from] EditsError),
}

impl AppError {
    /// Exit status reported for this error.
    ///
    /// Command-line and configuration problems map to `2`; everything that
    /// happens once the run has started maps to `1`.
    pub(crate) const fn exit_status(&self) -> u8 {
        match self {
            Self::LoadConfiguration(_)
            | Self::CliUsage(_)
            | Self::Telemetry(_)
            | Self::CompileDatabase(_)
            | Self::FieldFilter { .. }
            | Self::WorkingDirectory(_) => USAGE_EXIT_STATUS,
            Self::ReadSource { .. }
            | Self::MissingCompileCommand(_)
            | Self::Syntax(_)
            | Self::EmitEdits(_) => FAILURE_EXIT_STATUS,
        }
    }
}
