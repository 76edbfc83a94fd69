// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the benchmark application.

use std::fmt;
use std::path::PathBuf;

/// Result type alias for benchmark operations.
pub type Result<T> = std::result::Result<T, BenchmarkError>;

/// Process exit code reported for every failed run.
pub const FAILURE_EXIT_CODE: i32 = 3;

/// Main error type for the benchmark application.
#[derive(Debug)]
pub enum BenchmarkError {
    /// Bad or inconsistent command-line arguments.
    Validation(String),
    /// The model file could not be opened.
    Load {
        /// Path that was passed with `-m`.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failure surfaced by the inference engine (format, device, unsupported op).
    Engine(String),
    /// The statistics report could not be written.
    Report(std::io::Error),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
}

impl BenchmarkError {
    /// Exit code the process terminates with for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        FAILURE_EXIT_CODE
    }
}

impl fmt::Display for BenchmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::Load { path, source } => {
                write!(f, "Cannot open model file {}: {source}", path.display())
            }
            Self::Engine(msg) => write!(f, "Engine error: {msg}"),
            Self::Report(err) => write!(f, "Failed to write statistics report: {err}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for BenchmarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load { source, .. } => Some(source),
            Self::Report(err) | Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BenchmarkError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
