//! CLI-level errors: engine failures plus file and JSON handling.

use std::path::{Path, PathBuf};

use taxsim_core::error::TaxsimError;
use thiserror::Error;

/// Errors surfaced by the command handlers.
#[derive(Debug, Error)]
pub enum CliError {
    /// Computation or validation failure from the similarity engine.
    #[error(transparent)]
    Engine(#[from] TaxsimError),

    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// An input file held malformed JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// Offending path
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },

    /// Output could not be serialized.
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

/// Result type for command handlers.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        CliError::Read {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        CliError::Write {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn json(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        CliError::Json {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_names_the_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let msg = CliError::read("input/codes.json", io).to_string();
        assert!(msg.contains("input/codes.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_engine_error_passes_through() {
        let err: CliError = TaxsimError::unknown_concept("X404").into();
        assert!(err.to_string().contains("X404"));
    }
}
