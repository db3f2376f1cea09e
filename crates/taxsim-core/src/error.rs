//! Error types for taxonomic similarity computations.
//!
//! All failures are request-scoped: they abort the matrix computation that
//! raised them and are never retried, because formula failures are
//! deterministic rather than transient. Degenerate numeric cases (zero
//! ancestor counts, zero IC sums) are handled by guard branches in the
//! algorithms themselves and never surface here.

use thiserror::Error;

/// Errors that can occur during similarity computation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaxsimError {
    /// A supplied concept id is absent from the hierarchy.
    #[error("Unknown concept '{code}': not present in the hierarchy")]
    UnknownConcept {
        /// The offending concept code
        code: String,
    },

    /// Unsupported mode name or an algorithm/IC-policy combination the
    /// algorithm does not support.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Reason for rejection
        reason: String,
    },

    /// Structurally invalid caller input (empty concept list, empty set,
    /// or a comparison an algorithm defines no value for).
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Reason for rejection
        reason: String,
    },

    /// A matrix worker returned an error or panicked; the whole computation
    /// fails, partial matrices are never returned.
    #[error("Worker {worker} failed: {reason}")]
    WorkerFailure {
        /// Index of the failed row-block worker
        worker: usize,
        /// Underlying failure description
        reason: String,
    },

    /// A concept code was added to a hierarchy that already contains it.
    #[error("Duplicate concept '{code}': already present in the hierarchy")]
    DuplicateConcept {
        /// The duplicated concept code
        code: String,
    },

    /// A concept was attached to a parent the hierarchy does not contain.
    #[error("Unknown parent '{parent}' while adding concept '{code}'")]
    UnknownParent {
        /// The missing parent code
        parent: String,
        /// The concept being attached
        code: String,
    },
}

/// Result type for similarity operations.
pub type TaxsimResult<T> = Result<T, TaxsimError>;

impl TaxsimError {
    /// Create an UnknownConcept error.
    pub fn unknown_concept(code: impl Into<String>) -> Self {
        TaxsimError::UnknownConcept { code: code.into() }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        TaxsimError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        TaxsimError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a WorkerFailure error for a failed row-block worker.
    pub fn worker_failure(worker: usize, reason: impl Into<String>) -> Self {
        TaxsimError::WorkerFailure {
            worker,
            reason: reason.into(),
        }
    }

    /// Check if this error was caused by an unsupported configuration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, TaxsimError::InvalidConfiguration { .. })
    }

    /// Check if this error was caused by malformed caller input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            TaxsimError::InvalidInput { .. } | TaxsimError::UnknownConcept { .. }
        )
    }
}
