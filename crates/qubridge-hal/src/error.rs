//! Error types for the HAL crate.

use thiserror::Error;

/// Boxed engine error carried by [`HalError::Execution`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in HAL operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// A gate has no mapping to the backend's native gates.
    #[error("Unsupported gate '{gate}' at instruction {position}")]
    UnsupportedGate {
        /// Gate name.
        gate: String,
        /// Index of the instruction in the circuit.
        position: usize,
    },

    /// The circuit cannot run on this backend as configured.
    #[error("Incompatible circuit: {0}")]
    IncompatibleCircuit(String),

    /// The execution engine failed.
    #[error("Execution failed: {message}")]
    Execution {
        /// What was being executed.
        message: String,
        /// Engine error.
        #[source]
        source: BoxError,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backend is not available.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Unsupported feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HalError {
    /// Wrap an engine error.
    pub fn execution(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        HalError::Execution {
            message: message.into(),
            source: Box::new(source),
        }
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
