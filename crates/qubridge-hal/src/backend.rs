//! Backend trait and configuration.
//!
//! The [`Backend`] trait defines the lifecycle for running circuits on a
//! backend:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ prepare() ──→ run()
//!                                          └──── process() ────┘
//!                                          └── submit() → status() → result()
//! ```
//!
//! | Method | Required | Returns |
//! |--------|----------|---------|
//! | `name()` | yes | `&str` |
//! | `capabilities()` | yes | `&Capabilities` |
//! | `validate()` | yes | `HalResult<ValidationResult>` |
//! | `prepare()` | yes | `HalResult<PreparedCircuit>` |
//! | `run()` | yes | `HalResult<ExecutionResult>` |
//! | `process()` | provided | `HalResult<ExecutionResult>` |
//! | `submit()` | yes | `HalResult<JobId>` |
//! | `status()` | yes | `HalResult<JobStatus>` |
//! | `result()` | yes | `HalResult<ExecutionResult>` |
//!
//! All methods block until done; there is no cancellation.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use qubridge_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::prepared::{PreparedCircuit, RunMode};
use crate::result::ExecutionResult;

/// Configuration for a backend instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Backend-specific settings.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Deserialize the extra settings into a typed configuration.
    pub fn extra_as<T: DeserializeOwned>(&self) -> HalResult<T> {
        serde_json::from_value(serde_json::Value::Object(self.extra.clone())).map_err(|e| {
            HalError::Configuration(format!("invalid settings for '{}': {e}", self.name))
        })
    }
}

/// Trait for backends.
///
/// # Contract
///
/// - `capabilities()` is infallible and cached at construction.
/// - `validate()` never fails for a well-formed circuit; problems are
///   reported in the returned [`ValidationResult`].
/// - `prepare()` rejects circuits the backend cannot run, before any
///   execution happens.
/// - `run()` only accepts circuits prepared by the same backend.
/// - `submit()` runs to completion; results stay available until the
///   backend is dropped.
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Check a circuit against backend constraints.
    fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    /// Validate and convert a circuit for execution.
    fn prepare(&self, circuit: &Circuit) -> HalResult<PreparedCircuit>;

    /// Execute a prepared circuit.
    fn run(&self, prepared: &PreparedCircuit, mode: &RunMode) -> HalResult<ExecutionResult>;

    /// Prepare and run in one step.
    fn process(&self, circuit: &Circuit, mode: &RunMode) -> HalResult<ExecutionResult> {
        let prepared = self.prepare(circuit)?;
        self.run(&prepared, mode)
    }

    /// Run a circuit and keep its result under a new job id.
    fn submit(&self, circuit: &Circuit, mode: RunMode) -> HalResult<JobId>;

    /// Get the status of a job.
    fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Get the result of a completed job.
    fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;
}

/// Result of circuit validation against backend constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Circuit can run as-is.
    Valid,
    /// Circuit cannot run on this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Build from a list of problems; empty means valid.
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        }
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}
