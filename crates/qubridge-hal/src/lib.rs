//! Qubridge Hardware Abstraction Layer
//!
//! This crate defines the contract every Qubridge backend implements, so
//! that callers can validate, prepare and run circuits without knowing
//! which engine sits behind them.
//!
//! # Overview
//!
//! - A common [`Backend`] trait covering validation, preparation, execution
//!   and job bookkeeping
//! - [`Capabilities`] describing the qubit limit, accepted gates and
//!   feature flags of a backend
//! - [`PreparedCircuit`] holding a converted circuit keyed by its
//!   [`CircuitKey`] content hash
//! - Unified result handling via [`ExecutionResult`], [`ShotTable`] and
//!   [`Counts`]
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use qubridge_hal::{Backend, BasisOrder, RunMode};
//! use qubridge_adapter_qulacs::QulacsBackend;
//! use qubridge_ir::Circuit;
//!
//! fn main() -> anyhow::Result<()> {
//!     let circuit = Circuit::bell()?;
//!     let backend = QulacsBackend::new();
//!
//!     let prepared = backend.prepare(&circuit)?;
//!     let result = backend.run(&prepared, &RunMode::seeded_shots(1000, 7))?;
//!
//!     if let Some((bitstring, count)) = result.counts().unwrap_or_default().most_frequent() {
//!         println!("Most frequent: {} ({} times)", bitstring, count);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Implementing a Custom Backend
//!
//! ```ignore
//! use qubridge_hal::{
//!     Backend, Capabilities, ExecutionResult, HalResult, JobId, JobStatus,
//!     PreparedCircuit, RunMode, ValidationResult,
//! };
//! use qubridge_ir::Circuit;
//!
//! struct MyBackend {
//!     capabilities: Capabilities,
//! }
//!
//! impl Backend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!
//!     fn capabilities(&self) -> &Capabilities {
//!         &self.capabilities
//!     }
//!
//!     fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
//!         Ok(ValidationResult::Valid)
//!     }
//!
//!     fn prepare(&self, circuit: &Circuit) -> HalResult<PreparedCircuit> {
//!         # todo!()
//!     }
//!
//!     fn run(&self, prepared: &PreparedCircuit, mode: &RunMode) -> HalResult<ExecutionResult> {
//!         # todo!()
//!     }
//!
//!     fn submit(&self, circuit: &Circuit, mode: RunMode) -> HalResult<JobId> {
//!         # todo!()
//!     }
//!
//!     fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
//!         # todo!()
//!     }
//!
//!     fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
//!         # todo!()
//!     }
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod prepared;
pub mod registry;
pub mod result;

pub use backend::{Backend, BackendConfig, BackendFactory, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use error::{BoxError, HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use prepared::{CircuitKey, PreparedCircuit, RunMode};
pub use registry::BackendRegistry;
pub use result::{BasisOrder, Counts, ExecutionResult, ResultData, ResultMetadata, ShotTable};
