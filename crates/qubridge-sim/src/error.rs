//! Error types for the simulator engine.

use std::collections::TryReserveError;
use thiserror::Error;

use crate::device::Device;

/// Errors produced by the simulator engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A gate or observable references a qubit outside the register.
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Register size.
        num_qubits: usize,
    },

    /// A gate lists the same qubit twice.
    #[error("Gate '{gate}' uses qubit {qubit} more than once")]
    DuplicateQubit {
        /// Gate name.
        gate: &'static str,
        /// The repeated qubit.
        qubit: usize,
    },

    /// The register cannot be addressed on this platform.
    #[error("A {num_qubits}-qubit register cannot be addressed")]
    TooManyQubits {
        /// Requested register size.
        num_qubits: usize,
    },

    /// Allocating the state buffer failed.
    #[error("Failed to allocate state for {num_qubits} qubits")]
    Allocation {
        /// Requested register size.
        num_qubits: usize,
        /// Allocator error.
        #[source]
        source: TryReserveError,
    },

    /// Circuit and state have different register sizes.
    #[error("Circuit acts on {circuit} qubits but the state has {state}")]
    SizeMismatch {
        /// Circuit register size.
        circuit: usize,
        /// State register size.
        state: usize,
    },

    /// The execution library for this device is not compiled in.
    #[error("Device '{0}' is not available in this build")]
    DeviceUnavailable(Device),
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;
