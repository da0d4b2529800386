//! Prepared circuits and run modes.

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::hash::Hasher;
use std::sync::Arc;

use qubridge_ir::{Circuit, PauliOperator};

use crate::error::HalResult;

/// Stable content hash of a source circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CircuitKey(pub u64);

impl CircuitKey {
    /// Hash the serialized form of `circuit`.
    ///
    /// Equal circuits (same wires, instructions, parameters and phase)
    /// always produce the same key.
    pub fn of(circuit: &Circuit) -> HalResult<Self> {
        let bytes = serde_json::to_vec(circuit)?;
        let mut hasher = FxHasher::default();
        hasher.write(&bytes);
        Ok(Self(hasher.finish()))
    }
}

impl fmt::Display for CircuitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A circuit that a backend has validated and converted.
///
/// Holds the source circuit and the backend's native form, shared behind
/// `Arc`s so a cached preparation can be handed out cheaply.
#[derive(Clone)]
pub struct PreparedCircuit {
    key: CircuitKey,
    backend: String,
    source: Arc<Circuit>,
    native: Arc<dyn Any + Send + Sync>,
}

impl PreparedCircuit {
    /// Create a prepared circuit.
    pub fn new(
        backend: impl Into<String>,
        key: CircuitKey,
        source: Arc<Circuit>,
        native: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        Self {
            key,
            backend: backend.into(),
            source,
            native,
        }
    }

    /// Content hash of the source circuit.
    pub fn key(&self) -> CircuitKey {
        self.key
    }

    /// Name of the backend that prepared it.
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// The source circuit.
    pub fn source(&self) -> &Circuit {
        &self.source
    }

    /// The native form, if it has type `T`.
    pub fn native<T: Any>(&self) -> Option<&T> {
        self.native.downcast_ref::<T>()
    }

    /// True if both share the same native allocation.
    pub fn shares_native_with(&self, other: &PreparedCircuit) -> bool {
        Arc::ptr_eq(&self.native, &other.native)
    }
}

impl fmt::Debug for PreparedCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedCircuit")
            .field("key", &self.key)
            .field("backend", &self.backend)
            .field("circuit", &self.source.name())
            .field("num_qubits", &self.source.num_qubits())
            .finish_non_exhaustive()
    }
}

/// What to compute when running a prepared circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunMode {
    /// The final state vector or density matrix.
    State,
    /// Sampled readouts of the measured classical bits.
    Shots {
        /// Number of shots.
        n_shots: usize,
        /// RNG seed; falls back to the backend default, then to entropy.
        seed: Option<u64>,
    },
    /// Expectation value of an operator on the final state.
    Expectation(PauliOperator),
}

impl RunMode {
    /// Unseeded sampling.
    pub fn shots(n_shots: usize) -> Self {
        RunMode::Shots {
            n_shots,
            seed: None,
        }
    }

    /// Seeded sampling.
    pub fn seeded_shots(n_shots: usize, seed: u64) -> Self {
        RunMode::Shots {
            n_shots,
            seed: Some(seed),
        }
    }

    /// Short label for logs and job records.
    pub fn label(&self) -> &'static str {
        match self {
            RunMode::State => "state",
            RunMode::Shots { .. } => "shots",
            RunMode::Expectation(_) => "expectation",
        }
    }
}
