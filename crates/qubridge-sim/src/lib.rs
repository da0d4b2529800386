//! Qubridge Simulator Engine
//!
//! A small state-vector and density-matrix simulator with a native object
//! model: circuits are lists of [`NativeGate`]s on a fixed register, evolved
//! against a [`QuantumState`] or [`DensityMatrix`].
//!
//! Qubit `q` is bit `q` of a basis-state index (little-endian).
//!
//! # Execution libraries
//!
//! | Device | Kernels | Availability |
//! |--------|---------|--------------|
//! | [`Device::Cpu`] | Sequential, one kernel per gate kind | Always |
//! | [`Device::Gpu`] | Data-parallel dense kernels (rayon) | `gpu` feature (default) |
//!
//! # Performance
//!
//! | Qubits | State vector | Density matrix |
//! |--------|--------------|----------------|
//! | 10 | ~16 KB | ~16 MB |
//! | 15 | ~512 KB | ~16 GB |
//! | 20 | ~16 MB | Not recommended |
//! | 25 | ~512 MB | Not recommended |
//!
//! # Example
//!
//! ```rust
//! use qubridge_sim::{NativeCircuit, NativeGate, QuantumState, StateBase};
//!
//! let mut circuit = NativeCircuit::new(2);
//! circuit.add_gate(NativeGate::H(0)).unwrap();
//! circuit.add_gate(NativeGate::CNOT { control: 0, target: 1 }).unwrap();
//!
//! let mut state = QuantumState::new(2).unwrap();
//! circuit.update_quantum_state(&mut state).unwrap();
//!
//! let probs = state.probabilities();
//! assert!((probs[0] - 0.5).abs() < 1e-12);
//! assert!((probs[3] - 0.5).abs() < 1e-12);
//! ```

pub mod circuit;
pub mod device;
pub mod error;
pub mod gate;
mod kernels;
pub mod observable;
#[cfg(feature = "gpu")]
mod parallel;
mod sampling;
pub mod state;

pub use circuit::NativeCircuit;
pub use device::{Device, Precision, SimOptions};
pub use error::{SimError, SimResult};
pub use gate::{GateMatrix, NativeGate};
pub use observable::{Observable, PauliId, PauliTerm};
pub use state::{DensityMatrix, QuantumState, StateBase};
