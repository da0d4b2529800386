//! Qubridge Source Circuit Representation
//!
//! This crate provides the circuit model that callers build and that the
//! qubridge adapters convert for execution.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`], grouped into
//!   named registers
//! - **Gates**: [`OpType`] for built-in gates and [`CustomGate`] for
//!   operations no backend knows natively
//! - **Parameters**: [`ParameterExpression`] angles in half-turns, possibly
//!   symbolic
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Circuit**: [`Circuit`] ordered, validated builder API with a global phase
//! - **Operators**: [`PauliOperator`] weighted Pauli strings for expectation values
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qubridge_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//!
//! // |00⟩ → (|00⟩ + |11⟩)/√2
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.n_gates(), 2);
//! ```
//!
//! # Example: Parameterized Circuit
//!
//! ```rust
//! use qubridge_ir::{Circuit, ParameterExpression, QubitId};
//! use rustc_hash::FxHashMap;
//!
//! let mut circuit = Circuit::with_size("variational", 1, 0);
//! circuit.rx(ParameterExpression::symbol("theta"), QubitId(0)).unwrap();
//!
//! let mut bindings = FxHashMap::default();
//! bindings.insert("theta".to_string(), 0.25);
//! let bound = circuit.bind_parameters(&bindings);
//! assert!(bound.free_symbols().is_empty());
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod operator;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, GateKind, OpType};
pub use instruction::{Instruction, InstructionKind};
pub use operator::{Pauli, PauliOperator, PauliString};
pub use parameter::ParameterExpression;
pub use qubit::{Clbit, ClbitId, QuantumRegister, Qubit, QubitId};
