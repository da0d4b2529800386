//! Qubridge Qulacs Adapter
//!
//! Converts qubridge circuits into the qulacs-style native object model and
//! exposes the simulator engine as a [`qubridge_hal::Backend`].
//!
//! # Features
//!
//! - **Circuit conversion**: [`circuit_to_native`] maps every supported gate
//!   to a native gate or a short native decomposition, in order
//! - **State, shots and expectation values** through one backend contract
//! - **Two execution libraries**: CPU, and a data-parallel library selected
//!   with `device = "gpu"` (cargo feature `gpu`, on by default)
//! - **Prepared-circuit cache** keyed by the circuit's content hash
//!
//! # Basis order
//!
//! States are returned in increasing lexicographic order (the first qubit is
//! the most significant bit); ask for [`qubridge_hal::BasisOrder::Dlo`] to
//! reverse it. Shot rows list classical bits `c0` first.
//!
//! # Example
//!
//! ```
//! use qubridge_adapter_qulacs::QulacsBackend;
//! use qubridge_hal::{Backend, BasisOrder, RunMode};
//! use qubridge_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let backend = QulacsBackend::new();
//! let result = backend.process(&circuit, &RunMode::State).unwrap();
//! let state = result.state_vector(BasisOrder::Ilo).unwrap();
//! assert!((state[0].re - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
//! assert!((state[3].re - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
//! ```

mod backend;
mod config;
mod convert;
mod error;
mod program;

pub use backend::{CPU_BACKEND, GPU_BACKEND, QulacsBackend, register_backends};
pub use config::{QulacsConfig, ResultType};
pub use convert::{
    ConvertOptions, QubitMap, SUPPORTED_GATES, circuit_to_native, is_supported, map_operator,
    operator_to_observable,
};
pub use error::{ConvertError, ConvertResult, ImaginaryResidue};
pub use program::QulacsCircuit;
