//! Native circuits.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::gate::NativeGate;
use crate::state::StateBase;

/// An ordered gate list on a fixed-size register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeCircuit {
    num_qubits: usize,
    gates: Vec<NativeGate>,
}

impl NativeCircuit {
    /// Create an empty circuit on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: vec![],
        }
    }

    /// Append a gate; its targets must lie in the register.
    pub fn add_gate(&mut self, gate: NativeGate) -> SimResult<&mut Self> {
        gate.check(self.num_qubits)?;
        self.gates.push(gate);
        Ok(self)
    }

    /// Register size.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gates in application order.
    pub fn gates(&self) -> &[NativeGate] {
        &self.gates
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// True if the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Apply every gate to `state` in order.
    pub fn update_quantum_state<S: StateBase + ?Sized>(&self, state: &mut S) -> SimResult<()> {
        if state.num_qubits() != self.num_qubits {
            return Err(SimError::SizeMismatch {
                circuit: self.num_qubits,
                state: state.num_qubits(),
            });
        }
        debug!(
            "Applying {} gates on {} qubits ({:?})",
            self.gates.len(),
            self.num_qubits,
            state.options().device
        );
        for gate in &self.gates {
            state.apply_gate(gate)?;
        }
        Ok(())
    }
}
