//! Pauli observables.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// A non-identity single-qubit Pauli factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliId {
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

/// One weighted Pauli product in an [`Observable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    coeff: f64,
    ops: Vec<(usize, PauliId)>,
}

impl PauliTerm {
    /// Real coefficient.
    pub fn coeff(&self) -> f64 {
        self.coeff
    }

    /// (qubit, factor) pairs; qubits not listed carry the identity.
    pub fn ops(&self) -> &[(usize, PauliId)] {
        &self.ops
    }

    /// Bit masks describing the action on a basis state.
    ///
    /// `P|i⟩ = i^{ny} · (-1)^{popcount(i & sign)} · |i ^ flip⟩`.
    pub(crate) fn masks(&self) -> TermMasks {
        let mut masks = TermMasks::default();
        for &(q, p) in &self.ops {
            match p {
                PauliId::X => masks.flip |= 1 << q,
                PauliId::Y => {
                    masks.flip |= 1 << q;
                    masks.sign |= 1 << q;
                    masks.ny += 1;
                }
                PauliId::Z => masks.sign |= 1 << q,
            }
        }
        masks
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TermMasks {
    pub flip: usize,
    pub sign: usize,
    pub ny: u32,
}

/// A real-weighted sum of Pauli products on a fixed register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observable {
    num_qubits: usize,
    terms: Vec<PauliTerm>,
}

impl Observable {
    /// Create an empty observable on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            terms: vec![],
        }
    }

    /// Add `coeff · Π ops`. An empty `ops` adds a multiple of the identity.
    pub fn add_operator(
        &mut self,
        coeff: f64,
        ops: impl IntoIterator<Item = (usize, PauliId)>,
    ) -> SimResult<&mut Self> {
        let ops: Vec<_> = ops.into_iter().collect();
        for (i, &(qubit, _)) in ops.iter().enumerate() {
            if qubit >= self.num_qubits {
                return Err(SimError::QubitOutOfRange {
                    qubit,
                    num_qubits: self.num_qubits,
                });
            }
            if ops[..i].iter().any(|(q, _)| *q == qubit) {
                return Err(SimError::DuplicateQubit {
                    gate: "pauli",
                    qubit,
                });
            }
        }
        self.terms.push(PauliTerm { coeff, ops });
        Ok(self)
    }

    /// Register size.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// All terms.
    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }
}
