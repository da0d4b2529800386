//! Pauli operators.
//!
//! An operator is a sum of weighted Pauli strings:
//!
//!   H = Σ_k  c_k · P_k
//!
//! where each P_k is a tensor product of single-qubit Pauli operators
//! (I, X, Y, Z) on circuit qubits and c_k ∈ ℝ.
//!
//! # Example
//!
//! ```rust
//! use qubridge_ir::{Pauli, PauliOperator, PauliString, QubitId};
//!
//! // H = -1.0·Z₀Z₁  +  0.5·X₀
//! let h = PauliOperator::from_terms(vec![
//!     (PauliString::from_ops([(QubitId(0), Pauli::Z), (QubitId(1), Pauli::Z)]), -1.0),
//!     (PauliString::from_ops([(QubitId(0), Pauli::X)]), 0.5),
//! ]);
//! assert_eq!(h.n_terms(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::qubit::QubitId;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Pauli::I => "I",
            Pauli::X => "X",
            Pauli::Y => "Y",
            Pauli::Z => "Z",
        };
        f.write_str(c)
    }
}

/// A tensor product of Pauli operators on circuit qubits.
///
/// Stored sorted by qubit with identity factors omitted; qubits not listed
/// are implicitly I.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliString {
    ops: Vec<(QubitId, Pauli)>,
}

impl PauliString {
    /// The identity string.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Construct from (qubit, op) pairs.
    ///
    /// Identity operators are dropped; the remaining ops are sorted by qubit.
    /// A qubit listed twice keeps its last operator.
    pub fn from_ops(ops: impl IntoIterator<Item = (QubitId, Pauli)>) -> Self {
        let mut v: Vec<(QubitId, Pauli)> = Vec::new();
        for (q, op) in ops {
            v.retain(|(existing, _)| *existing != q);
            if op != Pauli::I {
                v.push((q, op));
            }
        }
        v.sort_by_key(|(q, _)| *q);
        Self { ops: v }
    }

    /// Non-identity (qubit, op) pairs, sorted by qubit.
    pub fn ops(&self) -> &[(QubitId, Pauli)] {
        &self.ops
    }

    /// True if there are no non-identity operators.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// The highest qubit referenced, or `None` for the identity.
    pub fn max_qubit(&self) -> Option<QubitId> {
        self.ops.last().map(|(q, _)| *q)
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return f.write_str("I");
        }
        for (i, (q, op)) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{op}{}", q.0)?;
        }
        Ok(())
    }
}

/// A real-weighted sum of Pauli strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PauliOperator {
    terms: Vec<(PauliString, f64)>,
}

impl PauliOperator {
    /// Create an empty operator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a list of terms.
    pub fn from_terms(terms: Vec<(PauliString, f64)>) -> Self {
        Self { terms }
    }

    /// Add a term.
    pub fn add_term(&mut self, pauli: PauliString, coeff: f64) -> &mut Self {
        self.terms.push((pauli, coeff));
        self
    }

    /// All terms.
    pub fn terms(&self) -> &[(PauliString, f64)] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// The highest qubit referenced by any term.
    pub fn max_qubit(&self) -> Option<QubitId> {
        self.terms.iter().filter_map(|(p, _)| p.max_qubit()).max()
    }
}

impl FromIterator<(PauliString, f64)> for PauliOperator {
    fn from_iter<T: IntoIterator<Item = (PauliString, f64)>>(iter: T) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}
