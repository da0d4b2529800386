//! Qubit, classical bit and register types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a qubit: its declaration index within the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Identifier of a classical bit: its declaration index within the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

/// A qubit and the register slot it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qubit {
    /// The unique identifier.
    pub id: QubitId,
    /// Name of the owning register.
    pub register: String,
    /// Index within the register.
    pub index: u32,
}

impl Qubit {
    /// Create a qubit in the given register slot.
    pub fn new(id: QubitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: register.into(),
            index,
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

/// A classical bit and the register slot it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clbit {
    /// The unique identifier.
    pub id: ClbitId,
    /// Name of the owning register.
    pub register: String,
    /// Index within the register.
    pub index: u32,
}

impl Clbit {
    /// Create a classical bit in the given register slot.
    pub fn new(id: ClbitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: register.into(),
            index,
        }
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

/// A named quantum register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumRegister {
    /// Register name.
    pub name: String,
    /// Qubits in register order.
    pub qubits: Vec<QubitId>,
}

impl QuantumRegister {
    /// Number of qubits in the register.
    pub fn size(&self) -> usize {
        self.qubits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId(3)), "q3");
        let q = Qubit::new(QubitId(1), "anc", 0);
        assert_eq!(format!("{q}"), "anc[0]");
    }

    #[test]
    fn test_clbit_display() {
        assert_eq!(format!("{}", ClbitId(0)), "c0");
        let c = Clbit::new(ClbitId(2), "meas", 1);
        assert_eq!(format!("{c}"), "meas[1]");
    }
}
