//! Gate kinds and gate instances.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::parameter::ParameterExpression;

/// Built-in gate kinds.
///
/// Rotation gates follow the half-turn convention: `Rx(a)` is
/// `exp(-i·(aπ/2)·X)`. `U1`/`U2`/`U3` are the usual IBM-style single-qubit
/// gates with every parameter in half-turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpType {
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,
    /// Rotation around X, one angle.
    Rx,
    /// Rotation around Y, one angle.
    Ry,
    /// Rotation around Z, one angle.
    Rz,
    /// U1(λ).
    U1,
    /// U2(φ, λ).
    U2,
    /// U3(θ, φ, λ).
    U3,
    /// Controlled-X (CNOT).
    CX,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
    /// Controlled-Hadamard.
    CH,
    /// Controlled Z-rotation, one angle.
    CRz,
    /// Controlled phase, one angle.
    CP,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// ZZ-phase interaction `exp(-i·(aπ/2)·Z⊗Z)`, one angle.
    ZZPhase,
    /// Toffoli (CCX).
    CCX,
    /// Fredkin (CSWAP).
    CSwap,
}

impl OpType {
    /// Lower-case gate name.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            OpType::X => "x",
            OpType::Y => "y",
            OpType::Z => "z",
            OpType::H => "h",
            OpType::S => "s",
            OpType::Sdg => "sdg",
            OpType::T => "t",
            OpType::Tdg => "tdg",
            OpType::SX => "sx",
            OpType::SXdg => "sxdg",
            OpType::Rx => "rx",
            OpType::Ry => "ry",
            OpType::Rz => "rz",
            OpType::U1 => "u1",
            OpType::U2 => "u2",
            OpType::U3 => "u3",
            OpType::CX => "cx",
            OpType::CY => "cy",
            OpType::CZ => "cz",
            OpType::CH => "ch",
            OpType::CRz => "crz",
            OpType::CP => "cp",
            OpType::Swap => "swap",
            OpType::ISwap => "iswap",
            OpType::ZZPhase => "zzphase",
            OpType::CCX => "ccx",
            OpType::CSwap => "cswap",
        }
    }

    /// Number of qubits the gate acts on.
    #[inline]
    pub fn num_qubits(self) -> u32 {
        match self {
            OpType::X
            | OpType::Y
            | OpType::Z
            | OpType::H
            | OpType::S
            | OpType::Sdg
            | OpType::T
            | OpType::Tdg
            | OpType::SX
            | OpType::SXdg
            | OpType::Rx
            | OpType::Ry
            | OpType::Rz
            | OpType::U1
            | OpType::U2
            | OpType::U3 => 1,

            OpType::CX
            | OpType::CY
            | OpType::CZ
            | OpType::CH
            | OpType::CRz
            | OpType::CP
            | OpType::Swap
            | OpType::ISwap
            | OpType::ZZPhase => 2,

            OpType::CCX | OpType::CSwap => 3,
        }
    }

    /// Number of angle parameters the gate takes.
    #[inline]
    pub fn num_params(self) -> usize {
        match self {
            OpType::Rx
            | OpType::Ry
            | OpType::Rz
            | OpType::U1
            | OpType::CRz
            | OpType::CP
            | OpType::ZZPhase => 1,
            OpType::U2 => 2,
            OpType::U3 => 3,
            _ => 0,
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A gate defined outside the built-in set.
///
/// Carried through the IR so callers can describe arbitrary operations, but
/// no backend knows how to execute one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
}

impl CustomGate {
    /// Create a new custom gate.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
        }
    }
}

/// Either a built-in gate kind or a custom one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A built-in gate.
    Standard(OpType),
    /// A custom gate.
    Custom(CustomGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(op) => op.name(),
            GateKind::Custom(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(op) => op.num_qubits(),
            GateKind::Custom(g) => g.num_qubits,
        }
    }

    /// The built-in gate kind, if any.
    pub fn op_type(&self) -> Option<OpType> {
        match self {
            GateKind::Standard(op) => Some(*op),
            GateKind::Custom(_) => None,
        }
    }
}

/// A gate together with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Angle parameters, in half-turns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParameterExpression>,
}

impl Gate {
    /// Create a built-in gate, checking the parameter count.
    pub fn new(op: OpType, params: Vec<ParameterExpression>) -> IrResult<Self> {
        if params.len() != op.num_params() {
            return Err(IrError::ParameterCountMismatch {
                gate_name: op.name().to_string(),
                expected: op.num_params(),
                got: params.len(),
            });
        }
        Ok(Self {
            kind: GateKind::Standard(op),
            params,
        })
    }

    /// Create a parameterless built-in gate.
    ///
    /// Use [`Gate::new`] for rotations; passing a parameterised kind here
    /// yields a gate that the builder rejects.
    pub fn fixed(op: OpType) -> Self {
        Self {
            kind: GateKind::Standard(op),
            params: vec![],
        }
    }

    /// Create a custom gate.
    pub fn custom(gate: CustomGate, params: Vec<ParameterExpression>) -> Self {
        Self {
            kind: GateKind::Custom(gate),
            params,
        }
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// True if any parameter still contains a free symbol.
    pub fn is_parameterized(&self) -> bool {
        self.params.iter().any(ParameterExpression::is_symbolic)
    }
}

impl From<OpType> for Gate {
    fn from(op: OpType) -> Self {
        Gate::fixed(op)
    }
}
