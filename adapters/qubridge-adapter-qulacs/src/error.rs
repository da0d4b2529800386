//! Conversion errors.

use qubridge_hal::HalError;
use qubridge_sim::SimError;
use thiserror::Error;

/// Errors raised while translating a circuit or operator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The gate has no native mapping or decomposition.
    #[error("Gate '{gate}' at instruction {position} is not implemented for qulacs")]
    UnsupportedGate { gate: String, position: usize },

    /// A gate parameter still contains free symbols.
    #[error("Gate '{gate}' at instruction {position} has unbound parameters: {symbols}")]
    UnboundParameter {
        gate: String,
        position: usize,
        symbols: String,
    },

    /// A qubit is not part of the register being mapped.
    #[error("Qubit {qubit} is outside the {num_qubits}-qubit register")]
    QubitOutOfRange { qubit: u32, num_qubits: usize },

    /// A gate acts on a qubit after it has been measured.
    #[error("Gate '{gate}' at instruction {position} acts on measured qubit {qubit}")]
    MeasuredQubitReused {
        gate: String,
        position: usize,
        qubit: u32,
    },

    /// The native object model rejected the result.
    #[error(transparent)]
    Native(#[from] SimError),
}

/// An expectation value came out with a non-negligible imaginary part.
#[derive(Debug, Error)]
#[error("Expectation value has imaginary part {imag:e} (tolerance {tolerance:e})")]
pub struct ImaginaryResidue {
    pub imag: f64,
    pub tolerance: f64,
}

/// Result type for conversions.
pub type ConvertResult<T> = Result<T, ConvertError>;

impl From<ConvertError> for HalError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::UnsupportedGate { gate, position } => {
                HalError::UnsupportedGate { gate, position }
            }
            other => HalError::IncompatibleCircuit(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_gate_keeps_position() {
        let err: HalError = ConvertError::UnsupportedGate {
            gate: "ch".into(),
            position: 4,
        }
        .into();
        assert!(matches!(
            err,
            HalError::UnsupportedGate { ref gate, position: 4 } if gate == "ch"
        ));
    }

    #[test]
    fn test_unbound_is_incompatible() {
        let err: HalError = ConvertError::UnboundParameter {
            gate: "rz".into(),
            position: 0,
            symbols: "theta".into(),
        }
        .into();
        match err {
            HalError::IncompatibleCircuit(msg) => assert!(msg.contains("theta")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
