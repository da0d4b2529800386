//! Conversion from qubridge circuits to native qulacs-style circuits.
//!
//! Source angles are in half-turns; native gates take radians. Native
//! rotations are `exp(+iθP/2)`, so `Rx(a)` becomes `RX(-aπ)`.
//!
//! | Source | Native |
//! |--------|--------|
//! | `x y z h s sdg t tdg` | `X Y Z H S Sdag T Tdag` |
//! | `sx sxdg` | `SqrtX SqrtXdag` |
//! | `rx ry rz` | `RX RY RZ` with negated angle |
//! | `u1 u2 u3` | `U1 U2 U3`, parameters times π |
//! | `cx cz swap` | `CNOT CZ SWAP` |
//! | `ccx cswap` | `Toffoli Fredkin` |
//! | `cy` | `Sdag(t) CNOT(c, t) S(t)` |
//! | `measure barrier` | skipped |

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use qubridge_ir::{Circuit, Gate, InstructionKind, OpType, Pauli, PauliOperator, QubitId};
use qubridge_sim::{NativeCircuit, NativeGate, Observable, PauliId};

use crate::error::{ConvertError, ConvertResult};

/// Source gates with a native mapping.
pub const SUPPORTED_GATES: &[OpType] = &[
    OpType::X,
    OpType::Y,
    OpType::Z,
    OpType::H,
    OpType::S,
    OpType::Sdg,
    OpType::T,
    OpType::Tdg,
    OpType::SX,
    OpType::SXdg,
    OpType::Rx,
    OpType::Ry,
    OpType::Rz,
    OpType::U1,
    OpType::U2,
    OpType::U3,
    OpType::CX,
    OpType::CY,
    OpType::CZ,
    OpType::Swap,
    OpType::CCX,
    OpType::CSwap,
];

/// Options controlling qubit numbering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Mirror qubit positions (`n - 1 - pos`) so the native little-endian
    /// state reads in increasing lexicographic order.
    pub reverse_index: bool,
}

impl ConvertOptions {
    /// Options with mirrored positions.
    pub fn reversed() -> Self {
        Self {
            reverse_index: true,
        }
    }
}

/// Absolute native index of every qubit in a circuit.
///
/// Registers are laid out in declaration order: a qubit's position is the
/// number of qubits in preceding registers plus its index in its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QubitMap {
    indices: FxHashMap<QubitId, usize>,
    num_qubits: usize,
}

impl QubitMap {
    /// Build the map for `circuit`.
    pub fn for_circuit(circuit: &Circuit, options: &ConvertOptions) -> Self {
        let n = circuit.num_qubits();
        let mut indices = FxHashMap::default();
        let mut offset = 0;
        for register in circuit.qregs() {
            for (i, &qubit) in register.qubits.iter().enumerate() {
                indices.insert(qubit, place(offset + i, n, options));
            }
            offset += register.size();
        }
        Self {
            indices,
            num_qubits: n,
        }
    }

    /// Map `QubitId(i)` to position `i` of a single `num_qubits` register.
    pub fn linear(num_qubits: usize, options: &ConvertOptions) -> Self {
        let indices = (0..num_qubits)
            .map(|i| (QubitId(i as u32), place(i, num_qubits, options)))
            .collect();
        Self {
            indices,
            num_qubits,
        }
    }

    /// Native index of `qubit`.
    pub fn index(&self, qubit: QubitId) -> ConvertResult<usize> {
        self.indices
            .get(&qubit)
            .copied()
            .ok_or(ConvertError::QubitOutOfRange {
                qubit: qubit.0,
                num_qubits: self.num_qubits,
            })
    }

    /// Register size.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }
}

fn place(position: usize, n: usize, options: &ConvertOptions) -> usize {
    if options.reverse_index {
        n - 1 - position
    } else {
        position
    }
}

/// Check if a source gate has a native mapping.
pub fn is_supported(op: OpType) -> bool {
    SUPPORTED_GATES.contains(&op)
}

/// Convert a circuit into a native circuit on the same number of qubits.
///
/// Gates keep their order. Measurements and barriers are dropped. Fails on
/// the first gate without a mapping; no partial circuit is returned.
pub fn circuit_to_native(
    circuit: &Circuit,
    options: &ConvertOptions,
) -> ConvertResult<NativeCircuit> {
    let map = QubitMap::for_circuit(circuit, options);
    let mut native = NativeCircuit::new(circuit.num_qubits());

    for (position, inst) in circuit.iter().enumerate() {
        let gate = match &inst.kind {
            InstructionKind::Gate(gate) => gate,
            InstructionKind::Measure | InstructionKind::Barrier => continue,
            InstructionKind::Reset => {
                return Err(ConvertError::UnsupportedGate {
                    gate: inst.name().to_string(),
                    position,
                });
            }
        };

        let unsupported = || ConvertError::UnsupportedGate {
            gate: gate.name().to_string(),
            position,
        };
        let op = gate
            .kind
            .op_type()
            .filter(|op| is_supported(*op))
            .ok_or_else(unsupported)?;

        let angles = radians(gate, position)?;
        let qubits = inst
            .qubits
            .iter()
            .map(|q| map.index(*q))
            .collect::<ConvertResult<Vec<_>>>()?;

        for native_gate in lower(op, &qubits, &angles).ok_or_else(unsupported)? {
            native.add_gate(native_gate)?;
        }
    }

    debug!(
        "Converted '{}': {} instructions -> {} native gates",
        circuit.name(),
        circuit.instructions().len(),
        native.len()
    );
    Ok(native)
}

/// Convert a Pauli operator on `n_qubits` qubits `0..n_qubits`.
pub fn operator_to_observable(
    operator: &PauliOperator,
    n_qubits: usize,
    options: &ConvertOptions,
) -> ConvertResult<Observable> {
    map_operator(operator, &QubitMap::linear(n_qubits, options))
}

/// Convert a Pauli operator through an existing qubit map.
pub fn map_operator(operator: &PauliOperator, map: &QubitMap) -> ConvertResult<Observable> {
    let mut observable = Observable::new(map.num_qubits());
    for (pauli, coeff) in operator.terms() {
        let mut ops = Vec::with_capacity(pauli.ops().len());
        for &(qubit, p) in pauli.ops() {
            let id = match p {
                Pauli::I => continue,
                Pauli::X => PauliId::X,
                Pauli::Y => PauliId::Y,
                Pauli::Z => PauliId::Z,
            };
            ops.push((map.index(qubit)?, id));
        }
        observable.add_operator(*coeff, ops)?;
    }
    Ok(observable)
}

fn radians(gate: &Gate, position: usize) -> ConvertResult<Vec<f64>> {
    gate.params
        .iter()
        .map(|p| {
            p.radians().ok_or_else(|| {
                let symbols: Vec<_> = p.symbols().into_iter().collect();
                ConvertError::UnboundParameter {
                    gate: gate.name().to_string(),
                    position,
                    symbols: if symbols.is_empty() {
                        p.to_string()
                    } else {
                        symbols.join(", ")
                    },
                }
            })
        })
        .collect()
}

fn lower(op: OpType, q: &[usize], a: &[f64]) -> Option<Vec<NativeGate>> {
    let gates = match op {
        OpType::X => vec![NativeGate::X(q[0])],
        OpType::Y => vec![NativeGate::Y(q[0])],
        OpType::Z => vec![NativeGate::Z(q[0])],
        OpType::H => vec![NativeGate::H(q[0])],
        OpType::S => vec![NativeGate::S(q[0])],
        OpType::Sdg => vec![NativeGate::Sdag(q[0])],
        OpType::T => vec![NativeGate::T(q[0])],
        OpType::Tdg => vec![NativeGate::Tdag(q[0])],
        OpType::SX => vec![NativeGate::SqrtX(q[0])],
        OpType::SXdg => vec![NativeGate::SqrtXdag(q[0])],

        OpType::Rx => vec![NativeGate::RX(q[0], -a[0])],
        OpType::Ry => vec![NativeGate::RY(q[0], -a[0])],
        OpType::Rz => vec![NativeGate::RZ(q[0], -a[0])],

        OpType::U1 => vec![NativeGate::U1(q[0], a[0])],
        OpType::U2 => vec![NativeGate::U2(q[0], a[0], a[1])],
        OpType::U3 => vec![NativeGate::U3(q[0], a[0], a[1], a[2])],

        OpType::CX => vec![NativeGate::CNOT {
            control: q[0],
            target: q[1],
        }],
        OpType::CZ => vec![NativeGate::CZ {
            control: q[0],
            target: q[1],
        }],
        OpType::Swap => vec![NativeGate::SWAP(q[0], q[1])],
        OpType::CY => vec![
            NativeGate::Sdag(q[1]),
            NativeGate::CNOT {
                control: q[0],
                target: q[1],
            },
            NativeGate::S(q[1]),
        ],

        OpType::CCX => vec![NativeGate::Toffoli {
            control1: q[0],
            control2: q[1],
            target: q[2],
        }],
        OpType::CSwap => vec![NativeGate::Fredkin {
            control: q[0],
            target1: q[1],
            target2: q[2],
        }],

        OpType::CH | OpType::CRz | OpType::CP | OpType::ISwap | OpType::ZZPhase => return None,
    };
    Some(gates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qubridge_ir::{ClbitId, CustomGate, ParameterExpression, PauliString};
    use std::f64::consts::PI;

    fn convert(circuit: &Circuit) -> NativeCircuit {
        circuit_to_native(circuit, &ConvertOptions::default()).unwrap()
    }

    #[test]
    fn test_fixed_gates_map_one_to_one() {
        let mut circuit = Circuit::with_size("t", 3, 0);
        circuit
            .x(QubitId(0))
            .unwrap()
            .sdg(QubitId(1))
            .unwrap()
            .sxdg(QubitId(2))
            .unwrap()
            .cx(QubitId(0), QubitId(2))
            .unwrap()
            .ccx(QubitId(0), QubitId(1), QubitId(2))
            .unwrap()
            .cswap(QubitId(2), QubitId(0), QubitId(1))
            .unwrap();

        let native = convert(&circuit);
        assert_eq!(
            native.gates(),
            &[
                NativeGate::X(0),
                NativeGate::Sdag(1),
                NativeGate::SqrtXdag(2),
                NativeGate::CNOT {
                    control: 0,
                    target: 2
                },
                NativeGate::Toffoli {
                    control1: 0,
                    control2: 1,
                    target: 2
                },
                NativeGate::Fredkin {
                    control: 2,
                    target1: 0,
                    target2: 1
                },
            ]
        );
    }

    #[test]
    fn test_rotation_sign_and_units() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit.rx(0.5, QubitId(0)).unwrap();
        circuit.rz(-0.25, QubitId(0)).unwrap();
        circuit.u3(0.5, 1.0, -0.5, QubitId(0)).unwrap();

        let native = convert(&circuit);
        assert_eq!(native.gates()[0], NativeGate::RX(0, -PI / 2.0));
        assert_eq!(native.gates()[1], NativeGate::RZ(0, PI / 4.0));
        assert_eq!(native.gates()[2], NativeGate::U3(0, PI / 2.0, PI, -PI / 2.0));
    }

    #[test]
    fn test_cy_decomposition() {
        let mut circuit = Circuit::with_size("t", 2, 0);
        circuit.cy(QubitId(1), QubitId(0)).unwrap();
        let native = convert(&circuit);
        assert_eq!(
            native.gates(),
            &[
                NativeGate::Sdag(0),
                NativeGate::CNOT {
                    control: 1,
                    target: 0
                },
                NativeGate::S(0),
            ]
        );
    }

    #[test]
    fn test_measure_and_barrier_skipped() {
        let mut circuit = Circuit::with_size("t", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .barrier_all()
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();
        let native = convert(&circuit);
        assert_eq!(native.gates(), &[NativeGate::H(0)]);
        assert_eq!(native.num_qubits(), 2);
    }

    #[test]
    fn test_unsupported_gate_position() {
        let mut circuit = Circuit::with_size("t", 2, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .ch(QubitId(0), QubitId(1))
            .unwrap();

        let err = circuit_to_native(&circuit, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnsupportedGate { ref gate, position: 2 } if gate == "ch"
        ));
    }

    #[test]
    fn test_reset_and_custom_unsupported() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit.reset(QubitId(0)).unwrap();
        assert!(matches!(
            circuit_to_native(&circuit, &ConvertOptions::default()),
            Err(ConvertError::UnsupportedGate { position: 0, .. })
        ));

        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit
            .gate(Gate::custom(CustomGate::new("oracle", 1), vec![]), [QubitId(0)])
            .unwrap();
        assert!(matches!(
            circuit_to_native(&circuit, &ConvertOptions::default()),
            Err(ConvertError::UnsupportedGate { ref gate, .. }) if gate == "oracle"
        ));
    }

    #[test]
    fn test_unbound_parameter() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit
            .ry(
                ParameterExpression::symbol("theta") * ParameterExpression::constant(2.0),
                QubitId(0),
            )
            .unwrap();
        let err = circuit_to_native(&circuit, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnboundParameter { ref symbols, .. } if symbols == "theta"
        ));
    }

    #[test]
    fn test_reverse_index() {
        let mut circuit = Circuit::with_size("t", 3, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let native = circuit_to_native(&circuit, &ConvertOptions::reversed()).unwrap();
        assert_eq!(
            native.gates(),
            &[NativeGate::CNOT {
                control: 2,
                target: 1
            }]
        );
    }

    #[test]
    fn test_register_offsets() {
        let mut circuit = Circuit::new("regs");
        let a = circuit.add_qreg("a", 2).unwrap();
        let b = circuit.add_qreg("b", 3).unwrap();

        let map = QubitMap::for_circuit(&circuit, &ConvertOptions::default());
        assert_eq!(map.index(a[1]).unwrap(), 1);
        assert_eq!(map.index(b[0]).unwrap(), 2);
        assert_eq!(map.index(b[2]).unwrap(), 4);

        let map = QubitMap::for_circuit(&circuit, &ConvertOptions::reversed());
        assert_eq!(map.index(a[0]).unwrap(), 4);
        assert_eq!(map.index(b[2]).unwrap(), 0);
    }

    #[test]
    fn test_operator_to_observable() {
        let mut op = PauliOperator::new();
        op.add_term(PauliString::identity(), 0.5);
        op.add_term(
            PauliString::from_ops([(QubitId(0), Pauli::Z), (QubitId(2), Pauli::X)]),
            -1.0,
        );

        let obs = operator_to_observable(&op, 3, &ConvertOptions::reversed()).unwrap();
        assert_eq!(obs.num_qubits(), 3);
        assert_eq!(obs.terms().len(), 2);
        assert!(obs.terms()[0].ops().is_empty());
        assert_eq!(obs.terms()[1].ops(), &[(2, PauliId::Z), (0, PauliId::X)]);
    }

    #[test]
    fn test_operator_out_of_range() {
        let mut op = PauliOperator::new();
        op.add_term(PauliString::from_ops([(QubitId(3), Pauli::Y)]), 1.0);
        assert!(matches!(
            operator_to_observable(&op, 2, &ConvertOptions::default()),
            Err(ConvertError::QubitOutOfRange { qubit: 3, num_qubits: 2 })
        ));
    }
}
