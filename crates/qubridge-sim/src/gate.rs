//! Native gates.
//!
//! Rotations use the engine's own sign convention: `RX(θ)` is
//! `exp(+i·θ/2·X)`, and likewise for `RY` and `RZ`. All angles are in
//! radians.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

use crate::error::{SimError, SimResult};

/// A dense gate matrix in row-major order.
///
/// Bit `k` of a row or column index is the state of the `k`-th qubit
/// returned by [`NativeGate::qubits`].
pub type GateMatrix = Vec<Complex64>;

/// A gate the engine executes natively, with its target qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NativeGate {
    /// Pauli-X.
    X(usize),
    /// Pauli-Y.
    Y(usize),
    /// Pauli-Z.
    Z(usize),
    /// Hadamard.
    H(usize),
    /// Phase gate diag(1, i).
    S(usize),
    /// diag(1, -i).
    Sdag(usize),
    /// diag(1, e^{iπ/4}).
    T(usize),
    /// diag(1, e^{-iπ/4}).
    Tdag(usize),
    /// Square root of X.
    SqrtX(usize),
    /// Inverse square root of X.
    SqrtXdag(usize),
    /// `exp(+i·θ/2·X)`.
    RX(usize, f64),
    /// `exp(+i·θ/2·Y)`.
    RY(usize, f64),
    /// `exp(+i·θ/2·Z)`.
    RZ(usize, f64),
    /// U1(λ) = diag(1, e^{iλ}).
    U1(usize, f64),
    /// U2(φ, λ) = U3(π/2, φ, λ).
    U2(usize, f64, f64),
    /// U3(θ, φ, λ).
    U3(usize, f64, f64, f64),
    /// Controlled-NOT.
    CNOT {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
    },
    /// Controlled-Z.
    CZ {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
    },
    /// SWAP.
    SWAP(usize, usize),
    /// Doubly-controlled NOT.
    Toffoli {
        /// First control.
        control1: usize,
        /// Second control.
        control2: usize,
        /// Target qubit.
        target: usize,
    },
    /// Controlled SWAP.
    Fredkin {
        /// Control qubit.
        control: usize,
        /// First swapped qubit.
        target1: usize,
        /// Second swapped qubit.
        target2: usize,
    },
}

impl NativeGate {
    /// Gate name as the engine reports it.
    pub fn name(&self) -> &'static str {
        match self {
            NativeGate::X(_) => "X",
            NativeGate::Y(_) => "Y",
            NativeGate::Z(_) => "Z",
            NativeGate::H(_) => "H",
            NativeGate::S(_) => "S",
            NativeGate::Sdag(_) => "Sdag",
            NativeGate::T(_) => "T",
            NativeGate::Tdag(_) => "Tdag",
            NativeGate::SqrtX(_) => "sqrtX",
            NativeGate::SqrtXdag(_) => "sqrtXdag",
            NativeGate::RX(..) => "X-rotation",
            NativeGate::RY(..) => "Y-rotation",
            NativeGate::RZ(..) => "Z-rotation",
            NativeGate::U1(..) => "U1",
            NativeGate::U2(..) => "U2",
            NativeGate::U3(..) => "U3",
            NativeGate::CNOT { .. } => "CNOT",
            NativeGate::CZ { .. } => "CZ",
            NativeGate::SWAP(..) => "SWAP",
            NativeGate::Toffoli { .. } => "Toffoli",
            NativeGate::Fredkin { .. } => "Fredkin",
        }
    }

    /// Qubits the gate acts on; controls come first.
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            NativeGate::X(q)
            | NativeGate::Y(q)
            | NativeGate::Z(q)
            | NativeGate::H(q)
            | NativeGate::S(q)
            | NativeGate::Sdag(q)
            | NativeGate::T(q)
            | NativeGate::Tdag(q)
            | NativeGate::SqrtX(q)
            | NativeGate::SqrtXdag(q)
            | NativeGate::RX(q, _)
            | NativeGate::RY(q, _)
            | NativeGate::RZ(q, _)
            | NativeGate::U1(q, _)
            | NativeGate::U2(q, _, _)
            | NativeGate::U3(q, _, _, _) => vec![q],
            NativeGate::CNOT { control, target } | NativeGate::CZ { control, target } => {
                vec![control, target]
            }
            NativeGate::SWAP(a, b) => vec![a, b],
            NativeGate::Toffoli {
                control1,
                control2,
                target,
            } => vec![control1, control2, target],
            NativeGate::Fredkin {
                control,
                target1,
                target2,
            } => vec![control, target1, target2],
        }
    }

    /// Check that every target lies in a `num_qubits` register and that no
    /// target repeats.
    pub fn check(&self, num_qubits: usize) -> SimResult<()> {
        let qubits = self.qubits();
        for (i, &qubit) in qubits.iter().enumerate() {
            if qubit >= num_qubits {
                return Err(SimError::QubitOutOfRange { qubit, num_qubits });
            }
            if qubits[..i].contains(&qubit) {
                return Err(SimError::DuplicateQubit {
                    gate: self.name(),
                    qubit,
                });
            }
        }
        Ok(())
    }

    /// Dense matrix of the gate over [`NativeGate::qubits`].
    pub fn matrix(&self) -> GateMatrix {
        match *self {
            NativeGate::X(_) => pauli_x().to_vec(),
            NativeGate::Y(_) => pauli_y().to_vec(),
            NativeGate::Z(_) => diagonal(c(-1.0, 0.0)).to_vec(),
            NativeGate::H(_) => {
                let h = c(FRAC_1_SQRT_2, 0.0);
                vec![h, h, h, -h]
            }
            NativeGate::S(_) => diagonal(c(0.0, 1.0)).to_vec(),
            NativeGate::Sdag(_) => diagonal(c(0.0, -1.0)).to_vec(),
            NativeGate::T(_) => diagonal(Complex64::from_polar(1.0, FRAC_PI_4)).to_vec(),
            NativeGate::Tdag(_) => diagonal(Complex64::from_polar(1.0, -FRAC_PI_4)).to_vec(),
            NativeGate::SqrtX(_) => {
                let (p, m) = (c(0.5, 0.5), c(0.5, -0.5));
                vec![p, m, m, p]
            }
            NativeGate::SqrtXdag(_) => {
                let (p, m) = (c(0.5, 0.5), c(0.5, -0.5));
                vec![m, p, p, m]
            }
            NativeGate::RX(_, theta) => {
                let (cos, sin) = half_angle(theta);
                vec![c(cos, 0.0), c(0.0, sin), c(0.0, sin), c(cos, 0.0)]
            }
            NativeGate::RY(_, theta) => {
                let (cos, sin) = half_angle(theta);
                vec![c(cos, 0.0), c(sin, 0.0), c(-sin, 0.0), c(cos, 0.0)]
            }
            NativeGate::RZ(_, theta) => vec![
                Complex64::from_polar(1.0, theta / 2.0),
                c(0.0, 0.0),
                c(0.0, 0.0),
                Complex64::from_polar(1.0, -theta / 2.0),
            ],
            NativeGate::U1(_, lambda) => diagonal(Complex64::from_polar(1.0, lambda)).to_vec(),
            NativeGate::U2(_, phi, lambda) => u3(FRAC_PI_2, phi, lambda).to_vec(),
            NativeGate::U3(_, theta, phi, lambda) => u3(theta, phi, lambda).to_vec(),
            NativeGate::CNOT { .. } => controlled(&pauli_x(), 1),
            NativeGate::CZ { .. } => controlled(&diagonal(c(-1.0, 0.0)), 1),
            NativeGate::SWAP(..) => permutation(2, |i| swap_bits(i, 0, 1)),
            NativeGate::Toffoli { .. } => controlled(&pauli_x(), 2),
            NativeGate::Fredkin { .. } => {
                permutation(3, |i| if i & 1 == 1 { swap_bits(i, 1, 2) } else { i })
            }
        }
    }
}

#[inline]
fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn half_angle(theta: f64) -> (f64, f64) {
    ((theta / 2.0).cos(), (theta / 2.0).sin())
}

fn pauli_x() -> [Complex64; 4] {
    [c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)]
}

fn pauli_y() -> [Complex64; 4] {
    [c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0)]
}

fn diagonal(lower: Complex64) -> [Complex64; 4] {
    [c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), lower]
}

fn u3(theta: f64, phi: f64, lambda: f64) -> [Complex64; 4] {
    let (cos, sin) = half_angle(theta);
    [
        c(cos, 0.0),
        -Complex64::from_polar(sin, lambda),
        Complex64::from_polar(sin, phi),
        Complex64::from_polar(cos, phi + lambda),
    ]
}

fn swap_bits(i: usize, a: usize, b: usize) -> usize {
    let (ba, bb) = ((i >> a) & 1, (i >> b) & 1);
    if ba == bb {
        i
    } else {
        i ^ ((1 << a) | (1 << b))
    }
}

/// Embed a single-qubit matrix with `n_controls` control qubits in the low bits.
fn controlled(base: &[Complex64; 4], n_controls: usize) -> GateMatrix {
    let dim = 1 << (n_controls + 1);
    let ctrl = (1 << n_controls) - 1;
    let mut m = vec![c(0.0, 0.0); dim * dim];
    for row in 0..dim {
        if row & ctrl != ctrl {
            m[row * dim + row] = c(1.0, 0.0);
            continue;
        }
        for col in 0..dim {
            if col & ctrl == ctrl {
                m[row * dim + col] = base[(row >> n_controls) * 2 + (col >> n_controls)];
            }
        }
    }
    m
}

/// Matrix of the basis permutation `col -> f(col)` on `n` qubits.
fn permutation(n: usize, f: impl Fn(usize) -> usize) -> GateMatrix {
    let dim = 1 << n;
    let mut m = vec![c(0.0, 0.0); dim * dim];
    for col in 0..dim {
        m[f(col) * dim + col] = c(1.0, 0.0);
    }
    m
}
