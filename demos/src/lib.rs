//! Qubridge Demo Suite
//!
//! Small workloads that drive the qulacs backend end to end:
//!
//! - **Bell shots**: sample a measured Bell pair and print the counts
//! - **H2 energy**: scan the one-parameter UCC ansatz for the minimal-basis
//!   hydrogen molecule and report the lowest energy found

use std::f64::consts::PI;

use qubridge_hal::{Backend, HalResult, RunMode};
use qubridge_ir::{Circuit, IrResult, Pauli, PauliOperator, PauliString, QubitId};

/// Ground-state energy of the three-qubit H2 Hamiltonian, in Hartree.
pub const H2_GROUND_ENERGY: f64 = -1.137_306_035_753_400_4;

/// Parameter value that reaches the H2 ground state.
pub const H2_OPTIMAL_THETA: f64 = -0.111_768_49;

/// Three-qubit UCC ansatz for H2 with a single excitation angle `theta` (radians).
pub fn h2_ansatz(theta: f64) -> IrResult<Circuit> {
    let q = QubitId;
    let mut circ = Circuit::with_size("h2_ucc", 3, 0);
    circ.x(q(0))?.x(q(1))?;
    circ.rx(0.5, q(0))?.h(q(1))?.h(q(2))?;
    circ.cx(q(0), q(1))?.cx(q(1), q(2))?;
    circ.rz(-2.0 / PI * theta, q(2))?;
    circ.cx(q(1), q(2))?.cx(q(0), q(1))?;
    circ.rx(-0.5, q(0))?.h(q(1))?.h(q(2))?;
    Ok(circ)
}

/// Qubit Hamiltonian of H2 in the STO-3G basis after symmetry reduction.
pub fn h2_hamiltonian() -> PauliOperator {
    use Pauli::{X, Y, Z};
    let ps = |ops: &[(u32, Pauli)]| {
        PauliString::from_ops(ops.iter().map(|&(q, p)| (QubitId(q), p)))
    };
    PauliOperator::from_terms(vec![
        (PauliString::identity(), 0.084_064_444_594_657_76),
        (ps(&[(0, Z)]), 0.172_183_932_619_155_43),
        (ps(&[(1, Z)]), 0.172_183_932_619_155_46),
        (ps(&[(2, Z)]), -0.451_506_984_448_049_15),
        (ps(&[(0, Z), (1, Z)]), 0.168_927_538_700_879_12),
        (ps(&[(0, Z), (2, Z)]), 0.287_058_065_181_590_5),
        (ps(&[(1, Z), (2, Z)]), 0.287_058_065_181_590_5),
        (ps(&[(0, Y), (1, X), (2, Y)]), 0.045_232_799_946_057_85),
        (ps(&[(0, X), (1, X), (2, X)]), 0.045_232_799_946_057_85),
        (ps(&[(0, Y), (1, Y), (2, X)]), -0.045_232_799_946_057_85),
        (ps(&[(0, X), (1, Y), (2, Y)]), 0.045_232_799_946_057_85),
    ])
}

/// One point of an energy scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyPoint {
    pub theta: f64,
    pub energy: f64,
}

/// Evaluate the H2 energy at `steps` evenly spaced angles in `[lo, hi]`.
pub fn scan_h2_energy(
    backend: &dyn Backend,
    lo: f64,
    hi: f64,
    steps: usize,
) -> anyhow::Result<Vec<EnergyPoint>> {
    let hamiltonian = h2_hamiltonian();
    let mode = RunMode::Expectation(hamiltonian);
    let steps = steps.max(2);
    let mut points = Vec::with_capacity(steps);
    for i in 0..steps {
        let theta = lo + (hi - lo) * i as f64 / (steps - 1) as f64;
        let circuit = h2_ansatz(theta)?;
        let energy = h2_energy(backend, &circuit, &mode)?;
        tracing::debug!(theta, energy, "evaluated ansatz");
        points.push(EnergyPoint { theta, energy });
    }
    Ok(points)
}

fn h2_energy(backend: &dyn Backend, circuit: &Circuit, mode: &RunMode) -> HalResult<f64> {
    let result = backend.process(circuit, mode)?;
    Ok(result.expectation().unwrap_or(f64::NAN))
}

/// Lowest-energy point of a scan.
pub fn minimum(points: &[EnergyPoint]) -> Option<EnergyPoint> {
    points
        .iter()
        .copied()
        .min_by(|a, b| a.energy.total_cmp(&b.energy))
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", "=".repeat(60));
    println!("  {title}");
    println!("{}", "=".repeat(60));
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("> {title}");
    println!("{}", "-".repeat(40));
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {label}: {value}");
}
