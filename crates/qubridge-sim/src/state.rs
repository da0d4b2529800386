//! Quantum states: the pure state vector and the density matrix.

use num_complex::Complex64;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::device::{Device, Precision, SimOptions};
use crate::error::{SimError, SimResult};
use crate::gate::NativeGate;
use crate::kernels::{self, pauli_phase};
use crate::observable::Observable;
use crate::sampling;

/// Operations shared by every state representation.
pub trait StateBase: Send {
    /// Register size.
    fn num_qubits(&self) -> usize;

    /// Options the state was allocated with.
    fn options(&self) -> SimOptions;

    /// Evolve the state by one gate.
    fn apply_gate(&mut self, gate: &NativeGate) -> SimResult<()>;

    /// Probability of each computational basis state.
    fn probabilities(&self) -> Vec<f64>;

    /// Expectation value of `observable`; complex to expose numerical residue.
    fn expectation_value(&self, observable: &Observable) -> SimResult<Complex64>;

    /// Draw `n_shots` basis-state indices with a seeded generator.
    fn sampling(&self, n_shots: usize, seed: u64) -> Vec<usize> {
        sampling::sample(&self.probabilities(), n_shots, seed)
    }
}

fn check_available(options: SimOptions) -> SimResult<()> {
    if options.device.is_available() {
        Ok(())
    } else {
        Err(SimError::DeviceUnavailable(options.device))
    }
}

fn check_observable(observable: &Observable, num_qubits: usize) -> SimResult<()> {
    if observable.num_qubits() > num_qubits {
        return Err(SimError::SizeMismatch {
            circuit: observable.num_qubits(),
            state: num_qubits,
        });
    }
    Ok(())
}

// =============================================================================
// State vector
// =============================================================================

/// A pure state of `n` qubits stored as `2^n` amplitudes.
///
/// Qubit `q` is bit `q` of the basis index.
#[derive(Debug, Clone)]
pub struct QuantumState {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
    options: SimOptions,
}

impl QuantumState {
    /// Allocate |0...0⟩ on the CPU at double precision.
    pub fn new(num_qubits: usize) -> SimResult<Self> {
        Self::with_options(num_qubits, SimOptions::default())
    }

    /// Allocate |0...0⟩ with the given options.
    pub fn with_options(num_qubits: usize, options: SimOptions) -> SimResult<Self> {
        check_available(options)?;
        Ok(Self {
            amplitudes: kernels::zero_state(num_qubits, num_qubits)?,
            num_qubits,
            options,
        })
    }

    /// Amplitudes indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Take ownership of the amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Squared norm; 1 for a normalised state.
    pub fn norm_squared(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Multiply every amplitude by `coef`.
    pub fn multiply_coef(&mut self, coef: Complex64) {
        match self.options.device {
            #[cfg(feature = "gpu")]
            Device::Gpu => crate::parallel::scale(&mut self.amplitudes, coef),
            _ => self.amplitudes.iter_mut().for_each(|a| *a *= coef),
        }
    }

    fn apply_kernel(&mut self, gate: &NativeGate) {
        match *gate {
            NativeGate::X(q) => self.apply_x(q),
            NativeGate::Y(q) => self.apply_y(q),
            NativeGate::Z(q) => self.apply_z(q),
            NativeGate::H(q) => self.apply_h(q),
            NativeGate::S(q) => self.apply_phase(q, FRAC_PI_2),
            NativeGate::Sdag(q) => self.apply_phase(q, -FRAC_PI_2),
            NativeGate::T(q) => self.apply_phase(q, FRAC_PI_4),
            NativeGate::Tdag(q) => self.apply_phase(q, -FRAC_PI_4),
            NativeGate::SqrtX(_) | NativeGate::SqrtXdag(_) => {
                kernels::apply_matrix(&mut self.amplitudes, &gate.qubits(), &gate.matrix());
            }
            NativeGate::RX(q, theta) => self.apply_rx(q, theta),
            NativeGate::RY(q, theta) => self.apply_ry(q, theta),
            NativeGate::RZ(q, theta) => self.apply_rz(q, theta),
            NativeGate::U1(q, lambda) => self.apply_phase(q, lambda),
            NativeGate::U2(q, phi, lambda) => self.apply_u(q, FRAC_PI_2, phi, lambda),
            NativeGate::U3(q, theta, phi, lambda) => self.apply_u(q, theta, phi, lambda),
            NativeGate::CNOT { control, target } => self.apply_cx(control, target),
            NativeGate::CZ { control, target } => self.apply_cz(control, target),
            NativeGate::SWAP(a, b) => self.apply_swap(a, b),
            NativeGate::Toffoli {
                control1,
                control2,
                target,
            } => self.apply_ccx(control1, control2, target),
            NativeGate::Fredkin {
                control,
                target1,
                target2,
            } => self.apply_cswap(control, target1, target2),
        }
    }

    // =========================================================================
    // Single-qubit kernels
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let i_s = Complex64::new(0.0, (theta / 2.0).sin());
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + i_s * b;
                self.amplitudes[j] = i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + s * b;
                self.amplitudes[j] = -s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, -theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == 0 {
                *amp *= phase_0;
            } else {
                *amp *= phase_1;
            }
        }
    }

    fn apply_u(&mut self, qubit: usize, theta: f64, phi: f64, lambda: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let e_il = Complex64::from_polar(1.0, lambda);
        let e_ip = Complex64::from_polar(1.0, phi);
        let e_ipl = Complex64::from_polar(1.0, phi + lambda);

        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - e_il * s * b;
                self.amplitudes[j] = e_ip * s * a + e_ipl * c * b;
            }
        }
    }

    // =========================================================================
    // Multi-qubit kernels
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let both = (1 << control) | (1 << target);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & both == both {
                *amp = -*amp;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let ctrl = (1 << c1) | (1 << c2);
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl == ctrl) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cswap(&mut self, control: usize, t1: usize, t2: usize) {
        let ctrl_mask = 1 << control;
        let t1_mask = 1 << t1;
        let t2_mask = 1 << t2;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & t1_mask != 0) && (i & t2_mask == 0) {
                let j = (i & !t1_mask) | t2_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }
}

impl StateBase for QuantumState {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn options(&self) -> SimOptions {
        self.options
    }

    fn apply_gate(&mut self, gate: &NativeGate) -> SimResult<()> {
        gate.check(self.num_qubits)?;
        match self.options.device {
            Device::Cpu => self.apply_kernel(gate),
            Device::Gpu => kernels::apply_dense(
                Device::Gpu,
                &mut self.amplitudes,
                &gate.qubits(),
                &gate.matrix(),
            )?,
        }
        if self.options.precision == Precision::Single {
            kernels::round_to_single(&mut self.amplitudes);
        }
        Ok(())
    }

    fn probabilities(&self) -> Vec<f64> {
        match self.options.device {
            #[cfg(feature = "gpu")]
            Device::Gpu => crate::parallel::probabilities(&self.amplitudes),
            _ => self.amplitudes.iter().map(Complex64::norm_sqr).collect(),
        }
    }

    fn expectation_value(&self, observable: &Observable) -> SimResult<Complex64> {
        check_observable(observable, self.num_qubits)?;
        let amps = &self.amplitudes;
        let mut total = Complex64::new(0.0, 0.0);
        for term in observable.terms() {
            let masks = term.masks();
            let value: Complex64 = match self.options.device {
                #[cfg(feature = "gpu")]
                Device::Gpu => crate::parallel::pauli_expectation(amps, masks),
                _ => amps
                    .iter()
                    .enumerate()
                    .map(|(i, a)| amps[i ^ masks.flip].conj() * pauli_phase(i, masks) * a)
                    .sum(),
            };
            total += term.coeff() * value;
        }
        Ok(total)
    }
}

// =============================================================================
// Density matrix
// =============================================================================

/// A mixed state of `n` qubits stored as a `2^n × 2^n` matrix.
///
/// Element `ρ[row][col]` lives at index `row | (col << n)`, so a gate `U` on
/// qubit `q` acts as `U` on bit `q` and `conj(U)` on bit `q + n`.
#[derive(Debug, Clone)]
pub struct DensityMatrix {
    elements: Vec<Complex64>,
    num_qubits: usize,
    options: SimOptions,
}

impl DensityMatrix {
    /// Allocate |0...0⟩⟨0...0| on the CPU at double precision.
    pub fn new(num_qubits: usize) -> SimResult<Self> {
        Self::with_options(num_qubits, SimOptions::default())
    }

    /// Allocate |0...0⟩⟨0...0| with the given options.
    pub fn with_options(num_qubits: usize, options: SimOptions) -> SimResult<Self> {
        check_available(options)?;
        let bits = num_qubits
            .checked_mul(2)
            .ok_or(SimError::TooManyQubits { num_qubits })?;
        Ok(Self {
            elements: kernels::zero_state(num_qubits, bits)?,
            num_qubits,
            options,
        })
    }

    /// Matrix dimension `2^n`.
    pub fn dim(&self) -> usize {
        1 << self.num_qubits
    }

    /// Element `ρ[row][col]`.
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.elements[row | (col << self.num_qubits)]
    }

    /// Elements in row-major order.
    pub fn to_row_major(&self) -> Vec<Complex64> {
        let dim = self.dim();
        (0..dim * dim).map(|k| self.get(k / dim, k % dim)).collect()
    }

    /// Trace; 1 for a normalised state.
    pub fn trace(&self) -> Complex64 {
        (0..self.dim()).map(|r| self.get(r, r)).sum()
    }
}

impl StateBase for DensityMatrix {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn options(&self) -> SimOptions {
        self.options
    }

    fn apply_gate(&mut self, gate: &NativeGate) -> SimResult<()> {
        gate.check(self.num_qubits)?;
        let rows = gate.qubits();
        let cols: Vec<usize> = rows.iter().map(|q| q + self.num_qubits).collect();
        let m = gate.matrix();
        let m_conj: Vec<Complex64> = m.iter().map(Complex64::conj).collect();

        kernels::apply_dense(self.options.device, &mut self.elements, &rows, &m)?;
        kernels::apply_dense(self.options.device, &mut self.elements, &cols, &m_conj)?;
        if self.options.precision == Precision::Single {
            kernels::round_to_single(&mut self.elements);
        }
        Ok(())
    }

    fn probabilities(&self) -> Vec<f64> {
        (0..self.dim()).map(|r| self.get(r, r).re).collect()
    }

    fn expectation_value(&self, observable: &Observable) -> SimResult<Complex64> {
        check_observable(observable, self.num_qubits)?;
        // Tr(ρP) = Σ_r ρ[r][r ^ flip] · phase(r)
        let mut total = Complex64::new(0.0, 0.0);
        for term in observable.terms() {
            let masks = term.masks();
            let value: Complex64 = (0..self.dim())
                .map(|r| self.get(r, r ^ masks.flip) * pauli_phase(r, masks))
                .sum();
            total += term.coeff() * value;
        }
        Ok(total)
    }
}
