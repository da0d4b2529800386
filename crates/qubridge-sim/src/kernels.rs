//! Device-independent kernels over raw amplitude buffers.

use num_complex::Complex64;

use crate::device::Device;
use crate::error::{SimError, SimResult};
use crate::observable::TermMasks;

/// Basis offset of local index `local` over `targets`.
#[inline]
pub(crate) fn deposit(local: usize, targets: &[usize]) -> usize {
    targets
        .iter()
        .enumerate()
        .filter(|(k, _)| (local >> k) & 1 == 1)
        .fold(0, |acc, (_, &q)| acc | (1 << q))
}

/// Phase picked up by basis state `index` under a Pauli product.
#[inline]
pub(crate) fn pauli_phase(index: usize, masks: TermMasks) -> Complex64 {
    let sign = if (index & masks.sign).count_ones() % 2 == 0 {
        1.0
    } else {
        -1.0
    };
    let base = match masks.ny % 4 {
        0 => Complex64::new(1.0, 0.0),
        1 => Complex64::new(0.0, 1.0),
        2 => Complex64::new(-1.0, 0.0),
        _ => Complex64::new(0.0, -1.0),
    };
    base * sign
}

/// Apply a dense `2^k × 2^k` matrix to `targets`, sequentially and in place.
pub(crate) fn apply_matrix(amps: &mut [Complex64], targets: &[usize], m: &[Complex64]) {
    let dim = 1 << targets.len();
    let mask = targets.iter().fold(0_usize, |acc, &q| acc | (1 << q));
    let offsets: Vec<usize> = (0..dim).map(|l| deposit(l, targets)).collect();
    let mut buf = vec![Complex64::new(0.0, 0.0); dim];

    for base in 0..amps.len() {
        if base & mask != 0 {
            continue;
        }
        for (slot, &off) in buf.iter_mut().zip(&offsets) {
            *slot = amps[base | off];
        }
        for (row, &off) in offsets.iter().enumerate() {
            amps[base | off] = m[row * dim..(row + 1) * dim]
                .iter()
                .zip(&buf)
                .map(|(a, b)| a * b)
                .sum();
        }
    }
}

/// Apply a dense matrix with the execution library of `device`.
pub(crate) fn apply_dense(
    device: Device,
    amps: &mut [Complex64],
    targets: &[usize],
    m: &[Complex64],
) -> SimResult<()> {
    match device {
        Device::Cpu => apply_matrix(amps, targets, m),
        #[cfg(feature = "gpu")]
        Device::Gpu => crate::parallel::apply_matrix(amps, targets, m),
        #[cfg(not(feature = "gpu"))]
        Device::Gpu => return Err(SimError::DeviceUnavailable(device)),
    }
    Ok(())
}

/// Round every component to the nearest `f32`.
pub(crate) fn round_to_single(amps: &mut [Complex64]) {
    for a in amps {
        *a = Complex64::new(f64::from(a.re as f32), f64::from(a.im as f32));
    }
}

/// Allocate a zeroed buffer of `2^bits` amplitudes with `amps[0] = 1`.
pub(crate) fn zero_state(num_qubits: usize, bits: usize) -> SimResult<Vec<Complex64>> {
    if bits >= usize::BITS as usize {
        return Err(SimError::TooManyQubits { num_qubits });
    }
    let len = 1_usize << bits;
    let mut amps = Vec::new();
    amps.try_reserve_exact(len)
        .map_err(|source| SimError::Allocation { num_qubits, source })?;
    amps.resize(len, Complex64::new(0.0, 0.0));
    amps[0] = Complex64::new(1.0, 0.0);
    Ok(amps)
}
