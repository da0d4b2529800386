//! Data-parallel execution library used by [`Device::Gpu`](crate::Device::Gpu).

use num_complex::Complex64;
use rayon::prelude::*;

use crate::kernels::{self, pauli_phase};
use crate::observable::TermMasks;

/// Apply a dense `2^k × 2^k` matrix to `targets` in place.
///
/// Every chunk of `2^(max target + 1)` amplitudes holds whole target groups,
/// so chunks are updated independently.
pub(crate) fn apply_matrix(amps: &mut [Complex64], targets: &[usize], m: &[Complex64]) {
    let span = targets.iter().max().map_or(1, |&q| 2_usize << q);
    amps.par_chunks_mut(span.min(amps.len()).max(1))
        .for_each(|chunk| kernels::apply_matrix(chunk, targets, m));
}

/// Multiply every amplitude by `coef`.
pub(crate) fn scale(amps: &mut [Complex64], coef: Complex64) {
    amps.par_iter_mut().for_each(|a| *a *= coef);
}

/// |ψ_i|² for every basis state.
pub(crate) fn probabilities(amps: &[Complex64]) -> Vec<f64> {
    amps.par_iter().map(|a| a.norm_sqr()).collect()
}

/// ⟨ψ|P|ψ⟩ for a single Pauli product.
pub(crate) fn pauli_expectation(amps: &[Complex64], masks: TermMasks) -> Complex64 {
    amps.par_iter()
        .enumerate()
        .map(|(i, a)| amps[i ^ masks.flip].conj() * pauli_phase(i, masks) * a)
        .sum()
}
