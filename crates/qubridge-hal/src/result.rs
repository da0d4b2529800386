//! Execution results.
//!
//! State vectors and density matrices are stored in increasing
//! lexicographic order (ILO): the first qubit of the circuit is the most
//! significant bit of a basis index. Shot rows and count keys list classical
//! bits in declaration order, `c0` first.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bit significance of basis-state indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasisOrder {
    /// Increasing lexicographic order: first qubit most significant.
    #[default]
    Ilo,
    /// Decreasing lexicographic order: first qubit least significant.
    Dlo,
}

impl BasisOrder {
    /// Map an ILO index over `n` bits to this order.
    #[inline]
    pub fn permute_index(self, index: usize, n: usize) -> usize {
        match self {
            BasisOrder::Ilo => index,
            BasisOrder::Dlo => reverse_bits(index, n),
        }
    }
}

fn reverse_bits(index: usize, n: usize) -> usize {
    (0..n).fold(0, |acc, k| acc | (((index >> k) & 1) << (n - 1 - k)))
}

/// Measurement counts keyed by bitstring (`c0` first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring`.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The most frequent outcome; ties go to the smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(k, v)| (k.as_str(), *v))
    }

    /// Iterate over (bitstring, count) in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Per-shot readouts: one row per shot, one column per classical bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotTable {
    width: usize,
    rows: Vec<Vec<u8>>,
}

impl ShotTable {
    /// Create a table from rows of `width` bits each.
    pub fn new(width: usize, rows: Vec<Vec<u8>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == width));
        Self { width, rows }
    }

    /// Number of classical bits per shot.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of shots.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no shots.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows with `c0` in the first column.
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// Rows in the requested bit order; [`BasisOrder::Dlo`] puts `c0` last.
    pub fn rows_in(&self, order: BasisOrder) -> Vec<Vec<u8>> {
        match order {
            BasisOrder::Ilo => self.rows.clone(),
            BasisOrder::Dlo => self
                .rows
                .iter()
                .map(|r| r.iter().rev().copied().collect())
                .collect(),
        }
    }

    /// Aggregate the shots into counts.
    pub fn counts(&self) -> Counts {
        let mut counts = Counts::new();
        for row in &self.rows {
            let key: String = row.iter().map(|&b| if b == 0 { '0' } else { '1' }).collect();
            counts.insert(key, 1);
        }
        counts
    }
}

/// The payload of an execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResultData {
    /// Final state vector in ILO order.
    StateVector(Vec<Complex64>),
    /// Final density matrix, row-major, ILO order.
    DensityMatrix(Vec<Complex64>),
    /// Sampled readouts.
    Shots(ShotTable),
    /// Real expectation value of an operator.
    Expectation(f64),
}

/// Metadata recorded with every result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// Backend that produced the result.
    pub backend: String,
    /// Number of qubits simulated.
    pub num_qubits: usize,
    /// Execution time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
    /// Seed used for sampling, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Result of running a prepared circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// The payload.
    pub data: ResultData,
    /// Metadata.
    pub metadata: ResultMetadata,
}

impl ExecutionResult {
    /// Create a result.
    pub fn new(data: ResultData, backend: impl Into<String>, num_qubits: usize) -> Self {
        Self {
            data,
            metadata: ResultMetadata {
                backend: backend.into(),
                num_qubits,
                ..ResultMetadata::default()
            },
        }
    }

    /// Set the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.metadata.execution_time_ms = Some(ms);
        self
    }

    /// Record the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.metadata.seed = Some(seed);
        self
    }

    /// The state vector in the requested order, if this is a state result.
    pub fn state_vector(&self, order: BasisOrder) -> Option<Vec<Complex64>> {
        let ResultData::StateVector(amps) = &self.data else {
            return None;
        };
        let n = self.metadata.num_qubits;
        let mut out = vec![Complex64::new(0.0, 0.0); amps.len()];
        for (i, a) in amps.iter().enumerate() {
            out[order.permute_index(i, n)] = *a;
        }
        Some(out)
    }

    /// The row-major density matrix in the requested order, if this is a
    /// density-matrix result.
    pub fn density_matrix(&self, order: BasisOrder) -> Option<Vec<Complex64>> {
        let ResultData::DensityMatrix(elements) = &self.data else {
            return None;
        };
        let n = self.metadata.num_qubits;
        let dim = 1_usize << n;
        let mut out = vec![Complex64::new(0.0, 0.0); elements.len()];
        for (k, e) in elements.iter().enumerate() {
            let (r, c) = (k / dim, k % dim);
            out[order.permute_index(r, n) * dim + order.permute_index(c, n)] = *e;
        }
        Some(out)
    }

    /// The shot table, if this is a sampling result.
    pub fn shots(&self) -> Option<&ShotTable> {
        match &self.data {
            ResultData::Shots(table) => Some(table),
            _ => None,
        }
    }

    /// Counts derived from the shot table, if this is a sampling result.
    pub fn counts(&self) -> Option<Counts> {
        self.shots().map(ShotTable::counts)
    }

    /// The expectation value, if this is an expectation result.
    pub fn expectation(&self) -> Option<f64> {
        match self.data {
            ResultData::Expectation(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits(0b001, 3), 0b100);
        assert_eq!(reverse_bits(0b110, 3), 0b011);
        assert_eq!(reverse_bits(0, 0), 0);
    }

    #[test]
    fn test_state_vector_orders() {
        // X on the second of two qubits.
        let result = ExecutionResult::new(
            ResultData::StateVector(vec![c(0.0), c(1.0), c(0.0), c(0.0)]),
            "test",
            2,
        );
        assert_eq!(
            result.state_vector(BasisOrder::Ilo).unwrap(),
            vec![c(0.0), c(1.0), c(0.0), c(0.0)]
        );
        assert_eq!(
            result.state_vector(BasisOrder::Dlo).unwrap(),
            vec![c(0.0), c(0.0), c(1.0), c(0.0)]
        );
        assert!(result.shots().is_none());
    }

    #[test]
    fn test_density_matrix_dlo() {
        // |01⟩⟨01| in ILO sits at (1, 1); in DLO at (2, 2).
        let mut elements = vec![c(0.0); 16];
        elements[4 + 1] = c(1.0);
        let result = ExecutionResult::new(ResultData::DensityMatrix(elements), "test", 2);
        let dlo = result.density_matrix(BasisOrder::Dlo).unwrap();
        assert_eq!(dlo[2 * 4 + 2], c(1.0));
        assert_eq!(dlo.iter().filter(|e| e.re != 0.0).count(), 1);
    }

    #[test]
    fn test_shots_and_counts() {
        let table = ShotTable::new(2, vec![vec![1, 0], vec![1, 0], vec![0, 0]]);
        assert_eq!(table.rows_in(BasisOrder::Dlo)[0], vec![0, 1]);

        let counts = table.counts();
        assert_eq!(counts.get("10"), 2);
        assert_eq!(counts.get("00"), 1);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.most_frequent(), Some(("10", 2)));
    }

    #[test]
    fn test_zero_width_shots() {
        let table = ShotTable::new(0, vec![vec![]; 5]);
        assert_eq!(table.len(), 5);
        assert_eq!(table.counts().get(""), 5);
    }
}
