//! Backend capability introspection.

use serde::{Deserialize, Serialize};

/// Capabilities of a backend, cached at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gates, by source gate name.
    pub gate_set: GateSet,
    /// Maximum number of shots per run.
    pub max_shots: u32,
    /// Whether this is a simulator.
    pub is_simulator: bool,
    /// Capability flags such as `"statevector"`, `"density_matrix"`,
    /// `"expectation"` or `"gpu"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a simulator.
    pub fn simulator(name: impl Into<String>, num_qubits: u32, gate_set: GateSet) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gate_set,
            max_shots: 1_000_000,
            is_simulator: true,
            features: vec![],
        }
    }

    /// Add a capability flag.
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Check a capability flag.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Gate names a backend accepts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub three_qubit: Vec<String>,
}

impl GateSet {
    /// Build a gate set from names grouped by arity.
    pub fn new<S: Into<String>>(
        single_qubit: impl IntoIterator<Item = S>,
        two_qubit: impl IntoIterator<Item = S>,
        three_qubit: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            single_qubit: single_qubit.into_iter().map(Into::into).collect(),
            two_qubit: two_qubit.into_iter().map(Into::into).collect(),
            three_qubit: three_qubit.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit.iter().any(|g| g == gate)
            || self.two_qubit.iter().any(|g| g == gate)
            || self.three_qubit.iter().any(|g| g == gate)
    }

    /// Total number of supported gates.
    pub fn len(&self) -> usize {
        self.single_qubit.len() + self.two_qubit.len() + self.three_qubit.len()
    }

    /// True if no gate is supported.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
