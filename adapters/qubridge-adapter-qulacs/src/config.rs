//! Backend configuration.

use serde::{Deserialize, Serialize};

use qubridge_hal::{HalError, HalResult};
use qubridge_sim::{Device, Precision, SimOptions};

/// What a `State` run returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Pure state vector.
    #[default]
    Statevector,
    /// Density matrix.
    DensityMatrix,
}

/// Settings read from the `extra` map of a [`qubridge_hal::BackendConfig`].
///
/// ```json
/// { "result_type": "density_matrix", "device": "gpu", "seed": 7 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QulacsConfig {
    /// State representation.
    pub result_type: ResultType,
    /// Execution library.
    pub device: Device,
    /// Floating-point precision of the engine.
    pub precision: Precision,
    /// Largest circuit accepted.
    pub max_qubits: u32,
    /// Keep prepared circuits keyed by content hash.
    pub cache: bool,
    /// Most prepared circuits kept; the oldest is evicted first.
    pub cache_capacity: usize,
    /// Sampling seed used when a run does not provide one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for QulacsConfig {
    fn default() -> Self {
        Self {
            result_type: ResultType::Statevector,
            device: Device::Cpu,
            precision: Precision::Double,
            max_qubits: 24,
            cache: true,
            cache_capacity: 256,
            seed: None,
        }
    }
}

impl QulacsConfig {
    /// Select the execution library.
    #[must_use]
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Select the state representation.
    #[must_use]
    pub fn with_result_type(mut self, result_type: ResultType) -> Self {
        self.result_type = result_type;
        self
    }

    /// Select the engine precision.
    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Set the qubit limit.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Set the default sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable the prepared-circuit cache.
    #[must_use]
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Bound the prepared-circuit cache.
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Engine options for this configuration.
    pub fn sim_options(&self) -> SimOptions {
        SimOptions::on(self.device).with_precision(self.precision)
    }

    /// Tolerated imaginary residue of an expectation value.
    pub fn imaginary_tolerance(&self) -> f64 {
        match self.precision {
            Precision::Double => 1e-10,
            Precision::Single => 1e-5,
        }
    }

    /// Reject settings the build cannot honour.
    pub fn check(&self) -> HalResult<()> {
        if self.max_qubits == 0 {
            return Err(HalError::Configuration(
                "max_qubits must be at least 1".into(),
            ));
        }
        if !self.device.is_available() {
            return Err(HalError::BackendUnavailable(format!(
                "device '{}' requires the `gpu` feature",
                self.device
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qubridge_hal::BackendConfig;

    #[test]
    fn test_defaults() {
        let config = QulacsConfig::default();
        assert_eq!(config.result_type, ResultType::Statevector);
        assert_eq!(config.device, Device::Cpu);
        assert!(config.cache);
        assert_eq!(config.cache_capacity, 256);
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_from_backend_config() {
        let backend = BackendConfig::new("qulacs")
            .with_extra("result_type", serde_json::json!("density_matrix"))
            .with_extra("precision", serde_json::json!("single"))
            .with_extra("seed", serde_json::json!(11))
            .with_extra("cache_capacity", serde_json::json!(8));
        let config: QulacsConfig = backend.extra_as().unwrap();
        assert_eq!(config.result_type, ResultType::DensityMatrix);
        assert_eq!(config.precision, Precision::Single);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.cache_capacity, 8);
        assert_eq!(config.max_qubits, 24);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let backend = BackendConfig::new("qulacs").with_extra("devcie", serde_json::json!("gpu"));
        assert!(matches!(
            backend.extra_as::<QulacsConfig>(),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_check() {
        let config = QulacsConfig::default().with_max_qubits(0);
        assert!(matches!(config.check(), Err(HalError::Configuration(_))));

        let gpu = QulacsConfig::default().with_device(Device::Gpu);
        assert_eq!(gpu.check().is_ok(), Device::Gpu.is_available());
    }
}
