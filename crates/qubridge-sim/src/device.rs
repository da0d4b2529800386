//! Execution library selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which execution library evolves a state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Sequential kernels.
    #[default]
    Cpu,
    /// Data-parallel kernels (requires the `gpu` feature).
    Gpu,
}

impl Device {
    /// True if the execution library for this device is compiled in.
    pub fn is_available(self) -> bool {
        match self {
            Device::Cpu => true,
            Device::Gpu => cfg!(feature = "gpu"),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => f.write_str("cpu"),
            Device::Gpu => f.write_str("gpu"),
        }
    }
}

/// Floating-point precision of stored amplitudes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 64-bit components.
    #[default]
    Double,
    /// Components rounded to `f32` after every gate.
    Single,
}

/// Options fixed when a state is allocated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimOptions {
    /// Execution library.
    pub device: Device,
    /// Amplitude precision.
    pub precision: Precision,
}

impl SimOptions {
    /// Options for the given device at double precision.
    pub fn on(device: Device) -> Self {
        Self {
            device,
            precision: Precision::Double,
        }
    }

    /// Set the precision.
    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
}
