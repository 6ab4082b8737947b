//! Simulation configuration.

use std::env;

/// Default tolerance for |a0|² + |a1|² = 1 on qubit creation.
pub const DEFAULT_NORMALIZATION_TOLERANCE: f64 = 1e-12;

/// Default tolerance for prob0 + prob1 = 1 on measurement.
pub const DEFAULT_PROBABILITY_TOLERANCE: f64 = 1e-12;

/// 2^24 amplitudes is 256 MiB of state.
pub const DEFAULT_MAX_GROUP_QUBITS: usize = 24;

/// Configuration for a [`QuantumSystem`](crate::QuantumSystem).
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Deterministic seed. `None` uses OS entropy.
    pub seed: Option<u64>,
    /// Allowed deviation of |a0|² + |a1|² from 1 in `create_qubit`.
    pub normalization_tolerance: f64,
    /// Allowed deviation of prob0 + prob1 from 1 in `measure_qubit`.
    pub probability_tolerance: f64,
    /// Largest group a merge may produce.
    pub max_group_qubits: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            normalization_tolerance: DEFAULT_NORMALIZATION_TOLERANCE,
            probability_tolerance: DEFAULT_PROBABILITY_TOLERANCE,
            max_group_qubits: DEFAULT_MAX_GROUP_QUBITS,
        }
    }
}

impl SimConfig {
    /// Default configuration with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Override the group size limit.
    pub fn max_group_qubits(mut self, limit: usize) -> Self {
        self.max_group_qubits = limit;
        self
    }

    /// Defaults overridden by `ENTANGLE_SEED` and `ENTANGLE_MAX_GROUP_QUBITS`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(seed) = read_env::<u64>("ENTANGLE_SEED") {
            config.seed = Some(seed);
        }
        if let Some(limit) = read_env::<usize>("ENTANGLE_MAX_GROUP_QUBITS") {
            config.max_group_qubits = limit;
        }
        config
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}
