//! Experiment parameters.
//!
//! Defaults reproduce the classic stateful-LSTM demonstration: 1000 samples
//! of uniform noise in `[-0.1, 0.1)`, a 2-point moving average as target,
//! single-sample windows and a batch size of 1.

use crate::data::{check_amplitude, undefined_prefix, WindowOrder};
use crate::model::RegressorConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Windows left after the undefined head is dropped
    pub input_len: usize,
    /// Moving-average window of the target
    pub tsteps: usize,
    /// Samples per input window
    pub lahead: usize,
    pub batch_size: usize,
    /// Stateful reset cycles, and stateless epochs
    pub epochs: usize,
    /// Epochs run between two stateful resets
    pub stateful_epochs_per_cycle: usize,
    /// Samples are drawn from `[-amplitude, amplitude)`
    pub amplitude: f32,
    pub seed: u64,
    /// Fraction of windows used for training
    pub split_ratio: f64,
    pub hidden_size: usize,
    pub learning_rate: f64,
    pub window_order: WindowOrder,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            input_len: 1000,
            tsteps: 2,
            lahead: 1,
            batch_size: 1,
            epochs: 10,
            stateful_epochs_per_cycle: 5,
            amplitude: 0.1,
            seed: 1986,
            split_ratio: 0.8,
            hidden_size: 20,
            learning_rate: 1e-3,
            window_order: WindowOrder::Chronological,
        }
    }
}

impl ExperimentConfig {
    /// Load from a TOML file; missing keys keep their defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("input_len", self.input_len),
            ("tsteps", self.tsteps),
            ("lahead", self.lahead),
            ("batch_size", self.batch_size),
            ("hidden_size", self.hidden_size),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be > 0")));
            }
        }
        check_amplitude(self.amplitude)?;
        if !(0.0..=1.0).contains(&self.split_ratio) {
            return Err(Error::InvalidConfig(format!(
                "split_ratio must be in [0, 1], got {}",
                self.split_ratio
            )));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Leading samples lost to the moving average and the rolling window.
    pub fn to_drop(&self) -> usize {
        undefined_prefix(self.tsteps, self.lahead)
    }

    /// Samples to generate so that `input_len` windows remain.
    pub fn generated_len(&self) -> usize {
        self.input_len + self.to_drop()
    }

    /// A stateless model sees the whole averaging window only when `lahead >= tsteps`.
    pub fn stateless_should_converge(&self) -> bool {
        self.lahead >= self.tsteps
    }

    pub fn regressor(&self, stateful: bool) -> RegressorConfig {
        RegressorConfig::new(self.lahead, self.batch_size)
            .with_hidden_size(self.hidden_size)
            .with_learning_rate(self.learning_rate)
            .with_stateful(stateful)
    }
}
