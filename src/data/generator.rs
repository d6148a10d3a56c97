//! Synthetic input sequence and its trailing moving average.

use crate::{Error, Result};
use ndarray::Array1;
use rand::distributions::Uniform;
use rand::prelude::*;

/// Ordered real-valued samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    values: Array1<f32>,
}

impl Sequence {
    pub fn new(values: Array1<f32>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &Array1<f32> {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }
}

impl From<Vec<f32>> for Sequence {
    fn from(values: Vec<f32>) -> Self {
        Self::new(Array1::from(values))
    }
}

/// Trailing mean over `window` samples.
///
/// Positions `0..window - 1` have no value; only the defined tail is stored,
/// so `defined()[k]` belongs to sequence index `k + window - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverage {
    window: usize,
    len: usize,
    values: Array1<f32>,
}

impl MovingAverage {
    /// Compute the moving average of `sequence`.
    ///
    /// # Errors
    /// `window` must be in `1..=sequence.len()`.
    pub fn compute(sequence: &Sequence, window: usize) -> Result<Self> {
        if window == 0 {
            return Err(Error::InvalidConfig("tsteps must be > 0".to_owned()));
        }
        if window > sequence.len() {
            return Err(Error::InvalidConfig(format!(
                "tsteps {} exceeds sequence length {}",
                window,
                sequence.len()
            )));
        }

        let values: Array1<f32> = sequence
            .values()
            .windows(window)
            .into_iter()
            .map(|w| w.sum() / window as f32)
            .collect();

        Ok(Self {
            window,
            len: sequence.len(),
            values,
        })
    }

    /// Window length (`tsteps`).
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of positions, defined or not. Matches the source sequence.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the first defined position.
    pub fn first_defined(&self) -> usize {
        self.window - 1
    }

    pub fn defined_len(&self) -> usize {
        self.values.len()
    }

    /// Defined values, starting at [`first_defined`](Self::first_defined).
    pub fn defined(&self) -> &Array1<f32> {
        &self.values
    }

    /// Value at sequence index `index`, or `None` inside the undefined head.
    pub fn get(&self, index: usize) -> Option<f32> {
        index
            .checked_sub(self.first_defined())
            .and_then(|k| self.values.get(k).copied())
    }
}

/// Largest accepted amplitude; wider ranges overflow `f32`.
pub const MAX_AMPLITUDE: f32 = f32::MAX / 2.0;

/// Reject amplitudes that give an empty or non-representable sampling range.
pub fn check_amplitude(amplitude: f32) -> Result<()> {
    if !amplitude.is_finite() || amplitude <= 0.0 || amplitude > MAX_AMPLITUDE {
        return Err(Error::InvalidConfig(format!(
            "amplitude must be in (0, {MAX_AMPLITUDE:e}], got {amplitude}"
        )));
    }
    Ok(())
}

/// Seeded generator of uniform noise and its moving-average target.
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    amplitude: f32,
    tsteps: usize,
    seed: u64,
}

impl SequenceGenerator {
    /// # Arguments
    /// * `amplitude` - samples are drawn from `[-amplitude, amplitude)`
    /// * `tsteps` - moving-average window length
    /// * `seed` - RNG seed; equal seeds give equal sequences
    pub fn new(amplitude: f32, tsteps: usize, seed: u64) -> Result<Self> {
        check_amplitude(amplitude)?;
        if tsteps == 0 {
            return Err(Error::InvalidConfig("tsteps must be > 0".to_owned()));
        }

        Ok(Self {
            amplitude,
            tsteps,
            seed,
        })
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn tsteps(&self) -> usize {
        self.tsteps
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw `len` uniform samples.
    pub fn uniform(&self, len: usize) -> Result<Sequence> {
        if len == 0 {
            return Err(Error::InvalidConfig("sequence length must be > 0".to_owned()));
        }

        let rng = StdRng::seed_from_u64(self.seed);
        let dist = Uniform::new(-self.amplitude, self.amplitude);
        let values: Array1<f32> = rng.sample_iter(dist).take(len).collect();

        Ok(Sequence::new(values))
    }

    /// Draw `len` samples and compute their `tsteps` moving average.
    pub fn generate(&self, len: usize) -> Result<(Sequence, MovingAverage)> {
        let sequence = self.uniform(len)?;
        let average = MovingAverage::compute(&sequence, self.tsteps)?;
        tracing::debug!(
            len,
            tsteps = self.tsteps,
            defined = average.defined_len(),
            "generated sequence"
        );
        Ok((sequence, average))
    }
}
