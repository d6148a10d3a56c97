//! Test-set predictions of both models, their errors and plot ranges.

use crate::data::{MovingAverage, Sequence};
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;

/// Symmetric or skewed axis range for one figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisLimits {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

/// `expected - prediction` for each series.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSeries {
    /// `expected - expected`, drawn as the reference row of the error figure
    pub expected: Vec<f32>,
    pub stateful: Vec<f32>,
    pub stateless: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct CsvRow {
    index: usize,
    expected: f32,
    stateful: f32,
    stateless: f32,
    expected_err: f32,
    stateful_err: f32,
    stateless_err: f32,
}

#[derive(Debug, Serialize)]
struct InputRow {
    index: usize,
    input: f32,
    /// Empty inside the undefined head of the moving average
    expected: Option<f32>,
}

/// Write the generated input next to its expected output.
///
/// Columns are `index,input,expected`; `expected` is left blank where the
/// moving average is not yet defined.
pub fn write_input_csv(
    path: impl AsRef<Path>,
    sequence: &Sequence,
    average: &MovingAverage,
) -> Result<()> {
    if sequence.len() != average.len() {
        return Err(Error::InvalidShape(format!(
            "sequence has {} samples, moving average {}",
            sequence.len(),
            average.len()
        )));
    }

    let mut writer = csv::Writer::from_path(path)?;
    for (index, &input) in sequence.values().iter().enumerate() {
        writer.serialize(InputRow {
            index,
            input,
            expected: average.get(index),
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// Expected test targets next to both models' predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    expected: Vec<f32>,
    stateful: Vec<f32>,
    stateless: Vec<f32>,
}

fn max_abs<'a>(series: impl IntoIterator<Item = &'a [f32]>) -> f32 {
    series
        .into_iter()
        .flat_map(|s| s.iter())
        .fold(0.0_f32, |acc, v| acc.max(v.abs()))
}

fn diff(expected: &[f32], predicted: &[f32]) -> Vec<f32> {
    expected.iter().zip(predicted).map(|(e, p)| e - p).collect()
}

fn mse(expected: &[f32], predicted: &[f32]) -> f32 {
    if expected.is_empty() {
        return 0.0;
    }
    let sum: f32 = diff(expected, predicted).iter().map(|d| d * d).sum();
    sum / expected.len() as f32
}

impl Comparison {
    pub fn new(expected: Vec<f32>, stateful: Vec<f32>, stateless: Vec<f32>) -> Result<Self> {
        if stateful.len() != expected.len() || stateless.len() != expected.len() {
            return Err(Error::InvalidData(format!(
                "series length mismatch: expected {}, stateful {}, stateless {}",
                expected.len(),
                stateful.len(),
                stateless.len()
            )));
        }

        Ok(Self {
            expected,
            stateful,
            stateless,
        })
    }

    pub fn len(&self) -> usize {
        self.expected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    pub fn expected(&self) -> &[f32] {
        &self.expected
    }

    pub fn stateful(&self) -> &[f32] {
        &self.stateful
    }

    pub fn stateless(&self) -> &[f32] {
        &self.stateless
    }

    pub fn errors(&self) -> ErrorSeries {
        ErrorSeries {
            expected: diff(&self.expected, &self.expected),
            stateful: diff(&self.expected, &self.stateful),
            stateless: diff(&self.expected, &self.stateless),
        }
    }

    pub fn stateful_mse(&self) -> f32 {
        mse(&self.expected, &self.stateful)
    }

    pub fn stateless_mse(&self) -> f32 {
        mse(&self.expected, &self.stateless)
    }

    /// Shared range of the three prediction plots: 10% above the largest magnitude.
    pub fn prediction_limits(&self) -> AxisLimits {
        let max_y = max_abs([
            self.expected.as_slice(),
            self.stateful.as_slice(),
            self.stateless.as_slice(),
        ]) * 1.1;

        AxisLimits {
            min_x: 0.0,
            max_x: self.len() as f32,
            min_y: -max_y,
            max_y,
        }
    }

    /// Shared range of the three error plots; the floor extends to `-5 * max_err`.
    pub fn error_limits(&self) -> AxisLimits {
        let errors = self.errors();
        let max_err = max_abs([
            errors.expected.as_slice(),
            errors.stateful.as_slice(),
            errors.stateless.as_slice(),
        ]) * 1.1;

        AxisLimits {
            min_x: 0.0,
            max_x: self.len() as f32,
            min_y: max_err * -5.0,
            max_y: max_err,
        }
    }

    /// One row per test position, for external plotting.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let errors = self.errors();
        let mut writer = csv::Writer::from_path(path)?;

        for index in 0..self.len() {
            writer.serialize(CsvRow {
                index,
                expected: self.expected[index],
                stateful: self.stateful[index],
                stateless: self.stateless[index],
                expected_err: errors.expected[index],
                stateful_err: errors.stateful[index],
                stateless_err: errors.stateless[index],
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}
