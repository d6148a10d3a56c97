//! Rolling-window view and batch-aligned train/test split.

use super::dataset::WindowedDataset;
use super::generator::{MovingAverage, Sequence};
use crate::{Error, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Value order inside each window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowOrder {
    /// Oldest sample first: `[x[i - lahead + 1], ..., x[i]]`.
    #[default]
    Chronological,
    /// Current sample first: `[x[i], x[i - 1], ...]`.
    MostRecentFirst,
}

/// Train and test portions, each a multiple of the batch size long.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: WindowedDataset,
    pub test: WindowedDataset,
}

/// Number of leading positions where the target or the window is undefined.
pub fn undefined_prefix(tsteps: usize, lahead: usize) -> usize {
    tsteps.saturating_sub(1).max(lahead.saturating_sub(1))
}

/// Turns a sequence and its moving average into batch-aligned windows.
#[derive(Debug, Clone)]
pub struct WindowSplitter {
    lahead: usize,
    batch_size: usize,
    ratio: f64,
    order: WindowOrder,
}

impl WindowSplitter {
    /// Create a splitter with a 0.8 train ratio and chronological windows.
    pub fn new(lahead: usize, batch_size: usize) -> Result<Self> {
        if lahead == 0 {
            return Err(Error::InvalidConfig("lahead must be > 0".to_owned()));
        }
        if batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".to_owned()));
        }

        Ok(Self {
            lahead,
            batch_size,
            ratio: 0.8,
            order: WindowOrder::Chronological,
        })
    }

    /// Set the fraction of retained windows used for training.
    pub fn with_ratio(mut self, ratio: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(Error::InvalidConfig(format!(
                "split ratio must be in [0, 1], got {ratio}"
            )));
        }
        self.ratio = ratio;
        Ok(self)
    }

    pub fn with_order(mut self, order: WindowOrder) -> Self {
        self.order = order;
        self
    }

    pub fn lahead(&self) -> usize {
        self.lahead
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn order(&self) -> WindowOrder {
        self.order
    }

    /// One window per retained index, paired with the moving average there.
    ///
    /// The first `max(tsteps - 1, lahead - 1)` positions are dropped.
    pub fn windows(&self, sequence: &Sequence, average: &MovingAverage) -> Result<WindowedDataset> {
        if average.len() != sequence.len() {
            return Err(Error::InvalidData(format!(
                "moving average covers {} positions, sequence has {}",
                average.len(),
                sequence.len()
            )));
        }

        let to_drop = undefined_prefix(average.window(), self.lahead);
        let retained = sequence.len().saturating_sub(to_drop);

        // windows(lahead) yields the window ending at index j + lahead - 1 as item j
        let skip = to_drop + 1 - self.lahead;
        let mut flat = Vec::with_capacity(retained * self.lahead);
        for window in sequence
            .values()
            .windows(self.lahead)
            .into_iter()
            .skip(skip)
        {
            match self.order {
                WindowOrder::Chronological => flat.extend(window.iter().copied()),
                WindowOrder::MostRecentFirst => flat.extend(window.iter().rev().copied()),
            }
        }

        let targets: Array1<f32> = average
            .defined()
            .iter()
            .skip(to_drop - average.first_defined())
            .copied()
            .collect();

        let windows = Array2::from_shape_vec((retained, self.lahead), flat)?;
        WindowedDataset::from_parts(windows, targets)
    }

    /// Split retained windows into batch-aligned train and test portions.
    pub fn split(&self, data: &WindowedDataset) -> Split {
        let total = data.len();

        let mut to_train = (total as f64 * self.ratio).floor() as usize;
        to_train -= to_train % self.batch_size;

        let mut to_test = total - to_train;
        to_test -= to_test % self.batch_size;

        tracing::debug!(total, to_train, to_test, "split windows");

        Split {
            train: data.slice(0..to_train),
            test: data.slice(to_train..to_train + to_test),
        }
    }

    /// [`windows`](Self::windows) followed by [`split`](Self::split).
    pub fn run(&self, sequence: &Sequence, average: &MovingAverage) -> Result<Split> {
        let data = self.windows(sequence, average)?;
        Ok(self.split(&data))
    }
}

/// Shape of a window matrix as handed to the model: `[samples, lahead, 1]`.
pub fn input_shape(data: &WindowedDataset) -> [usize; 3] {
    [data.len(), data.lahead(), 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Sequence {
        Sequence::from((0..len).map(|i| i as f32).collect::<Vec<_>>())
    }

    #[test]
    fn test_undefined_prefix() {
        assert_eq!(undefined_prefix(2, 1), 1);
        assert_eq!(undefined_prefix(2, 5), 4);
        assert_eq!(undefined_prefix(5, 2), 4);
        assert_eq!(undefined_prefix(1, 1), 0);
    }

    #[test]
    fn test_single_sample_windows() {
        let seq = ramp(6);
        let ma = MovingAverage::compute(&seq, 3).unwrap();
        let data = WindowSplitter::new(1, 1).unwrap().windows(&seq, &ma).unwrap();

        assert_eq!(data.len(), 4);
        assert_eq!(data.lahead(), 1);
        assert_eq!(data.window(0).to_vec(), vec![2.0]);
        assert_eq!(data.target(0), 1.0);
        assert_eq!(data.target(3), 4.0);
    }

    #[test]
    fn test_window_longer_than_average() {
        let seq = ramp(8);
        let ma = MovingAverage::compute(&seq, 2).unwrap();
        let data = WindowSplitter::new(4, 1).unwrap().windows(&seq, &ma).unwrap();

        // drop = 3, retained indices 3..8
        assert_eq!(data.len(), 5);
        assert_eq!(data.window(0).to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(data.target(0), 2.5);
        assert_eq!(data.window(4).to_vec(), vec![4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_most_recent_first_order() {
        let seq = ramp(5);
        let ma = MovingAverage::compute(&seq, 2).unwrap();
        let data = WindowSplitter::new(3, 1)
            .unwrap()
            .with_order(WindowOrder::MostRecentFirst)
            .windows(&seq, &ma)
            .unwrap();

        assert_eq!(data.window(0).to_vec(), vec![2.0, 1.0, 0.0]);
        assert_eq!(data.target(0), 1.5);
    }

    #[test]
    fn test_split_alignment() {
        let seq = ramp(23);
        let ma = MovingAverage::compute(&seq, 1).unwrap();
        let split = WindowSplitter::new(1, 4).unwrap().run(&seq, &ma).unwrap();

        // floor(23 * 0.8) = 18 -> 16 train; 7 left -> 4 test
        assert_eq!(split.train.len(), 16);
        assert_eq!(split.test.len(), 4);
        assert_eq!(split.test.target(0), 16.0);
    }

    #[test]
    fn test_split_can_be_empty() {
        let seq = ramp(5);
        let ma = MovingAverage::compute(&seq, 1).unwrap();
        let split = WindowSplitter::new(1, 8).unwrap().run(&seq, &ma).unwrap();

        assert!(split.train.is_empty());
        assert!(split.test.is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(WindowSplitter::new(0, 1).is_err());
        assert!(WindowSplitter::new(1, 0).is_err());
        assert!(WindowSplitter::new(1, 1).unwrap().with_ratio(1.5).is_err());
        assert!(WindowSplitter::new(1, 1).unwrap().with_ratio(-0.1).is_err());

        let seq = ramp(5);
        let other = ramp(6);
        let ma = MovingAverage::compute(&other, 2).unwrap();
        assert!(WindowSplitter::new(1, 1).unwrap().windows(&seq, &ma).is_err());
    }

    #[test]
    fn test_lahead_longer_than_sequence() {
        let seq = ramp(3);
        let ma = MovingAverage::compute(&seq, 1).unwrap();
        let data = WindowSplitter::new(5, 1).unwrap().windows(&seq, &ma).unwrap();
        assert!(data.is_empty());
        assert_eq!(data.lahead(), 5);
    }
}
