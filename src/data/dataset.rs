//! Window matrix plus scalar targets.
//!
//! Rows are windows of `lahead` samples stored row-major in an `Array2`;
//! `targets[i]` is the value the model must predict from `windows[i]`.

use crate::{Error, Result};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowedDataset {
    windows: Array2<f32>,
    targets: Array1<f32>,
}

impl WindowedDataset {
    /// Pair a `(len, lahead)` window matrix with `len` targets.
    pub fn from_parts(windows: Array2<f32>, targets: Array1<f32>) -> Result<Self> {
        if windows.nrows() != targets.len() {
            return Err(Error::InvalidData(format!(
                "windows/targets length mismatch: {} vs {}",
                windows.nrows(),
                targets.len()
            )));
        }
        if windows.ncols() == 0 {
            return Err(Error::InvalidData("window length must be > 0".to_owned()));
        }

        Ok(Self { windows, targets })
    }

    /// Build from flat row-major windows.
    pub fn from_flat(windows: Vec<f32>, targets: Vec<f32>, lahead: usize) -> Result<Self> {
        let rows = targets.len();
        let windows = Array2::from_shape_vec((rows, lahead), windows)?;
        Self::from_parts(windows, Array1::from(targets))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Values per window.
    #[inline]
    pub fn lahead(&self) -> usize {
        self.windows.ncols()
    }

    pub fn windows(&self) -> ArrayView2<'_, f32> {
        self.windows.view()
    }

    pub fn targets(&self) -> ArrayView1<'_, f32> {
        self.targets.view()
    }

    /// Panics if `idx >= len`.
    pub fn window(&self, idx: usize) -> ArrayView1<'_, f32> {
        self.windows.row(idx)
    }

    /// Panics if `idx >= len`.
    pub fn target(&self, idx: usize) -> f32 {
        self.targets[idx]
    }

    /// Owned copy of rows `range`. Panics if the range is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            windows: self.windows.slice(s![range.clone(), ..]).to_owned(),
            targets: self.targets.slice(s![range]).to_owned(),
        }
    }

    /// First `k` rows (fewer if the dataset is shorter).
    pub fn head(&self, k: usize) -> Self {
        self.slice(0..k.min(self.len()))
    }

    /// Last `k` rows (fewer if the dataset is shorter).
    pub fn tail(&self, k: usize) -> Self {
        let len = self.len();
        self.slice(len.saturating_sub(k)..len)
    }

    /// Consecutive row ranges of exactly `batch_size` rows, in order.
    pub fn batch_ranges(&self, batch_size: usize) -> Result<Vec<Range<usize>>> {
        if batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".to_owned()));
        }
        if self.len() % batch_size != 0 {
            return Err(Error::InvalidShape(format!(
                "dataset length {} is not a multiple of batch_size {}",
                self.len(),
                batch_size
            )));
        }

        Ok((0..self.len())
            .step_by(batch_size)
            .map(|start| start..start + batch_size)
            .collect())
    }
}
