//! Window rows to tensors and back.

use crate::data::WindowedDataset;
use crate::{Error, Result};
use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};
use ndarray::s;
use std::ops::Range;

/// One batch of windows and targets.
#[derive(Debug, Clone)]
pub struct WindowBatch<B: Backend> {
    /// `[batch, lahead, 1]`
    pub inputs: Tensor<B, 3>,
    /// `[batch, 1]`
    pub targets: Tensor<B, 2>,
}

/// Builds [`WindowBatch`]es on a fixed device.
#[derive(Debug, Clone)]
pub struct WindowBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> WindowBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Rows `range` of `data`. Panics if the range is out of bounds.
    pub fn batch(&self, data: &WindowedDataset, range: Range<usize>) -> WindowBatch<B> {
        let rows = range.len();
        let lahead = data.lahead();

        let inputs: Vec<f32> = data
            .windows()
            .slice(s![range.clone(), ..])
            .iter()
            .copied()
            .collect();
        let targets = data.targets().slice(s![range]).to_vec();

        WindowBatch {
            inputs: Tensor::from_data(TensorData::new(inputs, [rows, lahead, 1]), &self.device),
            targets: Tensor::from_data(TensorData::new(targets, [rows, 1]), &self.device),
        }
    }
}

/// Read a tensor back as flat `f32` values.
pub fn tensor_to_vec<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| Error::Tensor(format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    fn dataset() -> WindowedDataset {
        let windows = (0..12).map(|v| v as f32).collect();
        let targets = (0..4).map(|v| v as f32 * 0.5).collect();
        WindowedDataset::from_flat(windows, targets, 3).unwrap()
    }

    #[test]
    fn test_batch_shapes() {
        let batcher = WindowBatcher::<TestBackend>::new(Default::default());
        let batch = batcher.batch(&dataset(), 0..2);

        assert_eq!(batch.inputs.dims(), [2, 3, 1]);
        assert_eq!(batch.targets.dims(), [2, 1]);
    }

    #[test]
    fn test_batch_values_follow_rows() {
        let batcher = WindowBatcher::<TestBackend>::new(Default::default());
        let batch = batcher.batch(&dataset(), 2..4);

        let inputs = tensor_to_vec(batch.inputs).unwrap();
        let targets = tensor_to_vec(batch.targets).unwrap();

        assert_eq!(inputs, vec![6.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
        assert_eq!(targets, vec![1.0, 1.5]);
    }
}
