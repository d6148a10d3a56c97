//! # Recurrent Regressors
//!
//! The experiment talks to its models only through [`SequenceRegressor`]:
//! fit on windows, predict one value per window, reset carried state.
//! [`LstmRegressor`] implements it on top of Burn; the recurrent cell, the
//! loss and the optimizer all come from Burn.
//!
//! ## Stateful vs Stateless
//!
//! | Mode | Initial state of batch `k + 1` |
//! |------|--------------------------------|
//! | Stateless | zeros |
//! | Stateful | final state of batch `k` (until [`SequenceRegressor::reset_state`]) |
//!
//! With batch size `b`, a stateful model effectively trains on `b` interleaved
//! series, each extractable as `data[i::b]`.
//!
//! ## Tensor Shapes
//!
//! | Tensor | Shape |
//! |--------|-------|
//! | inputs | `[batch, lahead, 1]` |
//! | targets / predictions | `[batch, 1]` |
//! | recurrent state | `[batch, hidden_size]` |
//!
//! ## Example
//!
//! ```ignore
//! use burn::backend::{Autodiff, NdArray};
//! use stateful_rnn::model::{RegressorConfig, SequenceRegressor};
//!
//! type Backend = Autodiff<NdArray<f32>>;
//! let device = Default::default();
//!
//! let mut model = RegressorConfig::new(1, 1)
//!     .with_stateful(true)
//!     .init::<Backend>(&device)?;
//!
//! model.fit(&split.train, Some(&split.test), 5)?;
//! model.reset_state();
//! let predictions = model.predict(&split.test)?;
//! ```

pub mod batch;
pub mod lstm;
pub mod regressor;

pub use batch::{tensor_to_vec, WindowBatch, WindowBatcher};
pub use lstm::{detach_state, LstmNet, LstmNetConfig};
pub use regressor::{LstmRegressor, RegressorConfig};

use crate::data::WindowedDataset;
use crate::Result;

/// Losses of one training epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    /// Zero-based epoch index within the `fit` call
    pub epoch: usize,
    /// Mean batch MSE on the training set
    pub train_loss: f32,
    /// MSE on the validation set, if one was given
    pub val_loss: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitReport {
    pub epochs: Vec<EpochReport>,
}

impl FitReport {
    pub fn final_train_loss(&self) -> Option<f32> {
        self.epochs.last().map(|e| e.train_loss)
    }

    pub fn final_val_loss(&self) -> Option<f32> {
        self.epochs.last().and_then(|e| e.val_loss)
    }
}

/// A trainable model mapping windows to scalars.
pub trait SequenceRegressor {
    /// Train for `epochs` passes over `train`, in order, without shuffling.
    fn fit(
        &mut self,
        train: &WindowedDataset,
        validation: Option<&WindowedDataset>,
        epochs: usize,
    ) -> Result<FitReport>;

    /// One prediction per window of `inputs`; targets are ignored.
    fn predict(&mut self, inputs: &WindowedDataset) -> Result<Vec<f32>>;

    /// Forget any recurrent state carried between batches.
    fn reset_state(&mut self);

    /// Whether state is carried between batches.
    fn is_stateful(&self) -> bool;
}
