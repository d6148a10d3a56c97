//! Burn-backed [`SequenceRegressor`].

use super::batch::{tensor_to_vec, WindowBatcher};
use super::lstm::{detach_state, LstmNet, LstmNetConfig};
use super::{EpochReport, FitReport, SequenceRegressor};
use crate::data::WindowedDataset;
use crate::{Error, Result};
use burn::nn::loss::{MseLoss, Reduction};
use burn::nn::LstmState;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::ElementConversion;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Hyperparameters of an [`LstmRegressor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressorConfig {
    /// Timesteps per input window
    pub lahead: usize,
    /// Number of LSTM units
    pub hidden_size: usize,
    /// Rows per batch; datasets must be a multiple of it
    pub batch_size: usize,
    /// Adam learning rate
    pub learning_rate: f64,
    /// Carry recurrent state between batches
    pub stateful: bool,
}

impl RegressorConfig {
    /// Stateless config with 20 units and a `1e-3` learning rate.
    pub fn new(lahead: usize, batch_size: usize) -> Self {
        Self {
            lahead,
            hidden_size: 20,
            batch_size,
            learning_rate: 1e-3,
            stateful: false,
        }
    }

    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_stateful(mut self, stateful: bool) -> Self {
        self.stateful = stateful;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.lahead == 0 {
            return Err(Error::InvalidConfig("lahead must be > 0".to_owned()));
        }
        if self.hidden_size == 0 {
            return Err(Error::InvalidConfig("hidden_size must be > 0".to_owned()));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".to_owned()));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Build a freshly initialised regressor trained with Adam.
    pub fn init<B: AutodiffBackend>(
        &self,
        device: &B::Device,
    ) -> Result<LstmRegressor<B, impl Optimizer<LstmNet<B>, B>>> {
        self.validate()?;
        let model = LstmNetConfig::new(self.lahead, self.hidden_size).init(device);
        let optim = AdamConfig::new().init();
        Ok(LstmRegressor::from_parts(
            self.clone(),
            model,
            optim,
            device.clone(),
        ))
    }
}

/// LSTM regressor with optional state carried across batches.
///
/// Batches are always visited in dataset order. In stateful mode the final
/// state of each batch, detached from the graph, seeds the next batch, and it
/// survives across `fit` and `predict` calls until [`reset_state`].
///
/// [`reset_state`]: SequenceRegressor::reset_state
pub struct LstmRegressor<B: AutodiffBackend, O> {
    config: RegressorConfig,
    model: LstmNet<B>,
    optim: O,
    batcher: WindowBatcher<B>,
    state: Option<LstmState<B, 2>>,
}

impl<B, O> LstmRegressor<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<LstmNet<B>, B>,
{
    /// Assemble a regressor from an existing network and optimizer.
    pub fn from_parts(
        config: RegressorConfig,
        model: LstmNet<B>,
        optim: O,
        device: B::Device,
    ) -> Self {
        Self {
            config,
            model,
            optim,
            batcher: WindowBatcher::new(device),
            state: None,
        }
    }

    pub fn config(&self) -> &RegressorConfig {
        &self.config
    }

    pub fn model(&self) -> &LstmNet<B> {
        &self.model
    }

    /// Whether a recurrent state is currently carried.
    pub fn has_state(&self) -> bool {
        self.state.is_some()
    }

    fn check_input(&self, data: &WindowedDataset) -> Result<()> {
        if data.lahead() != self.model.lahead() {
            return Err(Error::InvalidShape(format!(
                "window length {} does not match model lahead {}",
                data.lahead(),
                self.model.lahead()
            )));
        }
        if data.len() % self.config.batch_size != 0 {
            return Err(Error::InvalidShape(format!(
                "dataset length {} is not a multiple of batch_size {}",
                data.len(),
                self.config.batch_size
            )));
        }
        Ok(())
    }

    /// State for the next batch, taken out of `self` when stateful.
    fn take_state(&mut self) -> Option<LstmState<B, 2>> {
        if self.config.stateful {
            self.state.take()
        } else {
            None
        }
    }

    fn keep_state(&mut self, state: LstmState<B, 2>) {
        if self.config.stateful {
            self.state = Some(detach_state(state));
        }
    }

    /// Mean batch MSE over `data`, starting from a zero state.
    ///
    /// The carried training state is left untouched.
    pub fn evaluate(&self, data: &WindowedDataset) -> Result<f32> {
        self.check_input(data)?;
        let ranges = data.batch_ranges(self.config.batch_size)?;
        if ranges.is_empty() {
            return Err(Error::InvalidShape("evaluation set is empty".to_owned()));
        }

        let loss_fn = MseLoss::new();
        let mut state = None;
        let mut total = 0.0;
        for range in ranges.iter().cloned() {
            let batch = self.batcher.batch(data, range);
            let (output, next) = self.model.forward(batch.inputs, state.take());
            if self.config.stateful {
                state = Some(detach_state(next));
            }
            let loss = loss_fn.forward(output, batch.targets, Reduction::Mean);
            total += loss.into_scalar().elem::<f32>();
        }

        Ok(total / ranges.len() as f32)
    }
}

impl<B, O> SequenceRegressor for LstmRegressor<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<LstmNet<B>, B>,
{
    fn fit(
        &mut self,
        train: &WindowedDataset,
        validation: Option<&WindowedDataset>,
        epochs: usize,
    ) -> Result<FitReport> {
        self.check_input(train)?;
        if train.is_empty() {
            return Err(Error::InvalidShape("training set is empty".to_owned()));
        }
        let validation = match validation {
            Some(data) if !data.is_empty() => {
                self.check_input(data)?;
                Some(data)
            }
            _ => None,
        };

        let ranges = train.batch_ranges(self.config.batch_size)?;
        let loss_fn = MseLoss::new();
        let mut report = FitReport::default();

        for epoch in 0..epochs {
            let mut loss_sum = 0.0;

            for range in ranges.iter().cloned() {
                let batch = self.batcher.batch(train, range);
                let state = self.take_state();
                let (output, next) = self.model.forward(batch.inputs, state);
                self.keep_state(next);

                let loss = loss_fn.forward(output, batch.targets, Reduction::Mean);
                loss_sum += loss.clone().into_scalar().elem::<f32>();

                let grads = loss.backward();
                let grads = GradientsParams::from_grads(grads, &self.model);
                self.model = self
                    .optim
                    .step(self.config.learning_rate, self.model.clone(), grads);
            }

            let train_loss = loss_sum / ranges.len() as f32;
            let val_loss = validation.map(|data| self.evaluate(data)).transpose()?;

            debug!(
                epoch = epoch + 1,
                epochs,
                train_loss,
                ?val_loss,
                stateful = self.config.stateful,
                "epoch finished"
            );
            report.epochs.push(EpochReport {
                epoch,
                train_loss,
                val_loss,
            });
        }

        if let Some(last) = report.epochs.last() {
            info!(
                epochs,
                train_loss = last.train_loss,
                val_loss = ?last.val_loss,
                stateful = self.config.stateful,
                "fit finished"
            );
        }

        Ok(report)
    }

    fn predict(&mut self, inputs: &WindowedDataset) -> Result<Vec<f32>> {
        self.check_input(inputs)?;

        let mut predictions = Vec::with_capacity(inputs.len());
        for range in inputs.batch_ranges(self.config.batch_size)? {
            let batch = self.batcher.batch(inputs, range);
            let state = self.take_state();
            let (output, next) = self.model.forward(batch.inputs, state);
            self.keep_state(next);
            predictions.extend(tensor_to_vec(output.detach())?);
        }

        Ok(predictions)
    }

    fn reset_state(&mut self) {
        self.state = None;
    }

    fn is_stateful(&self) -> bool {
        self.config.stateful
    }
}
