//! Stateful vs stateless comparison pipeline.
//!
//! generate → window/split → train stateful → predict → train stateless →
//! predict → compare. Each step runs once, in order; any error aborts the run.

use crate::config::ExperimentConfig;
use crate::data::{
    MovingAverage, Sequence, SequenceGenerator, Split, WindowSplitter, WindowedDataset,
};
use crate::model::{FitReport, SequenceRegressor};
use crate::report::Comparison;
use crate::Result;
use burn::tensor::backend::AutodiffBackend;
use tracing::info;

/// Generated data before and after windowing.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub sequence: Sequence,
    pub average: MovingAverage,
    /// All retained windows, before the split
    pub windows: WindowedDataset,
    pub split: Split,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    pub data: PreparedData,
    /// One report per reset cycle
    pub stateful_history: Vec<FitReport>,
    pub stateless_history: FitReport,
    pub comparison: Comparison,
}

/// Generate the sequence, drop the undefined head and split.
pub fn prepare_data(config: &ExperimentConfig) -> Result<PreparedData> {
    config.validate()?;

    let generator = SequenceGenerator::new(config.amplitude, config.tsteps, config.seed)?;
    let (sequence, average) = generator.generate(config.generated_len())?;

    let splitter = WindowSplitter::new(config.lahead, config.batch_size)?
        .with_ratio(config.split_ratio)?
        .with_order(config.window_order);
    let windows = splitter.windows(&sequence, &average)?;
    let split = splitter.split(&windows);

    info!(
        generated = sequence.len(),
        to_drop = config.to_drop(),
        windows = windows.len(),
        train = split.train.len(),
        test = split.test.len(),
        "data prepared"
    );

    Ok(PreparedData {
        sequence,
        average,
        windows,
        split,
    })
}

/// Train in `cycles` rounds of `epochs_per_cycle` epochs, resetting state after each.
pub fn train_with_resets<R: SequenceRegressor>(
    model: &mut R,
    split: &Split,
    cycles: usize,
    epochs_per_cycle: usize,
) -> Result<Vec<FitReport>> {
    let mut history = Vec::with_capacity(cycles);
    for cycle in 0..cycles {
        info!(cycle = cycle + 1, cycles, "stateful training cycle");
        history.push(model.fit(&split.train, Some(&split.test), epochs_per_cycle)?);
        model.reset_state();
    }
    Ok(history)
}

/// Runs the whole comparison on backend `B`.
pub struct Experiment<B: AutodiffBackend> {
    config: ExperimentConfig,
    device: B::Device,
}

impl<B: AutodiffBackend> Experiment<B> {
    pub fn new(config: ExperimentConfig, device: B::Device) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, device })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn run(&self) -> Result<ExperimentOutcome> {
        let data = prepare_data(&self.config)?;
        self.run_on(data)
    }

    /// Train and compare both models on already prepared data.
    pub fn run_on(&self, data: PreparedData) -> Result<ExperimentOutcome> {
        let split = &data.split;

        info!("creating stateful model");
        let mut stateful = self.config.regressor(true).init::<B>(&self.device)?;
        let stateful_history = train_with_resets(
            &mut stateful,
            split,
            self.config.epochs,
            self.config.stateful_epochs_per_cycle,
        )?;
        let stateful_predictions = stateful.predict(&split.test)?;

        info!("creating stateless model");
        let mut stateless = self.config.regressor(false).init::<B>(&self.device)?;
        let stateless_history = stateless.fit(&split.train, Some(&split.test), self.config.epochs)?;
        let stateless_predictions = stateless.predict(&split.test)?;

        let comparison = Comparison::new(
            split.test.targets().to_vec(),
            stateful_predictions,
            stateless_predictions,
        )?;

        info!(
            stateful_mse = comparison.stateful_mse(),
            stateless_mse = comparison.stateless_mse(),
            "comparison finished"
        );

        Ok(ExperimentOutcome {
            data,
            stateful_history,
            stateless_history,
            comparison,
        })
    }
}
