//! # Stateful RNN - stateful vs stateless LSTM regression
//!
//! Trains two LSTM regressors on a synthetic moving-average task using the
//! Burn framework and compares how well each tracks the target.
//!
//! The input is uniform noise; the target at each step is the mean of the
//! last `tsteps` inputs. Each model only sees windows of `lahead` samples.
//! When `lahead < tsteps` a stateless model cannot see the whole averaging
//! window, while a stateful one can recover it from state carried across
//! batches.
//!
//! ## Features
//!
//! - **Seeded generation**: uniform noise and its trailing moving average
//! - **Rolling windows**: undefined head dropped, one window per target
//! - **Batch-aligned split**: train and test lengths are multiples of the batch size
//! - **Stateful training**: recurrent state carried across batches until reset
//! - **Comparison report**: error series, axis ranges and CSV export
//!
//! ## Quick Start
//!
//! ```rust
//! use stateful_rnn::prelude::*;
//!
//! let generator = SequenceGenerator::new(0.1, 2, 1986).unwrap();
//! let (sequence, average) = generator.generate(11).unwrap();
//!
//! let split = WindowSplitter::new(2, 1)
//!     .unwrap()
//!     .run(&sequence, &average)
//!     .unwrap();
//!
//! assert_eq!(split.train.len(), 8);
//! assert_eq!(split.test.len(), 2);
//! assert_eq!(split.train.lahead(), 2);
//! ```
//!
//! ## Running the Comparison
//!
//! ```ignore
//! use burn::backend::{Autodiff, NdArray};
//! use stateful_rnn::prelude::*;
//!
//! type Backend = Autodiff<NdArray<f32>>;
//!
//! let experiment = Experiment::<Backend>::new(ExperimentConfig::default(), Default::default())?;
//! let outcome = experiment.run()?;
//! println!("stateful MSE: {}", outcome.comparison.stateful_mse());
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod experiment;
pub mod model;
pub mod report;

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::config::ExperimentConfig;
    pub use crate::data::{
        MovingAverage, Sequence, SequenceGenerator, Split, WindowOrder, WindowSplitter,
        WindowedDataset,
    };
    pub use crate::experiment::{Experiment, ExperimentOutcome};
    pub use crate::model::{LstmNet, LstmRegressor, RegressorConfig, SequenceRegressor};
    pub use crate::report::Comparison;
    pub use crate::{Error, Result};
}
