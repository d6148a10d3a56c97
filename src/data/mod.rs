//! # Synthetic Data and Windowing
//!
//! Everything that happens before the model sees a tensor:
//!
//! | Step | Type | Output |
//! |------|------|--------|
//! | Generate | [`SequenceGenerator`] | [`Sequence`] + [`MovingAverage`] |
//! | Window | [`WindowSplitter::windows`] | [`WindowedDataset`] |
//! | Split | [`WindowSplitter::split`] | [`Split`] (train/test) |
//!
//! ## Undefined Region
//!
//! The moving average has no value for the first `tsteps - 1` positions and a
//! window of `lahead` samples cannot end before index `lahead - 1`. Both are
//! dropped together, so `max(tsteps - 1, lahead - 1)` leading positions never
//! reach the model ([`undefined_prefix`]).
//!
//! ## Batch Alignment
//!
//! A stateful model pairs sample `i` of batch `k` with sample `i` of batch
//! `k + 1`, so every batch must be full. The train length is rounded down to
//! a multiple of the batch size and the test tail is truncated the same way.
//!
//! ```rust
//! use stateful_rnn::data::{SequenceGenerator, WindowSplitter};
//!
//! let generator = SequenceGenerator::new(0.1, 2, 1986).unwrap();
//! let (sequence, average) = generator.generate(10).unwrap();
//!
//! let split = WindowSplitter::new(1, 1).unwrap().run(&sequence, &average).unwrap();
//! assert_eq!(split.train.len(), 7);
//! assert_eq!(split.test.len(), 2);
//! ```

pub mod dataset;
pub mod generator;
pub mod window;

pub use dataset::WindowedDataset;
pub use generator::{check_amplitude, MovingAverage, Sequence, SequenceGenerator, MAX_AMPLITUDE};
pub use window::{input_shape, undefined_prefix, Split, WindowOrder, WindowSplitter};
