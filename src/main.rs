//! Stateful vs stateless LSTM comparison on a moving-average task.
//!
//! ```text
//! stateful-rnn --lahead 2 --tsteps 2 --csv predictions.csv --input-csv input.csv
//! RUST_LOG=debug stateful-rnn --config experiment.toml
//! ```

use anyhow::{Context, Result};
use burn::backend::{Autodiff, NdArray};
use clap::Parser;
use stateful_rnn::config::ExperimentConfig;
use stateful_rnn::data::{input_shape, WindowedDataset};
use stateful_rnn::experiment::{prepare_data, Experiment};
use stateful_rnn::report::{write_input_csv, AxisLimits};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

type Backend = Autodiff<NdArray<f32>>;

#[derive(Parser, Debug)]
#[command(name = "stateful-rnn", about = "Compare stateful and stateless LSTMs on a moving average")]
struct Args {
    /// TOML file with experiment parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Windows kept after dropping the undefined head
    #[arg(long)]
    input_len: Option<usize>,

    /// Moving-average window of the target
    #[arg(long)]
    tsteps: Option<usize>,

    /// Samples per input window
    #[arg(long)]
    lahead: Option<usize>,

    #[arg(long)]
    batch_size: Option<usize>,

    #[arg(long)]
    epochs: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Write expected values, predictions and errors to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the generated input and its expected output to this CSV file
    #[arg(long)]
    input_csv: Option<PathBuf>,
}

impl Args {
    fn to_config(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ExperimentConfig::default(),
        };

        if let Some(v) = self.input_len {
            config.input_len = v;
        }
        if let Some(v) = self.tsteps {
            config.tsteps = v;
        }
        if let Some(v) = self.lahead {
            config.lahead = v;
        }
        if let Some(v) = self.batch_size {
            config.batch_size = v;
        }
        if let Some(v) = self.epochs {
            config.epochs = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }

        config.validate()?;
        Ok(config)
    }
}

fn print_rows(label: &str, data: &WindowedDataset) {
    println!("{label}:");
    for i in 0..data.len() {
        println!("  {:?} -> {:.6}", data.window(i).to_vec(), data.target(i));
    }
}

fn print_limits(label: &str, limits: &AxisLimits) {
    println!(
        "  {label}: x in [{}, {}], y in [{:.6}, {:.6}]",
        limits.min_x, limits.max_x, limits.min_y, limits.max_y
    );
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = args.to_config()?;

    println!("{}", "*".repeat(33));
    if config.stateless_should_converge() {
        println!("STATELESS LSTM WILL ALSO CONVERGE");
    } else {
        println!("STATELESS LSTM WILL NOT CONVERGE");
    }
    println!("{}", "*".repeat(33));

    println!("Generating data...");
    let data = prepare_data(&config)?;

    println!("Input vs expected output (first 10 points):");
    for (i, input) in data.sequence.values().iter().take(10).enumerate() {
        match data.average.get(i) {
            Some(expected) => println!("  {i:>3}: {input:+.6} -> {expected:+.6}"),
            None => println!("  {i:>3}: {input:+.6} -> undefined"),
        }
    }
    if let Some(path) = &args.input_csv {
        write_input_csv(path, &data.sequence, &data.average)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Input series written to {}", path.display());
    }

    println!("Input shape:  {:?}", input_shape(&data.windows));
    println!("Output shape: {:?}", [data.windows.len(), 1]);
    print_rows("Head", &data.windows.head(5));
    print_rows("Tail", &data.windows.tail(5));

    println!("x_train shape: {:?}", input_shape(&data.split.train));
    println!("y_train shape: {:?}", [data.split.train.len(), 1]);
    println!("x_test shape:  {:?}", input_shape(&data.split.test));
    println!("y_test shape:  {:?}", [data.split.test.len(), 1]);

    let experiment = Experiment::<Backend>::new(config, Default::default())?;
    let outcome = experiment.run_on(data)?;
    let comparison = &outcome.comparison;

    println!();
    println!("Results on {} test windows:", comparison.len());
    println!("  stateful  MSE: {:.8}", comparison.stateful_mse());
    println!("  stateless MSE: {:.8}", comparison.stateless_mse());
    println!("Plot ranges:");
    print_limits("predictions", &comparison.prediction_limits());
    print_limits("errors", &comparison.error_limits());

    if let Some(path) = &args.csv {
        comparison
            .write_csv(path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Series written to {}", path.display());
    }

    Ok(())
}
