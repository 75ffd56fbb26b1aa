mod metrics;

use std::{path::PathBuf, time::Instant};

use anyhow::Result;
use clap::Parser;
use percolation::{
  error::PercolationResult, Config, DirSink, LogProgress, Metadata, OutputFormat, Percolation,
};
use tracing_subscriber::EnvFilter;

use crate::metrics::Metrics;

/// Simulates bond percolation on a square lattice and records every step.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
  /// Side length of the lattice. Every step is held in memory until the run
  /// ends, about 8 * size^2 bytes per step with up to 2 * size^2 steps.
  #[arg(long, env = "PERCOLATION_SIZE", default_value_t = 32)]
  size: u32,

  /// Probability that each bond is included.
  #[arg(short, long, env = "PERCOLATION_P", default_value_t = 0.5)]
  p: f64,

  #[arg(long, env = "PERCOLATION_SEED", default_value_t = 42)]
  seed: u64,

  #[arg(short, long, env = "PERCOLATION_OUT_DIR", default_value = "percolation_out")]
  out_dir: PathBuf,

  /// Number of largest cluster sizes recorded per step (extended format).
  #[arg(long, env = "PERCOLATION_TOP_N", default_value_t = 10)]
  top_n: usize,

  /// extended, legacy or steps.
  #[arg(long, env = "PERCOLATION_FORMAT", default_value_t = OutputFormat::Extended)]
  format: OutputFormat,
}

impl Args {
  fn into_config(self) -> PercolationResult<Config> {
    Config::new(
      self.size,
      self.p,
      self.seed,
      self.out_dir,
      self.top_n,
      self.format,
    )
  }
}

fn run(config: &Config) -> Result<Metrics> {
  let mut metrics = Metrics::new(config.size());

  let engine = Percolation::new(config.size(), config.seed());

  let start = Instant::now();
  let bonds = engine.generate_bonds(config.p());
  metrics.generate_time = start.elapsed();
  tracing::info!(
    "generated {} bonds in {:?}",
    bonds.len(),
    metrics.generate_time
  );

  let mut sink = DirSink::new(config.out_dir());
  Metadata::new(config, bonds.len()).write(&mut sink)?;

  let start = Instant::now();
  let simulation = engine.run_and_serialize(
    &bonds,
    config.top_n(),
    config.format(),
    &mut sink,
    LogProgress,
  )?;
  metrics.run_time = start.elapsed();
  metrics.record_simulation(&simulation);

  Ok(metrics)
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let config = Args::parse().into_config()?;
  tracing::info!(
    "size={} p={} seed={} format={} out_dir={}",
    config.size(),
    config.p(),
    config.seed(),
    config.format(),
    config.out_dir().display()
  );

  let metrics = run(&config)?;
  println!(
    "{} of {} bonds included ({:.3}), {} merges, {} redundant",
    metrics.n_bonds,
    metrics.n_candidates,
    metrics.inclusion_rate(),
    metrics.n_merges,
    metrics.n_redundant
  );
  println!(
    "{} states in {:?}, {:.0} states/sec",
    metrics.n_states,
    metrics.run_time,
    metrics.states_per_sec()
  );

  Ok(())
}
