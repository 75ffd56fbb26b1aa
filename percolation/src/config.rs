use std::{
  num::NonZeroUsize,
  path::{Path, PathBuf},
};

use crate::{error::PercolationResult, make_config_error, OutputFormat};

/// A validated run configuration. Construction is the only place values are
/// checked, so every `Config` in existence describes a runnable simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
  size: u32,
  p: f64,
  seed: u64,
  out_dir: PathBuf,
  top_n: usize,
  format: OutputFormat,
}

impl Config {
  pub fn new(
    size: u32,
    p: f64,
    seed: u64,
    out_dir: impl Into<PathBuf>,
    top_n: usize,
    format: OutputFormat,
  ) -> PercolationResult<Self> {
    if size < 2 {
      return Err(make_config_error!("size must be at least 2, got {}", size));
    }
    if (size as u64) * (size as u64) > u32::MAX as u64 {
      return Err(make_config_error!(
        "size {} has more than {} sites",
        size,
        u32::MAX
      ));
    }
    if !(0.0..=1.0).contains(&p) {
      return Err(make_config_error!("p must be within [0, 1], got {}", p));
    }
    if format.tracks_top_sizes() && top_n == 0 {
      return Err(make_config_error!(
        "top_n must be at least 1 for the {} format",
        format
      ));
    }

    Ok(Self {
      size,
      p,
      seed,
      out_dir: out_dir.into(),
      top_n,
      format,
    })
  }

  pub fn size(&self) -> u32 {
    self.size
  }

  pub fn sites(&self) -> usize {
    self.size as usize * self.size as usize
  }

  pub fn p(&self) -> f64 {
    self.p
  }

  pub fn seed(&self) -> u64 {
    self.seed
  }

  pub fn out_dir(&self) -> &Path {
    &self.out_dir
  }

  pub fn format(&self) -> OutputFormat {
    self.format
  }

  /// The number of largest clusters tracked per step, or `None` when the
  /// output format does not record them.
  pub fn top_n(&self) -> Option<NonZeroUsize> {
    NonZeroUsize::new(self.top_n).filter(|_| self.format.tracks_top_sizes())
  }
}

#[cfg(test)]
mod tests {
  use googletest::prelude::*;
  use rstest::rstest;

  use crate::{error::PercolationError, Config, OutputFormat};

  #[gtest]
  fn test_valid_config() -> Result<()> {
    let config = Config::new(10, 0.5, 7, "out", 3, OutputFormat::Extended)?;
    expect_eq!(config.size(), 10);
    expect_eq!(config.sites(), 100);
    expect_eq!(config.seed(), 7);
    expect_eq!(config.top_n().map(|n| n.get()), Some(3));
    Ok(())
  }

  #[gtest]
  fn test_legacy_format_disables_top_n() -> Result<()> {
    let config = Config::new(10, 0.5, 7, "out", 3, OutputFormat::Legacy)?;
    expect_that!(config.top_n(), none());
    Ok(())
  }

  #[rstest]
  #[case(1, 0.5, 1)]
  #[case(0, 0.5, 1)]
  #[case(70_000, 0.5, 1)]
  #[case(4, -0.1, 1)]
  #[case(4, 1.5, 1)]
  #[case(4, f64::NAN, 1)]
  #[case(4, 0.5, 0)]
  #[gtest]
  fn test_rejects_invalid(#[case] size: u32, #[case] p: f64, #[case] top_n: usize) {
    expect_that!(
      Config::new(size, p, 0, "out", top_n, OutputFormat::Extended),
      err(matches_pattern!(PercolationError::Config(anything())))
    );
  }

  #[rstest]
  #[case(0.0)]
  #[case(1.0)]
  #[gtest]
  fn test_accepts_probability_bounds(#[case] p: f64) {
    expect_that!(
      Config::new(2, p, 0, "out", 1, OutputFormat::Extended),
      ok(anything())
    );
  }

  #[rstest]
  #[gtest]
  fn test_top_n_unused_outside_extended(
    #[values(OutputFormat::Legacy, OutputFormat::Steps)] format: OutputFormat,
  ) -> Result<()> {
    let config = Config::new(4, 0.5, 0, "out", 0, format)?;
    expect_eq!(config.format(), format);
    expect_that!(config.top_n(), none());
    Ok(())
  }
}
