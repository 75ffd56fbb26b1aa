use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::{
  error::PercolationResult, serialize::METADATA_FILE, Config, OutputFormat, OutputSink,
};

/// Describes a finished run well enough to read its binary artifacts back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
  pub size: u32,
  pub p: f64,
  pub seed: u64,
  pub total_bonds: usize,
  /// Always `total_bonds + 1`; the first state precedes every bond.
  pub total_states: usize,
  #[serde(default)]
  pub format: OutputFormat,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub top_n: Option<usize>,
}

impl Metadata {
  pub fn new(config: &Config, total_bonds: usize) -> Self {
    Self {
      size: config.size(),
      p: config.p(),
      seed: config.seed(),
      total_bonds,
      total_states: total_bonds + 1,
      format: config.format(),
      top_n: config.top_n().map(|n| n.get()),
    }
  }

  pub fn sites(&self) -> usize {
    self.size as usize * self.size as usize
  }

  pub fn write<S: OutputSink>(&self, sink: &mut S) -> PercolationResult {
    let mut writer = sink.create(METADATA_FILE)?;
    serde_json::to_writer_pretty(&mut writer, self)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
  }

  pub fn from_slice(bytes: &[u8]) -> PercolationResult<Self> {
    Ok(serde_json::from_slice(bytes)?)
  }
}
