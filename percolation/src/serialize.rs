use std::{fmt::Display, io::Write, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
  error::{PercolationError, PercolationResult},
  make_config_error, Bond, OutputSink, Progress, ProgressTracker, Snapshot, Stage,
};

pub const METADATA_FILE: &str = "percolation.json";
pub const BONDS_FILE: &str = "bonds.bin";
pub const ROOTS_FILE: &str = "roots.bin";
pub const SIZES_FILE: &str = "sizes.bin";
pub const TOP_SIZES_FILE: &str = "top_sizes.bin";
pub const STATES_FILE: &str = "states.bin";
pub const STEPS_FILE: &str = "steps.bin";

/// Bytes in one bond record: orientation flag, row, column.
pub const BOND_RECORD_SIZE: usize = 1 + 4 + 4;

/// The layouts a run can be written in. All integers are little-endian u32
/// with no padding between records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  /// `bonds.bin`, plus one record per step in each of `roots.bin`,
  /// `sizes.bin` and `top_sizes.bin`.
  #[default]
  Extended,
  /// `bonds.bin` plus `states.bin`, which holds only the per-site cluster
  /// sizes of each step.
  Legacy,
  /// A single `steps.bin`: the initial `(root, size)` pairs, then for each
  /// bond its record followed by the `(root, size)` pairs after adding it.
  Steps,
}

impl OutputFormat {
  pub fn tracks_top_sizes(self) -> bool {
    matches!(self, Self::Extended)
  }

  /// The binary artifacts written in this format, excluding metadata.
  pub fn files(self) -> &'static [&'static str] {
    match self {
      Self::Extended => &[BONDS_FILE, ROOTS_FILE, SIZES_FILE, TOP_SIZES_FILE],
      Self::Legacy => &[BONDS_FILE, STATES_FILE],
      Self::Steps => &[STEPS_FILE],
    }
  }

  fn name(self) -> &'static str {
    match self {
      Self::Extended => "extended",
      Self::Legacy => "legacy",
      Self::Steps => "steps",
    }
  }
}

impl Display for OutputFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name())
  }
}

impl FromStr for OutputFormat {
  type Err = PercolationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    [Self::Extended, Self::Legacy, Self::Steps]
      .into_iter()
      .find(|format| format.name() == s)
      .ok_or_else(|| make_config_error!("unknown output format \"{}\"", s))
  }
}

pub fn write_bond<W: Write>(writer: &mut W, bond: &Bond, size: u32) -> std::io::Result<()> {
  writer.write_all(&[bond.orientation().flag()])?;
  writer.write_all(&bond.row(size).to_le_bytes())?;
  writer.write_all(&bond.col(size).to_le_bytes())
}

pub fn write_u32s<W: Write>(writer: &mut W, values: &[u32]) -> std::io::Result<()> {
  for value in values {
    writer.write_all(&value.to_le_bytes())?;
  }
  Ok(())
}

/// Writes `(root, size)` for every site of the snapshot.
pub fn write_root_sizes<W: Write>(writer: &mut W, snapshot: &Snapshot) -> std::io::Result<()> {
  for (root, size) in snapshot.roots().iter().zip(snapshot.sizes()) {
    writer.write_all(&root.to_le_bytes())?;
    writer.write_all(&size.to_le_bytes())?;
  }
  Ok(())
}

/// Writes the bonds and snapshots of a run in one of the `OutputFormat`
/// layouts.
pub struct Serializer {
  size: u32,
  format: OutputFormat,
}

impl Serializer {
  pub fn new(size: u32, format: OutputFormat) -> Self {
    Self { size, format }
  }

  pub fn format(&self) -> OutputFormat {
    self.format
  }

  /// `snapshots[0]` is the state before any bond, and `snapshots[k]` the
  /// state after `bonds[k - 1]`.
  pub fn write<S: OutputSink, P: Progress>(
    &self,
    sink: &mut S,
    bonds: &[Bond],
    snapshots: &[Snapshot],
    progress: P,
  ) -> PercolationResult {
    debug_assert_eq!(snapshots.len(), bonds.len() + 1);
    let mut tracker = ProgressTracker::new(progress, Stage::Serialize, snapshots.len());

    match self.format {
      OutputFormat::Extended => {
        self.write_bonds(sink, bonds)?;
        let mut roots = sink.create(ROOTS_FILE)?;
        let mut sizes = sink.create(SIZES_FILE)?;
        let mut top_sizes = sink.create(TOP_SIZES_FILE)?;
        for (step, snapshot) in snapshots.iter().enumerate() {
          write_u32s(&mut roots, snapshot.roots())?;
          write_u32s(&mut sizes, snapshot.sizes())?;
          write_u32s(&mut top_sizes, snapshot.top_sizes())?;
          tracker.advance(step + 1);
        }
        roots.flush()?;
        sizes.flush()?;
        top_sizes.flush()?;
      }
      OutputFormat::Legacy => {
        self.write_bonds(sink, bonds)?;
        let mut states = sink.create(STATES_FILE)?;
        for (step, snapshot) in snapshots.iter().enumerate() {
          write_u32s(&mut states, snapshot.sizes())?;
          tracker.advance(step + 1);
        }
        states.flush()?;
      }
      OutputFormat::Steps => {
        let mut steps = sink.create(STEPS_FILE)?;
        if let Some((initial, rest)) = snapshots.split_first() {
          write_root_sizes(&mut steps, initial)?;
          tracker.advance(1);
          for (step, (bond, snapshot)) in bonds.iter().zip(rest).enumerate() {
            write_bond(&mut steps, bond, self.size)?;
            write_root_sizes(&mut steps, snapshot)?;
            tracker.advance(step + 2);
          }
        }
        steps.flush()?;
      }
    }

    Ok(())
  }

  fn write_bonds<S: OutputSink>(&self, sink: &mut S, bonds: &[Bond]) -> PercolationResult {
    let mut writer = sink.create(BONDS_FILE)?;
    for bond in bonds {
      write_bond(&mut writer, bond, self.size)?;
    }
    writer.flush()?;
    Ok(())
  }
}
