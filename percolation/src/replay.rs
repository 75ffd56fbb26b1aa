use std::{collections::BTreeMap, fs, path::Path};

use itertools::Itertools;
use union_find::UnionFind;

use crate::{
  error::PercolationResult,
  make_corrupt_error,
  serialize::{
    BOND_RECORD_SIZE, BONDS_FILE, METADATA_FILE, ROOTS_FILE, SIZES_FILE, STATES_FILE, STEPS_FILE,
    TOP_SIZES_FILE,
  },
  Bond, MemorySink, Metadata, Orientation, OutputFormat,
};

/// A run read back from its artifacts.
#[derive(Clone, Debug)]
pub struct Replay {
  metadata: Metadata,
  bonds: Vec<Bond>,
  /// Per-site cluster sizes, one entry per step.
  sizes: Vec<Vec<u32>>,
  /// Per-site roots, absent in the legacy format.
  roots: Option<Vec<Vec<u32>>>,
  /// Largest cluster sizes per step, only in the extended format.
  top_sizes: Option<Vec<Vec<u32>>>,
}

fn to_u32s(bytes: &[u8]) -> Vec<u32> {
  bytes
    .chunks_exact(4)
    .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
    .collect()
}

/// Splits `bytes` into `steps` records of `width` u32s each.
fn split_steps(
  bytes: &[u8],
  name: &str,
  steps: usize,
  width: usize,
) -> PercolationResult<Vec<Vec<u32>>> {
  let expected = steps
    .checked_mul(width)
    .and_then(|values| values.checked_mul(4))
    .ok_or_else(|| make_corrupt_error!("{} steps of {} values overflow", steps, width))?;
  if bytes.len() != expected {
    return Err(make_corrupt_error!(
      "{} has {} bytes, expected {} steps of {} values",
      name,
      bytes.len(),
      steps,
      width
    ));
  }
  if width == 0 {
    return Ok(vec![Vec::new(); steps]);
  }
  Ok(to_u32s(bytes).chunks(width).map(<[u32]>::to_vec).collect())
}

fn parse_bond(record: &[u8], size: u32) -> PercolationResult<Bond> {
  let orientation = Orientation::from_flag(record[0])
    .ok_or_else(|| make_corrupt_error!("bad orientation flag {}", record[0]))?;
  let values = to_u32s(&record[1..BOND_RECORD_SIZE]);
  let (row, col) = (values[0], values[1]);

  let in_range = match orientation {
    Orientation::Horizontal => row < size && col < size.saturating_sub(1),
    Orientation::Vertical => row < size.saturating_sub(1) && col < size,
  };
  if !in_range {
    return Err(make_corrupt_error!(
      "{:?} bond at ({}, {}) is off a {}x{} lattice",
      orientation,
      row,
      col,
      size,
      size
    ));
  }

  Ok(Bond::from_position(orientation, row, col, size))
}

fn parse_bonds(bytes: &[u8], size: u32) -> PercolationResult<Vec<Bond>> {
  if bytes.len() % BOND_RECORD_SIZE != 0 {
    return Err(make_corrupt_error!("{} has a trailing partial record", BONDS_FILE));
  }
  bytes
    .chunks_exact(BOND_RECORD_SIZE)
    .map(|record| parse_bond(record, size))
    .collect()
}

/// Recovers the cluster-size multiset from per-site sizes alone: a cluster
/// of size `s` contributes `s` sites that all report `s`.
fn cluster_sizes_from_site_sizes(sizes: &[u32]) -> PercolationResult<Vec<u32>> {
  let mut counts = BTreeMap::<u32, usize>::new();
  for &size in sizes {
    *counts.entry(size).or_default() += 1;
  }

  let mut clusters = Vec::new();
  for (&size, &count) in counts.iter().rev() {
    if size == 0 || count % size as usize != 0 {
      return Err(make_corrupt_error!(
        "{} sites report cluster size {}",
        count,
        size
      ));
    }
    clusters.extend(std::iter::repeat_n(size, count / size as usize));
  }
  Ok(clusters)
}

impl Replay {
  /// Reads a run from the files in `dir`.
  pub fn open(dir: impl AsRef<Path>) -> PercolationResult<Self> {
    let dir = dir.as_ref();
    Self::load(|name| Ok(fs::read(dir.join(name))?))
  }

  pub fn from_memory(sink: &MemorySink) -> PercolationResult<Self> {
    Self::load(|name| sink.read(name))
  }

  /// Reads a run through `read`, which returns the bytes of a named
  /// artifact. The metadata decides which other artifacts are read.
  pub fn load(
    mut read: impl FnMut(&str) -> PercolationResult<Vec<u8>>,
  ) -> PercolationResult<Self> {
    let metadata = Metadata::from_slice(&read(METADATA_FILE)?)?;
    let size = metadata.size;
    if size < 2 || metadata.sites() > u32::MAX as usize {
      return Err(make_corrupt_error!("lattice size {} is out of range", size));
    }
    let sites = metadata.sites();
    let steps = metadata.total_states;
    if metadata.total_bonds.checked_add(1) != Some(steps) {
      return Err(make_corrupt_error!(
        "{} states recorded for {} bonds",
        steps,
        metadata.total_bonds
      ));
    }

    let (bonds, sizes, roots, top_sizes) = match metadata.format {
      OutputFormat::Extended => {
        let bonds = parse_bonds(&read(BONDS_FILE)?, size)?;
        let roots = split_steps(&read(ROOTS_FILE)?, ROOTS_FILE, steps, sites)?;
        let sizes = split_steps(&read(SIZES_FILE)?, SIZES_FILE, steps, sites)?;
        let top_bytes = read(TOP_SIZES_FILE)?;
        let top_n = metadata.top_n.unwrap_or(top_bytes.len() / 4 / steps);
        let top_sizes = split_steps(&top_bytes, TOP_SIZES_FILE, steps, top_n)?;
        (bonds, sizes, Some(roots), Some(top_sizes))
      }
      OutputFormat::Legacy => {
        let bonds = parse_bonds(&read(BONDS_FILE)?, size)?;
        let sizes = split_steps(&read(STATES_FILE)?, STATES_FILE, steps, sites)?;
        (bonds, sizes, None, None)
      }
      OutputFormat::Steps => {
        let (bonds, roots, sizes) = Self::parse_steps(&read(STEPS_FILE)?, size, steps)?;
        (bonds, sizes, Some(roots), None)
      }
    };

    if bonds.len() != metadata.total_bonds {
      return Err(make_corrupt_error!(
        "found {} bonds, metadata records {}",
        bonds.len(),
        metadata.total_bonds
      ));
    }

    Ok(Self {
      metadata,
      bonds,
      sizes,
      roots,
      top_sizes,
    })
  }

  #[allow(clippy::type_complexity)]
  fn parse_steps(
    bytes: &[u8],
    size: u32,
    steps: usize,
  ) -> PercolationResult<(Vec<Bond>, Vec<Vec<u32>>, Vec<Vec<u32>>)> {
    let sites = size as usize * size as usize;
    let state_size = sites * 8;
    let expected = steps
      .checked_mul(state_size)
      .zip((steps - 1).checked_mul(BOND_RECORD_SIZE))
      .and_then(|(states, bonds)| states.checked_add(bonds))
      .ok_or_else(|| make_corrupt_error!("{} steps overflow {}", steps, STEPS_FILE))?;
    if bytes.len() != expected {
      return Err(make_corrupt_error!(
        "{} has {} bytes, expected {}",
        STEPS_FILE,
        bytes.len(),
        expected
      ));
    }

    let mut bonds = Vec::with_capacity(steps - 1);
    let mut roots = Vec::with_capacity(steps);
    let mut sizes = Vec::with_capacity(steps);
    let mut pos = 0;
    for step in 0..steps {
      if step > 0 {
        bonds.push(parse_bond(&bytes[pos..pos + BOND_RECORD_SIZE], size)?);
        pos += BOND_RECORD_SIZE;
      }
      let (step_roots, step_sizes): (Vec<u32>, Vec<u32>) = to_u32s(&bytes[pos..pos + state_size])
        .into_iter()
        .tuples()
        .unzip();
      roots.push(step_roots);
      sizes.push(step_sizes);
      pos += state_size;
    }

    Ok((bonds, roots, sizes))
  }

  pub fn metadata(&self) -> &Metadata {
    &self.metadata
  }

  pub fn bonds(&self) -> &[Bond] {
    &self.bonds
  }

  pub fn steps(&self) -> usize {
    self.sizes.len()
  }

  pub fn sizes(&self, step: usize) -> &[u32] {
    &self.sizes[step]
  }

  pub fn roots(&self, step: usize) -> Option<&[u32]> {
    self.roots.as_ref().map(|roots| roots[step].as_slice())
  }

  pub fn top_sizes(&self, step: usize) -> Option<&[u32]> {
    self.top_sizes.as_ref().map(|top| top[step].as_slice())
  }

  /// The cluster-size multiset recorded for `step`, in descending order.
  pub fn cluster_sizes(&self, step: usize) -> PercolationResult<Vec<u32>> {
    match self.roots(step) {
      Some(roots) => Ok(
        roots
          .iter()
          .zip(self.sizes(step))
          .enumerate()
          .filter(|&(idx, (&root, _))| root as usize == idx)
          .map(|(_, (_, &size))| size)
          .sorted_unstable_by(|a, b| b.cmp(a))
          .collect(),
      ),
      None => cluster_sizes_from_site_sizes(self.sizes(step)),
    }
  }

  /// Rebuilds the clusters from the stored bonds alone and returns their
  /// sizes in descending order.
  pub fn recompute_final_sizes(&self) -> Vec<u32> {
    let mut uf = UnionFind::new(self.metadata.sites());
    for bond in &self.bonds {
      uf.merge(bond.site1() as usize, bond.site2() as usize);
    }
    uf.roots()
      .map(|(_, size)| size)
      .sorted_unstable_by(|a, b| b.cmp(a))
      .collect()
  }
}
