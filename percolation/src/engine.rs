use std::num::NonZeroUsize;

use union_find::UnionFind;

use crate::{
  error::PercolationResult, make_config_error, Bond, BondGenerator, OutputFormat, OutputSink, Progress,
  ProgressTracker, Serializer, Snapshot, Stage, StateCapture,
};

/// The states of a finished simulation, in step order.
#[derive(Clone, Debug)]
pub struct Simulation {
  /// One more than the number of bonds: `snapshots[0]` precedes every bond.
  pub snapshots: Vec<Snapshot>,
  /// Bonds that joined two clusters.
  pub merges: usize,
  /// Bonds whose sites were already in the same cluster.
  pub redundant: usize,
}

/// Bond percolation on a `size` x `size` square lattice.
///
/// An engine runs once: `generate_bonds` may be called any number of times,
/// but `simulate` and `run_and_serialize` consume it.
pub struct Percolation {
  size: u32,
  seed: u64,
  uf: UnionFind,
}

impl Percolation {
  pub fn new(size: u32, seed: u64) -> Self {
    debug_assert!(size >= 2);
    Self {
      size,
      seed,
      uf: UnionFind::new(size as usize * size as usize),
    }
  }

  pub fn size(&self) -> u32 {
    self.size
  }

  pub fn seed(&self) -> u64 {
    self.seed
  }

  pub fn sites(&self) -> usize {
    self.uf.capacity()
  }

  /// The included bonds of this lattice, in the order they will be added.
  pub fn generate_bonds(&self, p: f64) -> Vec<Bond> {
    BondGenerator::new(self.size, self.seed).generate_shuffled(p)
  }

  /// Adds `bonds` in order, capturing the state before the first bond and
  /// after every bond.
  pub fn simulate<P: Progress>(
    mut self,
    bonds: &[Bond],
    capture: StateCapture,
    progress: P,
  ) -> Simulation {
    let mut tracker = ProgressTracker::new(progress, Stage::Simulate, bonds.len());
    let mut snapshots = Vec::with_capacity(bonds.len() + 1);
    snapshots.push(capture.capture(&mut self.uf));
    tracker.advance(0);

    let mut merges = 0;
    for (step, bond) in bonds.iter().enumerate() {
      if self.uf.merge(bond.site1() as usize, bond.site2() as usize) {
        merges += 1;
      }
      snapshots.push(capture.capture(&mut self.uf));
      tracker.advance(step + 1);
    }

    tracing::debug!(
      "{} bonds added, {} clusters remain",
      bonds.len(),
      self.uf.unique_sets()
    );

    Simulation {
      snapshots,
      merges,
      redundant: bonds.len() - merges,
    }
  }

  /// Runs the simulation and writes every step to `sink`. `top_n` is
  /// required by formats that store top cluster sizes and ignored by the
  /// others.
  pub fn run_and_serialize<S: OutputSink, P: Progress>(
    self,
    bonds: &[Bond],
    top_n: Option<NonZeroUsize>,
    format: OutputFormat,
    sink: &mut S,
    mut progress: P,
  ) -> PercolationResult<Simulation> {
    if format.tracks_top_sizes() && top_n.is_none() {
      return Err(make_config_error!("the {} format requires top_n", format));
    }
    let top_n = top_n.filter(|_| format.tracks_top_sizes());
    let serializer = Serializer::new(self.size, format);

    let simulation = self.simulate(bonds, StateCapture::new(top_n), &mut progress);
    serializer.write(sink, bonds, &simulation.snapshots, &mut progress)?;
    Ok(simulation)
  }
}
