use std::time::Duration;

use percolation::{candidate_bonds, Simulation};

#[derive(Clone, Debug, Default)]
pub struct Metrics {
  /// Bonds the lattice could hold.
  pub n_candidates: u64,
  /// Bonds included by the generator.
  pub n_bonds: u64,
  pub n_merges: u64,
  pub n_redundant: u64,
  pub n_states: u64,
  pub generate_time: Duration,
  pub run_time: Duration,
}

impl Metrics {
  pub fn new(size: u32) -> Self {
    Self {
      n_candidates: candidate_bonds(size) as u64,
      ..Self::default()
    }
  }

  pub fn record_simulation(&mut self, simulation: &Simulation) {
    self.n_bonds = (simulation.merges + simulation.redundant) as u64;
    self.n_merges = simulation.merges as u64;
    self.n_redundant = simulation.redundant as u64;
    self.n_states = simulation.snapshots.len() as u64;
  }

  /// Fraction of candidate bonds that were included.
  pub fn inclusion_rate(&self) -> f64 {
    if self.n_candidates == 0 {
      0.0
    } else {
      self.n_bonds as f64 / self.n_candidates as f64
    }
  }

  pub fn states_per_sec(&self) -> f64 {
    self.n_states as f64 / self.run_time.as_secs_f64()
  }
}
