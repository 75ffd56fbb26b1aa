use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{bond::candidate_bonds, Bond};

/// Produces the bonds of one run and the order they are added in.
///
/// Every random decision comes from generators seeded with `seed`, so the
/// same `(size, p, seed)` always yields the same bonds in the same order.
pub struct BondGenerator {
  size: u32,
  seed: u64,
}

impl BondGenerator {
  pub fn new(size: u32, seed: u64) -> Self {
    debug_assert!(size >= 2);
    Self { size, seed }
  }

  fn rng(&self) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(self.seed)
  }

  /// Includes each lattice bond independently with probability `p`.
  ///
  /// Sites are visited in row-major order. Each site draws once for its
  /// right-hand bond (if it has a right neighbor), then once for the bond
  /// below it (if it has a lower neighbor). Changing this order changes
  /// which bonds a given seed accepts.
  pub fn generate(&self, p: f64) -> Vec<Bond> {
    let mut rng = self.rng();
    let size = self.size;
    let mut bonds = Vec::with_capacity((candidate_bonds(size) as f64 * p).ceil() as usize);

    for row in 0..size {
      for col in 0..size {
        let site = row * size + col;
        if col < size - 1 && rng.random::<f64>() < p {
          bonds.push(Bond::horizontal(site));
        }
        if row < size - 1 && rng.random::<f64>() < p {
          bonds.push(Bond::vertical(site, size));
        }
      }
    }

    bonds
  }

  /// Fisher-Yates shuffle from the last index down, swapping each index `i`
  /// with a uniform index in `[0, i]`. Uses a fresh generator seeded like
  /// the one in `generate`.
  pub fn shuffle(&self, bonds: &mut [Bond]) {
    let mut rng = self.rng();
    for i in (1..bonds.len()).rev() {
      let j = rng.random_range(0..=i);
      bonds.swap(i, j);
    }
  }

  pub fn generate_shuffled(&self, p: f64) -> Vec<Bond> {
    let mut bonds = self.generate(p);
    self.shuffle(&mut bonds);
    bonds
  }
}
