use std::{collections::HashMap, num::NonZeroUsize};

use googletest::prelude::*;
use itertools::Itertools;
use percolation::{NoProgress, Percolation, StateCapture};
use rstest::rstest;
use union_find::UnionFind;

fn is_descending_then_zero(top_sizes: &[u32]) -> bool {
  let nonzero = top_sizes.iter().take_while(|&&size| size != 0).collect_vec();
  top_sizes[nonzero.len()..].iter().all(|&size| size == 0)
    && nonzero.iter().tuple_windows().all(|(a, b)| a > b)
}

#[rstest]
#[case(4, 0.5, 1, 1)]
#[case(8, 0.6, 3, 5)]
#[case(10, 0.3, 99, 10)]
#[case(12, 1.0, 7, 3)]
#[gtest]
fn test_top_sizes_descending_every_step(
  #[case] size: u32,
  #[case] p: f64,
  #[case] seed: u64,
  #[case] top_n: usize,
) {
  let engine = Percolation::new(size, seed);
  let bonds = engine.generate_bonds(p);
  let simulation = engine.simulate(&bonds, StateCapture::new(NonZeroUsize::new(top_n)), NoProgress);

  for snapshot in &simulation.snapshots {
    expect_eq!(snapshot.top_sizes().len(), top_n);
    expect_true!(is_descending_then_zero(snapshot.top_sizes()));
    // The largest cluster always leads unless every cluster is a singleton.
    let largest = snapshot.largest();
    let expected_head = if largest > 1 { largest } else { 0 };
    expect_eq!(snapshot.top_sizes()[0], expected_head);
  }
}

#[rstest]
#[case(5, 11)]
#[case(9, 12)]
#[gtest]
fn test_sizes_match_membership_every_step(#[case] size: u32, #[case] seed: u64) {
  let sites = (size * size) as usize;
  let bonds = Percolation::new(size, seed).generate_bonds(0.55);
  let mut uf = UnionFind::new(sites);

  for bond in &bonds {
    let (a, b) = (bond.site1() as usize, bond.site2() as usize);
    uf.merge(a, b);
    expect_eq!(uf.find(a), uf.find(b));

    let mut members = HashMap::<usize, u32>::new();
    for site in 0..sites {
      *members.entry(uf.find(site)).or_default() += 1;
    }
    for (&root, &count) in &members {
      expect_eq!(uf.root_size(root), count);
    }
    expect_eq!(uf.roots().map(|(_, size)| size as usize).sum::<usize>(), sites);
    expect_eq!(members.len(), uf.unique_sets());
  }
}

#[gtest]
fn test_snapshot_roots_are_consistent() {
  let engine = Percolation::new(7, 8);
  let bonds = engine.generate_bonds(0.5);
  let simulation = engine.simulate(&bonds, StateCapture::new(None), NoProgress);

  for snapshot in &simulation.snapshots {
    for (&root, &size) in snapshot.roots().iter().zip(snapshot.sizes()) {
      // Every root resolves to itself and reports the same size as its
      // members.
      expect_eq!(snapshot.roots()[root as usize], root);
      expect_eq!(snapshot.sizes()[root as usize], size);
      let members = snapshot.roots().iter().filter(|&&r| r == root).count();
      expect_eq!(members as u32, size);
    }
  }
}
