use std::num::NonZeroUsize;

use itertools::Itertools;
use union_find::UnionFind;

/// Fixed-length list of the largest distinct cluster sizes seen so far,
/// strictly descending and zero-padded at the end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopSizes {
  sizes: Vec<u32>,
}

impl TopSizes {
  pub fn new(n: NonZeroUsize) -> Self {
    Self {
      sizes: vec![0; n.get()],
    }
  }

  /// Insertion-sort step: finds the first entry smaller than `size`, shifts
  /// the tail right by one (dropping the last entry) and writes `size`
  /// there. Sizes already present, or smaller than every entry of a full
  /// list, are dropped.
  pub fn insert(&mut self, size: u32) {
    let Some(pos) = self.sizes.iter().position(|&entry| entry <= size) else {
      return;
    };
    if self.sizes[pos] == size {
      return;
    }

    let len = self.sizes.len();
    self.sizes.copy_within(pos..len - 1, pos + 1);
    self.sizes[pos] = size;
  }

  pub fn as_slice(&self) -> &[u32] {
    &self.sizes
  }

  pub fn into_vec(self) -> Vec<u32> {
    self.sizes
  }
}

/// Cluster membership of every site after one step of the simulation.
///
/// A snapshot owns its buffers; it stays valid after the union-find it was
/// taken from keeps merging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
  roots: Vec<u32>,
  sizes: Vec<u32>,
  /// Empty when top-N tracking is disabled.
  top_sizes: Vec<u32>,
}

impl Snapshot {
  pub fn new(roots: Vec<u32>, sizes: Vec<u32>, top_sizes: Vec<u32>) -> Self {
    debug_assert_eq!(roots.len(), sizes.len());
    Self {
      roots,
      sizes,
      top_sizes,
    }
  }

  pub fn sites(&self) -> usize {
    self.roots.len()
  }

  pub fn roots(&self) -> &[u32] {
    &self.roots
  }

  pub fn sizes(&self) -> &[u32] {
    &self.sizes
  }

  pub fn top_sizes(&self) -> &[u32] {
    &self.top_sizes
  }

  /// Size of every cluster, one entry per distinct root, in descending
  /// order.
  pub fn cluster_sizes(&self) -> Vec<u32> {
    self
      .roots
      .iter()
      .zip(&self.sizes)
      .enumerate()
      .filter(|&(idx, (&root, _))| root as usize == idx)
      .map(|(_, (_, &size))| size)
      .sorted_unstable_by(|a, b| b.cmp(a))
      .collect()
  }

  pub fn largest(&self) -> u32 {
    self.sizes.iter().copied().max().unwrap_or(0)
  }
}

/// Takes snapshots of a live union-find.
///
/// Each capture resolves every site, so a capture costs O(sites) and a full
/// run costs O(bonds * sites). Replay tools need a complete snapshot per
/// step, so this is not optimized into a diff.
#[derive(Clone, Copy, Debug)]
pub struct StateCapture {
  top_n: Option<NonZeroUsize>,
}

impl StateCapture {
  pub fn new(top_n: Option<NonZeroUsize>) -> Self {
    Self { top_n }
  }

  pub fn top_n(&self) -> Option<NonZeroUsize> {
    self.top_n
  }

  pub fn capture(&self, uf: &mut UnionFind) -> Snapshot {
    let sites = uf.capacity();
    let mut roots = Vec::with_capacity(sites);
    let mut sizes = Vec::with_capacity(sites);
    let mut top_sizes = self.top_n.map(TopSizes::new);

    for site in 0..sites {
      let root = uf.find(site);
      let size = uf.root_size(root);
      roots.push(root as u32);
      sizes.push(size);

      if root == site && size > 1 {
        if let Some(top_sizes) = top_sizes.as_mut() {
          top_sizes.insert(size);
        }
      }
    }

    Snapshot::new(
      roots,
      sizes,
      top_sizes.map(TopSizes::into_vec).unwrap_or_default(),
    )
  }
}
