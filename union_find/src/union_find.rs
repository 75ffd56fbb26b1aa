/// Disjoint-set forest over a fixed number of elements, stored as two
/// parallel arrays indexed by element id.
///
/// Element ids are `usize` at the API boundary but stored as `u32`, which
/// bounds the capacity to `u32::MAX` elements.
#[derive(Clone, Debug)]
pub struct UnionFind {
  unique_sets: usize,
  /// The index of parent of each node (self if root).
  parent: Vec<u32>,
  /// Size of the tree under each element. Only meaningful for roots; the
  /// value left behind in an absorbed root is stale.
  size: Vec<u32>,
}

impl UnionFind {
  pub fn new(capacity: usize) -> Self {
    debug_assert!(capacity <= u32::MAX as usize);
    Self {
      unique_sets: capacity,
      parent: (0..capacity as u32).collect(),
      size: vec![1; capacity],
    }
  }

  pub fn capacity(&self) -> usize {
    self.parent.len()
  }

  /// The number of disjoint sets currently in the structure.
  pub fn unique_sets(&self) -> usize {
    self.unique_sets
  }

  pub fn is_root(&self, node_id: usize) -> bool {
    self.parent[node_id] as usize == node_id
  }

  /// Size of the tree rooted at `root_id`. `root_id` must be a root.
  pub fn root_size(&self, root_id: usize) -> u32 {
    debug_assert!(self.is_root(root_id));
    self.size[root_id]
  }

  /// Gives id of the root of tree that node is in.
  pub fn find(&mut self, mut node_id: usize) -> usize {
    debug_assert!(node_id < self.capacity());
    let mut parent_id = self.parent[node_id] as usize;

    while parent_id != node_id {
      let grandparent_id = self.parent[parent_id];
      // Slowly compress tree by assigning node's parent to its grandparent.
      self.parent[node_id] = grandparent_id;

      // Next look at the former parent of node, rather than skipping to it's
      // new parent. This will cause a long chain of nodes to be compressed into
      // two equally-sized trees.
      node_id = parent_id;
      parent_id = self.parent[node_id] as usize;
    }

    node_id
  }

  /// Number of elements in the set containing `node_id`.
  pub fn cluster_size(&mut self, node_id: usize) -> u32 {
    let root_id = self.find(node_id);
    self.size[root_id]
  }

  /// Unions the two sets that a and b are in. Returns false if they were
  /// already in the same set, in which case nothing changes.
  ///
  /// The root of the smaller tree is attached under the root of the larger
  /// one. On a tie, b's root is attached under a's.
  pub fn merge(&mut self, a_id: usize, b_id: usize) -> bool {
    let a_root_id = self.find(a_id);
    let b_root_id = self.find(b_id);

    if a_root_id == b_root_id {
      return false;
    }

    let a_size = self.size[a_root_id];
    let b_size = self.size[b_root_id];

    // Attach smaller tree to larger tree.
    if a_size < b_size {
      self.parent[a_root_id] = b_root_id as u32;
      self.size[b_root_id] += a_size;
    } else {
      self.parent[b_root_id] = a_root_id as u32;
      self.size[a_root_id] += b_size;
    }

    // Two sets have joined, reducing the number of unique sets by one.
    self.unique_sets -= 1;
    true
  }

  /// Iterates over `(root, size)` for every current root, in increasing root
  /// order.
  pub fn roots(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
    self
      .parent
      .iter()
      .enumerate()
      .filter(|&(idx, &parent)| parent as usize == idx)
      .map(|(idx, _)| (idx, self.size[idx]))
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use googletest::{expect_eq, expect_false, expect_true, gtest};
  use rand::{rngs::StdRng, Rng, SeedableRng};
  use rstest::rstest;

  use crate::UnionFind;

  fn check_invariants(uf: &mut UnionFind) {
    let mut counts = HashMap::<usize, u32>::new();
    for i in 0..uf.capacity() {
      *counts.entry(uf.find(i)).or_default() += 1;
    }

    assert_eq!(counts.len(), uf.unique_sets());
    for (root, count) in &counts {
      assert_eq!(uf.root_size(*root), *count);
    }
    assert_eq!(
      uf.roots().map(|(_, size)| size as usize).sum::<usize>(),
      uf.capacity()
    );
  }

  #[gtest]
  fn test_basic() {
    let mut uf = UnionFind::new(10);

    for i in 0..10 {
      expect_eq!(uf.find(i), i);
    }

    uf.merge(1, 3);
    uf.merge(4, 5);
    uf.merge(1, 5);

    expect_true!(uf.find(1) == uf.find(3));
    expect_true!(uf.find(1) == uf.find(4));
    expect_true!(uf.find(1) == uf.find(5));
    for i in [0, 2, 6, 7, 8, 9] {
      expect_eq!(uf.find(i), i);
    }
    expect_eq!(uf.unique_sets(), 7);
    expect_eq!(uf.cluster_size(3), 4);
  }

  #[gtest]
  fn test_long_chain() {
    let mut uf = UnionFind::new(256);

    for i in 0..255 {
      uf.merge(i, i + 1);
    }

    let root_id = uf.find(0);
    for i in 1..256 {
      expect_eq!(uf.find(i), root_id);
    }
    expect_eq!(uf.root_size(root_id), 256);
    expect_eq!(uf.unique_sets(), 1);
  }

  #[gtest]
  fn test_merge_same_set_is_noop() {
    let mut uf = UnionFind::new(4);
    expect_true!(uf.merge(0, 1));
    expect_false!(uf.merge(1, 0));
    expect_eq!(uf.unique_sets(), 3);
    expect_eq!(uf.cluster_size(0), 2);
  }

  #[gtest]
  fn test_tie_attaches_second_under_first() {
    let mut uf = UnionFind::new(4);
    uf.merge(2, 3);
    expect_eq!(uf.find(3), 2);

    uf.merge(1, 0);
    expect_eq!(uf.find(0), 1);

    // Equal sizes again: 3's root (2) goes under 0's root (1).
    uf.merge(0, 3);
    expect_eq!(uf.find(2), 1);
    expect_eq!(uf.root_size(1), 4);
  }

  #[gtest]
  fn test_smaller_attaches_under_larger() {
    let mut uf = UnionFind::new(5);
    uf.merge(1, 2);
    uf.merge(1, 3);
    // 0 is a singleton, so it goes under 1 even though it is the first
    // operand.
    uf.merge(0, 3);
    expect_eq!(uf.find(0), 1);
    expect_eq!(uf.root_size(1), 4);
  }

  #[gtest]
  fn test_find_compresses_path() {
    let mut uf = UnionFind::new(4);
    // Build a chain by hand: 3 -> 2 -> 1 -> 0.
    uf.parent = vec![0, 0, 1, 2];
    uf.size = vec![4, 1, 1, 1];
    uf.unique_sets = 1;

    expect_eq!(uf.find(3), 0);
    expect_eq!(uf.parent[3], 1);
    expect_eq!(uf.parent[2], 0);
  }

  #[rstest]
  #[case(16, 1)]
  #[case(100, 2)]
  #[case(1000, 3)]
  #[gtest]
  fn test_random_merges_keep_sizes_consistent(#[case] n: usize, #[case] seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut uf = UnionFind::new(n);

    for _ in 0..n {
      let a = rng.random_range(0..n);
      let b = rng.random_range(0..n);
      uf.merge(a, b);
      expect_eq!(uf.find(a), uf.find(b));
    }

    check_invariants(&mut uf);
  }
}
