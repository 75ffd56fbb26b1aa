use std::fmt::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
  /// Joins a site to its right neighbor.
  Horizontal,
  /// Joins a site to the neighbor below it.
  Vertical,
}

impl Orientation {
  /// The flag byte written to bond records.
  pub fn flag(self) -> u8 {
    match self {
      Self::Horizontal => 1,
      Self::Vertical => 0,
    }
  }

  pub fn from_flag(flag: u8) -> Option<Self> {
    match flag {
      1 => Some(Self::Horizontal),
      0 => Some(Self::Vertical),
      _ => None,
    }
  }
}

/// An edge between two adjacent lattice sites. `site2` is always either
/// `site1 + 1` or `site1 + size`, so the orientation is never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bond {
  site1: u32,
  site2: u32,
}

impl Bond {
  pub fn horizontal(site: u32) -> Self {
    Self {
      site1: site,
      site2: site + 1,
    }
  }

  pub fn vertical(site: u32, size: u32) -> Self {
    Self {
      site1: site,
      site2: site + size,
    }
  }

  pub fn from_position(orientation: Orientation, row: u32, col: u32, size: u32) -> Self {
    let site = row * size + col;
    match orientation {
      Orientation::Horizontal => Self::horizontal(site),
      Orientation::Vertical => Self::vertical(site, size),
    }
  }

  pub fn site1(&self) -> u32 {
    self.site1
  }

  pub fn site2(&self) -> u32 {
    self.site2
  }

  pub fn orientation(&self) -> Orientation {
    if self.site2 == self.site1 + 1 {
      Orientation::Horizontal
    } else {
      Orientation::Vertical
    }
  }

  pub fn row(&self, size: u32) -> u32 {
    self.site1 / size
  }

  pub fn col(&self, size: u32) -> u32 {
    self.site1 % size
  }
}

impl Display for Bond {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let sep = match self.orientation() {
      Orientation::Horizontal => "-",
      Orientation::Vertical => "|",
    };
    write!(f, "{}{}{}", self.site1, sep, self.site2)
  }
}

/// The number of nearest-neighbor bonds on a `size` x `size` lattice.
pub fn candidate_bonds(size: u32) -> usize {
  2 * size as usize * (size as usize - 1)
}

#[cfg(test)]
mod tests {
  use googletest::{expect_eq, gtest};

  use crate::{bond::candidate_bonds, Bond, Orientation};

  #[gtest]
  fn test_orientation_is_derived() {
    expect_eq!(Bond::horizontal(4).orientation(), Orientation::Horizontal);
    expect_eq!(Bond::vertical(4, 2).orientation(), Orientation::Vertical);
    expect_eq!(Bond::vertical(4, 5).site2(), 9);
  }

  #[gtest]
  fn test_position() {
    let bond = Bond::vertical(7, 3);
    expect_eq!(bond.row(3), 2);
    expect_eq!(bond.col(3), 1);
    expect_eq!(Bond::from_position(Orientation::Vertical, 2, 1, 3), bond);
    expect_eq!(
      Bond::from_position(Orientation::Horizontal, 0, 1, 3),
      Bond::horizontal(1)
    );
  }

  #[gtest]
  fn test_flags() {
    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
      expect_eq!(Orientation::from_flag(orientation.flag()), Some(orientation));
    }
    expect_eq!(Orientation::from_flag(2), None);
  }

  #[gtest]
  fn test_candidate_bonds() {
    expect_eq!(candidate_bonds(2), 4);
    expect_eq!(candidate_bonds(3), 12);
    expect_eq!(candidate_bonds(10), 180);
  }
}
