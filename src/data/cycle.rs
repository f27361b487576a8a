use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use super::{EdgeId, PointId, PointSet};

/// Lengths of short cycles that can be forbidden within a color class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CycleLength {
  Triangle,
  Quadrilateral,
}

impl CycleLength {
  pub fn vertex_count(self) -> usize {
    match self {
      CycleLength::Triangle => 3,
      CycleLength::Quadrilateral => 4,
    }
  }
}

impl TryFrom<u8> for CycleLength {
  type Error = String;
  fn try_from(len: u8) -> Result<CycleLength, String> {
    match len {
      3 => Ok(CycleLength::Triangle),
      4 => Ok(CycleLength::Quadrilateral),
      other => Err(format!("only cycles of length 3 or 4 can be forbidden, got {}", other)),
    }
  }
}

impl From<CycleLength> for u8 {
  fn from(len: CycleLength) -> u8 {
    match len {
      CycleLength::Triangle => 3,
      CycleLength::Quadrilateral => 4,
    }
  }
}

impl std::fmt::Display for CycleLength {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
    write!(f, "{}", self.vertex_count())
  }
}

/// A closed walk through distinct points of the complete graph, used as a
/// constraint template. The closing edge from the last vertex back to the first
/// is implicit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cycle(Vec<PointId>);

impl Cycle {
  pub fn new(vertices: Vec<PointId>) -> Cycle {
    debug_assert!(vertices.len() >= 3);
    Cycle(vertices)
  }

  pub fn vertices(&self) -> &[PointId] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// The edges walked by the cycle, closing edge last.
  pub fn edges<'a>(&'a self, point_set: &'a PointSet) -> impl Iterator<Item = EdgeId> + 'a {
    let n = self.0.len();
    (0..n).map(move |i| point_set.edge_between(self.0[i], self.0[(i + 1) % n]))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cycle_length_from_u8() {
    assert_eq!(CycleLength::try_from(3), Ok(CycleLength::Triangle));
    assert_eq!(CycleLength::try_from(4), Ok(CycleLength::Quadrilateral));
    assert!(CycleLength::try_from(5).is_err());
  }

  #[test]
  fn closing_edge_is_included() {
    let ps = PointSet::new(vec![[0., 0.], [1., 0.], [1., 1.], [0., 1.]]).unwrap();
    let cycle = Cycle::new(vec![PointId(0), PointId(2), PointId(3)]);
    let edges: Vec<EdgeId> = cycle.edges(&ps).collect();
    assert_eq!(
      edges,
      vec![
        ps.edge_between(PointId(0), PointId(2)),
        ps.edge_between(PointId(2), PointId(3)),
        ps.edge_between(PointId(3), PointId(0)),
      ]
    );
  }
}
