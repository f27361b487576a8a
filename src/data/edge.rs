use serde::{Deserialize, Serialize};

use super::PointId;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub usize);

impl std::fmt::Debug for EdgeId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
    write!(f, "EdgeId({})", self.0)
  }
}

impl EdgeId {
  pub fn usize(self) -> usize {
    self.0
  }
}

/// An edge of the complete graph. `min < max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
  pub id: EdgeId,
  pub min: PointId,
  pub max: PointId,
}

impl Edge {
  /// # Panics
  ///
  /// Panics in debug builds if `a == b`.
  pub fn new(id: EdgeId, a: PointId, b: PointId) -> Edge {
    debug_assert_ne!(a, b, "an edge needs two distinct endpoints");
    if a < b {
      Edge { id, min: a, max: b }
    } else {
      Edge { id, min: b, max: a }
    }
  }

  pub fn endpoints(&self) -> [PointId; 2] {
    [self.min, self.max]
  }

  pub fn is_incident(&self, p: PointId) -> bool {
    self.min == p || self.max == p
  }

  pub fn shares_endpoint(&self, other: &Edge) -> bool {
    self.is_incident(other.min) || self.is_incident(other.max)
  }
}

/// Number of edges in the complete graph on `n` vertices.
pub const fn complete_edge_count(n: usize) -> usize {
  n * n.saturating_sub(1) / 2
}

/// Position of the edge `{a, b}` in the lexicographic order of `(min, max)` pairs
/// over `n` points.
pub(crate) fn edge_index(n: usize, a: usize, b: usize) -> usize {
  let (i, j) = if a < b { (a, b) } else { (b, a) };
  debug_assert!(i != j && j < n);
  // Edges starting before `i`: (n-1) + (n-2) + ... + (n-i).
  i * (2 * n - i - 1) / 2 + (j - i - 1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_normalizes_endpoints() {
    let e = Edge::new(EdgeId(0), PointId(4), PointId(1));
    assert_eq!(e.endpoints(), [PointId(1), PointId(4)]);
  }

  #[test]
  fn shared_endpoints() {
    let e = Edge::new(EdgeId(0), PointId(0), PointId(1));
    let f = Edge::new(EdgeId(1), PointId(1), PointId(2));
    let g = Edge::new(EdgeId(2), PointId(2), PointId(3));
    assert!(e.shares_endpoint(&f));
    assert!(f.shares_endpoint(&g));
    assert!(!e.shares_endpoint(&g));
  }

  #[test]
  fn edge_index_is_lexicographic() {
    let n = 7;
    let mut expected = 0;
    for i in 0..n {
      for j in i + 1..n {
        assert_eq!(edge_index(n, i, j), expected);
        assert_eq!(edge_index(n, j, i), expected);
        expected += 1;
      }
    }
    assert_eq!(expected, complete_edge_count(n));
  }
}
