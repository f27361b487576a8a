use itertools::Itertools;
use tracing::debug;

use crate::data::{EdgeId, PointSet};

///////////////////////////////////////////////////////////////////////////////
// CrossingGraph

/// The crossing relation on the edges of a complete geometric graph.
///
/// Pairs are stored once, as `(a, b)` with `a < b`, in lexicographic order. The
/// relation is symmetric and irreflexive; every query normalizes its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossingGraph {
  pairs: Vec<(EdgeId, EdgeId)>,
  partners: Vec<Vec<EdgeId>>,
}

impl CrossingGraph {
  fn from_pairs(n_edges: usize, pairs: Vec<(EdgeId, EdgeId)>) -> CrossingGraph {
    let mut partners = vec![Vec::new(); n_edges];
    for &(a, b) in &pairs {
      partners[a.usize()].push(b);
      partners[b.usize()].push(a);
    }
    for list in &mut partners {
      list.sort_unstable();
    }
    CrossingGraph { pairs, partners }
  }

  /// Number of unordered crossing pairs.
  pub fn len(&self) -> usize {
    self.pairs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pairs.is_empty()
  }

  pub fn pairs(&self) -> &[(EdgeId, EdgeId)] {
    &self.pairs
  }

  /// $O(\log k)$ Do `a` and `b` cross?
  pub fn contains(&self, a: EdgeId, b: EdgeId) -> bool {
    self
      .partners
      .get(a.usize())
      .map_or(false, |list| list.binary_search(&b).is_ok())
  }

  /// Edges crossed by `edge`, in increasing id order.
  pub fn partners(&self, edge: EdgeId) -> &[EdgeId] {
    &self.partners[edge.usize()]
  }

  pub fn crossing_count(&self, edge: EdgeId) -> usize {
    self.partners[edge.usize()].len()
  }

  /// Edges that are not crossed by any other edge.
  pub fn uncrossed(&self) -> impl Iterator<Item = EdgeId> + '_ {
    self
      .partners
      .iter()
      .enumerate()
      .filter(|(_, list)| list.is_empty())
      .map(|(e, _)| EdgeId(e))
  }
}

///////////////////////////////////////////////////////////////////////////////
// Construction

/// Find all pairs of properly crossing edges of the complete graph.
///
/// Edges sharing an endpoint are skipped without evaluating any predicate.
///
/// # Time complexity
/// $O(n^4)$ for $n$ points.
pub fn segment_crossings(point_set: &PointSet) -> CrossingGraph {
  let edges = point_set.edges();
  let pairs: Vec<(EdgeId, EdgeId)> = (0..edges.len())
    .tuple_combinations::<(usize, usize)>()
    .filter(|&(a, b)| !edges[a].shares_endpoint(&edges[b]))
    .filter(|&(a, b)| {
      point_set
        .segment(EdgeId(a))
        .crosses(&point_set.segment(EdgeId(b)))
    })
    .map(|(a, b)| (EdgeId(a), EdgeId(b)))
    .collect();
  debug!(
    points = point_set.len(),
    edges = edges.len(),
    crossings = pairs.len(),
    "computed crossing graph"
  );
  CrossingGraph::from_pairs(edges.len(), pairs)
}

///////////////////////////////////////////////////////////////////////////////
// Tests
