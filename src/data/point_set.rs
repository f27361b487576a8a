use serde::Serialize;

use super::edge::{complete_edge_count, edge_index};
use super::{Edge, EdgeId, Point, PointId, SegmentView};
use crate::families::Family;
use crate::{Error, Orientation};

///////////////////////////////////////////////////////////////////////////////
// PointSet

/// An immutable point set together with the edges of its complete graph.
///
/// Point `i` has id `PointId(i)`. Edges are numbered in lexicographic order of
/// their `(min, max)` endpoint ids, so the edge `{a, b}` can be located in $O(1)$.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSet {
  points: Vec<Point>,
  #[serde(skip)]
  edges: Vec<Edge>,
  #[serde(skip_serializing_if = "Option::is_none")]
  family: Option<Family>,
}

impl PointSet {
  /// $O(n^2)$ Build a point set from raw coordinates. Ids follow the input order.
  ///
  /// General position is not checked; see [`PointSet::check_general_position`].
  pub fn new(coords: Vec<[f64; 2]>) -> Result<PointSet, Error> {
    let points = coords
      .into_iter()
      .enumerate()
      .map(|(id, array)| Point::new(id, array))
      .collect();
    PointSet::from_points(points)
  }

  /// $O(n^2)$ Build a point set from labelled points.
  ///
  /// The ids must be `0..n` in order.
  pub fn from_points(points: Vec<Point>) -> Result<PointSet, Error> {
    if points.len() < 2 {
      return Err(Error::InsufficientPoints {
        needed: 2,
        found: points.len(),
      });
    }
    for (idx, pt) in points.iter().enumerate() {
      if pt.id.usize() != idx {
        return Err(Error::MisnumberedPoint {
          position: idx,
          id: pt.id.usize(),
        });
      }
      if !pt.is_finite() {
        return Err(Error::NonFiniteCoordinate(idx));
      }
    }
    let n = points.len();
    let mut edges = Vec::with_capacity(complete_edge_count(n));
    for a in 0..n {
      for b in a + 1..n {
        edges.push(Edge::new(EdgeId(edges.len()), PointId(a), PointId(b)));
      }
    }
    Ok(PointSet {
      points,
      edges,
      family: None,
    })
  }

  #[must_use]
  pub fn with_family(self, family: Family) -> PointSet {
    PointSet {
      family: Some(family),
      ..self
    }
  }

  /// The parameters this point set was generated from, if any.
  pub fn family(&self) -> Option<&Family> {
    self.family.as_ref()
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  pub fn points(&self) -> &[Point] {
    &self.points
  }

  pub fn point(&self, id: PointId) -> &Point {
    &self.points[id.usize()]
  }

  pub fn coordinates(&self) -> Vec<[f64; 2]> {
    self.points.iter().map(|pt| pt.array).collect()
  }

  pub fn edges(&self) -> &[Edge] {
    &self.edges
  }

  pub fn n_edges(&self) -> usize {
    self.edges.len()
  }

  pub fn edge(&self, id: EdgeId) -> &Edge {
    &self.edges[id.usize()]
  }

  /// $O(1)$ The id of the edge between `a` and `b`.
  ///
  /// # Panics
  ///
  /// Panics if `a == b` or either id is out of range.
  pub fn edge_between(&self, a: PointId, b: PointId) -> EdgeId {
    assert!(a != b, "no loop edges in a complete graph");
    assert!(a.usize() < self.len() && b.usize() < self.len());
    EdgeId(edge_index(self.len(), a.usize(), b.usize()))
  }

  pub fn segment(&self, id: EdgeId) -> SegmentView<'_> {
    let edge = self.edge(id);
    SegmentView::new(self.point(edge.min), self.point(edge.max))
  }

  /// Edges incident to `p`, in increasing id order.
  pub fn incident_edges(&self, p: PointId) -> impl Iterator<Item = EdgeId> + '_ {
    (0..self.len())
      .map(PointId)
      .filter(move |&q| q != p)
      .map(move |q| self.edge_between(p, q))
  }

  /// $O(n^3)$ Reject the point set if any three points are (numerically) colinear.
  pub fn check_general_position(&self) -> Result<(), Error> {
    let n = self.len();
    for a in 0..n {
      for b in a + 1..n {
        for c in b + 1..n {
          let (pa, pb, pc) = (&self.points[a], &self.points[b], &self.points[c]);
          if Orientation::is_near_colinear(&pa.array, &pb.array, &pc.array) {
            return Err(Error::CoLinearViolation(a, b, c));
          }
        }
      }
    }
    Ok(())
  }

  pub fn is_in_general_position(&self) -> bool {
    self.check_general_position().is_ok()
  }
}

///////////////////////////////////////////////////////////////////////////////
// Tests
