use super::Point;

use crate::{Intersects, Orientation, ProperCrossing};
use Orientation::*;

///////////////////////////////////////////////////////////////////////////////
// SegmentView

/// A straight-line edge between two labelled points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentView<'a> {
  pub min: &'a Point,
  pub max: &'a Point,
}

impl<'a> SegmentView<'a> {
  pub fn new(a: &'a Point, b: &'a Point) -> SegmentView<'a> {
    if a.id < b.id {
      SegmentView { min: a, max: b }
    } else {
      SegmentView { min: b, max: a }
    }
  }

  pub fn shares_endpoint(&self, other: &SegmentView<'_>) -> bool {
    self.min.id == other.min.id
      || self.min.id == other.max.id
      || self.max.id == other.min.id
      || self.max.id == other.max.id
  }

  /// True iff the open segments meet in exactly one point.
  pub fn crosses(&self, other: &SegmentView<'_>) -> bool {
    (*self).intersect(*other).is_some()
  }
}

///////////////////////////////////////////////////////////////////////////////
// Intersects

impl<'a, 'b> Intersects<SegmentView<'b>> for SegmentView<'a> {
  type Result = ProperCrossing;
  fn intersect(self, other: SegmentView<'b>) -> Option<Self::Result> {
    // Edges with a common vertex never cross, even when they overlap.
    if self.shares_endpoint(&other) {
      return None;
    }
    let a1 = self.min;
    let a2 = self.max;
    let b1 = other.min;
    let b2 = other.max;
    let l1_to_b1 = Point::orient(a1, a2, b1);
    let l1_to_b2 = Point::orient(a1, a2, b2);
    let l2_to_a1 = Point::orient(b1, b2, a1);
    let l2_to_a2 = Point::orient(b1, b2, a2);
    match (l1_to_b1, l1_to_b2, l2_to_a1, l2_to_a2) {
      // Touching or overlapping; excluded by general position anyway.
      (CoLinear, _, _, _) | (_, CoLinear, _, _) | (_, _, CoLinear, _) | (_, _, _, CoLinear) => None,
      _ if l1_to_b1 != l1_to_b2 && l2_to_a1 != l2_to_a2 => Some(ProperCrossing),
      _ => None,
    }
  }
}

///////////////////////////////////////////////////////////////////////////////
// Tests
