pub trait Intersects<T = Self> {
  type Result;
  fn intersect(self, other: T) -> Option<Self::Result>;
}

/// Two segments meet in a single point interior to both of them.
///
/// Touching at an endpoint, T-junctions and colinear overlaps are not proper
/// crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProperCrossing;
