use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::Orientation;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub usize);

impl std::fmt::Debug for PointId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
    write!(f, "PointId({})", self.0)
  }
}

impl std::fmt::Display for PointId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
    write!(f, "{}", self.0)
  }
}

impl PointId {
  pub fn usize(self) -> usize {
    self.0
  }
}

/// A labelled point in the plane.
///
/// `group` is the layer or wheel group the point was generated in, if the
/// generating family has such a notion. The hub of a wheel has no group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
  pub id: PointId,
  pub array: [f64; 2],
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub group: Option<usize>,
}

impl Point {
  pub const fn new(id: usize, array: [f64; 2]) -> Point {
    Point {
      id: PointId(id),
      array,
      group: None,
    }
  }

  #[must_use]
  pub fn with_group(self, group: usize) -> Point {
    Point {
      group: Some(group),
      ..self
    }
  }

  pub fn x_coord(&self) -> f64 {
    self.array[0]
  }

  pub fn y_coord(&self) -> f64 {
    self.array[1]
  }

  pub fn is_finite(&self) -> bool {
    self.array.iter().all(|c| c.is_finite())
  }

  pub fn orient(p1: &Point, p2: &Point, p3: &Point) -> Orientation {
    Orientation::new(&p1.array, &p2.array, &p3.array)
  }

  pub fn orientation(&self, q: &Point, r: &Point) -> Orientation {
    Point::orient(self, q, r)
  }
}

impl Index<usize> for Point {
  type Output = f64;
  fn index(&self, key: usize) -> &f64 {
    self.array.index(key)
  }
}

impl From<(usize, f64, f64)> for Point {
  fn from((id, x, y): (usize, f64, f64)) -> Point {
    Point::new(id, [x, y])
  }
}
