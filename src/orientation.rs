use std::cmp::Ordering;

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone)]
pub enum Orientation {
  CounterClockWise,
  ClockWise,
  CoLinear,
}

// Absolute bound on |det| below which a triple counts as numerically colinear
// for the general-position check. Crossing tests never use it.
pub(crate) const COLINEAR_EPS: f64 = 4.0 * f64::EPSILON;

impl Orientation {
  /// Determine the direction you have to turn if you walk from `p1`
  /// to `p2` to `p3`.
  ///
  /// The sign is computed with adaptive-precision arithmetic and is exact for
  /// every finite `f64` input; there is no tolerance.
  ///
  /// # Examples
  ///
  /// ```rust
  /// # use plane_partition::Orientation;
  /// let p1 = [0., 0.];
  /// let p2 = [0., 1.]; // One unit above p1.
  /// assert!(Orientation::new(&p1, &p2, &[0., 2.]).is_colinear());
  /// assert!(Orientation::new(&p1, &p2, &[-1., 2.]).is_ccw());
  /// assert!(Orientation::new(&p1, &p2, &[1., 2.]).is_cw());
  /// ```
  pub fn new(p1: &[f64; 2], p2: &[f64; 2], p3: &[f64; 2]) -> Orientation {
    let orient = geometry_predicates::predicates::orient2d(*p1, *p2, *p3);
    match orient.partial_cmp(&0.0) {
      Some(Ordering::Greater) => Orientation::CounterClockWise,
      Some(Ordering::Less) => Orientation::ClockWise,
      _ => Orientation::CoLinear,
    }
  }

  /// Like [`Orientation::new`] but also reports triples whose plain
  /// floating-point determinant is within [`COLINEAR_EPS`] of zero.
  ///
  /// Used to reject point sets that are only accidentally in general position,
  /// e.g. antipodal points around a hub computed with `sin`/`cos`.
  pub fn is_near_colinear(p1: &[f64; 2], p2: &[f64; 2], p3: &[f64; 2]) -> bool {
    let det = (p2[0] - p1[0]) * (p3[1] - p1[1]) - (p2[1] - p1[1]) * (p3[0] - p1[0]);
    det.abs() < COLINEAR_EPS || Orientation::new(p1, p2, p3).is_colinear()
  }

  pub fn is_colinear(self) -> bool {
    matches!(self, Orientation::CoLinear)
  }

  pub fn is_ccw(self) -> bool {
    matches!(self, Orientation::CounterClockWise)
  }

  pub fn is_cw(self) -> bool {
    matches!(self, Orientation::ClockWise)
  }

  #[must_use]
  pub fn reverse(self) -> Orientation {
    match self {
      Orientation::CounterClockWise => Orientation::ClockWise,
      Orientation::ClockWise => Orientation::CounterClockWise,
      Orientation::CoLinear => Orientation::CoLinear,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use test_strategy::proptest;

  fn pt(x: i8, y: i8) -> [f64; 2] {
    [f64::from(x), f64::from(y)]
  }

  #[proptest]
  fn swapping_reverses_prop(pts: [i8; 6]) {
    let [a, b, c, d, e, f] = pts;
    let (p, q, r) = (pt(a, b), pt(c, d), pt(e, f));
    assert_eq!(Orientation::new(&p, &q, &r), Orientation::new(&q, &p, &r).reverse());
  }

  #[proptest]
  fn rotation_invariant_prop(pts: [i8; 6]) {
    let [a, b, c, d, e, f] = pts;
    let (p, q, r) = (pt(a, b), pt(c, d), pt(e, f));
    assert_eq!(Orientation::new(&p, &q, &r), Orientation::new(&q, &r, &p));
  }

  #[test]
  fn exact_on_tiny_determinants() {
    // Naive evaluation of this determinant suffers from cancellation.
    let p = [0.5, 0.5];
    let q = [12.0, 12.0];
    let r = [24.0, 24.0];
    assert!(Orientation::new(&p, &q, &r).is_colinear());
    let r = [24.0, 24.0 + f64::EPSILON * 32.0];
    assert!(Orientation::new(&p, &q, &r).is_ccw());
  }

  #[test]
  fn near_colinear_detects_floating_antipodes() {
    let angle = 0.7_f64;
    let a = [angle.cos(), angle.sin()];
    let b = [
      (angle + std::f64::consts::PI).cos(),
      (angle + std::f64::consts::PI).sin(),
    ];
    assert!(Orientation::is_near_colinear(&[0.0, 0.0], &a, &b));
    assert!(!Orientation::is_near_colinear(&[0.0, 0.0], &[1.0, 0.0], &[0.0, 1.0]));
  }
}
