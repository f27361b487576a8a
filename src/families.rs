//! Parametric point-set families used as test instances.
//!
//! Every family is a variant of [`Family`] carrying its own parameters. A
//! single dispatch function, [`generate`], validates the parameters and turns
//! the variant into a [`PointSet`] in general position.
use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::data::{Point, PointSet};
use crate::{Error, Orientation};

/// Random families give up after this many rejected samples.
pub const MAX_ATTEMPTS: usize = 1000;

// Angular distance between consecutive points of a wheel group.
const GROUP_STEP: f64 = 0.1;
// Rotation applied to bumpy wheels so that their drawing matches the usual figure.
const BUMPY_ROTATION: f64 = PI / 2.55;
const OUTER_LAYER_RADIUS: f64 = 4.0;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FamilyError {
  #[error("point set family '{family}' requires the parameter '{parameter}'")]
  MissingParameter {
    family: &'static str,
    parameter: &'static str,
  },
  #[error("invalid parameter '{parameter}' for point set family '{family}': {reason}")]
  InvalidParameter {
    family: &'static str,
    parameter: &'static str,
    reason: String,
  },
  #[error("no sample of '{family}' was in general position after {attempts} attempts")]
  GeneralPositionUnreachable {
    family: &'static str,
    attempts: usize,
  },
  #[error("unknown point set family '{0}'")]
  UnknownFamily(String),
}

///////////////////////////////////////////////////////////////////////////////
// FamilyKind

/// The family tag without its parameters, as selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyKind {
  #[serde(alias = "bw")]
  BumpyWheel,
  #[serde(alias = "gw")]
  GeneralizedWheel,
  Convex,
  Random,
  RandomWheel,
  TwoConvexLayers,
}

impl FamilyKind {
  pub const ALL: [FamilyKind; 6] = [
    FamilyKind::BumpyWheel,
    FamilyKind::GeneralizedWheel,
    FamilyKind::Convex,
    FamilyKind::Random,
    FamilyKind::RandomWheel,
    FamilyKind::TwoConvexLayers,
  ];

  /// Short name, also used in file names.
  pub fn name(self) -> &'static str {
    match self {
      FamilyKind::BumpyWheel => "bw",
      FamilyKind::GeneralizedWheel => "gw",
      FamilyKind::Convex => "convex",
      FamilyKind::Random => "random",
      FamilyKind::RandomWheel => "random_wheel",
      FamilyKind::TwoConvexLayers => "two_convex_layers",
    }
  }
}

impl fmt::Display for FamilyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for FamilyKind {
  type Err = FamilyError;

  fn from_str(s: &str) -> Result<FamilyKind, FamilyError> {
    let kind = match s {
      "bumpy_wheel" => FamilyKind::BumpyWheel,
      "generalized_wheel" => FamilyKind::GeneralizedWheel,
      other => FamilyKind::ALL
        .into_iter()
        .find(|kind| kind.name() == other)
        .ok_or_else(|| FamilyError::UnknownFamily(other.to_string()))?,
    };
    Ok(kind)
  }
}

///////////////////////////////////////////////////////////////////////////////
// Family

/// A point-set family together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Family {
  /// A hub at the origin and `k` groups of `l` points on the unit circle.
  BumpyWheel { k: usize, l: usize },
  /// A hub at the origin and one group per entry of `group_sizes`.
  GeneralizedWheel { group_sizes: Vec<usize> },
  /// `n` points evenly spaced on the unit circle.
  Convex { n: usize },
  /// `n` points with integer coordinates in `[0, 10n]`.
  Random { n: usize },
  /// `n - 1` random points on the unit circle and one random point inside their hull.
  RandomWheel { n: usize },
  /// `n / 2` random points on each of two concentric circles.
  TwoConvexLayers { n: usize },
}

impl Family {
  /// Assemble a family from loose parameters, as given on the command line.
  ///
  /// Parameters the family does not use are ignored.
  pub fn from_parts(
    kind: FamilyKind,
    k: Option<usize>,
    l: Option<usize>,
    n: Option<usize>,
    group_sizes: Option<Vec<usize>>,
  ) -> Result<Family, FamilyError> {
    let name = kind.name();
    let require = |value: Option<usize>, parameter: &'static str| {
      value.ok_or(FamilyError::MissingParameter {
        family: name,
        parameter,
      })
    };
    let family = match kind {
      FamilyKind::BumpyWheel => Family::BumpyWheel {
        k: require(k, "k")?,
        l: require(l, "l")?,
      },
      FamilyKind::GeneralizedWheel => Family::GeneralizedWheel {
        group_sizes: group_sizes.ok_or(FamilyError::MissingParameter {
          family: name,
          parameter: "group_sizes",
        })?,
      },
      FamilyKind::Convex => Family::Convex {
        n: require(n, "n")?,
      },
      FamilyKind::Random => Family::Random {
        n: require(n, "n")?,
      },
      FamilyKind::RandomWheel => Family::RandomWheel {
        n: require(n, "n")?,
      },
      FamilyKind::TwoConvexLayers => Family::TwoConvexLayers {
        n: require(n, "n")?,
      },
    };
    family.validate()?;
    Ok(family)
  }

  pub fn kind(&self) -> FamilyKind {
    match self {
      Family::BumpyWheel { .. } => FamilyKind::BumpyWheel,
      Family::GeneralizedWheel { .. } => FamilyKind::GeneralizedWheel,
      Family::Convex { .. } => FamilyKind::Convex,
      Family::Random { .. } => FamilyKind::Random,
      Family::RandomWheel { .. } => FamilyKind::RandomWheel,
      Family::TwoConvexLayers { .. } => FamilyKind::TwoConvexLayers,
    }
  }

  pub fn name(&self) -> &'static str {
    self.kind().name()
  }

  /// Whether two calls to [`generate`] may return different point sets.
  pub fn is_random(&self) -> bool {
    matches!(
      self,
      Family::Random { .. } | Family::RandomWheel { .. } | Family::TwoConvexLayers { .. }
    )
  }

  /// Number of points [`generate`] produces.
  pub fn point_count(&self) -> usize {
    match self {
      Family::BumpyWheel { k, l } => 1 + k * l,
      Family::GeneralizedWheel { group_sizes } => 1 + group_sizes.iter().sum::<usize>(),
      Family::Convex { n }
      | Family::Random { n }
      | Family::RandomWheel { n }
      | Family::TwoConvexLayers { n } => *n,
    }
  }

  pub fn validate(&self) -> Result<(), FamilyError> {
    let family = self.name();
    let invalid = |parameter: &'static str, reason: String| FamilyError::InvalidParameter {
      family,
      parameter,
      reason,
    };
    let at_least = |parameter: &'static str, value: usize, min: usize| {
      if value < min {
        Err(invalid(parameter, format!("must be at least {}, got {}", min, value)))
      } else {
        Ok(())
      }
    };
    match self {
      Family::BumpyWheel { k, l } => {
        at_least("k", *k, 1)?;
        at_least("l", *l, 1)?;
        at_least("k * l", k * l, 2)
      }
      Family::GeneralizedWheel { group_sizes } => {
        if group_sizes.is_empty() {
          return Err(invalid("group_sizes", "needs at least one group".to_string()));
        }
        if group_sizes.contains(&0) {
          return Err(invalid("group_sizes", "groups must not be empty".to_string()));
        }
        at_least("group_sizes", group_sizes.iter().sum(), 2)
      }
      Family::Convex { n } | Family::Random { n } => at_least("n", *n, 3),
      Family::RandomWheel { n } => at_least("n", *n, 4),
      Family::TwoConvexLayers { n } => {
        at_least("n", *n, 4)?;
        if n % 2 != 0 {
          return Err(invalid("n", format!("must be even, got {}", n)));
        }
        Ok(())
      }
    }
  }
}

impl fmt::Display for Family {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Family::BumpyWheel { k, l } => write!(f, "bumpy wheel (k={}, l={})", k, l),
      Family::GeneralizedWheel { group_sizes } => {
        write!(f, "generalized wheel (sizes={:?})", group_sizes)
      }
      Family::Convex { n } => write!(f, "convex position (n={})", n),
      Family::Random { n } => write!(f, "random position (n={})", n),
      Family::RandomWheel { n } => write!(f, "random wheel (n={})", n),
      Family::TwoConvexLayers { n } => write!(f, "two convex layers (n={})", n),
    }
  }
}

///////////////////////////////////////////////////////////////////////////////
// Generation

/// Generate a point set from `family`.
///
/// Fixed families are checked for general position and rejected with
/// [`Error::CoLinearViolation`]. Random families draw from `rng` until a
/// sample is in general position, giving up after [`MAX_ATTEMPTS`].
pub fn generate<R: Rng + ?Sized>(family: &Family, rng: &mut R) -> Result<PointSet, Error> {
  family.validate()?;
  let point_set = match family {
    Family::BumpyWheel { k, l } => {
      let sizes = vec![*l; *k];
      let ps = PointSet::from_points(wheel(&sizes, -BUMPY_ROTATION))?;
      ps.check_general_position()?;
      ps
    }
    Family::GeneralizedWheel { group_sizes } => {
      let ps = PointSet::from_points(wheel(group_sizes, 0.0))?;
      ps.check_general_position()?;
      ps
    }
    Family::Convex { n } => {
      let ps = PointSet::new(convex_position(*n))?;
      ps.check_general_position()?;
      ps
    }
    Family::Random { n } => sample(family, || random_position(*n, &mut *rng))?,
    Family::RandomWheel { n } => sample(family, || random_wheel(*n, &mut *rng))?,
    Family::TwoConvexLayers { n } => sample(family, || two_convex_layers(*n, &mut *rng))?,
  };
  debug!(family = %family, points = point_set.len(), "generated point set");
  Ok(point_set.with_family(family.clone()))
}

// Draw until the sample is in general position.
fn sample<F>(family: &Family, mut draw: F) -> Result<PointSet, Error>
where
  F: FnMut() -> Option<Vec<Point>>,
{
  for attempt in 1..=MAX_ATTEMPTS {
    let Some(points) = draw() else {
      continue;
    };
    let ps = PointSet::from_points(points)?;
    match ps.check_general_position() {
      Ok(()) => return Ok(ps),
      Err(err) => debug!(attempt, "rejected sample: {}", err),
    }
  }
  Err(
    FamilyError::GeneralPositionUnreachable {
      family: family.name(),
      attempts: MAX_ATTEMPTS,
    }
    .into(),
  )
}

fn on_circle(radius: f64, angle: f64) -> [f64; 2] {
  [radius * angle.cos(), radius * angle.sin()]
}

// Hub at the origin; group `i` starts at angle 2πi/k + rotation.
fn wheel(group_sizes: &[usize], rotation: f64) -> Vec<Point> {
  let k = group_sizes.len() as f64;
  let mut points = vec![Point::new(0, [0.0, 0.0])];
  for (group, &size) in group_sizes.iter().enumerate() {
    for j in 0..size {
      let angle = TAU / k * group as f64 + j as f64 * GROUP_STEP + rotation;
      points.push(Point::new(points.len(), on_circle(1.0, angle)).with_group(group));
    }
  }
  points
}

fn convex_position(n: usize) -> Vec<[f64; 2]> {
  (0..n)
    .map(|i| on_circle(1.0, TAU / n as f64 * i as f64))
    .collect()
}

fn random_position<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Option<Vec<Point>> {
  let size = 10 * n as u64;
  let points = (0..n)
    .map(|id| {
      let x = rng.gen_range(0..=size) as f64;
      let y = rng.gen_range(0..=size) as f64;
      Point::new(id, [x, y])
    })
    .collect();
  Some(points)
}

fn random_wheel<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Option<Vec<Point>> {
  let mut points: Vec<Point> = (0..n - 1)
    .map(|id| Point::new(id, on_circle(1.0, rng.gen_range(0.0..TAU))).with_group(0))
    .collect();
  let mut hull: Vec<[f64; 2]> = points.iter().map(|pt| pt.array).collect();
  hull.sort_by_key(|p| OrderedFloat(p[1].atan2(p[0])));
  let inner = random_point_inside(&hull, rng)?;
  points.push(Point::new(n - 1, inner));
  Some(points)
}

// Rejection sampling from the bounding box of a convex polygon given in
// counter-clockwise order. Points on the boundary are rejected.
fn random_point_inside<R: Rng + ?Sized>(polygon: &[[f64; 2]], rng: &mut R) -> Option<[f64; 2]> {
  let bound = |axis: usize| {
    let coords = polygon.iter().map(|p| OrderedFloat(p[axis]));
    Some((coords.clone().min()?.0, coords.max()?.0))
  };
  let (min_x, max_x) = bound(0)?;
  let (min_y, max_y) = bound(1)?;
  if min_x >= max_x || min_y >= max_y {
    return None;
  }
  (0..MAX_ATTEMPTS)
    .map(|_| [rng.gen_range(min_x..max_x), rng.gen_range(min_y..max_y)])
    .find(|p| is_strictly_inside(polygon, p))
}

fn is_strictly_inside(polygon: &[[f64; 2]], p: &[f64; 2]) -> bool {
  let n = polygon.len();
  n >= 3
    && (0..n).all(|i| Orientation::new(&polygon[i], &polygon[(i + 1) % n], p).is_ccw())
}

fn two_convex_layers<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Option<Vec<Point>> {
  let half = n / 2;
  let points = (0..n)
    .map(|id| {
      let (layer, radius) = if id < half {
        (0, 1.0)
      } else {
        (1, OUTER_LAYER_RADIUS)
      };
      Point::new(id, on_circle(radius, rng.gen_range(0.0..TAU))).with_group(layer)
    })
    .collect();
  Some(points)
}

///////////////////////////////////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
  use super::*;

  use claims::{assert_matches, assert_ok};
  use rand::rngs::SmallRng;
  use rand::SeedableRng;
  use test_strategy::proptest;

  fn rng() -> SmallRng {
    SmallRng::seed_from_u64(0xdead_beef)
  }

  #[test]
  fn bumpy_wheel_layout() {
    let ps = generate(&Family::BumpyWheel { k: 3, l: 5 }, &mut rng()).unwrap();
    assert_eq!(ps.len(), 16);
    assert_eq!(ps.points()[0].array, [0.0, 0.0]);
    assert_eq!(ps.points()[0].group, None);
    for pt in &ps.points()[1..] {
      let r = pt.x_coord().hypot(pt.y_coord());
      assert!((r - 1.0).abs() < 1e-12);
    }
    let groups: Vec<Option<usize>> = ps.points().iter().map(|pt| pt.group).collect();
    assert_eq!(groups[1..6], [Some(0); 5]);
    assert_eq!(groups[11..16], [Some(2); 5]);
    assert_eq!(ps.family(), Some(&Family::BumpyWheel { k: 3, l: 5 }));
  }

  #[test]
  fn even_wheels_are_degenerate() {
    // Opposite groups put two points on a line through the hub.
    assert_matches!(
      generate(&Family::BumpyWheel { k: 2, l: 2 }, &mut rng()),
      Err(Error::CoLinearViolation(0, _, _))
    );
  }

  #[test]
  fn generalized_wheel_sizes() {
    let family = Family::GeneralizedWheel {
      group_sizes: vec![2, 3, 1],
    };
    let ps = generate(&family, &mut rng()).unwrap();
    assert_eq!(ps.len(), family.point_count());
    assert_eq!(ps.points()[6].group, Some(2));
  }

  #[test]
  fn missing_parameters_are_named() {
    assert_eq!(
      Family::from_parts(FamilyKind::BumpyWheel, Some(3), None, None, None),
      Err(FamilyError::MissingParameter {
        family: "bw",
        parameter: "l"
      })
    );
    assert_matches!(
      Family::from_parts(FamilyKind::GeneralizedWheel, None, None, Some(5), None),
      Err(FamilyError::MissingParameter {
        parameter: "group_sizes",
        ..
      })
    );
    assert_eq!(
      Family::from_parts(FamilyKind::Convex, None, None, Some(6), None),
      Ok(Family::Convex { n: 6 })
    );
  }

  #[test]
  fn invalid_parameters() {
    assert_matches!(
      Family::Convex { n: 2 }.validate(),
      Err(FamilyError::InvalidParameter { parameter: "n", .. })
    );
    assert_matches!(
      Family::TwoConvexLayers { n: 7 }.validate(),
      Err(FamilyError::InvalidParameter { parameter: "n", .. })
    );
    assert_matches!(
      Family::GeneralizedWheel {
        group_sizes: vec![3, 0]
      }
      .validate(),
      Err(FamilyError::InvalidParameter { .. })
    );
    assert_matches!(
      generate(&Family::RandomWheel { n: 3 }, &mut rng()),
      Err(Error::Family(FamilyError::InvalidParameter { .. }))
    );
  }

  #[test]
  fn kind_names_round_trip() {
    for kind in FamilyKind::ALL {
      assert_eq!(kind.name().parse::<FamilyKind>(), Ok(kind));
    }
    assert_eq!("bumpy_wheel".parse::<FamilyKind>(), Ok(FamilyKind::BumpyWheel));
    assert_matches!("hexagon".parse::<FamilyKind>(), Err(FamilyError::UnknownFamily(_)));
  }

  #[test]
  fn serde_tagging() {
    let family: Family = serde_json::from_str(r#"{"kind":"bumpy_wheel","k":3,"l":5}"#).unwrap();
    assert_eq!(family, Family::BumpyWheel { k: 3, l: 5 });
  }

  #[test]
  fn random_families_are_reproducible() {
    let family = Family::Random { n: 8 };
    let a = generate(&family, &mut SmallRng::seed_from_u64(7)).unwrap();
    let b = generate(&family, &mut SmallRng::seed_from_u64(7)).unwrap();
    assert_eq!(a, b);
  }

  #[proptest]
  fn random_families_are_in_general_position(
    seed: u64,
    #[strategy(4usize..12)] n: usize,
  ) {
    let mut rng = SmallRng::seed_from_u64(seed);
    for family in [
      Family::Random { n },
      Family::RandomWheel { n },
      Family::TwoConvexLayers { n: n & !1 },
    ] {
      let ps = generate(&family, &mut rng).unwrap();
      assert_eq!(ps.len(), family.point_count());
      assert_ok!(ps.check_general_position());
    }
  }

  #[proptest]
  fn random_wheel_center_is_inside(seed: u64, #[strategy(4usize..10)] n: usize) {
    let ps = generate(&Family::RandomWheel { n }, &mut SmallRng::seed_from_u64(seed)).unwrap();
    let mut hull: Vec<[f64; 2]> = ps.points()[..n - 1].iter().map(|pt| pt.array).collect();
    hull.sort_by_key(|p| OrderedFloat(p[1].atan2(p[0])));
    assert!(is_strictly_inside(&hull, &ps.points()[n - 1].array));
  }
}
