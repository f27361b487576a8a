//! Edge partitions of complete geometric graphs.
//!
//! Given a finite point set in the plane, decide whether the edges of its complete
//! straight-line graph can be split into a fixed number of color classes such that
//! every class is a plane spanning tree (or, more weakly, a plane subgraph).
//!
//! The decision problem is encoded as a 0/1 integer program:
//!
//! 1. [`data::PointSet`] holds the points and the $\binom{n}{2}$ edges.
//! 2. [`algorithms::segment_crossings`] finds every pair of properly crossing edges.
//! 3. [`algorithms::enumerate_cycles`] lists the short cycles that may not be monochromatic.
//! 4. [`model::ConstraintModel`] turns all of the above into variables and linear constraints.
//! 5. [`solver::FeasibilitySolver`] hands the model to an external solver.
//! 6. [`algorithms::verify_assignment`] re-checks a returned coloring by direct graph analysis.
//!
//! Only necessary conditions for spanning trees are encoded, so an infeasible model
//! proves that no partition exists, while a feasible one still has to be verified.
//!
//! ```rust
//! # use plane_partition::data::PointSet;
//! # use plane_partition::algorithms::segment_crossings;
//! let square = PointSet::new(vec![[0., 0.], [1., 0.], [1., 1.], [0., 1.]])?;
//! // Only the two diagonals cross.
//! assert_eq!(segment_crossings(&square).len(), 1);
//! # Ok::<(), plane_partition::Error>(())
//! ```
#![deny(clippy::cast_lossless)]
#![doc(test(no_crate_inject))]

pub mod algorithms;
pub mod config;
pub mod data;
pub mod families;
mod intersection;
pub mod model;
mod orientation;
pub mod pipeline;
pub mod report;
pub mod solver;

pub use intersection::{Intersects, ProperCrossing};
pub use orientation::Orientation;

pub use config::ConfigError;
pub use families::FamilyError;
pub use solver::SolveError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("insufficient points: need at least {needed}, found {found}")]
  InsufficientPoints { needed: usize, found: usize },
  #[error("point at position {position} has id {id}")]
  MisnumberedPoint { position: usize, id: usize },
  #[error("point {0} has a non-finite coordinate")]
  NonFiniteCoordinate(usize),
  /// Three points are (numerically) colinear, violating general position.
  #[error("points {0}, {1} and {2} are colinear")]
  CoLinearViolation(usize, usize, usize),
  #[error("color {color} is out of range for {n_colors} colors")]
  ColorOutOfRange { color: usize, n_colors: usize },
  #[error("assignment covers {found} edges but the point set has {expected}")]
  AssignmentLength { expected: usize, found: usize },
  /// A solution vector gives an edge no color or several colors.
  #[error("edge {0} does not have exactly one color")]
  AmbiguousColor(usize),
  #[error(transparent)]
  Family(#[from] FamilyError),
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error(transparent)]
  Solve(#[from] SolveError),
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
  #[error("serialization error: {0}")]
  Json(#[from] serde_json::Error),
}
