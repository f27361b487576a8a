//! Solver adapters.
//!
//! A [`FeasibilitySolver`] takes a [`ConstraintModel`] and reports one of three
//! outcomes: a satisfying assignment, a proof that none exists, or that the
//! time limit ran out first. Only genuine execution failures are errors.
use good_lp::constraint::{eq, geq, leq};
use good_lp::solvers::coin_cbc::coin_cbc;
use good_lp::{
  variable, Constraint, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
  Variable,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::ColorAssignment;
use crate::model::{ConstraintModel, LinearConstraint, Sense};

#[derive(Debug, Error)]
pub enum SolveError {
  #[error("solver backend failed: {0}")]
  Backend(String),
  /// The backend reported success but its solution violates the model.
  #[error("solver returned an invalid solution: {0}")]
  InvalidSolution(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
  /// A satisfying assignment was found.
  Optimal,
  /// No assignment satisfies the model.
  Infeasible,
  /// The time limit elapsed first; satisfiability is unknown.
  TimeLimitReached,
}

impl fmt::Display for SolverStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      SolverStatus::Optimal => "optimal",
      SolverStatus::Infeasible => "infeasible",
      SolverStatus::TimeLimitReached => "time limit reached",
    })
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverResult {
  pub status: SolverStatus,
  /// Present iff `status` is [`SolverStatus::Optimal`].
  pub assignment: Option<ColorAssignment>,
  pub elapsed: Duration,
}

impl SolverResult {
  pub fn optimal(assignment: ColorAssignment, elapsed: Duration) -> SolverResult {
    SolverResult {
      status: SolverStatus::Optimal,
      assignment: Some(assignment),
      elapsed,
    }
  }

  pub fn infeasible(elapsed: Duration) -> SolverResult {
    SolverResult {
      status: SolverStatus::Infeasible,
      assignment: None,
      elapsed,
    }
  }

  pub fn time_limit_reached(elapsed: Duration) -> SolverResult {
    SolverResult {
      status: SolverStatus::TimeLimitReached,
      assignment: None,
      elapsed,
    }
  }
}

/// Anything that can decide a [`ConstraintModel`].
///
/// The model is consumed; callers that need its statistics should take them
/// before solving.
pub trait FeasibilitySolver {
  fn name(&self) -> &'static str;

  fn solve(
    &self,
    model: ConstraintModel,
    time_limit: Option<Duration>,
  ) -> Result<SolverResult, SolveError>;
}

///////////////////////////////////////////////////////////////////////////////
// Cbc

/// Branch and cut with COIN-OR CBC through `good_lp`.
///
/// The time limit is handed to CBC, which stops by itself once it is reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cbc;

impl FeasibilitySolver for Cbc {
  fn name(&self) -> &'static str {
    "cbc"
  }

  fn solve(
    &self,
    model: ConstraintModel,
    time_limit: Option<Duration>,
  ) -> Result<SolverResult, SolveError> {
    let start = Instant::now();
    let mut vars = ProblemVariables::new();
    let xs: Vec<Variable> = (0..model.n_variables())
      .map(|_| vars.add(variable().binary()))
      .collect();

    // Pure feasibility: any constant objective will do.
    let objective: Expression = 0.into();
    let mut problem = vars.minimise(objective).using(coin_cbc);
    problem.set_parameter("log", "0");
    if let Some(limit) = time_limit {
      problem.set_parameter("seconds", &limit.as_secs_f64().to_string());
    }
    for constraint in model.constraints() {
      problem.add_constraint(to_good_lp(constraint, &xs));
    }
    debug!(
      variables = xs.len(),
      constraints = model.constraints().len(),
      "invoking cbc"
    );

    let outcome = problem.solve();
    let elapsed = start.elapsed();
    let limit_reached = time_limit.map_or(false, |limit| elapsed >= limit);
    let solution = match outcome {
      Ok(solution) => solution,
      Err(ResolutionError::Infeasible) => return Ok(SolverResult::infeasible(elapsed)),
      Err(err) if limit_reached => {
        warn!(?elapsed, "solver time limit reached: {}", err);
        return Ok(SolverResult::time_limit_reached(elapsed));
      }
      Err(err) => return Err(SolveError::Backend(err.to_string())),
    };

    let values: Vec<bool> = xs.iter().map(|&x| solution.value(x) > 0.5).collect();
    if let Some(violated) = model.first_violation(&values) {
      // CBC hands back its last iterate when stopped before finding a solution.
      if limit_reached {
        warn!(?elapsed, "solver time limit reached without a solution");
        return Ok(SolverResult::time_limit_reached(elapsed));
      }
      return Err(SolveError::InvalidSolution(format!(
        "violates a {} constraint",
        violated.family
      )));
    }
    let assignment = model
      .decode(&values)
      .map_err(|err| SolveError::InvalidSolution(err.to_string()))?;
    Ok(SolverResult::optimal(assignment, elapsed))
  }
}

fn to_good_lp(constraint: &LinearConstraint, xs: &[Variable]) -> Constraint {
  let lhs: Expression = constraint
    .terms
    .iter()
    .map(|&(var, coefficient)| coefficient as f64 * xs[var.usize()])
    .sum();
  let rhs = constraint.rhs as f64;
  match constraint.sense {
    Sense::LessEq => leq(lhs, rhs),
    Sense::Eq => eq(lhs, rhs),
    Sense::GreaterEq => geq(lhs, rhs),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::config::ModelConfig;
  use crate::data::{CycleLength, PointSet};
  use crate::families::{generate, Family};
  use claims::assert_ok;
  use rand::rngs::SmallRng;
  use rand::SeedableRng;

  fn square() -> PointSet {
    PointSet::new(vec![[0., 0.], [1., 0.], [1., 1.], [0., 1.]]).unwrap()
  }

  #[test]
  fn two_plane_subgraphs_of_a_square() {
    let ps = square();
    let config = ModelConfig {
      cardinality: false,
      ..ModelConfig::new(2)
    };
    let model = ConstraintModel::from_point_set(&ps, &config);
    let check = model.clone();
    let result = assert_ok!(Cbc.solve(model, None));
    assert_eq!(result.status, SolverStatus::Optimal);
    let assignment = result.assignment.unwrap();
    assert!(check.is_satisfied_by(&check.encode(&assignment)));
  }

  #[test]
  fn one_color_cannot_hold_both_diagonals() {
    let config = ModelConfig {
      cardinality: false,
      ..ModelConfig::new(1)
    };
    let model = ConstraintModel::from_point_set(&square(), &config);
    let result = assert_ok!(Cbc.solve(model, Some(Duration::from_secs(60))));
    assert_eq!(result.status, SolverStatus::Infeasible);
    assert_eq!(result.assignment, None);
  }

  #[test]
  fn time_limit_is_not_infeasibility() {
    let ps = generate(&Family::BumpyWheel { k: 3, l: 5 }, &mut SmallRng::seed_from_u64(0)).unwrap();
    let config = ModelConfig::for_points(ps.len())
      .with_forbidden_cycles([CycleLength::Triangle, CycleLength::Quadrilateral]);
    let model = ConstraintModel::from_point_set(&ps, &config);
    let result = assert_ok!(Cbc.solve(model, Some(Duration::from_millis(1))));
    assert_eq!(result.status, SolverStatus::TimeLimitReached);
    assert_eq!(result.assignment, None);
  }

  #[test]
  fn solver_returns_at_the_time_limit() {
    let ps = generate(&Family::BumpyWheel { k: 3, l: 5 }, &mut SmallRng::seed_from_u64(0)).unwrap();
    let config = ModelConfig {
      break_symmetry: false,
      ..ModelConfig::for_points(ps.len()).with_forbidden_cycles([CycleLength::Triangle])
    };
    let model = ConstraintModel::from_point_set(&ps, &config);
    let started = Instant::now();
    let result = assert_ok!(Cbc.solve(model, Some(Duration::from_secs(1))));
    assert!(started.elapsed() < Duration::from_secs(30));
    assert_ne!(result.status, SolverStatus::Optimal);
  }
}
