//! Single runs and repeated experiments.
//!
//! A run goes `ModelBuilt -> Solving -> {Optimal, Infeasible, TimedOut}` and,
//! when verification is requested, `Optimal -> Verifying -> {Confirmed,
//! Discrepant}`. The outcome is summarized as a [`Verdict`].
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

use crate::algorithms::{enumerate_cycles, segment_crossings, verify_assignment};
use crate::config::Config;
use crate::data::PointSet;
use crate::families::generate;
use crate::model::ConstraintModel;
use crate::report::RunRecord;
use crate::solver::{FeasibilitySolver, SolverStatus};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
  /// The necessary conditions cannot be met.
  Infeasible,
  /// The solver ran out of time.
  Undetermined,
  /// A feasible assignment was found and not verified.
  Feasible,
  /// A feasible assignment was found and every class is a plane spanning tree.
  Confirmed,
  /// A feasible assignment was found but some class is not a plane spanning tree.
  Discrepant,
}

impl Verdict {
  pub fn message(self) -> &'static str {
    match self {
      Verdict::Infeasible => "no partition satisfying the encoded necessary conditions exists",
      Verdict::Undetermined => "undetermined: the solver time limit was reached",
      Verdict::Feasible => "found a partition satisfying the encoded conditions",
      Verdict::Confirmed => "found a partition into plane spanning trees",
      Verdict::Discrepant => {
        "found a partition satisfying the encoded conditions, but not into plane spanning trees"
      }
    }
  }
}

impl fmt::Display for Verdict {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.message())
  }
}

/// Run the full pipeline on one point set.
///
/// Infeasibility, timeouts and verification failures are results, not errors;
/// only solver execution failures are returned as `Err`.
pub fn run_once(
  config: &Config,
  point_set: &PointSet,
  solver: &dyn FeasibilitySolver,
) -> Result<RunRecord, Error> {
  let started = Instant::now();
  info!(
    points = point_set.len(),
    colors = config.model.n_colors,
    "preparing model for {}",
    config.point_set
  );

  let crossings = segment_crossings(point_set);
  let cycles = enumerate_cycles(point_set.len(), &config.model.forbidden_cycles);
  debug!(
    crossings = crossings.len(),
    uncrossed_edges = crossings.uncrossed().count(),
    cycles = cycles.len(),
    "preprocessing done"
  );
  let model = ConstraintModel::build(point_set, &crossings, &cycles, &config.model);
  let stats = model.stats();
  info!(
    variables = stats.n_variables,
    constraints = stats.n_constraints,
    "model built in {:.2?}",
    started.elapsed()
  );
  for (family, count) in &stats.per_family {
    debug!(family = %family, count, "constraint family");
  }

  info!(solver = solver.name(), time_limit = ?config.time_limit(), "solving");
  let result = solver.solve(model, config.time_limit())?;
  info!(status = %result.status, "solver finished in {:.2?}", result.elapsed);

  let (verdict, verification) = match (&result.status, &result.assignment) {
    (SolverStatus::Infeasible, _) => (Verdict::Infeasible, None),
    (SolverStatus::TimeLimitReached, _) => (Verdict::Undetermined, None),
    (SolverStatus::Optimal, Some(assignment)) if config.verify => {
      let report = verify_assignment(point_set, assignment);
      let verdict = if report.passed {
        Verdict::Confirmed
      } else {
        Verdict::Discrepant
      };
      (verdict, Some(report))
    }
    (SolverStatus::Optimal, _) => (Verdict::Feasible, None),
  };
  info!("{}", verdict);

  Ok(RunRecord::new(
    config,
    point_set,
    result,
    verdict,
    stats,
    verification,
  ))
}

///////////////////////////////////////////////////////////////////////////////
// Experiments

/// Outcome counts over the trials of an experiment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentSummary {
  pub trials: usize,
  pub optimal: usize,
  pub infeasible: usize,
  pub timed_out: usize,
  pub confirmed: usize,
  pub discrepant: usize,
}

impl ExperimentSummary {
  pub fn record(&mut self, record: &RunRecord) {
    self.trials += 1;
    match record.status {
      SolverStatus::Optimal => self.optimal += 1,
      SolverStatus::Infeasible => self.infeasible += 1,
      SolverStatus::TimeLimitReached => self.timed_out += 1,
    }
    match record.verdict {
      Verdict::Confirmed => self.confirmed += 1,
      Verdict::Discrepant => self.discrepant += 1,
      _ => {}
    }
  }
}

impl fmt::Display for ExperimentSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} trials: {} feasible ({} confirmed, {} discrepant), {} infeasible, {} timed out",
      self.trials, self.optimal, self.confirmed, self.discrepant, self.infeasible, self.timed_out
    )
  }
}

/// Run `config.trials` independent trials, each on a freshly generated point
/// set, handing every record to `on_record` as soon as it is available.
///
/// Fixed families produce the same point set in every trial.
pub fn run_experiment<R, F>(
  config: &Config,
  solver: &dyn FeasibilitySolver,
  rng: &mut R,
  mut on_record: F,
) -> Result<ExperimentSummary, Error>
where
  R: Rng + ?Sized,
  F: FnMut(&RunRecord) -> Result<(), Error>,
{
  if config.trials > 1 && !config.point_set.is_random() {
    warn!(
      trials = config.trials,
      "{} is not random; every trial uses the same point set", config.point_set
    );
  }
  let mut summary = ExperimentSummary::default();
  for trial in 0..config.trials {
    let span = info_span!("trial", trial);
    let _enter = span.enter();
    let point_set = generate(&config.point_set, &mut *rng)?;
    let record = run_once(config, &point_set, solver)?.with_trial(trial);
    summary.record(&record);
    on_record(&record)?;
  }
  info!("{}", summary);
  Ok(summary)
}
