//! Run records and their persistence.
//!
//! Each run is summarized as a [`RunRecord`]. Records can be written as one
//! JSON document per run, and appended as one JSON line per run to an overview
//! log named after the family, the point count and the goal. Runs that prove a
//! point set infeasible are additionally appended to `important.jsonl`.
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::algorithms::VerificationReport;
use crate::config::Config;
use crate::data::{ColorAssignment, PointSet};
use crate::model::ModelStats;
use crate::pipeline::Verdict;
use crate::solver::{SolverResult, SolverStatus};
use crate::Error;

const STAMP_FORMAT: &str = "%d_%m_%Y-%H_%M_%S";
pub const IMPORTANT_FILE: &str = "important.jsonl";

///////////////////////////////////////////////////////////////////////////////
// PlotData

/// What an external visualizer needs to draw a run: the points and one edge
/// list per color class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotData {
  pub coordinates: Vec<[f64; 2]>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub groups: Vec<Option<usize>>,
  /// `classes[c]` lists the `[min, max]` point ids of the edges of color `c`.
  pub classes: Vec<Vec<[usize; 2]>>,
}

impl PlotData {
  pub fn new(point_set: &PointSet, assignment: Option<&ColorAssignment>) -> PlotData {
    let groups: Vec<Option<usize>> = point_set.points().iter().map(|pt| pt.group).collect();
    let classes = assignment
      .map(|assignment| {
        (0..assignment.n_colors())
          .map(|c| {
            assignment
              .class(c)
              .map(|e| {
                let edge = point_set.edge(e);
                [edge.min.usize(), edge.max.usize()]
              })
              .collect()
          })
          .collect()
      })
      .unwrap_or_default();
    PlotData {
      coordinates: point_set.coordinates(),
      groups: if groups.iter().all(Option::is_none) {
        Vec::new()
      } else {
        groups
      },
      classes,
    }
  }
}

///////////////////////////////////////////////////////////////////////////////
// RunRecord

#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
  pub timestamp: DateTime<Local>,
  /// Position within an experiment, 0 for single runs.
  pub trial: usize,
  pub config: Config,
  pub n_points: usize,
  pub status: SolverStatus,
  pub verdict: Verdict,
  pub elapsed_secs: f64,
  pub stats: ModelStats,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assignment: Option<ColorAssignment>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub verification: Option<VerificationReport>,
  pub plot: PlotData,
}

// One line of an overview log.
#[derive(Serialize)]
struct OverviewEntry<'a> {
  timestamp: String,
  trial: usize,
  n: usize,
  point_set: &'a crate::families::Family,
  #[serde(skip_serializing_if = "Option::is_none")]
  coordinates: Option<&'a [[f64; 2]]>,
  status: SolverStatus,
  verdict: Verdict,
  elapsed_secs: f64,
  is_pst_partition: bool,
}

#[derive(Serialize)]
struct ImportantEntry<'a> {
  timestamp: String,
  point_set: &'a crate::families::Family,
  coordinates: &'a [[f64; 2]],
  elapsed_secs: f64,
}

impl RunRecord {
  pub fn new(
    config: &Config,
    point_set: &PointSet,
    result: SolverResult,
    verdict: Verdict,
    stats: ModelStats,
    verification: Option<VerificationReport>,
  ) -> RunRecord {
    RunRecord {
      timestamp: Local::now(),
      trial: 0,
      config: config.clone(),
      n_points: point_set.len(),
      status: result.status,
      verdict,
      elapsed_secs: result.elapsed.as_secs_f64(),
      stats,
      plot: PlotData::new(point_set, result.assignment.as_ref()),
      assignment: result.assignment,
      verification,
    }
  }

  #[must_use]
  pub fn with_trial(self, trial: usize) -> RunRecord {
    RunRecord { trial, ..self }
  }

  pub fn coordinates(&self) -> &[[f64; 2]] {
    &self.plot.coordinates
  }

  /// Did verification confirm a partition into plane spanning trees?
  pub fn is_pst_partition(&self) -> bool {
    self.verification.as_ref().map_or(false, |v| v.passed)
  }

  pub fn stamp(&self) -> String {
    self.timestamp.format(STAMP_FORMAT).to_string()
  }

  /// `{family}_{n}_{pst|subgraphs}.jsonl`
  pub fn overview_file_name(&self) -> String {
    format!(
      "{}_{}_{}.jsonl",
      self.config.point_set.name(),
      self.n_points,
      self.config.goal()
    )
  }

  /// Write the record as pretty JSON to `dir/{stamp}_{trial}_data.json`,
  /// creating `dir` if needed.
  pub fn write_json(&self, dir: &Path) -> Result<PathBuf, Error> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}_{}_data.json", self.stamp(), self.trial));
    let file = fs::File::create(&path)?;
    serde_json::to_writer_pretty(file, self)?;
    info!(path = %path.display(), "saved run record");
    Ok(path)
  }

  /// Append one line to the overview log in `dir`, and to `important.jsonl`
  /// if the point set was proven infeasible. Returns the overview log path.
  pub fn append_overview(&self, dir: &Path) -> Result<PathBuf, Error> {
    fs::create_dir_all(dir)?;
    let point_set = &self.config.point_set;
    let entry = OverviewEntry {
      timestamp: self.stamp(),
      trial: self.trial,
      n: self.n_points,
      point_set,
      coordinates: point_set.is_random().then(|| self.coordinates()),
      status: self.status,
      verdict: self.verdict,
      elapsed_secs: self.elapsed_secs,
      is_pst_partition: self.is_pst_partition(),
    };
    let path = dir.join(self.overview_file_name());
    append_line(&path, &entry)?;

    if self.status == SolverStatus::Infeasible {
      let important = ImportantEntry {
        timestamp: self.stamp(),
        point_set,
        coordinates: self.coordinates(),
        elapsed_secs: self.elapsed_secs,
      };
      append_line(&dir.join(IMPORTANT_FILE), &important)?;
    }
    info!(path = %path.display(), "appended overview entry");
    Ok(path)
  }
}

fn append_line<T: Serialize>(path: &Path, value: &T) -> Result<(), Error> {
  let mut line = serde_json::to_string(value)?;
  line.push('\n');
  let mut file = OpenOptions::new().create(true).append(true).open(path)?;
  file.write_all(line.as_bytes())?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::algorithms::verify_assignment;
  use crate::config::{ConfigBuilder, Preset};
  use crate::families::{generate, FamilyKind};
  use crate::model::ConstraintModel;
  use rand::rngs::SmallRng;
  use rand::SeedableRng;
  use serde_json::Value;
  use std::time::Duration;

  fn record(status: SolverStatus) -> RunRecord {
    let config = ConfigBuilder::new()
      .pset(FamilyKind::Random)
      .n(4)
      .preset(Preset::SpanningTrees)
      .build()
      .unwrap();
    let ps = generate(&config.point_set, &mut SmallRng::seed_from_u64(3)).unwrap();
    let stats = ConstraintModel::from_point_set(&ps, &config.model).stats();
    let elapsed = Duration::from_millis(250);
    let (result, verdict, verification) = match status {
      SolverStatus::Optimal => {
        // Class 0 is the triangle 0-1-2.
        let assignment = ColorAssignment::new(vec![0, 0, 1, 0, 1, 1], 2).unwrap();
        let report = verify_assignment(&ps, &assignment);
        let verdict = if report.passed {
          Verdict::Confirmed
        } else {
          Verdict::Discrepant
        };
        (
          SolverResult::optimal(assignment, elapsed),
          verdict,
          Some(report),
        )
      }
      SolverStatus::Infeasible => (SolverResult::infeasible(elapsed), Verdict::Infeasible, None),
      SolverStatus::TimeLimitReached => (
        SolverResult::time_limit_reached(elapsed),
        Verdict::Undetermined,
        None,
      ),
    };
    RunRecord::new(&config, &ps, result, verdict, stats, verification)
  }

  fn read_lines(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
      .unwrap()
      .lines()
      .map(|line| serde_json::from_str(line).unwrap())
      .collect()
  }

  #[test]
  fn plot_data_lists_classes() {
    let record = record(SolverStatus::Optimal);
    assert_eq!(record.plot.coordinates.len(), 4);
    assert_eq!(record.plot.classes.len(), 2);
    assert_eq!(record.plot.classes[0], vec![[0, 1], [0, 2], [1, 2]]);
    assert_eq!(record.plot.classes[1], vec![[0, 3], [1, 3], [2, 3]]);
    assert!(record.plot.groups.is_empty());
  }

  #[test]
  fn json_record() {
    let dir = tempfile::tempdir().unwrap();
    let record = record(SolverStatus::Optimal).with_trial(2);
    let path = record.write_json(&dir.path().join("results")).unwrap();
    assert!(path.to_string_lossy().ends_with("_2_data.json"));
    let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["status"], "optimal");
    assert_eq!(value["verdict"], "discrepant");
    assert_eq!(value["n_points"], 4);
    assert_eq!(value["config"]["point_set"]["kind"], "random");
    assert_eq!(value["elapsed_secs"], 0.25);
    assert_eq!(value["verification"]["passed"], false);
    assert_eq!(value["verification"]["classes"][0]["acyclic"], false);
  }

  #[test]
  fn overview_and_important_logs() {
    let dir = tempfile::tempdir().unwrap();
    let feasible = record(SolverStatus::TimeLimitReached);
    let infeasible = record(SolverStatus::Infeasible);
    let path = feasible.append_overview(dir.path()).unwrap();
    assert_eq!(path, infeasible.append_overview(dir.path()).unwrap());
    assert_eq!(path.file_name().unwrap(), "random_4_pst.jsonl");

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["status"], "time_limit_reached");
    assert_eq!(lines[1]["status"], "infeasible");
    assert_eq!(lines[1]["coordinates"].as_array().unwrap().len(), 4);
    assert_eq!(lines[1]["is_pst_partition"], false);

    let important = read_lines(&dir.path().join(IMPORTANT_FILE));
    assert_eq!(important.len(), 1);
    assert_eq!(important[0]["point_set"]["n"], 4);
  }
}
