//! Run configuration.
//!
//! Command-line flags and configuration files are collected in a
//! [`ConfigBuilder`] whose fields are all optional. [`ConfigBuilder::build`]
//! fills in defaults, applies the preset and validates the result, producing
//! an immutable [`Config`] before any geometry is computed.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::convert::TryFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::data::CycleLength;
use crate::families::{Family, FamilyError, FamilyKind};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("missing required parameter: {0}")]
  MissingParameter(&'static str),
  #[error("invalid value for '{parameter}': {reason}")]
  InvalidValue {
    parameter: &'static str,
    reason: String,
  },
  #[error(transparent)]
  Family(#[from] FamilyError),
  #[error("failed to read configuration file '{path}': {source}", path = path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to parse configuration: {0}")]
  Toml(#[from] toml::de::Error),
}

///////////////////////////////////////////////////////////////////////////////
// ModelConfig

/// Which constraint families the model builder emits.
///
/// Color uniqueness is always present. The non-crossing family is present
/// unless `k_planar` is set, in which case the k-planar bound replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
  pub n_colors: usize,
  /// Every color class has exactly `n - 1` edges.
  pub cardinality: bool,
  pub forbidden_cycles: BTreeSet<CycleLength>,
  /// Every point has an incident edge of every color.
  pub cover_all_vertices: bool,
  /// At most `k` crossings per edge within a color class. `None` means plane.
  pub k_planar: Option<usize>,
  /// Number the color classes by their first edge, so that relabelings of one
  /// partition are not explored separately.
  pub break_symmetry: bool,
}

impl ModelConfig {
  pub fn new(n_colors: usize) -> ModelConfig {
    ModelConfig {
      n_colors,
      cardinality: true,
      forbidden_cycles: BTreeSet::new(),
      cover_all_vertices: false,
      k_planar: None,
      break_symmetry: true,
    }
  }

  /// The default model for `n_points` points: `n_points / 2` colors.
  pub fn for_points(n_points: usize) -> ModelConfig {
    ModelConfig::new(n_points / 2)
  }

  #[must_use]
  pub fn with_forbidden_cycles<I: IntoIterator<Item = CycleLength>>(self, lengths: I) -> ModelConfig {
    ModelConfig {
      forbidden_cycles: lengths.into_iter().collect(),
      ..self
    }
  }

  pub fn is_plane(&self) -> bool {
    self.k_planar.is_none()
  }
}

///////////////////////////////////////////////////////////////////////////////
// Presets

/// A bundle of settings for one of the two partition goals.
///
/// A preset only supplies defaults: every setting given explicitly, on the
/// command line or in a file, takes precedence over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
  /// Partition into plane spanning trees: cardinality, vertex coverage and
  /// verification on; 3- and 4-cycles forbidden.
  SpanningTrees,
  /// Partition into plane subgraphs: only uniqueness and non-crossing.
  Subgraphs,
}

// The toggles a preset decides. `Toggles::default()` is what applies without one.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Toggles {
  cardinality: bool,
  forbidden_cycles: BTreeSet<CycleLength>,
  cover_all_vertices: bool,
  verify: bool,
}

impl Default for Toggles {
  fn default() -> Self {
    Toggles {
      cardinality: true,
      forbidden_cycles: BTreeSet::new(),
      cover_all_vertices: false,
      verify: false,
    }
  }
}

impl Preset {
  fn toggles(self) -> Toggles {
    match self {
      Preset::SpanningTrees => Toggles {
        cardinality: true,
        forbidden_cycles: [CycleLength::Triangle, CycleLength::Quadrilateral]
          .into_iter()
          .collect(),
        cover_all_vertices: true,
        verify: true,
      },
      Preset::Subgraphs => Toggles {
        cardinality: false,
        forbidden_cycles: BTreeSet::new(),
        cover_all_vertices: false,
        verify: false,
      },
    }
  }
}

///////////////////////////////////////////////////////////////////////////////
// Config

/// A fully resolved, validated run configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
  pub point_set: Family,
  pub model: ModelConfig,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub preset: Option<Preset>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub time_limit_secs: Option<f64>,
  /// Re-check feasible assignments for plane spanning trees.
  pub verify: bool,
  /// Number of independent runs; each draws a fresh point set.
  pub trials: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub seed: Option<u64>,
}

impl Config {
  pub fn time_limit(&self) -> Option<Duration> {
    self.time_limit_secs.map(Duration::from_secs_f64)
  }

  /// `"pst"` when searching for spanning trees, `"subgraphs"` otherwise.
  pub fn goal(&self) -> &'static str {
    if self.verify {
      "pst"
    } else {
      "subgraphs"
    }
  }
}

///////////////////////////////////////////////////////////////////////////////
// ConfigBuilder

/// Unresolved settings. Field names follow the command-line flags, so a
/// configuration file reads like a list of flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigBuilder {
  pset: Option<FamilyKind>,
  k: Option<usize>,
  l: Option<usize>,
  n: Option<usize>,
  group_sizes: Option<Vec<usize>>,
  n_colors: Option<usize>,
  n1_constraints: Option<bool>,
  forbidden_cycles: Option<Vec<u8>>,
  cover_all_vertices: Option<bool>,
  k_planar: Option<usize>,
  break_symmetry: Option<bool>,
  timelimit: Option<f64>,
  preset: Option<Preset>,
  check_pst: Option<bool>,
  trials: Option<usize>,
  seed: Option<u64>,
}

impl ConfigBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(s)?)
  }

  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_toml_str(&content)
  }

  /// Values set in `other` take precedence.
  #[must_use]
  pub fn merge(self, other: ConfigBuilder) -> Self {
    Self {
      pset: other.pset.or(self.pset),
      k: other.k.or(self.k),
      l: other.l.or(self.l),
      n: other.n.or(self.n),
      group_sizes: other.group_sizes.or(self.group_sizes),
      n_colors: other.n_colors.or(self.n_colors),
      n1_constraints: other.n1_constraints.or(self.n1_constraints),
      forbidden_cycles: other.forbidden_cycles.or(self.forbidden_cycles),
      cover_all_vertices: other.cover_all_vertices.or(self.cover_all_vertices),
      k_planar: other.k_planar.or(self.k_planar),
      break_symmetry: other.break_symmetry.or(self.break_symmetry),
      timelimit: other.timelimit.or(self.timelimit),
      preset: other.preset.or(self.preset),
      check_pst: other.check_pst.or(self.check_pst),
      trials: other.trials.or(self.trials),
      seed: other.seed.or(self.seed),
    }
  }

  pub fn pset(mut self, kind: FamilyKind) -> Self {
    self.pset = Some(kind);
    self
  }
  pub fn k(mut self, k: usize) -> Self {
    self.k = Some(k);
    self
  }
  pub fn l(mut self, l: usize) -> Self {
    self.l = Some(l);
    self
  }
  pub fn n(mut self, n: usize) -> Self {
    self.n = Some(n);
    self
  }
  pub fn group_sizes(mut self, sizes: Vec<usize>) -> Self {
    self.group_sizes = Some(sizes);
    self
  }
  pub fn n_colors(mut self, n_colors: usize) -> Self {
    self.n_colors = Some(n_colors);
    self
  }
  pub fn n1_constraints(mut self, on: bool) -> Self {
    self.n1_constraints = Some(on);
    self
  }
  pub fn forbidden_cycles(mut self, lengths: Vec<u8>) -> Self {
    self.forbidden_cycles = Some(lengths);
    self
  }
  pub fn cover_all_vertices(mut self, on: bool) -> Self {
    self.cover_all_vertices = Some(on);
    self
  }
  pub fn k_planar(mut self, k: usize) -> Self {
    self.k_planar = Some(k);
    self
  }

  pub fn break_symmetry(mut self, on: bool) -> Self {
    self.break_symmetry = Some(on);
    self
  }

  pub fn timelimit(mut self, secs: f64) -> Self {
    self.timelimit = Some(secs);
    self
  }
  pub fn preset(mut self, preset: Preset) -> Self {
    self.preset = Some(preset);
    self
  }
  pub fn check_pst(mut self, on: bool) -> Self {
    self.check_pst = Some(on);
    self
  }
  pub fn trials(mut self, trials: usize) -> Self {
    self.trials = Some(trials);
    self
  }
  pub fn seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  pub fn build(self) -> Result<Config, ConfigError> {
    let kind = self.pset.ok_or(ConfigError::MissingParameter("pset"))?;
    let point_set = Family::from_parts(kind, self.k, self.l, self.n, self.group_sizes)?;

    let base = self.preset.map_or_else(Toggles::default, Preset::toggles);
    let forbidden_cycles = match self.forbidden_cycles {
      Some(lengths) => lengths
        .into_iter()
        .map(CycleLength::try_from)
        .collect::<Result<BTreeSet<CycleLength>, String>>()
        .map_err(|reason| ConfigError::InvalidValue {
          parameter: "forbidden_cycles",
          reason,
        })?,
      None => base.forbidden_cycles,
    };

    let n_colors = self.n_colors.unwrap_or(point_set.point_count() / 2);
    if n_colors == 0 {
      return Err(ConfigError::InvalidValue {
        parameter: "n_colors",
        reason: "at least one color is needed".to_string(),
      });
    }

    let model = ModelConfig {
      n_colors,
      cardinality: self.n1_constraints.unwrap_or(base.cardinality),
      forbidden_cycles,
      cover_all_vertices: self.cover_all_vertices.unwrap_or(base.cover_all_vertices),
      k_planar: self.k_planar.filter(|&k| k > 0),
      break_symmetry: self.break_symmetry.unwrap_or(true),
    };
    let verify = self.check_pst.unwrap_or(base.verify);

    if let Some(secs) = self.timelimit {
      if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::InvalidValue {
          parameter: "timelimit",
          reason: format!("must be a positive number of seconds, got {}", secs),
        });
      }
    }

    let trials = self.trials.unwrap_or(1);
    if trials == 0 {
      return Err(ConfigError::InvalidValue {
        parameter: "trials",
        reason: "at least one trial is needed".to_string(),
      });
    }

    Ok(Config {
      point_set,
      model,
      preset: self.preset,
      time_limit_secs: self.timelimit,
      verify,
      trials,
      seed: self.seed,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use claims::{assert_matches, assert_ok};

  fn bumpy() -> ConfigBuilder {
    ConfigBuilder::new().pset(FamilyKind::BumpyWheel).k(3).l(5)
  }

  #[test]
  fn defaults() {
    let config = bumpy().build().unwrap();
    assert_eq!(config.point_set, Family::BumpyWheel { k: 3, l: 5 });
    assert_eq!(config.model, ModelConfig::new(8));
    assert!(config.model.is_plane());
    assert!(!config.verify);
    assert_eq!(config.goal(), "subgraphs");
    assert_eq!(config.trials, 1);
    assert_eq!(config.time_limit(), None);
  }

  #[test]
  fn missing_family() {
    assert_matches!(
      ConfigBuilder::new().n(5).build(),
      Err(ConfigError::MissingParameter("pset"))
    );
    assert_matches!(
      ConfigBuilder::new().pset(FamilyKind::Convex).build(),
      Err(ConfigError::Family(FamilyError::MissingParameter {
        parameter: "n",
        ..
      }))
    );
  }

  #[test]
  fn spanning_tree_preset() {
    let config = bumpy().preset(Preset::SpanningTrees).build().unwrap();
    assert!(config.model.cardinality);
    assert!(config.model.cover_all_vertices);
    assert!(config.verify);
    assert_eq!(config.goal(), "pst");
    let expected: BTreeSet<CycleLength> = [CycleLength::Triangle, CycleLength::Quadrilateral]
      .into_iter()
      .collect();
    assert_eq!(config.model.forbidden_cycles, expected);
  }

  #[test]
  fn explicit_flags_override_presets() {
    let config = bumpy()
      .forbidden_cycles(vec![3])
      .cover_all_vertices(false)
      .check_pst(false)
      .preset(Preset::SpanningTrees)
      .build()
      .unwrap();
    let expected: BTreeSet<CycleLength> = [CycleLength::Triangle].into_iter().collect();
    assert_eq!(config.model.forbidden_cycles, expected);
    assert!(config.model.cardinality);
    assert!(!config.model.cover_all_vertices);
    assert!(!config.verify);

    let config = bumpy()
      .n1_constraints(true)
      .preset(Preset::Subgraphs)
      .build()
      .unwrap();
    assert!(config.model.cardinality);
    assert!(config.model.forbidden_cycles.is_empty());
    assert!(!config.model.cover_all_vertices);
  }

  #[test]
  fn subgraph_preset_clears_tree_constraints() {
    let config = bumpy().preset(Preset::Subgraphs).build().unwrap();
    assert!(!config.model.cardinality);
    assert!(config.model.forbidden_cycles.is_empty());
    assert!(!config.model.cover_all_vertices);
    assert!(!config.verify);
    assert_eq!(config.goal(), "subgraphs");
  }

  #[test]
  fn symmetry_breaking_can_be_disabled() {
    assert!(bumpy().build().unwrap().model.break_symmetry);
    assert!(!bumpy().break_symmetry(false).build().unwrap().model.break_symmetry);
  }

  #[test]
  fn zero_k_planar_means_plane() {
    assert_eq!(bumpy().k_planar(0).build().unwrap().model.k_planar, None);
    assert_eq!(bumpy().k_planar(2).build().unwrap().model.k_planar, Some(2));
  }

  #[test]
  fn invalid_values() {
    assert_matches!(
      bumpy().forbidden_cycles(vec![3, 5]).build(),
      Err(ConfigError::InvalidValue {
        parameter: "forbidden_cycles",
        ..
      })
    );
    assert_matches!(
      bumpy().n_colors(0).build(),
      Err(ConfigError::InvalidValue {
        parameter: "n_colors",
        ..
      })
    );
    assert_matches!(
      bumpy().timelimit(-1.0).build(),
      Err(ConfigError::InvalidValue {
        parameter: "timelimit",
        ..
      })
    );
    assert_matches!(
      bumpy().trials(0).build(),
      Err(ConfigError::InvalidValue {
        parameter: "trials",
        ..
      })
    );
  }

  #[test]
  fn toml_file_with_flag_overrides() {
    let file = ConfigBuilder::from_toml_str(
      r#"
        pset = "gw"
        group_sizes = [4, 5, 6]
        forbidden_cycles = [3]
        timelimit = 30.0
        preset = "spanning_trees"
      "#,
    )
    .unwrap();
    let config = file.merge(ConfigBuilder::new().timelimit(5.0)).build().unwrap();
    assert_eq!(
      config.point_set,
      Family::GeneralizedWheel {
        group_sizes: vec![4, 5, 6]
      }
    );
    assert_eq!(config.model.n_colors, 8);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(5)));
    assert_eq!(config.preset, Some(Preset::SpanningTrees));
  }

  #[test]
  fn toml_rejects_unknown_keys() {
    assert_matches!(
      ConfigBuilder::from_toml_str("colours = 3"),
      Err(ConfigError::Toml(_))
    );
    assert_ok!(ConfigBuilder::from_toml_str(""));
  }
}
