use clap::Parser;
use plane_partition::config::{ConfigBuilder, Preset};
use plane_partition::families::FamilyKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  version,
  about = "Decide whether the complete geometric graph on a point set can be partitioned into plane spanning trees (or plane subgraphs)."
)]
pub struct Cli {
  /// TOML configuration file. Flags given on the command line override its values.
  #[arg(short, long, value_name = "PATH")]
  pub config: Option<PathBuf>,

  // --- Point set ---
  /// Point set family: bw, gw, convex, random, random_wheel or two_convex_layers.
  #[arg(long, value_name = "FAMILY")]
  pub pset: Option<FamilyKind>,

  /// Number of groups of a bumpy wheel.
  #[arg(long)]
  pub k: Option<usize>,

  /// Points per group of a bumpy wheel.
  #[arg(long)]
  pub l: Option<usize>,

  /// Number of points for convex, random, random_wheel and two_convex_layers.
  #[arg(long)]
  pub n: Option<usize>,

  /// Group sizes of a generalized wheel.
  #[arg(long, num_args = 1.., value_delimiter = ',', value_name = "SIZES")]
  pub group_sizes: Option<Vec<usize>>,

  // --- Model ---
  /// Number of color classes (default: half the number of points).
  #[arg(long)]
  pub n_colors: Option<usize>,

  /// Require exactly n - 1 edges per color class.
  #[arg(long, value_name = "BOOL")]
  pub n1_constraints: Option<bool>,

  /// Cycle lengths (3 and/or 4) that may not be monochromatic.
  #[arg(long, num_args = 0.., value_delimiter = ',', value_name = "LENGTHS")]
  pub forbidden_cycles: Option<Vec<u8>>,

  /// Require every point to have an incident edge of every color.
  #[arg(long, value_name = "BOOL")]
  pub cover_all_vertices: Option<bool>,

  /// Allow up to K crossings per edge within a color class (0 means plane).
  #[arg(long, value_name = "K")]
  pub k_planar: Option<usize>,

  /// Order the color classes by their first edge to prune relabeled solutions.
  #[arg(long, value_name = "BOOL")]
  pub break_symmetry: Option<bool>,

  /// Solver time limit in seconds.
  #[arg(long, value_name = "SECONDS")]
  pub timelimit: Option<f64>,

  // --- Presets ---
  /// Search for a partition into plane spanning trees. Explicit model flags still apply.
  #[arg(long, conflicts_with = "partition_subgraphs")]
  pub partition_pst: bool,

  /// Search for a partition into plane subgraphs. Explicit model flags still apply.
  #[arg(long)]
  pub partition_subgraphs: bool,

  /// Verify that a found partition consists of plane spanning trees.
  #[arg(long, value_name = "BOOL")]
  pub check_pst: Option<bool>,

  // --- Experiments and output ---
  /// Number of runs, each on a freshly generated point set.
  #[arg(long)]
  pub trials: Option<usize>,

  /// Seed for the random families.
  #[arg(long)]
  pub seed: Option<u64>,

  /// Write one JSON record per run into this directory.
  #[arg(long, value_name = "DIR")]
  pub save: Option<PathBuf>,

  /// Append one line per run to the overview logs in this directory.
  #[arg(long, value_name = "DIR")]
  pub overview: Option<PathBuf>,

  // --- Logging ---
  /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all log output
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Write logs to a file in addition to the console output
  #[arg(long, value_name = "PATH")]
  pub log_file: Option<PathBuf>,
}

impl Cli {
  /// The settings given as flags, to be merged over the configuration file.
  pub fn config_builder(&self) -> ConfigBuilder {
    let mut builder = ConfigBuilder::new();
    if let Some(kind) = self.pset {
      builder = builder.pset(kind);
    }
    if let Some(k) = self.k {
      builder = builder.k(k);
    }
    if let Some(l) = self.l {
      builder = builder.l(l);
    }
    if let Some(n) = self.n {
      builder = builder.n(n);
    }
    if let Some(sizes) = &self.group_sizes {
      builder = builder.group_sizes(sizes.clone());
    }
    if let Some(n_colors) = self.n_colors {
      builder = builder.n_colors(n_colors);
    }
    if let Some(on) = self.n1_constraints {
      builder = builder.n1_constraints(on);
    }
    if let Some(lengths) = &self.forbidden_cycles {
      builder = builder.forbidden_cycles(lengths.clone());
    }
    if let Some(on) = self.cover_all_vertices {
      builder = builder.cover_all_vertices(on);
    }
    if let Some(k) = self.k_planar {
      builder = builder.k_planar(k);
    }
    if let Some(on) = self.break_symmetry {
      builder = builder.break_symmetry(on);
    }
    if let Some(secs) = self.timelimit {
      builder = builder.timelimit(secs);
    }
    if self.partition_pst {
      builder = builder.preset(Preset::SpanningTrees);
    }
    if self.partition_subgraphs {
      builder = builder.preset(Preset::Subgraphs);
    }
    if let Some(on) = self.check_pst {
      builder = builder.check_pst(on);
    }
    if let Some(trials) = self.trials {
      builder = builder.trials(trials);
    }
    if let Some(seed) = self.seed {
      builder = builder.seed(seed);
    }
    builder
  }
}
