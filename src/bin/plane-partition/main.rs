mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, error, info};

use plane_partition::config::ConfigBuilder;
use plane_partition::pipeline::run_experiment;
use plane_partition::solver::Cbc;

use crate::cli::Cli;

fn main() {
  if let Err(err) = run() {
    error!("{:#}", err);
    eprintln!("Error: {:#}", err);
    std::process::exit(1);
  }
}

fn run() -> Result<()> {
  let cli = Cli::parse();
  logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;
  debug!("parsed arguments: {:?}", cli);

  let file = match &cli.config {
    Some(path) => ConfigBuilder::from_file(path)
      .with_context(|| format!("failed to load configuration from '{}'", path.display()))?,
    None => ConfigBuilder::new(),
  };
  let config = file
    .merge(cli.config_builder())
    .build()
    .context("invalid configuration")?;
  info!("plane-partition v{} starting", env!("CARGO_PKG_VERSION"));
  debug!("resolved configuration: {:?}", config);

  let mut rng = match config.seed {
    Some(seed) => SmallRng::seed_from_u64(seed),
    None => SmallRng::from_entropy(),
  };
  let summary = run_experiment(&config, &Cbc, &mut rng, |record| {
    println!(
      "[{}] {} points, {} after {:.2}s: {}",
      record.stamp(),
      record.n_points,
      record.status,
      record.elapsed_secs,
      record.verdict
    );
    if let Some(report) = record.verification.as_ref().filter(|r| !r.passed) {
      println!("  warning: {}", report.note);
    }
    if let Some(dir) = &cli.save {
      record.write_json(dir)?;
    }
    if let Some(dir) = &cli.overview {
      record.append_overview(dir)?;
    }
    Ok(())
  })?;
  if config.trials > 1 {
    println!("{}", summary);
  }
  Ok(())
}
