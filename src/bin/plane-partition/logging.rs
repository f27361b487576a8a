use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{
  filter::LevelFilter,
  fmt::{self},
  prelude::*,
};

pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
  if quiet {
    return LevelFilter::OFF;
  }
  match verbosity {
    0 => LevelFilter::WARN,
    1 => LevelFilter::INFO,
    2 => LevelFilter::DEBUG,
    _ => LevelFilter::TRACE,
  }
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
  let stderr_layer = fmt::layer()
    .with_writer(std::io::stderr)
    .with_target(false)
    .compact();

  let subscriber = tracing_subscriber::registry()
    .with(level_filter(verbosity, quiet))
    .with(stderr_layer);

  if let Some(path) = log_file {
    let file = File::create(path)
      .with_context(|| format!("failed to create log file '{}'", path.display()))?;
    let file_layer = fmt::layer()
      .with_writer(file)
      .with_ansi(false)
      .with_thread_ids(true)
      .with_target(true);
    subscriber.with(file_layer).init();
  } else {
    subscriber.init();
  }

  Ok(())
}
