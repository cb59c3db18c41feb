//! Command line interface and HTTP server for the makalah paper generator.
//!
//! This crate provides the `makalah` binary built on the [`makalah`] library. It supports:
//! - Serving the generator over HTTP with a small landing page
//! - Generating a paper interactively and saving it in several formats
//! - Exporting an existing text file to DOCX, PDF or Markdown
//!
//! # Usage
//!
//! ```bash
//! # Start the HTTP API on localhost:8000
//! makalah serve
//!
//! # Generate a paper, choosing formats from a menu
//! makalah generate
//!
//! # Generate without prompts
//! makalah generate --topic "Energi Terbarukan" --format pdf --output papers/
//!
//! # Export text you already have
//! makalah export --input draft.md --format docx
//! ```
//!
//! Commands that talk to the model need `GEMINI_API_KEY`, either exported or in a `.env` file.
//! Log verbosity is raised with `-v`, or set directly through `RUST_LOG`.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use makalah::{
  config::Config,
  error::MakalahError,
  export::{export as export_artifact, ExportRequest, Format},
  format::infer_title,
  generate::{failure_message, GeneratedPaper, Generator},
  template::Template,
};
use tracing::{debug, info, trace};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod commands;
pub mod error;
pub mod interaction;
pub mod server;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Generate academic papers with Gemini and export them")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
///
/// Logs go to stderr. With a `log_dir` they are also written to a daily rolling file there, and
/// the returned guard must be held until exit so buffered lines are flushed.
fn setup_logging(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  let stderr = fmt::layer()
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true);

  let (file, guard) = match log_dir {
    Some(dir) => {
      let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "makalah.log"));
      (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
    },
    None => (None, None),
  };

  tracing_subscriber::registry().with(filter).with(stderr).with(file).init();
  guard
}

/// Entry point for the makalah CLI application
///
/// Parses arguments, reads `.env` so that it can set `RUST_LOG`, sets up logging, loads
/// [`Config`] once and hands it to the requested command. Errors are printed in a single line
/// and end the process with status 1.
#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  let dotenv = dotenvy::dotenv();

  let log_dir = match &cli.command {
    Commands::Serve(args) => args.log_dir.clone(),
    _ => None,
  };
  let _guard = setup_logging(cli.verbose, log_dir.as_deref());
  match dotenv {
    Err(error) if !error.not_found() => tracing::warn!("Ignoring unreadable .env file: {error}"),
    _ => {},
  }

  if let Err(error) = run(cli).await {
    eprintln!("{} {error}", style(ERROR_PREFIX).red());
    std::process::exit(1);
  }
}

/// Loads configuration and dispatches to the selected command.
async fn run(cli: Cli) -> Result<()> {
  let config = Config::load()?;
  trace!("Configuration: {config:?}");

  let terminal = Terminal::new(cli.accept_defaults);
  match cli.command {
    Commands::Serve(args) => serve(config, args).await,
    Commands::Generate(args) => generate(&terminal, config, args).await,
    Commands::Export(args) => export(&terminal, args),
  }
}
