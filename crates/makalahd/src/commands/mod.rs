use super::*;

pub mod export;
pub mod generate;
pub mod serve;

pub use export::{export, ExportArgs};
pub use generate::{generate, GenerateArgs};
pub use serve::{serve, ServeArgs};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Run the HTTP API and landing page
  Serve(ServeArgs),

  /// Generate a paper about a topic and save it in the chosen formats
  Generate(GenerateArgs),

  /// Export an existing text file without calling the model
  Export(ExportArgs),
}
