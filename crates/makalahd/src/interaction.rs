//! Terminal interaction.
//!
//! Commands talk to the user only through [`UserInteraction`] so that they can be driven by a
//! script in tests and by flags in non-interactive runs.

use dialoguer::{Input, Select};

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for work in progress
pub static WORKING_PREFIX: &str = "» ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for user prompts
pub static PROMPT_PREFIX: &str = "❯ ";

/// Something a command wants to show the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// Full text of a generated paper
  Paper(&'a GeneratedPaper),
  /// A file was written
  Saved(&'a Path),
  /// An operation finished
  Success(&'a str),
  /// An operation failed, already phrased for the user
  Error(&'a str),
  /// Work that is about to start
  Working(&'a str),
}

/// How commands ask and tell the user things.
pub trait UserInteraction {
  /// Asks for free text, offering `default`.
  fn prompt(&self, message: &str, default: &str) -> Result<String>;
  /// Asks the user to pick one of `items` and returns its index.
  fn select(&self, message: &str, items: &[&str], default: usize) -> Result<usize>;
  /// Shows `content`.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// [`UserInteraction`] on the attached terminal.
#[derive(Debug, Clone, Copy)]
pub struct Terminal {
  /// Answer every prompt with its default instead of asking
  accept_defaults: bool,
}

impl Terminal {
  /// Creates a terminal interaction. With `accept_defaults` no prompt is ever shown.
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults } }
}

impl UserInteraction for Terminal {
  fn prompt(&self, message: &str, default: &str) -> Result<String> {
    if self.accept_defaults {
      return Ok(default.to_owned());
    }
    Ok(
      Input::<String>::new()
        .with_prompt(format!("{}{message}", style(PROMPT_PREFIX).cyan()))
        .default(default.to_owned())
        .interact_text()?,
    )
  }

  fn select(&self, message: &str, items: &[&str], default: usize) -> Result<usize> {
    if self.accept_defaults {
      return Ok(default);
    }
    Ok(
      Select::new()
        .with_prompt(format!("{}{message}", style(PROMPT_PREFIX).cyan()))
        .items(items)
        .default(default)
        .interact()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Paper(paper) => {
        println!(
          "\n{} {}",
          style("Hasil Makalah").bold().underlined(),
          style(format!("({}, {})", paper.model, paper.generated_at.format("%Y-%m-%d %H:%M")))
            .dim()
        );
        println!("{}\n", paper.content.trim_end());
      },
      ResponseContent::Saved(path) =>
        println!("{} Disimpan ke {}", style(SUCCESS_PREFIX).green(), style(path.display()).yellow()),
      ResponseContent::Success(message) => println!("{} {message}", style(SUCCESS_PREFIX).green()),
      ResponseContent::Error(message) => eprintln!("{} {message}", style(ERROR_PREFIX).red()),
      ResponseContent::Working(message) => println!("{} {message}", style(WORKING_PREFIX).cyan()),
    }
    Ok(())
  }
}
