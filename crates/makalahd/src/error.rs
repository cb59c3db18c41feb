//! Error types for the makalah binary.

use thiserror::Error;

use super::*;

/// Error type alias used for the `makalahd` crate.
pub type Result<T, E = MakalahdError> = core::result::Result<T, E>;

/// Errors from running a command.
#[derive(Error, Debug)]
pub enum MakalahdError {
  /// Generation, export or configuration failed in the library.
  #[error(transparent)]
  Makalah(#[from] MakalahError),

  /// Reading input, binding a socket or serving failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A terminal prompt could not be shown or read.
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),
}
