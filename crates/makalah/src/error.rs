//! Error types for the makalah library.
//!
//! Every fallible operation in the crate returns [`MakalahError`]. The variants fall into four
//! groups:
//! - Configuration problems detected at startup
//! - Generation failures from the model provider
//! - Export failures (unknown format, archive or PDF encoding problems)
//! - Plain I/O
//!
//! # Examples
//!
//! ```
//! use makalah::{error::MakalahError, export::Format};
//!
//! match "xyz".parse::<Format>() {
//!   Err(MakalahError::UnsupportedFormat(format)) => assert_eq!(format, "xyz"),
//!   _ => unreachable!(),
//! }
//! ```

use thiserror::Error;

/// Error type alias used for the [`makalah`](crate) crate.
pub type Result<T, E = MakalahError> = core::result::Result<T, E>;

/// Errors that can occur while generating or exporting a paper.
#[derive(Error, Debug)]
pub enum MakalahError {
  /// Required configuration is missing or malformed.
  ///
  /// The most common cause is an unset `GEMINI_API_KEY`. Surfaces that talk to the model refuse
  /// to start when this is returned.
  #[error("Configuration error: {0}")]
  Config(String),

  /// The topic was empty or contained only whitespace.
  #[error("Topic must not be empty")]
  EmptyTopic,

  /// A network request to the model provider failed.
  ///
  /// This covers connection failures, TLS errors and bodies that could not be decoded.
  #[error(transparent)]
  Network(reqwest::Error),

  /// The model provider did not answer within the configured timeout.
  #[error("Request to the model timed out")]
  Timeout,

  /// The model provider answered with an error.
  ///
  /// The string holds the status and the provider's own message, e.g. rate limit or
  /// authentication failures, or the reason a prompt was blocked.
  #[error("API error: {0}")]
  Api(String),

  /// The model answered successfully but without any usable text.
  #[error("The model returned an empty response")]
  EmptyResponse,

  /// The requested export format is not one of `docx`, `pdf` or `md`.
  ///
  /// The string holds the rejected input verbatim.
  #[error("Unsupported export format \"{0}\", expected one of: docx, pdf, md")]
  UnsupportedFormat(String),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// Writing the DOCX archive failed.
  #[error(transparent)]
  Zip(#[from] zip::result::ZipError),

  /// Building the PDF document failed.
  #[error(transparent)]
  Lopdf(#[from] lopdf::Error),

  /// A JSON body could not be encoded or decoded.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The configuration file is not valid TOML for [`Config`](crate::config::Config).
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),
}

impl From<reqwest::Error> for MakalahError {
  fn from(error: reqwest::Error) -> Self {
    if error.is_timeout() {
      Self::Timeout
    } else {
      Self::Network(error)
    }
  }
}

impl MakalahError {
  /// Whether this error came from the model round trip rather than from the caller's input or
  /// local configuration.
  pub fn is_generation_failure(&self) -> bool {
    matches!(self, Self::Network(_) | Self::Timeout | Self::Api(_) | Self::EmptyResponse)
  }
}
