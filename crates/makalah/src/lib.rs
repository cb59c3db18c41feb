//! Academic paper ("makalah") draft generation and document export.
//!
//! `makalah` turns a free-text topic into a structured academic paper written by a hosted
//! language model, then exports the result as DOCX, PDF or Markdown:
//!
//! - Prompt construction from fixed academic templates
//! - A single round trip to the Gemini `generateContent` API
//! - Text sanitization for binary document formats
//! - Filesystem-safe filename slugs
//! - DOCX, PDF and Markdown writers sharing one [`export::Exporter`] trait
//!
//! # Getting Started
//!
//! ```no_run
//! use makalah::{
//!   config::Config,
//!   export::{export, ExportRequest, Format},
//!   generate::Generator,
//!   prelude::*,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), MakalahError> {
//!   // Reads `.env`, the optional config file and `GEMINI_API_KEY`
//!   let config = Config::load()?.require_api_key()?;
//!   let generator = Generator::from_config(&config)?;
//!
//!   let paper = generator.generate("Dampak Perubahan Iklim").await?;
//!   let artifact = export(&ExportRequest::new(&paper.content, Format::Pdf).with_title(paper.title()))?;
//!   artifact.save(".")?;
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`config`]: Runtime configuration from file and environment
//! - [`generate`]: The generation pipeline and its data types
//! - [`llm`]: Gemini client and the [`llm::LanguageModel`] seam
//! - [`template`]: Prompt templates
//! - [`sanitize`]: Markdown and Unicode cleanup before binary export
//! - [`format`]: Filename slugs
//! - [`export`]: Document writers and artifacts
//! - [`prelude`]: Common traits and types for ergonomic imports

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  borrow::Cow,
  fmt::Display,
  path::{Path, PathBuf},
  str::FromStr,
  sync::Arc,
  time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
use unicode_normalization::UnicodeNormalization;
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod generate;
pub mod llm;
pub mod sanitize;
pub mod template;

use crate::{config::*, error::*, format::*, llm::*, sanitize::*, template::*};

/// Common traits and types for ergonomic imports.
///
/// ```
/// use makalah::prelude::*;
///
/// fn check(format: &str) -> Result<(), MakalahError> {
///   let _format: makalah::export::Format = format.parse()?;
///   Ok(())
/// }
/// assert!(check("docx").is_ok());
/// assert!(check("docx ").is_err());
/// ```
pub mod prelude {
  pub use crate::{error::MakalahError, export::Exporter, llm::LanguageModel};
}
