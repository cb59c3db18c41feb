//! Markdown export: the UTF-8 bytes of the text, unchanged.

use super::*;

/// Identity exporter for Markdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
  fn format(&self) -> Format { Format::Markdown }

  fn export(&self, content: &str) -> Result<Vec<u8>> { Ok(content.as_bytes().to_vec()) }
}
