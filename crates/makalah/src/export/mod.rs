//! Document export.
//!
//! Each supported [`Format`] has an [`Exporter`] that turns text into the bytes of a document.
//! [`export`] is the single entry point used by both surfaces. It sanitizes the text when the
//! format needs it, runs the exporter and packages the result as an [`Artifact`] ready to be
//! streamed or saved.
//!
//! ```
//! use makalah::export::{export, ExportRequest, Format};
//!
//! # fn main() -> Result<(), makalah::error::MakalahError> {
//! let artifact = export(&ExportRequest::new("# Judul\nIsi", Format::Markdown).with_title("Judul!"))?;
//! assert_eq!(artifact.filename, "judul.md");
//! assert_eq!(artifact.mime_type, "text/markdown");
//! assert_eq!(artifact.bytes, b"# Judul\nIsi");
//! # Ok(())
//! # }
//! ```

use super::*;

pub mod docx;
pub mod markdown;
pub mod pdf;

pub use self::{docx::DocxExporter, markdown::MarkdownExporter, pdf::PdfExporter};

/// Turns text into document bytes.
pub trait Exporter {
  /// Format produced by this exporter.
  fn format(&self) -> Format;

  /// Encodes `content`. The output is a pure function of the input and the exporter's
  /// configuration.
  fn export(&self, content: &str) -> Result<Vec<u8>>;
}

/// Supported document formats.
///
/// Parsing accepts exactly the wire names `docx`, `pdf` and `md`. Case, padding and aliases are
/// all rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
  /// Office Open XML word processing document
  #[serde(rename = "docx")]
  Docx,
  /// Portable Document Format
  #[serde(rename = "pdf")]
  Pdf,
  /// Markdown text, byte for byte
  #[serde(rename = "md")]
  Markdown,
}

impl Format {
  /// Every format in menu order.
  pub const ALL: [Format; 3] = [Format::Docx, Format::Pdf, Format::Markdown];

  /// File extension and wire name.
  pub fn extension(&self) -> &'static str {
    match self {
      Self::Docx => "docx",
      Self::Pdf => "pdf",
      Self::Markdown => "md",
    }
  }

  /// MIME type sent with the artifact.
  pub fn mime_type(&self) -> &'static str {
    match self {
      Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
      Self::Pdf => "application/pdf",
      Self::Markdown => "text/markdown",
    }
  }

  /// Human readable menu label.
  pub fn label(&self) -> &'static str {
    match self {
      Self::Docx => "DOCX",
      Self::Pdf => "PDF",
      Self::Markdown => "Markdown (.md)",
    }
  }

  /// Whether text must go through [`sanitize`] before encoding.
  ///
  /// Markdown tolerates the model's own formatting and is exported raw.
  pub fn requires_sanitizing(&self) -> bool { !matches!(self, Self::Markdown) }

  /// Exporter for this format with default settings and an optional document title.
  pub fn exporter(&self, title: Option<&str>) -> Box<dyn Exporter> {
    match self {
      Self::Docx => Box::new(DocxExporter::new().with_title(title)),
      Self::Pdf => Box::new(PdfExporter::new().with_title(title)),
      Self::Markdown => Box::new(MarkdownExporter),
    }
  }
}

impl Display for Format {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.extension())
  }
}

impl FromStr for Format {
  type Err = MakalahError;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "docx" => Ok(Self::Docx),
      "pdf" => Ok(Self::Pdf),
      "md" => Ok(Self::Markdown),
      other => Err(MakalahError::UnsupportedFormat(other.to_owned())),
    }
  }
}

/// What to export and how to name it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
  /// Raw paper text
  pub content: String,
  /// Target format
  pub format:  Format,
  /// Title used for the filename and document metadata
  pub title:   Option<String>,
}

impl ExportRequest {
  /// Creates a request without a title.
  pub fn new(content: impl Into<String>, format: Format) -> Self {
    Self { content: content.into(), format, title: None }
  }

  /// Sets the title.
  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = Some(title.into());
    self
  }
}

/// An exported document ready for transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
  /// Document bytes
  pub bytes:     Vec<u8>,
  /// MIME type of `bytes`
  pub mime_type: &'static str,
  /// Suggested filename, `<slug>.<extension>`
  pub filename:  String,
}

impl Artifact {
  /// Value for a `Content-Disposition` header offering the artifact as a download.
  pub fn content_disposition(&self) -> String {
    format!("attachment; filename=\"{}\"", self.filename)
  }

  /// Writes the artifact into `dir` under [`Artifact::filename`], creating `dir` if needed.
  ///
  /// The bytes on disk are exactly [`Artifact::bytes`].
  pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&self.filename);
    std::fs::write(&path, &self.bytes)?;
    debug!("Saved {} bytes to {}", self.bytes.len(), path.display());
    Ok(path)
  }
}

/// Exports a request into an [`Artifact`].
///
/// DOCX and PDF content is sanitized first. Markdown content is passed through untouched.
pub fn export(request: &ExportRequest) -> Result<Artifact> {
  let format = request.format;
  let title = request.title.as_deref().map(sanitize).filter(|title| !title.is_empty());

  let content = if format.requires_sanitizing() {
    Cow::Owned(sanitize(&request.content))
  } else {
    Cow::Borrowed(request.content.as_str())
  };

  let bytes = format.exporter(title.as_deref()).export(&content)?;
  let filename = format!("{}.{}", filename_stem(request.title.as_deref()), format.extension());
  info!("Exported {filename} ({} bytes)", bytes.len());

  Ok(Artifact { bytes, mime_type: format.mime_type(), filename })
}
