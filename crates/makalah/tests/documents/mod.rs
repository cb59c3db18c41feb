use std::io::{Cursor, Read};

use makalah::sanitize::sanitize;
use zip::ZipArchive;

use super::*;

const RAW: &str = "# **Dampak Perubahan Iklim**\n\n## Pendahuluan\nSuhu naik \u{2014} \
                   \u{201C}signifikan\u{201D} menurut *IPCC*.";

fn document_xml(bytes: &[u8]) -> String {
  let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
  let mut xml = String::new();
  archive.by_name("word/document.xml").unwrap().read_to_string(&mut xml).unwrap();
  xml
}

#[test]
fn test_docx_carries_sanitized_text() -> TestResult {
  let artifact = export(&ExportRequest::new(RAW, Format::Docx).with_title("Dampak Perubahan Iklim"))?;
  let xml = document_xml(&artifact.bytes);

  assert!(xml.contains(">Dampak Perubahan Iklim</w:t>"));
  assert!(xml.contains(">Pendahuluan</w:t>"));
  assert!(xml.contains("Suhu naik - &quot;signifikan&quot; menurut IPCC."));
  assert!(!xml.contains('*'));
  assert!(!xml.contains('#'));
  Ok(())
}

#[test]
fn test_sanitized_text_has_no_markup() {
  let clean = sanitize(RAW);
  assert!(!clean.contains('*'));
  assert!(!clean.contains('#'));
  assert!(clean.is_ascii());
}

#[test]
fn test_markdown_round_trip_through_disk() -> TestResult {
  let dir = tempdir()?;
  let artifact = export(&ExportRequest::new(RAW, Format::Markdown).with_title("Dampak Perubahan Iklim"))?;

  let path = artifact.save(dir.path())?;
  assert_eq!(path, dir.path().join("dampak_perubahan_iklim.md"));
  assert_eq!(std::fs::read_to_string(path)?, RAW);
  Ok(())
}

#[test]
fn test_saved_bytes_match_streamed_bytes() -> TestResult {
  let dir = tempdir()?;
  for format in Format::ALL {
    let artifact = export(&ExportRequest::new(RAW, format))?;
    let path = artifact.save(dir.path())?;
    assert_eq!(std::fs::read(path)?, artifact.bytes, "{format}");
  }
  Ok(())
}

#[test]
fn test_unsupported_formats_are_rejected() {
  for input in ["docx ", "xyz", "DOCX", "markdown"] {
    match input.parse::<Format>() {
      Err(MakalahError::UnsupportedFormat(rejected)) => assert_eq!(rejected, input),
      other => panic!("{input:?} should be unsupported, got {other:?}"),
    }
  }
}

#[test]
fn test_mime_types() {
  assert_eq!(
    Format::Docx.mime_type(),
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
  );
  assert_eq!(Format::Pdf.mime_type(), "application/pdf");
  assert_eq!(Format::Markdown.mime_type(), "text/markdown");
}
