//! DOCX export.
//!
//! Writes a minimal WordprocessingML package: one unstyled paragraph per line of text, the
//! `Normal` style, and core/app properties. All archive entries carry a fixed timestamp so the
//! same text always produces the same bytes.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::{write::SimpleFileOptions, CompressionMethod, DateTime, ZipWriter};

use super::*;

/// `[Content_Types].xml`
const CONTENT_TYPES_XML: &str = concat!(
  r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
  r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
  r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
  r#"<Default Extension="xml" ContentType="application/xml"/>"#,
  r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
  r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
  r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
  r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
  r#"</Types>"#,
);

/// `_rels/.rels`
const ROOT_RELS_XML: &str = concat!(
  r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
  r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
  r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
  r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
  r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#,
  r#"</Relationships>"#,
);

/// `word/_rels/document.xml.rels`
const DOCUMENT_RELS_XML: &str = concat!(
  r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
  r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
  r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
  r#"</Relationships>"#,
);

/// `word/styles.xml` with Calibri 11pt defaults and the `Normal` paragraph style
const STYLES_XML: &str = concat!(
  r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
  r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
  r#"<w:docDefaults><w:rPrDefault><w:rPr>"#,
  r#"<w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/>"#,
  r#"</w:rPr></w:rPrDefault>"#,
  r#"<w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault>"#,
  r#"</w:docDefaults>"#,
  r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
  r#"</w:styles>"#,
);

/// `docProps/app.xml`
const APP_XML: &str = concat!(
  r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
  r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
  r#"<Application>makalah</Application>"#,
  r#"</Properties>"#,
);

/// Opening of `word/document.xml` up to the first paragraph
const DOCUMENT_HEAD: &str = concat!(
  r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
  r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
  r#"<w:body>"#,
);

/// A4 section properties with one inch margins, closing `word/document.xml`
const DOCUMENT_TAIL: &str = concat!(
  r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/>"#,
  r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>"#,
  r#"</w:sectPr></w:body></w:document>"#,
);

/// DOCX writer.
#[derive(Debug, Clone, Default)]
pub struct DocxExporter {
  /// Written to the `dc:title` core property
  title: Option<String>,
}

impl DocxExporter {
  /// Creates an exporter without a document title.
  pub fn new() -> Self { Self::default() }

  /// Sets the document title property.
  pub fn with_title(mut self, title: Option<&str>) -> Self {
    self.title = title.map(str::to_owned);
    self
  }

  /// Builds `word/document.xml`: one `<w:p>` per line, empty lines as empty paragraphs.
  fn document_xml(content: &str) -> String {
    let mut xml = String::from(DOCUMENT_HEAD);
    for line in content.split('\n') {
      let text = xml_text(line);
      if text.is_empty() {
        xml.push_str("<w:p/>");
      } else {
        xml.push_str(r#"<w:p><w:r><w:t xml:space="preserve">"#);
        xml.push_str(&escape(text.as_str()));
        xml.push_str("</w:t></w:r></w:p>");
      }
    }
    xml.push_str(DOCUMENT_TAIL);
    xml
  }

  /// Builds `docProps/core.xml`.
  fn core_xml(&self) -> String {
    let title = self
      .title
      .as_deref()
      .map(|title| format!("<dc:title>{}</dc:title>", escape(xml_text(title).as_str())))
      .unwrap_or_default();
    format!(
      concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/">"#,
        "{}<dc:creator>makalah</dc:creator>",
        r#"</cp:coreProperties>"#,
      ),
      title
    )
  }
}

impl Exporter for DocxExporter {
  fn format(&self) -> Format { Format::Docx }

  fn export(&self, content: &str) -> Result<Vec<u8>> {
    let document = Self::document_xml(content);
    let core = self.core_xml();
    let parts: [(&str, &str); 7] = [
      ("[Content_Types].xml", CONTENT_TYPES_XML),
      ("_rels/.rels", ROOT_RELS_XML),
      ("word/document.xml", &document),
      ("word/styles.xml", STYLES_XML),
      ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
      ("docProps/core.xml", &core),
      ("docProps/app.xml", APP_XML),
    ];

    let options = SimpleFileOptions::default()
      .compression_method(CompressionMethod::Deflated)
      .last_modified_time(DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in parts {
      zip.start_file(name, options)?;
      zip.write_all(body.as_bytes())?;
    }
    let bytes = zip.finish()?.into_inner();
    trace!("Wrote DOCX package of {} bytes", bytes.len());
    Ok(bytes)
  }
}

/// Keeps only characters XML 1.0 allows in text: tab and everything from space upward.
fn xml_text(line: &str) -> String { line.chars().filter(|c| *c == '\t' || *c >= ' ').collect() }

#[cfg(test)]
mod tests {
  use std::io::Read;

  use zip::ZipArchive;

  use super::*;

  fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
  }

  #[test]
  fn test_container_signature_and_parts() {
    let bytes = DocxExporter::new().export("Judul\nIsi").unwrap();
    assert!(bytes.starts_with(b"PK\x03\x04"));

    let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort_unstable();
    assert_eq!(names, vec![
      "[Content_Types].xml",
      "_rels/.rels",
      "docProps/app.xml",
      "docProps/core.xml",
      "word/_rels/document.xml.rels",
      "word/document.xml",
      "word/styles.xml",
    ]);
  }

  #[test]
  fn test_one_paragraph_per_line() {
    let bytes = DocxExporter::new().export("Judul\n\nA & B <C>").unwrap();
    let document = read_part(&bytes, "word/document.xml");

    assert_eq!(document.matches("<w:p>").count() + document.matches("<w:p/>").count(), 3);
    assert!(document.contains(r#"<w:t xml:space="preserve">Judul</w:t>"#));
    assert!(document.contains("<w:p/>"));
    assert!(document.contains("A &amp; B &lt;C&gt;"));
  }

  #[test]
  fn test_control_characters_are_removed() {
    let bytes = DocxExporter::new().export("baris\r\nke\u{0007}dua").unwrap();
    let document = read_part(&bytes, "word/document.xml");
    assert!(document.contains(">baris</w:t>"));
    assert!(document.contains(">kedua</w:t>"));
  }

  #[test]
  fn test_title_property() {
    let bytes = DocxExporter::new().with_title(Some("Iklim & Cuaca")).export("isi").unwrap();
    let core = read_part(&bytes, "docProps/core.xml");
    assert!(core.contains("<dc:title>Iklim &amp; Cuaca</dc:title>"));

    let bytes = DocxExporter::new().export("isi").unwrap();
    assert!(!read_part(&bytes, "docProps/core.xml").contains("dc:title"));
  }
}
