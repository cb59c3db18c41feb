//! PDF export.
//!
//! Pages are A4 and set in the built-in Helvetica face, so no font is embedded. Every input line
//! is a paragraph, word wrapped with Helvetica's glyph metrics and justified except for its last
//! line.

use lopdf::{
  content::{Content, Operation},
  dictionary, Document, Object, ObjectId, Stream,
};

use super::*;

/// PostScript points per millimetre.
const MM: f32 = 72.0 / 25.4;

/// Resource name of the Helvetica font on every page.
const FONT: &str = "F1";

/// Helvetica advance widths in 1/1000 em for the printable ASCII range `' '..='~'`.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
  278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..='/'
  556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..='?'
  1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..='O'
  667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..='_'
  333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..='o'
  556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..='~'
];

/// Page geometry and typesetting parameters, all lengths in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfLayout {
  /// Page width
  pub page_width:    f32,
  /// Page height
  pub page_height:   f32,
  /// Left margin
  pub margin_left:   f32,
  /// Right margin
  pub margin_right:  f32,
  /// Top margin
  pub margin_top:    f32,
  /// Distance from the page bottom at which a new page starts
  pub margin_bottom: f32,
  /// Font size
  pub font_size:     f32,
  /// Height of one line of text
  pub line_height:   f32,
  /// Extra space after each paragraph
  pub paragraph_gap: f32,
  /// Whether wrapped lines are stretched to the full text width
  pub justify:       bool,
}

impl Default for PdfLayout {
  /// A4 portrait, 12pt text on 10mm lines.
  fn default() -> Self {
    Self {
      page_width:    595.28,
      page_height:   841.89,
      margin_left:   10.0 * MM,
      margin_right:  10.0 * MM,
      margin_top:    10.0 * MM,
      margin_bottom: 15.0 * MM,
      font_size:     12.0,
      line_height:   10.0 * MM,
      paragraph_gap: 0.5 * MM,
      justify:       true,
    }
  }
}

impl PdfLayout {
  /// Horizontal space available for text.
  pub fn text_width(&self) -> f32 { self.page_width - self.margin_left - self.margin_right }

  /// Width of `text` in points at the layout's font size.
  pub fn measure(&self, text: &str) -> f32 {
    text.chars().map(glyph_width).sum::<f32>() * self.font_size / 1000.0
  }

  /// Breaks one paragraph into lines no wider than [`PdfLayout::text_width`].
  ///
  /// Words are packed greedily. A word that is wider than a whole line is split between
  /// characters. An empty paragraph yields a single empty line.
  pub fn wrap(&self, paragraph: &str) -> Vec<String> {
    let width = self.text_width();
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in paragraph.split(' ').filter(|word| !word.is_empty()) {
      let candidate =
        if current.is_empty() { word.to_owned() } else { format!("{current} {word}") };
      if self.measure(&candidate) <= width {
        current = candidate;
        continue;
      }

      if !current.is_empty() {
        lines.push(std::mem::take(&mut current));
      }
      if self.measure(word) <= width {
        current = word.to_owned();
        continue;
      }

      for c in word.chars() {
        if !current.is_empty() && self.measure(&current) + self.measure_char(c) > width {
          lines.push(std::mem::take(&mut current));
        }
        current.push(c);
      }
    }

    if !current.is_empty() || lines.is_empty() {
      lines.push(current);
    }
    lines
  }

  /// Width of a single character in points.
  fn measure_char(&self, c: char) -> f32 { glyph_width(c) * self.font_size / 1000.0 }
}

/// Helvetica advance width of `c` in 1/1000 em. Characters outside printable ASCII never reach
/// the page and measure as zero.
fn glyph_width(c: char) -> f32 {
  match c {
    ' '..='~' => f32::from(HELVETICA_WIDTHS[c as usize - 0x20]),
    _ => 0.0,
  }
}

/// Reduces a line to what Helvetica with WinAnsiEncoding shows safely: printable ASCII, with
/// tabs as spaces.
fn printable(line: &str) -> String {
  line.chars().map(|c| if c == '\t' { ' ' } else { c }).filter(|c| matches!(c, ' '..='~')).collect()
}

/// PDF writer.
#[derive(Debug, Clone, Default)]
pub struct PdfExporter {
  /// Page geometry
  layout: PdfLayout,
  /// Written to the document information dictionary
  title:  Option<String>,
}

impl PdfExporter {
  /// Creates an exporter with the default [`PdfLayout`].
  pub fn new() -> Self { Self::default() }

  /// Sets the document title.
  pub fn with_title(mut self, title: Option<&str>) -> Self {
    self.title = title.map(str::to_owned);
    self
  }

  /// Replaces the page layout.
  pub fn with_layout(mut self, layout: PdfLayout) -> Self {
    self.layout = layout;
    self
  }

  /// Layout in use.
  pub fn layout(&self) -> &PdfLayout { &self.layout }

  /// Lays `content` out into the content operations of each page.
  fn typeset(&self, content: &str) -> Vec<Vec<Operation>> {
    let layout = &self.layout;
    let top = layout.page_height - layout.margin_top;
    let bottom = layout.margin_bottom;

    let mut pages = Vec::new();
    let mut page = Vec::new();
    let mut cursor = top;

    for paragraph in content.split('\n') {
      let lines = layout.wrap(&printable(paragraph.trim_end_matches('\r')));
      let last = lines.len() - 1;

      for (index, line) in lines.into_iter().enumerate() {
        if cursor - layout.line_height < bottom {
          pages.push(std::mem::take(&mut page));
          cursor = top;
        }

        let baseline = cursor - layout.line_height / 2.0 - 0.3 * layout.font_size;
        let spaces = line.matches(' ').count();
        let word_spacing = if layout.justify && index < last && spaces > 0 {
          (layout.text_width() - layout.measure(&line)) / spaces as f32
        } else {
          0.0
        };

        if !line.is_empty() {
          page.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![FONT.into(), layout.font_size.into()]),
            Operation::new("Td", vec![layout.margin_left.into(), baseline.into()]),
            Operation::new("Tw", vec![word_spacing.into()]),
            Operation::new("Tj", vec![Object::string_literal(line)]),
            Operation::new("ET", vec![]),
          ]);
        }
        cursor -= layout.line_height;
      }
      cursor -= layout.paragraph_gap;
    }

    pages.push(page);
    pages
  }
}

impl Exporter for PdfExporter {
  fn format(&self) -> Format { Format::Pdf }

  fn export(&self, content: &str) -> Result<Vec<u8>> {
    let layout = &self.layout;
    let pages = self.typeset(content);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
      "Type" => "Font",
      "Subtype" => "Type1",
      "BaseFont" => "Helvetica",
      "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
      "Font" => dictionary! { FONT => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
      let stream = Stream::new(dictionary! {}, Content { operations }.encode()?);
      let content_id = doc.add_object(stream);
      let page_id: ObjectId = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
      });
      kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
      pages_id,
      Object::Dictionary(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![
          Object::Integer(0),
          Object::Integer(0),
          Object::Real(layout.page_width),
          Object::Real(layout.page_height),
        ],
      }),
    );

    let catalog_id = doc.add_object(dictionary! {
      "Type" => "Catalog",
      "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut info = dictionary! { "Producer" => Object::string_literal("makalah") };
    if let Some(title) = &self.title {
      info.set("Title", Object::string_literal(printable(title)));
    }
    let info_id = doc.add_object(info);
    doc.trailer.set("Info", info_id);

    doc.compress();
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    trace!("Wrote PDF with {page_count} page(s), {} bytes", bytes.len());
    Ok(bytes)
  }
}
