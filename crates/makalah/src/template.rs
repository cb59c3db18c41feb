//! Prompt templates.
//!
//! Both templates are sent to the model as-is after `{topic}` substitution, so their wording is
//! part of the observable output format and must not drift.

use super::*;

/// Placeholder replaced by the topic.
const TOPIC_PLACEHOLDER: &str = "{topic}";

/// Five-section template used by the interactive surface.
const DRAFT_TEMPLATE: &str = r#"
Buat makalah ilmiah tentang topik berikut: "{topic}".
Gunakan format:
1. Pendahuluan
2. Tinjauan Pustaka
3. Metode
4. Hasil/Analisis
5. Kesimpulan

Tuliskan secara jelas, rapi, dan akademik.
"#;

/// Six-section template used by the HTTP surface.
const SERVICE_TEMPLATE: &str = r#"
Buat makalah ilmiah tentang topik berikut: "{topic}".

**PERATURAN PENTING:**
- **Langsung mulai dengan judul makalah.** Jangan sertakan kalimat pembuka atau basa-basi seperti "Tentu, berikut adalah makalah..."
- **Jangan gunakan pemisah** seperti "---" atau baris kosong yang berlebihan.

Gunakan format terstruktur berikut:
1. Pendahuluan
2. Tinjauan Pustaka
3. Metode Penelitian
4. Hasil dan Analisis
5. Kesimpulan
6. Daftar Pustaka

Tuliskan secara jelas, terstruktur, dan dengan gaya bahasa akademik.
"#;

/// Which instructional template to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
  /// Five sections without references
  Draft,
  /// Six sections including references, starting directly with the title
  #[default]
  Service,
}

impl Template {
  /// Raw template text with the `{topic}` placeholder.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Draft => DRAFT_TEMPLATE,
      Self::Service => SERVICE_TEMPLATE,
    }
  }

  /// Section headings the template asks for, in order.
  pub fn sections(&self) -> &'static [&'static str] {
    match self {
      Self::Draft =>
        &["Pendahuluan", "Tinjauan Pustaka", "Metode", "Hasil/Analisis", "Kesimpulan"],
      Self::Service => &[
        "Pendahuluan",
        "Tinjauan Pustaka",
        "Metode Penelitian",
        "Hasil dan Analisis",
        "Kesimpulan",
        "Daftar Pustaka",
      ],
    }
  }

  /// Fills the template with `topic`.
  ///
  /// ```
  /// use makalah::template::Template;
  ///
  /// let prompt = Template::Draft.render("Energi Terbarukan");
  /// assert!(prompt.contains("topik berikut: \"Energi Terbarukan\"."));
  /// ```
  pub fn render(&self, topic: &str) -> String { self.as_str().replace(TOPIC_PLACEHOLDER, topic) }
}
