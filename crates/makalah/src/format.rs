//! Filename helpers.

use super::*;

/// Filename stem used when a title yields no usable characters.
pub const DEFAULT_STEM: &str = "makalah";

/// Longest stem produced by [`filename_stem`].
pub const MAX_STEM_LEN: usize = 80;

lazy_static! {
  /// Runs of whitespace and hyphens
  static ref SEPARATORS: Regex = Regex::new(r"[-\s]+").unwrap();
}

/// Turns a free-text title into a lowercase, underscore-delimited token.
///
/// Accents are folded first, then anything other than ASCII letters, digits, whitespace, `-` and
/// `_` is removed. The output only ever contains `[a-z0-9_]` and may be empty.
///
/// ```
/// use makalah::format::slugify;
///
/// assert_eq!(slugify("Dampak Perubahan Iklim!"), "dampak_perubahan_iklim");
/// assert_eq!(slugify("Ekonomi Kreatif — Studi Kasus"), "ekonomi_kreatif_studi_kasus");
/// assert_eq!(slugify("?!"), "");
/// ```
pub fn slugify(title: &str) -> String {
  let kept: String = title
    .nfkd()
    .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
    .collect();
  let trimmed = kept.trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '_');
  SEPARATORS.replace_all(&trimmed.to_ascii_lowercase(), "_").into_owned()
}

/// Filename stem for an optional title, falling back to [`DEFAULT_STEM`].
///
/// Long titles are cut to [`MAX_STEM_LEN`] characters.
pub fn filename_stem(title: Option<&str>) -> String {
  let slug = title.map(slugify).unwrap_or_default();
  if slug.is_empty() {
    warn!("No usable title for the filename, using \"{DEFAULT_STEM}\"");
    return DEFAULT_STEM.to_owned();
  }

  if slug.len() > MAX_STEM_LEN {
    slug[..MAX_STEM_LEN].trim_end_matches('_').to_owned()
  } else {
    slug
  }
}

/// Title of a paper: its first non-blank line once sanitized.
///
/// ```
/// use makalah::format::infer_title;
///
/// assert_eq!(infer_title("\n# **Energi Terbarukan**\nIsi").as_deref(), Some("Energi Terbarukan"));
/// assert_eq!(infer_title("  \n "), None);
/// ```
pub fn infer_title(content: &str) -> Option<String> {
  sanitize(content).lines().map(str::trim).find(|line| !line.is_empty()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slugify() {
    assert_eq!(slugify("Dampak Perubahan Iklim!"), "dampak_perubahan_iklim");
    assert_eq!(slugify("  Energi   Terbarukan  "), "energi_terbarukan");
    assert_eq!(slugify("AI - Masa Depan"), "ai_masa_depan");
    assert_eq!(slugify("Café Économie 2024"), "cafe_economie_2024");
    assert_eq!(slugify("snake_case stays"), "snake_case_stays");
  }

  #[test]
  fn test_slugify_empty() {
    assert_eq!(slugify(""), "");
    assert_eq!(slugify("  !!! ... ---  "), "");
    assert_eq!(slugify("日本語"), "");
  }

  #[traced_test]
  #[test]
  fn test_filename_stem_fallback() {
    assert_eq!(filename_stem(None), DEFAULT_STEM);
    assert_eq!(filename_stem(Some("")), DEFAULT_STEM);
    assert_eq!(filename_stem(Some("?!")), DEFAULT_STEM);
    assert!(logs_contain("No usable title"));
    assert_eq!(filename_stem(Some("Dampak Perubahan Iklim!")), "dampak_perubahan_iklim");
  }

  #[test]
  fn test_filename_stem_truncates() {
    let title = "kata ".repeat(40);
    let stem = filename_stem(Some(&title));
    assert!(stem.len() <= MAX_STEM_LEN);
    assert!(stem.starts_with("kata_kata"));
    assert!(!stem.ends_with('_'));
  }
}
