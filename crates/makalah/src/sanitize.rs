//! Text cleanup before binary export.
//!
//! Model output is Markdown-flavoured and full of typographic punctuation. DOCX and PDF exports
//! carry plain ASCII, so [`sanitize`] strips emphasis and heading markers and folds everything
//! else down to ASCII.
//!
//! Characters that have no ASCII form after folding are dropped silently. This loss is the
//! accepted cost of the ASCII policy and is never reported as an error.

use super::*;

lazy_static! {
  /// `**bold**` spans on a single line
  static ref BOLD: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
  /// `*italic*` spans on a single line
  static ref ITALIC: Regex = Regex::new(r"\*(.*?)\*").unwrap();
  /// A run of `#` followed by one whitespace character
  static ref HEADING: Regex = Regex::new(r"#+\s").unwrap();
}

/// Cleans model output for DOCX and PDF export.
///
/// The ordered passes are:
/// 1. `**x**` becomes `x`
/// 2. `*x*` becomes `x`
/// 3. heading markers (`#`, `##`, ... followed by whitespace) are removed
/// 4. em and en dashes become `-`
/// 5. NFKD decomposition folds accents and compatibility forms
/// 6. curly quotes become straight quotes
/// 7. every remaining non-ASCII character is dropped
/// 8. surrounding whitespace is trimmed
///
/// Folding can expose markup the first pass could not see (a fullwidth `＊` becomes `*`), so the
/// passes repeat until the text is stable. The function is therefore idempotent.
///
/// ```
/// use makalah::sanitize::sanitize;
///
/// assert_eq!(sanitize("## **Pendahuluan** — *ringkas*"), "Pendahuluan - ringkas");
/// assert_eq!(sanitize("“kutipan” café"), "\"kutipan\" cafe");
/// ```
pub fn sanitize(text: &str) -> String {
  let mut current = sanitize_pass(text);
  loop {
    let next = sanitize_pass(&current);
    if next == current {
      return current;
    }
    current = next;
  }
}

/// One ordered run of all passes. On ASCII input every pass can only remove characters, which
/// bounds the loop in [`sanitize`].
fn sanitize_pass(text: &str) -> String {
  let text = BOLD.replace_all(text, "${1}");
  let text = ITALIC.replace_all(&text, "${1}");
  let text = HEADING.replace_all(&text, "");
  let text = text.replace(['\u{2014}', '\u{2013}'], "-");
  let text: String = text.nfkd().collect();
  let text = text.replace(['\u{201C}', '\u{201D}'], "\"").replace(['\u{2018}', '\u{2019}'], "'");
  let text: String = text.chars().filter(char::is_ascii).collect();
  text.trim().to_owned()
}
