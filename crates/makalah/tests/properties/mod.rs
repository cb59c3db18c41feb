use makalah::{
  format::{filename_stem, slugify, MAX_STEM_LEN},
  sanitize::sanitize,
};
use proptest::prelude::*;

proptest! {
  #[test]
  fn sanitize_is_idempotent(text in "\\PC*") {
    let once = sanitize(&text);
    prop_assert_eq!(sanitize(&once), once.clone());
    prop_assert!(once.is_ascii());
    prop_assert!(!once.contains("# "));
  }

  #[test]
  fn sanitize_handles_markdown_like_input(text in "[#* a-zA-Z\u{2014}\u{201C}\u{201D}\u{00e9}\n]{0,64}") {
    let once = sanitize(&text);
    prop_assert_eq!(sanitize(&once), once.clone());
    prop_assert_eq!(once.trim(), once.as_str());
  }

  #[test]
  fn slug_alphabet(title in "\\PC*") {
    let slug = slugify(&title);
    prop_assert!(slug.chars().all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_')));
    prop_assert!(!slug.starts_with('_') && !slug.ends_with('_'));
  }

  #[test]
  fn filename_stem_is_never_empty(title in proptest::option::of("\\PC*")) {
    let stem = filename_stem(title.as_deref());
    prop_assert!(!stem.is_empty());
    prop_assert!(stem.len() <= MAX_STEM_LEN);
  }
}
