//! Integration tests for the makalah CLI commands.
//!
//! Every test runs in a fresh working directory with its own config directory, so neither a
//! developer's `.env` nor their config file leaks in.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::{tempdir, TempDir};

// Helper function to create a command isolated from the caller's environment
fn makalah(dir: &Path) -> Command {
  let mut command = Command::cargo_bin("makalah").unwrap();
  command
    .current_dir(dir)
    .env("XDG_CONFIG_HOME", dir.join("config"))
    .env("HOME", dir)
    .env_remove("GEMINI_API_KEY")
    .env_remove("MAKALAH_CONFIG")
    .env_remove("RUST_LOG");
  command
}

fn workspace() -> TempDir { tempdir().unwrap() }

#[test]
#[serial]
fn test_export_markdown_keeps_bytes() -> anyhow::Result<()> {
  let dir = workspace();
  let content = "# **Energi Terbarukan**\n\nIsi dengan “kutipan” — dan *penekanan*.\n";
  std::fs::write(dir.path().join("draft.md"), content)?;

  makalah(dir.path())
    .args(["export", "--input", "draft.md", "--format", "md", "--output", "out"])
    .assert()
    .success()
    .stdout(predicate::str::contains("energi_terbarukan.md"));

  assert_eq!(std::fs::read_to_string(dir.path().join("out/energi_terbarukan.md"))?, content);
  Ok(())
}

#[test]
#[serial]
fn test_log_filter_from_dotenv() -> anyhow::Result<()> {
  let dir = workspace();
  std::fs::write(dir.path().join(".env"), "RUST_LOG=debug\n")?;
  std::fs::write(dir.path().join("draft.md"), "Judul\nIsi")?;

  makalah(dir.path())
    .args(["export", "--input", "draft.md", "--format", "md"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Loaded environment from"));
  Ok(())
}

#[test]
#[serial]
fn test_export_docx_with_title() -> anyhow::Result<()> {
  let dir = workspace();
  std::fs::write(dir.path().join("draft.txt"), "Judul\nIsi")?;

  makalah(dir.path())
    .args(["export", "-i", "draft.txt", "-f", "docx", "--title", "Dampak Perubahan Iklim!"])
    .assert()
    .success();

  let bytes = std::fs::read(dir.path().join("dampak_perubahan_iklim.docx"))?;
  assert!(bytes.starts_with(b"PK\x03\x04"));
  Ok(())
}

#[test]
#[serial]
fn test_export_rejects_unknown_format() -> anyhow::Result<()> {
  let dir = workspace();
  std::fs::write(dir.path().join("draft.md"), "isi")?;

  makalah(dir.path())
    .args(["export", "--input", "draft.md", "--format", "xyz"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Unsupported export format \"xyz\""));

  assert!(!dir.path().join("makalah.xyz").exists());
  Ok(())
}

#[test]
#[serial]
fn test_export_missing_input() {
  let dir = workspace();

  makalah(dir.path())
    .args(["export", "--input", "missing.md", "--format", "pdf"])
    .assert()
    .failure()
    .code(1);
}

#[test]
#[serial]
fn test_serve_requires_api_key() {
  let dir = workspace();

  makalah(dir.path())
    .args(["serve", "--port", "0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
#[serial]
fn test_generate_requires_api_key() {
  let dir = workspace();

  makalah(dir.path())
    .args(["generate", "--topic", "Iklim", "--accept-defaults"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
#[serial]
fn test_generate_failure_is_reported_not_fatal() {
  let dir = workspace();

  makalah(dir.path())
    .env("GEMINI_API_KEY", "dummy")
    .env("MAKALAH_BASE_URL", "http://127.0.0.1:9")
    .env("MAKALAH_TIMEOUT_SECS", "5")
    .args(["generate", "--topic", "Iklim", "--accept-defaults"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Terjadi kesalahan"));
}

#[test]
#[serial]
fn test_invalid_configuration_is_reported() {
  let dir = workspace();

  makalah(dir.path())
    .env("GEMINI_API_KEY", "dummy")
    .env("MAKALAH_TEMPERATURE", "9")
    .args(["generate", "--topic", "Iklim", "--accept-defaults"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Configuration error"));
}
