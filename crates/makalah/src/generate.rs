//! The generation pipeline: topic in, paper text out.
//!
//! There is exactly one step between the two: render the prompt template and ask the model once.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use makalah::{config::Config, generate::Generator, llm::GeminiClient, template::Template};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?.require_api_key()?;
//! let generator = Generator::new(Arc::new(GeminiClient::new(&config)?)).with_template(Template::Draft);
//!
//! let paper = generator.generate("Dampak Perubahan Iklim").await?;
//! println!("{}", paper.content);
//! # Ok(())
//! # }
//! ```

use super::*;
use crate::export::{export, Artifact, ExportRequest, Format};

/// A request to write a paper about a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
  /// Subject of the paper, never blank
  pub topic: String,
}

impl GenerationRequest {
  /// Validates and trims the topic.
  ///
  /// # Errors
  ///
  /// Returns [`MakalahError::EmptyTopic`] for empty or whitespace-only topics.
  pub fn new(topic: &str) -> Result<Self> {
    let topic = topic.trim();
    if topic.is_empty() {
      return Err(MakalahError::EmptyTopic);
    }
    Ok(Self { topic: topic.to_owned() })
  }
}

/// A generated paper, exactly as the model wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPaper {
  /// Topic the paper was generated for
  pub topic:        String,
  /// Raw model output, unsanitized
  pub content:      String,
  /// Model that wrote it
  pub model:        String,
  /// When generation finished
  pub generated_at: DateTime<Utc>,
}

impl GeneratedPaper {
  /// Title of the paper: its first non-blank line once sanitized, or the topic.
  pub fn title(&self) -> String { infer_title(&self.content).unwrap_or_else(|| self.topic.clone()) }

  /// Sections requested by `template` that do not appear anywhere in the text.
  ///
  /// Matching is case-insensitive. Sections are never enforced, this is only a hint for callers.
  pub fn missing_sections(&self, template: Template) -> Vec<&'static str> {
    let content = self.content.to_lowercase();
    template
      .sections()
      .iter()
      .copied()
      .filter(|section| !content.contains(&section.to_lowercase()))
      .collect()
  }

  /// Exports the paper, naming the file after [`GeneratedPaper::title`].
  pub fn export(&self, format: Format) -> Result<Artifact> {
    export(&ExportRequest::new(&self.content, format).with_title(self.title()))
  }
}

/// Turns topics into papers with one model call each.
///
/// A `Generator` holds no per-request state and can be shared behind an [`Arc`].
#[derive(Clone)]
pub struct Generator {
  /// Model answering the prompts
  model:    Arc<dyn LanguageModel>,
  /// Template wrapped around every topic
  template: Template,
}

impl Generator {
  /// Creates a generator using the [`Template::Service`] template.
  pub fn new(model: Arc<dyn LanguageModel>) -> Self { Self { model, template: Template::default() } }

  /// Creates a generator backed by a [`GeminiClient`].
  pub fn from_config(config: &Config) -> Result<Self> {
    Ok(Self::new(Arc::new(GeminiClient::new(config)?)))
  }

  /// Replaces the prompt template.
  pub fn with_template(mut self, template: Template) -> Self {
    self.template = template;
    self
  }

  /// Template in use.
  pub fn template(&self) -> Template { self.template }

  /// Writes a paper about `topic`.
  ///
  /// # Errors
  ///
  /// - [`MakalahError::EmptyTopic`] before any network traffic when `topic` is blank
  /// - Any generation failure from the model, see [`MakalahError::is_generation_failure`]
  pub async fn generate(&self, topic: &str) -> Result<GeneratedPaper> {
    let request = GenerationRequest::new(topic)?;
    let prompt = self.template.render(&request.topic);
    debug!("Generating paper for {:?} ({} prompt bytes)", request.topic, prompt.len());

    let completion = self.model.complete(&prompt).await?;
    info!(
      "Generated {} bytes with {} (finish reason: {:?})",
      completion.text.len(),
      completion.model,
      completion.finish_reason
    );
    if let Some(usage) = &completion.usage {
      debug!("Token usage: {:?}", usage);
    }

    let paper = GeneratedPaper {
      topic:        request.topic,
      content:      completion.text,
      model:        completion.model,
      generated_at: Utc::now(),
    };

    let missing = paper.missing_sections(self.template);
    if !missing.is_empty() {
      warn!("Generated paper lacks sections: {}", missing.join(", "));
    }
    Ok(paper)
  }
}

impl std::fmt::Debug for Generator {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Generator").field("template", &self.template).finish_non_exhaustive()
  }
}

/// The message interactive surfaces show in place of a paper when generation fails.
///
/// ```
/// use makalah::{error::MakalahError, generate::failure_message};
///
/// assert_eq!(
///   failure_message(&MakalahError::EmptyResponse),
///   "Terjadi kesalahan: The model returned an empty response"
/// );
/// ```
pub fn failure_message(error: &MakalahError) -> String { format!("Terjadi kesalahan: {error}") }
