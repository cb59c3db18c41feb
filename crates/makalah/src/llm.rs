//! Client implementation for the Gemini `generateContent` API.
//!
//! The generation pipeline only ever needs one thing from a model: turn a prompt into text. That
//! contract is the [`LanguageModel`] trait, and [`GeminiClient`] is its production
//! implementation. Requests are assembled with the [`GeminiRequest`] builder and answered with a
//! [`GeminiResponse`], whose text parts are joined into a [`Completion`].
//!
//! # Examples
//!
//! ```no_run
//! use makalah::{config::Config, llm::{GeminiClient, LanguageModel, Model}};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?.with_model(Model::Gemini25Flash).require_api_key()?;
//! let client = GeminiClient::new(&config)?;
//!
//! let completion = client.complete("What is the capital of France?").await?;
//! println!("{}", completion.text);
//! # Ok(())
//! # }
//! ```

use super::*;

/// Header carrying the API key on every request.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Anything that can answer a prompt with text.
///
/// Implementations must be cheap to share across concurrent requests.
#[async_trait]
pub trait LanguageModel: Send + Sync {
  /// Sends `prompt` and returns the model's full answer.
  async fn complete(&self, prompt: &str) -> Result<Completion>;
}

/// Text answer of a single model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
  /// The full answer, verbatim
  pub text:          String,
  /// Model that produced the answer
  pub model:         String,
  /// Why generation stopped, as reported by the provider
  pub finish_reason: Option<String>,
  /// Token accounting, when reported
  pub usage:         Option<UsageMetadata>,
}

/// Gemini models known to produce good papers.
///
/// Any other model id is carried through as [`Model::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Model {
  /// Gemini 2.5 Flash, the default for both surfaces
  Gemini25Flash,
  /// Gemini 2.5 Pro, slower with longer answers
  Gemini25Pro,
  /// Any other model id accepted by the API
  Custom(String),
}

impl Display for Model {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Model::Gemini25Flash => write!(f, "gemini-2.5-flash"),
      Model::Gemini25Pro => write!(f, "gemini-2.5-pro"),
      Model::Custom(id) => write!(f, "{id}"),
    }
  }
}

impl FromStr for Model {
  type Err = MakalahError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().trim_start_matches("models/") {
      "" => Err(MakalahError::Config("model id must not be empty".to_owned())),
      "gemini-2.5-flash" => Ok(Model::Gemini25Flash),
      "gemini-2.5-pro" => Ok(Model::Gemini25Pro),
      id => Ok(Model::Custom(id.to_owned())),
    }
  }
}

impl TryFrom<String> for Model {
  type Error = MakalahError;

  fn try_from(value: String) -> Result<Self> { value.parse() }
}

impl From<Model> for String {
  fn from(model: Model) -> Self { model.to_string() }
}

/// Request body for `models/{model}:generateContent`.
///
/// # Examples
///
/// ```
/// use makalah::llm::{GeminiRequest, Model};
///
/// let request = GeminiRequest::new()
///   .with_model(Model::Gemini25Flash)
///   .with_temperature(0.5)
///   .with_message("Explain how a computer works");
///
/// let body = serde_json::to_value(&request).unwrap();
/// assert_eq!(body["contents"][0]["parts"][0]["text"], "Explain how a computer works");
/// assert_eq!(body["generationConfig"]["temperature"], 0.5);
/// ```
#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
  /// Conversation turns, oldest first
  pub contents:          Vec<Content>,
  /// Sampling parameters
  pub generation_config: GenerationConfig,
  /// Model addressed in the URL rather than the body
  #[serde(skip)]
  pub model:             Option<Model>,
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
  /// `user` for prompts, `model` for answers
  #[serde(default)]
  pub role:  String,
  /// Ordered parts of the turn
  #[serde(default)]
  pub parts: Vec<Part>,
}

/// One part of a turn. Only text parts are produced or consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
  /// Text of this part. Absent for non-text parts.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
}

/// Sampling parameters.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
  /// Temperature for controlling randomness in generation
  #[serde(skip_serializing_if = "Option::is_none")]
  pub temperature:       Option<f64>,
  /// Maximum number of tokens to generate
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_output_tokens: Option<u32>,
}

/// Successful response from `generateContent`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
  /// Generated candidates. Only the first one is used.
  #[serde(default)]
  pub candidates:      Vec<Candidate>,
  /// Present when the prompt itself was rejected
  pub prompt_feedback: Option<PromptFeedback>,
  /// Token accounting
  pub usage_metadata:  Option<UsageMetadata>,
  /// Exact model version that answered
  pub model_version:   Option<String>,
}

/// A single generated answer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
  /// The answer turn
  pub content:       Option<Content>,
  /// Why generation stopped (`STOP`, `MAX_TOKENS`, `SAFETY`, ...)
  pub finish_reason: Option<String>,
}

/// Feedback about the prompt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
  /// Set when the prompt was blocked
  pub block_reason: Option<String>,
}

/// Token counts reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
  /// Tokens in the prompt
  pub prompt_token_count:     Option<u64>,
  /// Tokens in the answer
  pub candidates_token_count: Option<u64>,
  /// Total billed tokens
  pub total_token_count:      Option<u64>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
  /// The error itself
  error: ApiErrorDetail,
}

/// Provider error details.
#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
  /// Human readable message
  message: String,
  /// Canonical status such as `RESOURCE_EXHAUSTED`
  status:  Option<String>,
}

impl GeminiRequest {
  /// Creates a new request with builder-style API with default settings.
  pub fn new() -> Self { Self::default() }

  /// Sets the model to address.
  pub fn with_model(mut self, model: Model) -> Self {
    self.model.replace(model);
    self
  }

  /// Appends a user turn.
  pub fn with_message(mut self, content: &str) -> Self {
    self
      .contents
      .push(Content { role: "user".to_owned(), parts: vec![Part { text: Some(content.to_owned()) }] });
    self
  }

  /// Sets the sampling temperature.
  pub fn with_temperature(mut self, temperature: f64) -> Self {
    self.generation_config.temperature = Some(temperature);
    self
  }

  /// Caps the answer length.
  pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
    self.generation_config.max_output_tokens = Some(max_output_tokens);
    self
  }
}

impl GeminiResponse {
  /// Joins the text parts of the first candidate.
  ///
  /// Returns `None` when there is no candidate or its text is blank.
  pub fn text(&self) -> Option<String> {
    let content = self.candidates.first()?.content.as_ref()?;
    let text: String = content.parts.iter().filter_map(|part| part.text.as_deref()).collect();
    if text.trim().is_empty() {
      None
    } else {
      Some(text)
    }
  }

  /// Why the prompt was blocked, if it was.
  pub fn block_reason(&self) -> Option<&str> {
    self.prompt_feedback.as_ref().and_then(|feedback| feedback.block_reason.as_deref())
  }
}

/// Production [`LanguageModel`] talking to the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
  /// Shared connection pool carrying the configured timeout
  http:        reqwest::Client,
  /// API root, always ending in `/`
  base_url:    Url,
  /// Key sent in [`API_KEY_HEADER`]
  api_key:     String,
  /// Model addressed by default
  model:       Model,
  /// Sampling temperature sent with every request
  temperature: f64,
}

impl std::fmt::Debug for GeminiClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("GeminiClient")
      .field("base_url", &self.base_url.as_str())
      .field("api_key", &"***")
      .field("model", &self.model)
      .field("temperature", &self.temperature)
      .finish_non_exhaustive()
  }
}

impl GeminiClient {
  /// Builds a client from configuration.
  ///
  /// # Errors
  ///
  /// Returns [`MakalahError::Config`] when the API key is missing or the base URL is invalid.
  pub fn new(config: &Config) -> Result<Self> {
    let api_key = config.api_key()?.to_owned();

    let mut base_url = Url::parse(&config.base_url)
      .map_err(|e| MakalahError::Config(format!("invalid base_url {:?}: {e}", config.base_url)))?;
    if !base_url.path().ends_with('/') {
      let path = format!("{}/", base_url.path());
      base_url.set_path(&path);
    }

    let http = reqwest::Client::builder().timeout(config.timeout()).build()?;

    Ok(Self { http, base_url, api_key, model: config.model.clone(), temperature: config.temperature })
  }

  /// Model addressed by [`LanguageModel::complete`].
  pub fn model(&self) -> &Model { &self.model }

  /// URL of the `generateContent` call for `model`.
  pub fn endpoint(&self, model: &Model) -> Result<Url> {
    self
      .base_url
      .join(&format!("v1beta/models/{model}:generateContent"))
      .map_err(|e| MakalahError::Config(format!("cannot build endpoint for {model}: {e}")))
  }

  /// Sends a prepared request.
  ///
  /// # Errors
  ///
  /// - [`MakalahError::Timeout`] when the configured timeout elapses
  /// - [`MakalahError::Network`] for transport failures and undecodable bodies
  /// - [`MakalahError::Api`] for non-2xx answers, carrying the provider's message
  pub async fn send(&self, request: &GeminiRequest) -> Result<GeminiResponse> {
    let model = request.model.as_ref().unwrap_or(&self.model);
    let url = self.endpoint(model)?;
    debug!("Sending request to {url}");

    let response =
      self.http.post(url).header(API_KEY_HEADER, &self.api_key).json(request).send().await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await?;
      trace!("Error body: {body}");
      return Err(MakalahError::Api(api_error_message(status, &body)));
    }

    let gemini_response: GeminiResponse = response.json().await?;
    Ok(gemini_response)
  }
}

#[async_trait]
impl LanguageModel for GeminiClient {
  async fn complete(&self, prompt: &str) -> Result<Completion> {
    let request = GeminiRequest::new()
      .with_model(self.model.clone())
      .with_temperature(self.temperature)
      .with_message(prompt);

    let response = self.send(&request).await?;

    if let Some(reason) = response.block_reason() {
      return Err(MakalahError::Api(format!("prompt blocked: {reason}")));
    }

    let text = response.text().ok_or(MakalahError::EmptyResponse)?;
    let finish_reason = response.candidates.first().and_then(|c| c.finish_reason.clone());
    if finish_reason.as_deref().is_some_and(|reason| reason != "STOP") {
      warn!("Generation finished early: {:?}", finish_reason);
    }

    Ok(Completion {
      text,
      model: response.model_version.unwrap_or_else(|| self.model.to_string()),
      finish_reason,
      usage: response.usage_metadata,
    })
  }
}

/// Renders a non-2xx answer as `"<status>: <provider message>"`.
fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
  match serde_json::from_str::<ApiErrorBody>(body) {
    Ok(ApiErrorBody { error: ApiErrorDetail { message, status: Some(code) } }) =>
      format!("{status} ({code}): {message}"),
    Ok(ApiErrorBody { error: ApiErrorDetail { message, status: None } }) =>
      format!("{status}: {message}"),
    Err(_) if body.trim().is_empty() => status.to_string(),
    Err(_) => format!("{status}: {}", body.trim()),
  }
}
