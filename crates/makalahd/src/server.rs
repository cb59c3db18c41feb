//! HTTP surface.
//!
//! | Route | Body | Answer |
//! |---|---|---|
//! | `GET /` | | the landing page |
//! | `POST /generate-makalah` | `{"topic": "..."}` | `{"content": "..."}` |
//! | `POST /download` | `{"content": "...", "format": "docx", "title": "..."}` | the document |
//!
//! Failures answer with a non-2xx status and `{"error": "..."}`. CORS is open to any origin.

use axum::{
  extract::{rejection::JsonRejection, State},
  http::{header, StatusCode},
  response::{Html, IntoResponse, Response},
  routing::{get, post},
  Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::*;

/// Landing page served at `/`.
const INDEX_HTML: &str = include_str!("../static/index.html");

/// Shared, read-only server state.
#[derive(Clone, Debug)]
pub struct AppState {
  /// Generator used by every request
  pub generator: Arc<Generator>,
}

impl AppState {
  /// Wraps a generator for sharing across requests.
  pub fn new(generator: Generator) -> Self { Self { generator: Arc::new(generator) } }
}

/// Body of `POST /generate-makalah`.
#[derive(Debug, Deserialize)]
pub struct TopicRequest {
  /// Subject of the paper
  pub topic: String,
}

/// Answer of `POST /generate-makalah`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MakalahResponse {
  /// Raw paper text
  pub content: String,
}

/// Body of `POST /download`.
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
  /// Paper text to export
  pub content: String,
  /// Wire name of the format, checked by the handler
  pub format:  String,
  /// Title for the filename
  #[serde(default)]
  pub title:   Option<String>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/", get(index))
    .route("/generate-makalah", post(generate_makalah))
    .route("/download", post(download))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}

/// `GET /`
async fn index() -> Html<&'static str> { Html(INDEX_HTML) }

/// `POST /generate-makalah`
async fn generate_makalah(
  State(state): State<AppState>,
  payload: Result<Json<TopicRequest>, JsonRejection>,
) -> Result<Json<MakalahResponse>, ApiError> {
  let Json(request) = payload?;
  let paper = state.generator.generate(&request.topic).await?;
  Ok(Json(MakalahResponse { content: paper.content }))
}

/// `POST /download`
async fn download(
  payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
  let Json(request) = payload?;
  let format: Format = request.format.parse()?;
  let mut export_request = ExportRequest::new(request.content, format);
  if let Some(title) = request.title {
    export_request = export_request.with_title(title);
  }

  let artifact = export_artifact(&export_request)?;
  let headers = [
    (header::CONTENT_TYPE, artifact.mime_type.to_owned()),
    (header::CONTENT_DISPOSITION, artifact.content_disposition()),
  ];
  Ok((headers, artifact.bytes).into_response())
}

/// A failed request on its way to becoming an HTTP answer.
#[derive(Debug)]
pub enum ApiError {
  /// The body was not the JSON the route expects
  Body(JsonRejection),
  /// Generation or export failed
  Makalah(MakalahError),
}

impl From<MakalahError> for ApiError {
  fn from(error: MakalahError) -> Self { Self::Makalah(error) }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::Body(rejection) }
}

impl ApiError {
  /// Status code for the error.
  ///
  /// Body rejections keep axum's status: 400 for malformed JSON, 415 for a missing
  /// `Content-Type: application/json` and 422 for missing or mistyped fields.
  pub fn status(&self) -> StatusCode {
    match self {
      Self::Body(rejection) => rejection.status(),
      Self::Makalah(MakalahError::EmptyTopic | MakalahError::UnsupportedFormat(_)) =>
        StatusCode::BAD_REQUEST,
      Self::Makalah(MakalahError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
      Self::Makalah(MakalahError::Api(_) | MakalahError::Network(_) | MakalahError::EmptyResponse) =>
        StatusCode::BAD_GATEWAY,
      Self::Makalah(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// Message placed in the `error` field.
  pub fn message(&self) -> String {
    match self {
      Self::Body(rejection) => format!("Terjadi kesalahan: {}", rejection.body_text()),
      Self::Makalah(MakalahError::UnsupportedFormat(_)) => "Format tidak valid.".to_owned(),
      Self::Makalah(error) => failure_message(error),
    }
  }
}

impl std::fmt::Display for ApiError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Body(rejection) => write!(f, "{rejection}"),
      Self::Makalah(error) => write!(f, "{error}"),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("Request failed: {self}");
    } else {
      debug!("Rejected request: {self}");
    }
    (status, Json(serde_json::json!({ "error": self.message() }))).into_response()
  }
}
