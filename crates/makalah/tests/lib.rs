use std::{
  error::Error,
  sync::{Arc, Mutex},
  time::Duration,
};

use axum::{
  extract::{Path, State},
  http::{HeaderMap, StatusCode},
  routing::post,
  Json, Router,
};
use makalah::{
  config::Config,
  error::MakalahError,
  export::{export, ExportRequest, Format},
  generate::Generator,
  llm::GeminiClient,
  prelude::*,
};
use serde_json::{json, Value};
use tempfile::tempdir;
use tokio::net::TcpListener;

mod documents;
mod gemini;
mod properties;

pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// A request the mock Gemini endpoint received.
#[derive(Debug, Clone)]
pub struct Recorded {
  pub call:    String,
  pub api_key: Option<String>,
  pub body:    Value,
}

/// Canned `generateContent` endpoint that records every request.
#[derive(Clone)]
pub struct MockGemini {
  pub status: StatusCode,
  pub reply:  Value,
  pub delay:  Duration,
  pub seen:   Arc<Mutex<Vec<Recorded>>>,
}

impl MockGemini {
  pub fn replying(status: StatusCode, reply: Value) -> Self {
    Self { status, reply, delay: Duration::ZERO, seen: Arc::default() }
  }

  pub fn answering(text: &str) -> Self {
    Self::replying(
      StatusCode::OK,
      json!({
        "candidates": [{
          "content": { "role": "model", "parts": [{ "text": text }] },
          "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 900, "totalTokenCount": 1020 },
        "modelVersion": "gemini-2.5-flash"
      }),
    )
  }

  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }

  pub fn requests(&self) -> Vec<Recorded> { self.seen.lock().unwrap().clone() }

  /// Serves the mock on an ephemeral port and returns its base URL.
  pub async fn serve(&self) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app =
      Router::new().route("/v1beta/models/:call", post(generate_content)).with_state(self.clone());
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
  }

  /// Client pointed at this mock with a test key.
  pub async fn client(&self) -> GeminiClient {
    let config = Config::default()
      .with_api_key("test-key")
      .with_base_url(self.serve().await)
      .with_timeout(Duration::from_secs(5));
    GeminiClient::new(&config).unwrap()
  }
}

async fn generate_content(
  State(mock): State<MockGemini>,
  Path(call): Path<String>,
  headers: HeaderMap,
  Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
  let api_key =
    headers.get("x-goog-api-key").and_then(|value| value.to_str().ok()).map(str::to_owned);
  mock.seen.lock().unwrap().push(Recorded { call, api_key, body });
  tokio::time::sleep(mock.delay).await;
  (mock.status, Json(mock.reply.clone()))
}
