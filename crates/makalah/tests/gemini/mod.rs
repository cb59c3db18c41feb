use super::*;

#[tokio::test]
async fn test_complete_sends_prompt_and_key() -> TestResult {
  let mock = MockGemini::answering("# Judul\n\nPendahuluan");
  let client = mock.client().await;

  let completion = client.complete("Tulis makalah").await?;
  assert_eq!(completion.text, "# Judul\n\nPendahuluan");
  assert_eq!(completion.model, "gemini-2.5-flash");
  assert_eq!(completion.finish_reason.as_deref(), Some("STOP"));
  assert_eq!(completion.usage.map(|usage| usage.total_token_count), Some(Some(1020)));

  let requests = mock.requests();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].call, "gemini-2.5-flash:generateContent");
  assert_eq!(requests[0].api_key.as_deref(), Some("test-key"));
  assert_eq!(requests[0].body["contents"][0]["parts"][0]["text"], "Tulis makalah");
  assert_eq!(requests[0].body["generationConfig"]["temperature"], 0.5);
  Ok(())
}

#[tokio::test]
async fn test_rate_limit_is_an_api_error() {
  let mock = MockGemini::replying(
    StatusCode::TOO_MANY_REQUESTS,
    json!({ "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" } }),
  );
  let client = mock.client().await;

  match client.complete("prompt").await {
    Err(MakalahError::Api(message)) => {
      assert!(message.contains("429"));
      assert!(message.contains("RESOURCE_EXHAUSTED"));
      assert!(message.contains("Quota exceeded"));
    },
    other => panic!("expected an API error, got {other:?}"),
  }
}

#[tokio::test]
async fn test_no_candidates_is_an_empty_response() {
  let mock = MockGemini::replying(StatusCode::OK, json!({ "candidates": [] }));
  let client = mock.client().await;

  assert!(matches!(client.complete("prompt").await, Err(MakalahError::EmptyResponse)));
}

#[tokio::test]
async fn test_blocked_prompt() {
  let mock = MockGemini::replying(
    StatusCode::OK,
    json!({ "promptFeedback": { "blockReason": "SAFETY" } }),
  );
  let client = mock.client().await;

  match client.complete("prompt").await {
    Err(MakalahError::Api(message)) => assert_eq!(message, "prompt blocked: SAFETY"),
    other => panic!("expected a blocked prompt, got {other:?}"),
  }
}

#[tokio::test]
async fn test_slow_model_times_out() {
  let mock = MockGemini::answering("terlambat").with_delay(Duration::from_secs(3));
  let config = Config::default()
    .with_api_key("test-key")
    .with_base_url(mock.serve().await)
    .with_timeout(Duration::from_millis(200));
  let client = GeminiClient::new(&config).unwrap();

  let error = client.complete("prompt").await.unwrap_err();
  assert!(matches!(error, MakalahError::Timeout), "got {error:?}");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_network_error() {
  let config = Config::default().with_api_key("test-key").with_base_url("http://127.0.0.1:9");
  let client = GeminiClient::new(&config).unwrap();

  let error = client.complete("prompt").await.unwrap_err();
  assert!(error.is_generation_failure(), "got {error:?}");
}

#[tokio::test]
async fn test_generator_end_to_end() -> TestResult {
  let paper_text = "# **Climate Change and Biodiversity**\n\n## 1. Pendahuluan\nIklim *berubah* \
                    \u{2014} cepat.\n\n## 5. Kesimpulan\nSelesai.";
  let mock = MockGemini::answering(paper_text);
  let generator = Generator::new(Arc::new(mock.client().await));

  let paper = generator.generate("Climate Change").await?;
  assert!(paper.content.contains("Pendahuluan"));
  assert!(paper.content.contains("Kesimpulan"));
  assert_eq!(paper.title(), "Climate Change and Biodiversity");

  let prompt = mock.requests()[0].body["contents"][0]["parts"][0]["text"].clone();
  assert!(prompt.as_str().unwrap().contains("Climate Change"));

  let docx = paper.export(Format::Docx)?;
  assert!(docx.bytes.starts_with(b"PK\x03\x04"));
  assert_eq!(docx.filename, "climate_change_and_biodiversity.docx");

  let pdf = paper.export(Format::Pdf)?;
  assert!(pdf.bytes.starts_with(b"%PDF"));

  let markdown = paper.export(Format::Markdown)?;
  assert_eq!(markdown.bytes, paper_text.as_bytes());
  Ok(())
}

#[tokio::test]
async fn test_empty_topic_makes_no_request() {
  let mock = MockGemini::answering("tidak dipakai");
  let generator = Generator::new(Arc::new(mock.client().await));

  assert!(matches!(generator.generate("   ").await, Err(MakalahError::EmptyTopic)));
  assert!(mock.requests().is_empty());
}
