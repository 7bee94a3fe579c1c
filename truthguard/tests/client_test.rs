use std::sync::{Arc, Mutex};

use mockito::Matcher;
use truthguard::analysis::{AnalysisDetails, AnalysisResult};
use truthguard::client::{
    AnalysisForm, ClientError, DetectionApi, FormState, HttpDetectionApi, EMPTY_URL_MESSAGE,
    GENERIC_FAILURE_MESSAGE, INVALID_URL_MESSAGE,
};

const SAMPLE_BODY: &str = r#"{
    "isReliable": true,
    "confidence": 87,
    "reasoning": [
        "Source is from a well-established, credible news organization",
        "Domain has a strong track record of factual reporting",
        "Content structure follows journalistic standards",
        "High confidence in analysis based on multiple factors"
    ],
    "sourceCredibility": 90,
    "factualAccuracy": 84,
    "biasScore": 41,
    "analysisDetails": {
        "domain": "www.bbc.com",
        "publishDate": "2024-03-02",
        "author": "Jane Doe",
        "wordCount": 1320
    }
}"#;

fn sample_result() -> AnalysisResult {
    AnalysisResult {
        is_reliable: true,
        confidence: 72,
        reasoning: vec!["Content analysis shows mixed reliability indicators".into()],
        source_credibility: 70,
        factual_accuracy: 75,
        bias_score: 50,
        analysis_details: AnalysisDetails {
            domain: "example.org".into(),
            publish_date: None,
            author: None,
            word_count: 800,
        },
    }
}

/// Records submitted URLs and replays a canned outcome.
#[derive(Clone)]
struct StubApi {
    seen: Arc<Mutex<Vec<String>>>,
    fail_with: Option<u16>,
}

impl StubApi {
    fn ok() -> Self {
        Self { seen: Arc::default(), fail_with: None }
    }

    fn failing(status: u16) -> Self {
        Self { seen: Arc::default(), fail_with: Some(status) }
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DetectionApi for StubApi {
    async fn detect(&self, url: &str) -> Result<AnalysisResult, ClientError> {
        self.seen.lock().unwrap().push(url.to_string());
        match self.fail_with {
            Some(status) => Err(ClientError::Status(status)),
            None => Ok(sample_result()),
        }
    }
}

#[tokio::test]
async fn http_api_parses_success_response() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/detect-fake-news")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({ "url": "https://www.bbc.com/news/x" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SAMPLE_BODY)
        .create_async()
        .await;

    let api = HttpDetectionApi::new(&format!("{}/", server.url()), 5).expect("client");
    let result = api.detect("https://www.bbc.com/news/x").await.expect("analysis");

    assert!(result.is_reliable);
    assert_eq!(result.confidence, 87);
    assert_eq!(result.reasoning.len(), 4);
    assert_eq!(result.analysis_details.author.as_deref(), Some("Jane Doe"));
    assert_eq!(result.analysis_details.word_count, 1320);

    mock.assert_async().await;
}

#[tokio::test]
async fn http_api_surfaces_server_error_message() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/detect-fake-news")
        .with_status(503)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Service temporarily unavailable. Please try again."}"#)
        .create_async()
        .await;

    let api = HttpDetectionApi::new(&server.url(), 5).expect("client");
    let err = api.detect("https://www.bbc.com/news/x").await.unwrap_err();

    match &err {
        ClientError::Service { status, message } => {
            assert_eq!(*status, 503);
            assert_eq!(message, "Service temporarily unavailable. Please try again.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "Service temporarily unavailable. Please try again.");

    mock.assert_async().await;
}

#[tokio::test]
async fn http_api_reports_bare_status() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/detect-fake-news")
        .with_status(502)
        .with_body("<html>bad gateway</html>")
        .create_async()
        .await;

    let api = HttpDetectionApi::new(&server.url(), 5).expect("client");
    let err = api.detect("https://npr.org/").await.unwrap_err();

    assert!(matches!(err, ClientError::Status(502)));
    assert_eq!(err.user_message(), "HTTP error! status: 502");
}

#[tokio::test]
async fn http_api_treats_error_field_on_200_as_failure() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/detect-fake-news")
        .with_status(200)
        .with_body(r#"{"error":"quota exceeded"}"#)
        .create_async()
        .await;

    let api = HttpDetectionApi::new(&server.url(), 5).expect("client");
    let err = api.detect("https://npr.org/").await.unwrap_err();
    assert_eq!(err.user_message(), "quota exceeded");
}

#[tokio::test]
async fn http_api_maps_garbage_to_generic_message() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/detect-fake-news")
        .with_status(200)
        .with_body(r#"{"confidence":"very"}"#)
        .create_async()
        .await;

    let api = HttpDetectionApi::new(&server.url(), 5).expect("client");
    let err = api.detect("https://npr.org/").await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
    assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn http_api_connection_failure_uses_generic_message() {
    // nothing listens on port 9 locally
    let api = HttpDetectionApi::new("http://127.0.0.1:9", 2).expect("client");
    let err = api.detect("https://npr.org/").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn form_rejects_empty_url_without_sending() {
    let api = StubApi::ok();
    let mut form = AnalysisForm::new(api.clone());

    form.set_url("   ");
    assert_eq!(form.submit().await, &FormState::Idle);
    assert_eq!(form.url_error(), Some(EMPTY_URL_MESSAGE));
    assert!(api.seen().is_empty());
}

#[tokio::test]
async fn form_rejects_non_web_url_without_sending() {
    let api = StubApi::ok();
    let mut form = AnalysisForm::new(api.clone());

    for url in ["bbc.com/news", "ftp://bbc.com/file"] {
        form.set_url(url);
        assert_eq!(form.submit().await, &FormState::Idle);
        assert_eq!(form.url_error(), Some(INVALID_URL_MESSAGE));
    }
    assert!(api.seen().is_empty());
}

#[tokio::test]
async fn form_sends_sanitized_url_and_displays_result() {
    let api = StubApi::ok();
    let mut form = AnalysisForm::new(api.clone());

    form.set_url("https://example.org/story?id=9&javascript=alert&data=x");
    let state = form.submit().await.clone();

    assert_eq!(state, FormState::Displaying(sample_result()));
    assert_eq!(form.url_error(), None);
    assert_eq!(api.seen(), vec!["https://example.org/story?id=9".to_string()]);
}

#[tokio::test]
async fn form_maps_failures_to_messages() {
    let mut form = AnalysisForm::new(StubApi::failing(500));

    form.set_url("https://example.org/story");
    assert_eq!(
        form.submit().await,
        &FormState::Failed("HTTP error! status: 500".to_string())
    );
}

#[test]
fn form_walks_through_submitting() {
    let mut form = AnalysisForm::new(StubApi::ok());
    form.set_url("https://www.reuters.com/world/");

    let sanitized = form.begin_submit().expect("valid url");
    assert_eq!(sanitized, "https://www.reuters.com/world/");
    assert!(form.is_loading());
    assert_eq!(form.state(), &FormState::Submitting);

    form.finish_submit(Err(ClientError::Status(503)));
    assert!(!form.is_loading());
    assert_eq!(form.state(), &FormState::Failed("HTTP error! status: 503".into()));

    // editing the url clears the previous outcome
    form.set_url("https://www.reuters.com/markets/");
    assert_eq!(form.state(), &FormState::Idle);
    assert_eq!(form.url(), "https://www.reuters.com/markets/");
}

#[test]
fn form_shows_service_error_message() {
    let mut form = AnalysisForm::new(StubApi::ok());
    form.set_url("https://apnews.com/article/x");
    form.begin_submit().expect("valid url");

    let state = form.finish_submit(Err(ClientError::Service {
        status: 503,
        message: "Service temporarily unavailable. Please try again.".into(),
    }));
    assert_eq!(
        state,
        &FormState::Failed("Service temporarily unavailable. Please try again.".into())
    );
}
