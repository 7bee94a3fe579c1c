//! Client side of the detection API.
//!
//! `AnalysisForm` models the submission flow as a small state machine:
//! `Idle -> Submitting -> Displaying | Failed`. It validates and sanitizes
//! the URL locally, then hands it to a `DetectionApi`.

use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tracing::{error, info};

use common::{sanitize_url, validate_url};

use crate::analysis::AnalysisResult;

/// Shown for transport and decoding failures.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to analyze the article. Please check your internet connection and try again.";
pub const EMPTY_URL_MESSAGE: &str = "Please enter a URL";
pub const INVALID_URL_MESSAGE: &str = "Please enter a valid URL (must start with http:// or https://)";

/// Failures surfaced by a `DetectionApi`.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with an `{"error": ...}` body.
    #[error("{message}")]
    Service { status: u16, message: String },
    /// Non-success status without a readable error body.
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Service { .. } | ClientError::Status(_) => self.to_string(),
            ClientError::Transport(_) | ClientError::Decode(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Anything that can score a URL.
#[async_trait::async_trait]
pub trait DetectionApi: Send + Sync {
    async fn detect(&self, url: &str) -> Result<AnalysisResult, ClientError>;
}

#[derive(Serialize)]
struct DetectBody<'a> {
    url: &'a str,
}

/// `DetectionApi` backed by a running TruthGuard server.
pub struct HttpDetectionApi {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpDetectionApi {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("TruthGuard/0.1.0")
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            endpoint: format!("{}/api/detect-fake-news", base_url.trim_end_matches('/')),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl DetectionApi for HttpDetectionApi {
    async fn detect(&self, url: &str) -> Result<AnalysisResult, ClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&DetectBody { url })
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let body: Option<serde_json::Value> = serde_json::from_slice(&bytes).ok();

        // an `error` field wins regardless of status
        if let Some(message) = body
            .as_ref()
            .and_then(|b| b.get("error"))
            .and_then(|e| e.as_str())
        {
            return Err(ClientError::Service {
                status: status.as_u16(),
                message: message.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Where the form currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    Submitting,
    Displaying(AnalysisResult),
    Failed(String),
}

/// URL submission form driving a `DetectionApi`.
pub struct AnalysisForm<A: DetectionApi> {
    api: A,
    url: String,
    url_error: Option<String>,
    state: FormState,
}

impl<A: DetectionApi> AnalysisForm<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            url: String::new(),
            url_error: None,
            state: FormState::Idle,
        }
    }

    /// Editing the URL discards any previous outcome.
    pub fn set_url(&mut self, value: impl Into<String>) {
        self.url = value.into();
        self.url_error = None;
        self.state = FormState::Idle;
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Local validation message, set when `submit` refused to send.
    pub fn url_error(&self) -> Option<&str> {
        self.url_error.as_deref()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FormState::Submitting)
    }

    /// Validate the current URL and enter `Submitting`. Returns the sanitized
    /// URL to send, or `None` when local validation failed.
    pub fn begin_submit(&mut self) -> Option<String> {
        self.url_error = None;
        self.state = FormState::Idle;

        if self.url.trim().is_empty() {
            self.url_error = Some(EMPTY_URL_MESSAGE.to_string());
            return None;
        }
        if !validate_url(&self.url) {
            self.url_error = Some(INVALID_URL_MESSAGE.to_string());
            return None;
        }

        self.state = FormState::Submitting;
        Some(sanitize_url(&self.url))
    }

    /// Leave `Submitting` with the outcome of the request.
    pub fn finish_submit(&mut self, outcome: Result<AnalysisResult, ClientError>) -> &FormState {
        self.state = match outcome {
            Ok(result) => FormState::Displaying(result),
            Err(e) => {
                match &e {
                    ClientError::Service { status, .. } | ClientError::Status(status) => {
                        error!(status = *status, error = %e, "client: detection failed")
                    }
                    _ => error!(error = %e, "client: detection failed"),
                }
                FormState::Failed(e.user_message())
            }
        };
        &self.state
    }

    /// Validate, sanitize and send the current URL.
    pub async fn submit(&mut self) -> &FormState {
        let Some(sanitized) = self.begin_submit() else {
            return &self.state;
        };

        info!(url = %sanitized, "client: submitting url for analysis");
        let outcome = self.api.detect(&sanitized).await;
        self.finish_submit(outcome)
    }
}
