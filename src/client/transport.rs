use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::client::error::ActionError;
use crate::client::request::MovieRequest;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// What came back for a request. Only the status is inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &MovieRequest) -> Result<TransportResponse, ActionError>;
}

// ============================================================================
// reqwest-backed transport
// ============================================================================

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: url::Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ActionError> {
        let base_url = url::Url::parse(base_url).map_err(|e| ActionError::InvalidBaseUrl {
            url: base_url.to_string(),
            source: e,
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ActionError::Transport {
            method: "-".into(),
            path: base_url.to_string(),
            message: format!("could not build HTTP client: {}", e),
        })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Absolute URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> Result<url::Url, ActionError> {
        self.base_url.join(path).map_err(|e| ActionError::InvalidBaseUrl {
            url: format!("{}{}", self.base_url, path),
            source: e,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &MovieRequest) -> Result<TransportResponse, ActionError> {
        let url = self.endpoint(&request.path)?;

        let response = self
            .client
            .request(request.method.into(), url)
            .header(reqwest::header::CONTENT_TYPE, request.content_type)
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| ActionError::Transport {
                method: request.method.as_str().into(),
                path: request.path.clone(),
                message: e.to_string(),
            })?;

        Ok(TransportResponse {
            status: response.status().as_u16(),
        })
    }
}

// ============================================================================
// Recording transport (for tests)
// ============================================================================

/// Records every request and answers with scripted results, 200 once the
/// script runs out.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<MovieRequest>>,
    script: Mutex<VecDeque<Result<u16, String>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a status for the next unanswered request.
    pub fn respond_with(self, status: u16) -> Self {
        self.push(Ok(status));
        self
    }

    /// Queue a transport failure for the next unanswered request.
    pub fn fail_with(self, message: &str) -> Self {
        self.push(Err(message.to_string()));
        self
    }

    fn push(&self, entry: Result<u16, String>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(entry);
        }
    }

    pub fn requests(&self) -> Vec<MovieRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: &MovieRequest) -> Result<TransportResponse, ActionError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or(Ok(200));

        match next {
            Ok(status) => Ok(TransportResponse { status }),
            Err(message) => Err(ActionError::Transport {
                method: request.method.as_str().into(),
                path: request.path.clone(),
                message,
            }),
        }
    }
}
