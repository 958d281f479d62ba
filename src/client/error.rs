use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    /// No element with the given id exists on the page
    #[error("Element '{0}' not found")]
    ElementNotFound(String),

    /// Server answered with a non-2xx status
    #[error("{method} {path} rejected with status {status}")]
    RequestRejected {
        method: String,
        path: String,
        status: u16,
    },

    /// Network or client failure before a status was received
    #[error("{method} {path} failed: {message}")]
    Transport {
        method: String,
        path: String,
        message: String,
    },

    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Page file could not be read, parsed or written
    #[error("Page file '{path}': {message}")]
    PageFile { path: String, message: String },
}

impl ActionError {
    /// True for failures of the request itself (as opposed to local errors).
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            ActionError::RequestRejected { .. } | ActionError::Transport { .. }
        )
    }
}
