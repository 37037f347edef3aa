use thiserror::Error;

/// Errors returned by the SocialSpark REST client and task poller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("{endpoint} failed with HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response parsed but violates the endpoint's contract.
    #[error("malformed response from {context}: {reason}")]
    MalformedResponse { context: String, reason: String },

    /// The render task reached the `failed` state.
    #[error("render task {task_id} failed: {message}")]
    TaskFailed { task_id: String, message: String },

    #[error("polling for task {task_id} was cancelled")]
    Cancelled { task_id: String },

    #[error("task {task_id} did not finish within {waited_secs}s")]
    DeadlineExceeded { task_id: String, waited_secs: u64 },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    /// `true` for errors a caller may retry after a delay: timeouts, connect
    /// failures, 429 and 5xx responses.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http(e) => e.is_timeout() || e.is_connect(),
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            ApiError::Deserialize { .. }
            | ApiError::MalformedResponse { .. }
            | ApiError::TaskFailed { .. }
            | ApiError::Cancelled { .. }
            | ApiError::DeadlineExceeded { .. }
            | ApiError::InvalidBaseUrl { .. } => false,
        }
    }
}
