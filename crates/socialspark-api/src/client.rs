//! HTTP client for the SocialSpark REST API.
//!
//! Wraps `reqwest` with typed request/response bodies, boundary validation of
//! every response, error-message extraction for non-2xx answers, and retries
//! for the idempotent task-status lookup. Generation and scheduling POSTs are
//! sent exactly once.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use socialspark_core::AppConfig;

use crate::error::ApiError;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::types::{
    CaptionRequest, CaptionResponse, ExportRequest, ExportResponse, ImageRequest, ImageResponse,
    RenderVideoRequest, RenderVideoResponse, ScheduleRequest, ScheduleResponse,
    StoryboardRequest, StoryboardResponse, TaskStatusResponse, Validate,
};

const DEFAULT_BASE_URL: &str = "http://localhost:8000/";
const DEFAULT_USER_AGENT: &str = "socialspark/0.1 (content-studio)";

/// Construction settings for [`SocialSparkClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_url.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            retry: RetryPolicy {
                max_retries: config.max_retries,
                backoff_base_ms: config.retry_backoff_base_ms,
            },
        }
    }
}

/// Anything that can report the status of a render task.
///
/// Implemented by [`SocialSparkClient`]; the poller is generic over it so it
/// can be driven by a scripted source in tests.
#[async_trait]
pub trait TaskStatusSource: Send + Sync {
    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse, ApiError>;
}

/// Client for the SocialSpark REST API.
pub struct SocialSparkClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl SocialSparkClient {
    /// Creates a client from explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn new(options: ClientOptions) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(options.user_agent.as_str())
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment of a prefixed base URL.
        let normalised = format!("{}/", options.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            url: options.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            retry: options.retry,
        })
    }

    /// Creates a client pointed at `base_url` with default timeouts and no
    /// retries (for tests against a mock server).
    ///
    /// # Errors
    ///
    /// See [`SocialSparkClient::new`].
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::new(ClientOptions {
            base_url: base_url.to_string(),
            timeout_secs: 30,
            retry: RetryPolicy::none(),
            ..ClientOptions::default()
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /generate/caption`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Status`] on a non-2xx answer.
    /// - [`ApiError::Deserialize`] / [`ApiError::MalformedResponse`] when the
    ///   body does not match the contract.
    pub async fn generate_caption(
        &self,
        request: &CaptionRequest,
    ) -> Result<CaptionResponse, ApiError> {
        self.post_json("generate/caption", request).await
    }

    /// `POST /generate/image`.
    ///
    /// # Errors
    ///
    /// See [`SocialSparkClient::generate_caption`].
    pub async fn generate_image(&self, request: &ImageRequest) -> Result<ImageResponse, ApiError> {
        self.post_json("generate/image", request).await
    }

    /// `POST /generate/storyboard`.
    ///
    /// # Errors
    ///
    /// See [`SocialSparkClient::generate_caption`].
    pub async fn generate_storyboard(
        &self,
        request: &StoryboardRequest,
    ) -> Result<StoryboardResponse, ApiError> {
        self.post_json("generate/storyboard", request).await
    }

    /// `POST /render/video`: submits a storyboard and returns the task handle.
    ///
    /// # Errors
    ///
    /// See [`SocialSparkClient::generate_caption`].
    pub async fn render_video(
        &self,
        request: &RenderVideoRequest,
    ) -> Result<RenderVideoResponse, ApiError> {
        self.post_json("render/video", request).await
    }

    /// `GET /tasks/{id}`, retried on transient failures.
    ///
    /// # Errors
    ///
    /// See [`SocialSparkClient::generate_caption`]; transient errors are only
    /// returned once the retry budget is spent.
    pub async fn get_task(&self, task_id: &str) -> Result<TaskStatusResponse, ApiError> {
        let url = self.endpoint_url(&["tasks", task_id])?;
        let context = format!("GET /tasks/{task_id}");
        let (url, context) = (&url, context.as_str());
        retry_with_backoff(self.retry, context, || async move {
            tracing::debug!(%url, "requesting task status");
            let response = self.client.get(url.clone()).send().await?;
            Self::decode(context, response).await
        })
        .await
    }

    /// `POST /export`.
    ///
    /// # Errors
    ///
    /// See [`SocialSparkClient::generate_caption`].
    pub async fn export_draft(&self, request: &ExportRequest) -> Result<ExportResponse, ApiError> {
        self.post_json("export", request).await
    }

    /// `POST /schedule`. A `failed` status in the body is a successful call;
    /// the caller decides what to do with it.
    ///
    /// # Errors
    ///
    /// See [`SocialSparkClient::generate_caption`].
    pub async fn schedule_post(
        &self,
        request: &ScheduleRequest,
    ) -> Result<ScheduleResponse, ApiError> {
        self.post_json("schedule", request).await
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, ApiError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned + Validate,
    {
        let segments: Vec<&str> = path.split('/').collect();
        let url = self.endpoint_url(&segments)?;
        let context = format!("POST /{path}");
        tracing::debug!(%url, "sending request");
        let response = self.client.post(url).json(body).send().await?;
        Self::decode(&context, response).await
    }

    /// Checks the status, parses the body, and validates the contract.
    async fn decode<Resp>(context: &str, response: reqwest::Response) -> Result<Resp, ApiError>
    where
        Resp: DeserializeOwned + Validate,
    {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: context.to_string(),
                status: status.as_u16(),
                message: extract_error_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
            });
        }

        let parsed: Resp = serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: context.to_string(),
            source: e,
        })?;
        parsed
            .validate()
            .map_err(|reason| ApiError::MalformedResponse {
                context: context.to_string(),
                reason,
            })?;
        Ok(parsed)
    }
}

#[async_trait]
impl TaskStatusSource for SocialSparkClient {
    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse, ApiError> {
        self.get_task(task_id).await
    }
}

/// Pulls a human-readable message out of an error body.
///
/// Understands FastAPI's `{"detail": ...}` plus the `message`/`error` keys
/// used elsewhere; falls back to the raw text when it is short and not JSON.
fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => ["detail", "message", "error"]
            .iter()
            .find_map(|key| value.get(key))
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        Err(_) if trimmed.len() <= 200 => Some(trimmed.to_string()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> SocialSparkClient {
        SocialSparkClient::with_base_url(base_url).expect("client construction should not fail")
    }

    #[test]
    fn endpoint_url_appends_to_prefixed_base() {
        let client = test_client("https://api.example.com/v1");
        let url = client.endpoint_url(&["generate", "caption"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/generate/caption");
    }

    #[test]
    fn endpoint_url_strips_trailing_slash() {
        let client = test_client("http://localhost:8000/");
        let url = client.endpoint_url(&["tasks", "abc"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/tasks/abc");
    }

    #[test]
    fn endpoint_url_encodes_task_id() {
        let client = test_client("http://localhost:8000");
        let url = client.endpoint_url(&["tasks", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/tasks/a%2Fb%20c");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = SocialSparkClient::with_base_url("not a url");
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn extracts_fastapi_detail() {
        assert_eq!(
            extract_error_message(r#"{"detail": "Failed to generate Caption"}"#).as_deref(),
            Some("Failed to generate Caption")
        );
    }

    #[test]
    fn extracts_structured_detail_as_json() {
        let msg = extract_error_message(r#"{"detail": [{"loc": ["body", "idea"]}]}"#).unwrap();
        assert!(msg.contains("idea"));
    }

    #[test]
    fn extracts_plain_text_body() {
        assert_eq!(
            extract_error_message("Internal Server Error").as_deref(),
            Some("Internal Server Error")
        );
        assert!(extract_error_message("   ").is_none());
    }
}
