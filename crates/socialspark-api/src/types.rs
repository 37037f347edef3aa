//! Request and response types for the SocialSpark REST API.
//!
//! Every response type implements [`Validate`]; the client runs it right
//! after deserialization so malformed server data never reaches callers.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use socialspark_core::{BrandPresets, BusinessType, Language, Platform, StoryboardShot};

/// Contract checks applied to a deserialized response.
pub trait Validate {
    /// Returns a human-readable reason when the value breaks the contract.
    ///
    /// # Errors
    ///
    /// Returns the violated rule as a message.
    fn validate(&self) -> Result<(), String>;
}

fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("`{field}` is empty"))
    } else {
        Ok(())
    }
}

fn require_url(field: &str, value: &str) -> Result<(), String> {
    require_non_empty(field, value)?;
    // Relative paths are accepted; some deployments serve assets from the API origin.
    if value.starts_with('/') || reqwest::Url::parse(value).is_ok() {
        Ok(())
    } else {
        Err(format!("`{field}` is not a URL: {value}"))
    }
}

// ---------------------------------------------------------------------------
// POST /generate/caption
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CaptionRequest {
    pub idea: String,
    pub platform: Platform,
    pub language: Language,
    pub hashtags_count: u32,
    pub brand_presets: BrandPresets,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_type: Option<BusinessType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaptionResponse {
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl Validate for CaptionResponse {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("caption", &self.caption)
    }
}

// ---------------------------------------------------------------------------
// POST /generate/image
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest {
    pub idea: String,
    pub aspect_ratio: String,
    pub brand_presets: BrandPresets,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageResponse {
    pub image_url: String,
}

impl Validate for ImageResponse {
    fn validate(&self) -> Result<(), String> {
        require_url("image_url", &self.image_url)
    }
}

// ---------------------------------------------------------------------------
// POST /generate/storyboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StoryboardRequest {
    pub idea: String,
    pub platform: Platform,
    pub language: Language,
    pub number_of_shots: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<String>,
    pub brand_presets: BrandPresets,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoryboardResponse {
    pub shots: Vec<StoryboardShot>,
    #[serde(default)]
    pub music: String,
}

impl Validate for StoryboardResponse {
    fn validate(&self) -> Result<(), String> {
        if self.shots.is_empty() {
            return Err("`shots` is empty".to_string());
        }
        for (index, shot) in self.shots.iter().enumerate() {
            if !shot.duration.is_finite() || shot.duration <= 0.0 {
                return Err(format!(
                    "shot {index} has non-positive duration {}",
                    shot.duration
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// POST /render/video, GET /tasks/{id}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RenderVideoRequest {
    pub shots: Vec<StoryboardShot>,
    pub music: String,
}

/// Lifecycle of an asynchronous render task. `Ready` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Queued,
    Processing,
    Ready,
    Failed,
}

impl TaskState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Ready | TaskState::Failed)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskState::Queued => write!(f, "queued"),
            TaskState::Processing => write!(f, "processing"),
            TaskState::Ready => write!(f, "ready"),
            TaskState::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TaskState {
    type Err = String;

    /// Accepts the canonical names plus the worker-queue spellings the
    /// backend leaks through (`PENDING`, `STARTED`, `SUCCESS`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "queued" | "pending" => Ok(TaskState::Queued),
            "processing" | "started" | "retry" | "progress" => Ok(TaskState::Processing),
            "ready" | "completed" | "success" => Ok(TaskState::Ready),
            "failed" | "failure" => Ok(TaskState::Failed),
            other => Err(format!("unknown task status '{other}'")),
        }
    }
}

impl<'de> Deserialize<'de> for TaskState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderVideoResponse {
    pub task_id: String,
    pub status: TaskState,
}

impl Validate for RenderVideoResponse {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("task_id", &self.task_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskStatusResponse {
    pub status: TaskState,
    #[serde(default)]
    pub video_url: Option<String>,
    /// Failure detail, when the backend provides one.
    #[serde(default)]
    pub error: Option<String>,
}

impl Validate for TaskStatusResponse {
    fn validate(&self) -> Result<(), String> {
        match (&self.status, &self.video_url) {
            (TaskState::Ready, None) => Err("status is ready but `video_url` is missing".to_string()),
            (TaskState::Ready, Some(url)) => require_url("video_url", url),
            _ => Ok(()),
        }
    }
}

/// A render job tracked by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTask {
    pub task_id: String,
    pub status: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ExportRequest {
    pub draft_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportResponse {
    pub draft_id: String,
    pub asset_url: String,
}

impl Validate for ExportResponse {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("draft_id", &self.draft_id)?;
        require_url("asset_url", &self.asset_url)
    }
}

// ---------------------------------------------------------------------------
// POST /schedule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRequest {
    pub asset_id: String,
    pub platforms: Vec<Platform>,
    pub post_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Queued,
    Failed,
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleStatus::Queued => write!(f, "queued"),
            ScheduleStatus::Failed => write!(f, "failed"),
        }
    }
}

impl<'de> Deserialize<'de> for ScheduleStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_lowercase().as_str() {
            "queued" => Ok(ScheduleStatus::Queued),
            "failed" => Ok(ScheduleStatus::Failed),
            other => Err(serde::de::Error::custom(format!(
                "unknown schedule status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleResponse {
    pub status: ScheduleStatus,
    #[serde(default, alias = "scheduled_at")]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default, alias = "postID")]
    pub platform_post_id: Option<String>,
}

impl Validate for ScheduleResponse {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_state_accepts_worker_spellings() {
        let parsed: TaskStatusResponse =
            serde_json::from_str(r#"{"status": "PENDING", "video_url": null}"#).unwrap();
        assert_eq!(parsed.status, TaskState::Queued);
        assert_eq!("SUCCESS".parse::<TaskState>().unwrap(), TaskState::Ready);
        assert_eq!("completed".parse::<TaskState>().unwrap(), TaskState::Ready);
        assert_eq!("STARTED".parse::<TaskState>().unwrap(), TaskState::Processing);
    }

    #[test]
    fn task_state_rejects_unknown_values() {
        let result = serde_json::from_str::<TaskStatusResponse>(r#"{"status": "REVOKED"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn only_ready_and_failed_are_terminal() {
        assert!(TaskState::Ready.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(!TaskState::Queued.is_terminal());
        assert!(!TaskState::Processing.is_terminal());
    }

    #[test]
    fn ready_task_without_url_is_invalid() {
        let status = TaskStatusResponse {
            status: TaskState::Ready,
            video_url: None,
            error: None,
        };
        assert!(status.validate().is_err());
    }

    #[test]
    fn storyboard_with_zero_duration_is_invalid() {
        let response: StoryboardResponse = serde_json::from_str(
            r#"{"shots": [{"duration": 3, "text": "Pour"}, {"duration": 0, "text": "Sip"}], "music": "lofi"}"#,
        )
        .unwrap();
        let err = response.validate().unwrap_err();
        assert!(err.contains("shot 1"), "{err}");
    }

    #[test]
    fn empty_caption_is_invalid() {
        let response = CaptionResponse {
            caption: "   ".to_string(),
            hashtags: vec![],
        };
        assert!(response.validate().is_err());
    }

    #[test]
    fn image_url_may_be_relative() {
        let response = ImageResponse {
            image_url: "/static/latte.png".to_string(),
        };
        assert!(response.validate().is_ok());
        let response = ImageResponse {
            image_url: "not a url".to_string(),
        };
        assert!(response.validate().is_err());
    }

    #[test]
    fn schedule_response_accepts_legacy_field_names() {
        let parsed: ScheduleResponse = serde_json::from_str(
            r#"{"status": "Queued", "scheduled_at": "2026-11-01T09:00:00Z", "postID": "abc"}"#,
        )
        .unwrap();
        assert_eq!(parsed.status, ScheduleStatus::Queued);
        assert!(parsed.scheduled_for.is_some());
        assert_eq!(parsed.platform_post_id.as_deref(), Some("abc"));
    }

    #[test]
    fn schedule_request_omits_missing_run_at() {
        let request = ScheduleRequest {
            asset_id: "a1".to_string(),
            platforms: vec![Platform::Instagram, Platform::Tiktok],
            post_text: "Hello".to_string(),
            run_at: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("run_at").is_none());
        assert_eq!(json["platforms"], serde_json::json!(["instagram", "tiktok"]));
    }
}
