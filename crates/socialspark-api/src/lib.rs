pub mod client;
pub mod error;
pub mod poller;
pub mod retry;
pub mod types;

pub use client::{ClientOptions, SocialSparkClient, TaskStatusSource};
pub use error::ApiError;
pub use poller::{PollPolicy, TaskPoller};
pub use retry::RetryPolicy;
pub use types::{
    CaptionRequest, CaptionResponse, ExportRequest, ExportResponse, ImageRequest, ImageResponse,
    RenderTask, RenderVideoRequest, RenderVideoResponse, ScheduleRequest, ScheduleResponse,
    ScheduleStatus, StoryboardRequest, StoryboardResponse, TaskState, TaskStatusResponse,
};

pub use tokio_util::sync::CancellationToken;
