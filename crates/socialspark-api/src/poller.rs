//! Waits for a render task to reach a terminal state.
//!
//! The poller queries immediately, then sleeps between queries with a
//! growing interval. It stops on `ready` (returning the video URL), on
//! `failed` (returning [`ApiError::TaskFailed`]), when the cancellation token
//! fires, or when the deadline passes.

use std::time::Duration;

use socialspark_core::AppConfig;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::client::TaskStatusSource;
use crate::error::ApiError;
use crate::types::{TaskState, TaskStatusResponse};

/// Interval growth and overall deadline for [`TaskPoller`].
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    /// Factor applied to the interval after every non-terminal answer.
    pub multiplier: f64,
    pub max_interval: Duration,
    /// `None` waits indefinitely (cancellation still applies).
    pub deadline: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(2),
            multiplier: 1.5,
            max_interval: Duration::from_secs(15),
            deadline: Some(Duration::from_secs(15 * 60)),
        }
    }
}

impl PollPolicy {
    /// A constant interval with no deadline.
    #[must_use]
    pub fn fixed(interval: Duration) -> Self {
        Self {
            initial_interval: interval,
            multiplier: 1.0,
            max_interval: interval,
            deadline: None,
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            initial_interval: Duration::from_millis(config.poll_interval_ms),
            max_interval: Duration::from_millis(config.poll_max_interval_ms),
            deadline: config.poll_deadline_secs.map(Duration::from_secs),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    fn next_interval(&self, current: Duration) -> Duration {
        let grown = current.mul_f64(self.multiplier.max(1.0));
        grown.min(self.max_interval)
    }
}

/// Polls a [`TaskStatusSource`] until the task is terminal.
pub struct TaskPoller<'a, S: TaskStatusSource + ?Sized> {
    source: &'a S,
    policy: PollPolicy,
}

impl<'a, S: TaskStatusSource + ?Sized> TaskPoller<'a, S> {
    #[must_use]
    pub fn new(source: &'a S, policy: PollPolicy) -> Self {
        Self { source, policy }
    }

    #[must_use]
    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Waits for `task_id` to finish and returns its video URL.
    ///
    /// `on_status` sees every non-terminal answer, in order.
    ///
    /// # Errors
    ///
    /// - [`ApiError::TaskFailed`] when the task reports `failed`.
    /// - [`ApiError::MalformedResponse`] when a `ready` answer has no URL.
    /// - [`ApiError::Cancelled`] when `cancel` fires.
    /// - [`ApiError::DeadlineExceeded`] when the policy deadline passes.
    /// - Any error from the status source (after its own retries).
    pub async fn wait<F>(
        &self,
        task_id: &str,
        cancel: &CancellationToken,
        mut on_status: F,
    ) -> Result<String, ApiError>
    where
        F: FnMut(&TaskStatusResponse),
    {
        let started = Instant::now();
        let deadline_at = self.policy.deadline.map(|d| started + d);
        let mut interval = self.policy.initial_interval;
        let mut polls = 0u32;

        loop {
            let status = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(cancelled(task_id, polls)),
                () = sleep_until(deadline_at) => return Err(deadline_exceeded(task_id, started)),
                result = self.source.task_status(task_id) => result?,
            };
            polls += 1;

            match status.status {
                TaskState::Ready => {
                    let url = status.video_url.ok_or_else(|| ApiError::MalformedResponse {
                        context: format!("GET /tasks/{task_id}"),
                        reason: "status is ready but `video_url` is missing".to_string(),
                    })?;
                    tracing::info!(task_id, polls, "render task ready");
                    return Ok(url);
                }
                TaskState::Failed => {
                    let message = status
                        .error
                        .unwrap_or_else(|| "video rendering failed".to_string());
                    tracing::warn!(task_id, polls, %message, "render task failed");
                    return Err(ApiError::TaskFailed {
                        task_id: task_id.to_string(),
                        message,
                    });
                }
                TaskState::Queued | TaskState::Processing => {
                    tracing::debug!(task_id, status = %status.status, ?interval, "render task pending");
                    on_status(&status);
                }
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(cancelled(task_id, polls)),
                () = sleep_until(deadline_at) => return Err(deadline_exceeded(task_id, started)),
                () = tokio::time::sleep(interval) => {}
            }
            interval = self.policy.next_interval(interval);
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn cancelled(task_id: &str, polls: u32) -> ApiError {
    tracing::info!(task_id, polls, "render task polling cancelled");
    ApiError::Cancelled {
        task_id: task_id.to_string(),
    }
}

fn deadline_exceeded(task_id: &str, started: Instant) -> ApiError {
    ApiError::DeadlineExceeded {
        task_id: task_id.to_string(),
        waited_secs: started.elapsed().as_secs(),
    }
}
