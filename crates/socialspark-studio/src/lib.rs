//! User-facing workflows built on the API client and the draft store.

pub mod export;
pub mod generate;
pub mod library;
pub mod schedule;

pub use export::export_draft;
pub use generate::{GeneratedContent, GenerationRequest, GenerationStage, Generator};
pub use library::{
    copy_to_bucket, edit_library_item, filter_library, hashtags_text, share_text, LibraryFilter,
};
pub use schedule::{
    compose_post_text, optimal_times, parse_run_at, schedule_post, ScheduleOutcome,
    SchedulePostInput,
};

use socialspark_api::ApiError;
use socialspark_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    /// Input rejected before any network call.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A generation step failed; later steps were not attempted.
    #[error("failed to {step}: {source}")]
    Generation {
        step: &'static str,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl StudioError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
