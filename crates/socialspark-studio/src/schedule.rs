//! Scheduling a post for publication.

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use socialspark_api::{ScheduleRequest, ScheduleResponse, ScheduleStatus, SocialSparkClient};
use socialspark_core::{format_hashtags, DraftStatus, LibraryItem, LibraryPatch, NewDraft, Platform};
use socialspark_store::{DraftStore, StoreError};
use uuid::Uuid;

use crate::StudioError;

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulePostInput {
    pub asset_id: String,
    pub platforms: Vec<Platform>,
    pub post_text: String,
    pub run_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleOutcome {
    /// The server's answer, verbatim.
    pub response: ScheduleResponse,
    /// The library item marked `scheduled`, when the asset was one.
    pub library_item: Option<LibraryItem>,
}

/// Validates `input`, submits it, and marks the library item as scheduled
/// when the server queued the post.
///
/// # Errors
///
/// - [`StudioError::Validation`] for a blank asset id or text, no platforms,
///   or a run time in the past. No request is sent in that case.
/// - [`StudioError::Api`] when the request fails.
pub async fn schedule_post(
    client: &SocialSparkClient,
    store: &dyn DraftStore,
    input: SchedulePostInput,
) -> Result<ScheduleOutcome, StudioError> {
    let request = validate(input, Utc::now())?;
    tracing::info!(
        asset_id = %request.asset_id,
        platforms = ?request.platforms,
        run_at = ?request.run_at,
        "scheduling post"
    );

    let response = client.schedule_post(&request).await?;
    let library_item = match response.status {
        ScheduleStatus::Queued => mark_scheduled(store, &request.asset_id).await,
        ScheduleStatus::Failed => {
            tracing::warn!(asset_id = %request.asset_id, "server refused to queue post");
            None
        }
    };

    Ok(ScheduleOutcome {
        response,
        library_item,
    })
}

fn validate(input: SchedulePostInput, now: DateTime<Utc>) -> Result<ScheduleRequest, StudioError> {
    let asset_id = input.asset_id.trim().to_string();
    if asset_id.is_empty() {
        return Err(StudioError::validation("asset_id", "must not be empty"));
    }
    let post_text = input.post_text.trim().to_string();
    if post_text.is_empty() {
        return Err(StudioError::validation("post_text", "must not be empty"));
    }
    let mut platforms: Vec<Platform> = Vec::with_capacity(input.platforms.len());
    for platform in input.platforms {
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
    if platforms.is_empty() {
        return Err(StudioError::validation(
            "platforms",
            "select at least one platform",
        ));
    }
    if let Some(run_at) = input.run_at {
        ensure_future(run_at, now)?;
    }
    Ok(ScheduleRequest {
        asset_id,
        platforms,
        post_text,
        run_at: input.run_at,
    })
}

/// The library update is best effort: the post is already queued.
async fn mark_scheduled(store: &dyn DraftStore, asset_id: &str) -> Option<LibraryItem> {
    let id = Uuid::parse_str(asset_id).ok()?;
    match store
        .update_in_library(id, LibraryPatch::status(DraftStatus::Scheduled), None)
        .await
    {
        Ok(item) => Some(item),
        Err(StoreError::NotFound(_)) => None,
        Err(e) => {
            tracing::warn!(%id, error = %e, "post queued but library status not updated");
            None
        }
    }
}

fn ensure_future(run_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), StudioError> {
    if run_at <= now {
        return Err(StudioError::validation(
            "run_at",
            format!("{} is in the past", run_at.to_rfc3339()),
        ));
    }
    Ok(())
}

/// Parses a run time given as an RFC 3339 instant or as a local
/// `YYYY-MM-DDTHH:MM[:SS]` wall-clock time, and converts it to UTC.
///
/// # Errors
///
/// Returns [`StudioError::Validation`] when the text does not parse, names a
/// local time that does not exist, or is not after `now`.
pub fn parse_run_at(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, StudioError> {
    let trimmed = input.trim();
    let instant = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(_) => {
            let naive = LOCAL_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .ok_or_else(|| {
                    StudioError::validation(
                        "run_at",
                        format!("'{trimmed}' is neither RFC 3339 nor YYYY-MM-DDTHH:MM"),
                    )
                })?;
            Local
                .from_local_datetime(&naive)
                .earliest()
                .ok_or_else(|| {
                    StudioError::validation("run_at", format!("{naive} does not exist locally"))
                })?
                .with_timezone(&Utc)
        }
    };
    ensure_future(instant, now)?;
    Ok(instant)
}

/// Suggested posting times (local wall clock) for `platform`.
#[must_use]
pub fn optimal_times(platform: Platform) -> Vec<NaiveTime> {
    let hours: &[u32] = match platform {
        Platform::Tiktok => &[6, 10, 19, 21],
        Platform::Instagram | Platform::Facebook | Platform::Twitter => &[9, 12, 17, 20],
    };
    hours
        .iter()
        .filter_map(|h| NaiveTime::from_hms_opt(*h, 0, 0))
        .collect()
}

/// Caption, a blank line, then the hashtags.
#[must_use]
pub fn compose_post_text(draft: &NewDraft) -> String {
    let caption = draft.caption.trim();
    if draft.hashtags.is_empty() {
        return caption.to_string();
    }
    format!("{caption}\n\n{}", format_hashtags(&draft.hashtags))
}
