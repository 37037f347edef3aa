//! Library browsing helpers.

use socialspark_core::{
    format_hashtags, strip_hash_marks, ContentDraft, ContentType, DraftStatus, LibraryItem,
    LibraryPatch, Platform,
};
use socialspark_store::{Bucket, DraftStore, StoreError};
use uuid::Uuid;

use crate::schedule::compose_post_text;
use crate::StudioError;

/// `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryFilter {
    /// Case-insensitive substring of the title or caption.
    pub query: Option<String>,
    pub content_type: Option<ContentType>,
    pub platform: Option<Platform>,
    pub status: Option<DraftStatus>,
}

impl LibraryFilter {
    #[must_use]
    pub fn matches(&self, item: &LibraryItem) -> bool {
        let content = &item.draft.content;
        let matches_query = self
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map_or(true, |q| {
                let q = q.to_lowercase();
                content.title.to_lowercase().contains(&q)
                    || content.caption.to_lowercase().contains(&q)
            });

        matches_query
            && self.content_type.map_or(true, |t| content.content_type == t)
            && self.platform.map_or(true, |p| content.platform == p)
            && self.status.map_or(true, |s| item.status == s)
    }
}

#[must_use]
pub fn filter_library<'a>(items: &'a [LibraryItem], filter: &LibraryFilter) -> Vec<&'a LibraryItem> {
    items.iter().filter(|item| filter.matches(item)).collect()
}

/// Caption and hashtags, ready to paste into a post.
#[must_use]
pub fn share_text(item: &LibraryItem) -> String {
    compose_post_text(&item.draft.content)
}

#[must_use]
pub fn hashtags_text(item: &LibraryItem) -> String {
    format_hashtags(&item.draft.content.hashtags)
}

/// Applies editor changes to a library item.
///
/// Title and caption are trimmed and must stay non-empty; hashtags lose any
/// leading `#`. When the editor bucket holds a copy of the same draft it is
/// refreshed so both show the saved content.
///
/// # Errors
///
/// - [`StudioError::Validation`] for an empty patch or a blank title/caption.
/// - [`StoreError::NotFound`] / [`StoreError::VersionConflict`] from the store.
pub async fn edit_library_item(
    store: &dyn DraftStore,
    id: Uuid,
    patch: LibraryPatch,
    expected_version: Option<u64>,
) -> Result<LibraryItem, StudioError> {
    let patch = clean_patch(patch)?;
    let item = store.update_in_library(id, patch, expected_version).await?;

    if let Some(editor) = store.get_content(Bucket::Editor).await? {
        if editor.id == id {
            store.put_content(Bucket::Editor, item.draft.clone()).await?;
        }
    }
    tracing::info!(%id, version = item.version, "library item edited");
    Ok(item)
}

fn clean_patch(mut patch: LibraryPatch) -> Result<LibraryPatch, StudioError> {
    if patch.is_empty() {
        return Err(StudioError::validation("patch", "nothing to change"));
    }
    if let Some(title) = patch.title.as_mut() {
        *title = title.trim().to_string();
        if title.is_empty() {
            return Err(StudioError::validation("title", "must not be blank"));
        }
    }
    if let Some(caption) = patch.caption.as_mut() {
        *caption = caption.trim().to_string();
        if caption.is_empty() {
            return Err(StudioError::validation("caption", "must not be blank"));
        }
    }
    patch.hashtags = patch.hashtags.map(strip_hash_marks);
    Ok(patch)
}

/// Copies a library item into a single-draft bucket, keeping its id.
///
/// # Errors
///
/// - [`StoreError::NotFound`] when no library item has `id`.
/// - [`StoreError::NotSingleBucket`] when `bucket` is the library.
pub async fn copy_to_bucket(
    store: &dyn DraftStore,
    id: Uuid,
    bucket: Bucket,
) -> Result<ContentDraft, StudioError> {
    let item = store
        .get_from_library(id)
        .await?
        .ok_or(StoreError::NotFound(id))?;
    store.put_content(bucket, item.draft.clone()).await?;
    Ok(item.draft)
}
