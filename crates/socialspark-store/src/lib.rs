//! Draft store: named single-draft buckets plus the list-valued library.
//!
//! Two backends implement [`DraftStore`]: [`LocalDraftStore`] (in memory,
//! optionally persisted to one JSON file) and [`PgDraftStore`] (Postgres).

pub mod local;
pub mod pg;
pub mod seed;

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use socialspark_core::{ContentDraft, LibraryItem, LibraryPatch, NewDraft};
use thiserror::Error;
use uuid::Uuid;

pub use local::LocalDraftStore;
pub use pg::{connect_pool, ping, run_migrations, PgDraftStore, PoolConfig};
pub use seed::{sample_library, SeedItem};

/// A named slot in the draft store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Holds a list of [`LibraryItem`]s; every other bucket holds one draft.
    Library,
    Scheduler,
    Editor,
    Post,
    Export,
}

impl Bucket {
    /// The single-draft buckets, in lookup order.
    pub const SINGLE: [Bucket; 4] = [
        Bucket::Scheduler,
        Bucket::Editor,
        Bucket::Post,
        Bucket::Export,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Library => "library",
            Bucket::Scheduler => "scheduler",
            Bucket::Editor => "editor",
            Bucket::Post => "post",
            Bucket::Export => "export",
        }
    }

    #[must_use]
    pub fn is_single(self) -> bool {
        self != Bucket::Library
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "library" => Ok(Bucket::Library),
            "scheduler" => Ok(Bucket::Scheduler),
            "editor" => Ok(Bucket::Editor),
            "post" => Ok(Bucket::Post),
            "export" => Ok(Bucket::Export),
            _ => Err(StoreError::UnknownBucket(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("draft {0} not found")]
    NotFound(Uuid),

    #[error("library item {id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict { id: Uuid, expected: u64, actual: u64 },

    #[error("store file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode or decode store document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("bucket '{0}' holds a list; use the library operations instead")]
    NotSingleBucket(Bucket),

    #[error("unknown bucket '{0}' (expected library, scheduler, editor, post or export)")]
    UnknownBucket(String),

    #[error("stored row is invalid: {0}")]
    InvalidRow(String),
}

/// Storage operations shared by every backend.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Stores `draft` under a fresh id and returns that id.
    ///
    /// Single-draft buckets are overwritten; the library appends a new item
    /// at version 1 with `draft` status.
    async fn save_content(&self, bucket: Bucket, draft: NewDraft) -> Result<Uuid, StoreError>;

    /// Places an existing draft, id included, into a single-draft bucket.
    async fn put_content(&self, bucket: Bucket, draft: ContentDraft) -> Result<(), StoreError>;

    async fn get_content(&self, bucket: Bucket) -> Result<Option<ContentDraft>, StoreError>;

    /// Looks in every single-draft bucket, then the library.
    async fn find_content_by_id(&self, id: Uuid) -> Result<Option<ContentDraft>, StoreError>;

    async fn get_library(&self) -> Result<Vec<LibraryItem>, StoreError>;

    async fn get_from_library(&self, id: Uuid) -> Result<Option<LibraryItem>, StoreError>;

    /// Applies `patch` and returns the updated item.
    ///
    /// With `expected_version`, fails with [`StoreError::VersionConflict`]
    /// unless the stored version matches.
    async fn update_in_library(
        &self,
        id: Uuid,
        patch: LibraryPatch,
        expected_version: Option<u64>,
    ) -> Result<LibraryItem, StoreError>;

    /// Returns `false` when no item had this id.
    async fn remove_from_library(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Single-draft bucket contents followed by the library drafts.
    async fn get_all_content(&self) -> Result<Vec<ContentDraft>, StoreError>;

    async fn clear_all(&self) -> Result<(), StoreError>;

    /// Inserts `items` only when the library is empty. Returns how many were
    /// inserted.
    async fn seed_library_if_empty(&self, items: Vec<SeedItem>) -> Result<usize, StoreError>;
}

pub(crate) fn require_single(bucket: Bucket) -> Result<(), StoreError> {
    if bucket.is_single() {
        Ok(())
    } else {
        Err(StoreError::NotSingleBucket(bucket))
    }
}

pub(crate) fn check_version(item: &LibraryItem, expected: Option<u64>) -> Result<(), StoreError> {
    match expected {
        Some(expected) if expected != item.version => Err(StoreError::VersionConflict {
            id: item.id(),
            expected,
            actual: item.version,
        }),
        _ => Ok(()),
    }
}
