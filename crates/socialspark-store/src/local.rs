//! In-memory draft store, optionally persisted as a single JSON document.
//!
//! Every mutation works on a copy of the document, writes it to disk (temp
//! file then rename), and only then replaces the in-memory state, so a failed
//! write leaves both sides unchanged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use socialspark_core::{ContentDraft, LibraryItem, LibraryPatch, NewDraft};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{check_version, require_single, Bucket, DraftStore, SeedItem, StoreError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    buckets: BTreeMap<Bucket, ContentDraft>,
    #[serde(default)]
    library: Vec<LibraryItem>,
}

pub struct LocalDraftStore {
    path: Option<PathBuf>,
    state: Mutex<StoreDocument>,
}

impl LocalDraftStore {
    /// A store that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(StoreDocument::default()),
        }
    }

    /// Opens (or lazily creates) a store backed by the JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, or
    /// [`StoreError::Serialize`] if it is not a valid store document.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => StoreDocument::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreDocument::default(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        tracing::debug!(
            path = %path.display(),
            library = document.library.len(),
            "opened local draft store"
        );
        Ok(Self {
            path: Some(path),
            state: Mutex::new(document),
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Runs `f` against a copy of the document and commits it once persisted.
    async fn mutate<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut StoreDocument) -> Result<T, StoreError> + Send,
        T: Send,
    {
        let mut guard = self.state.lock().await;
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }

    async fn persist(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| StoreError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let bytes = serde_json::to_vec_pretty(document)?;
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
        Ok(())
    }
}

#[async_trait]
impl DraftStore for LocalDraftStore {
    async fn save_content(&self, bucket: Bucket, draft: NewDraft) -> Result<Uuid, StoreError> {
        let saved = ContentDraft::new(draft, Uuid::new_v4(), Utc::now());
        let id = saved.id;
        self.mutate(move |doc| {
            if bucket.is_single() {
                doc.buckets.insert(bucket, saved);
            } else {
                doc.library.push(LibraryItem::from_draft(saved));
            }
            Ok(())
        })
        .await?;
        tracing::info!(%bucket, %id, "saved draft");
        Ok(id)
    }

    async fn put_content(&self, bucket: Bucket, draft: ContentDraft) -> Result<(), StoreError> {
        require_single(bucket)?;
        let id = draft.id;
        self.mutate(move |doc| {
            doc.buckets.insert(bucket, draft);
            Ok(())
        })
        .await?;
        tracing::info!(%bucket, %id, "copied draft into bucket");
        Ok(())
    }

    async fn get_content(&self, bucket: Bucket) -> Result<Option<ContentDraft>, StoreError> {
        require_single(bucket)?;
        Ok(self.state.lock().await.buckets.get(&bucket).cloned())
    }

    async fn find_content_by_id(&self, id: Uuid) -> Result<Option<ContentDraft>, StoreError> {
        let doc = self.state.lock().await;
        let found = Bucket::SINGLE
            .iter()
            .filter_map(|b| doc.buckets.get(b))
            .find(|d| d.id == id)
            .or_else(|| {
                doc.library
                    .iter()
                    .map(|item| &item.draft)
                    .find(|d| d.id == id)
            });
        Ok(found.cloned())
    }

    async fn get_library(&self) -> Result<Vec<LibraryItem>, StoreError> {
        Ok(self.state.lock().await.library.clone())
    }

    async fn get_from_library(&self, id: Uuid) -> Result<Option<LibraryItem>, StoreError> {
        let doc = self.state.lock().await;
        Ok(doc.library.iter().find(|item| item.id() == id).cloned())
    }

    async fn update_in_library(
        &self,
        id: Uuid,
        patch: LibraryPatch,
        expected_version: Option<u64>,
    ) -> Result<LibraryItem, StoreError> {
        let updated = self
            .mutate(move |doc| {
                let item = doc
                    .library
                    .iter_mut()
                    .find(|item| item.id() == id)
                    .ok_or(StoreError::NotFound(id))?;
                check_version(item, expected_version)?;
                patch.apply(item);
                Ok(item.clone())
            })
            .await?;
        tracing::info!(%id, version = updated.version, "updated library item");
        Ok(updated)
    }

    async fn remove_from_library(&self, id: Uuid) -> Result<bool, StoreError> {
        let removed = self
            .mutate(move |doc| {
                let before = doc.library.len();
                doc.library.retain(|item| item.id() != id);
                Ok(doc.library.len() != before)
            })
            .await?;
        if removed {
            tracing::info!(%id, "removed library item");
        }
        Ok(removed)
    }

    async fn get_all_content(&self) -> Result<Vec<ContentDraft>, StoreError> {
        let doc = self.state.lock().await;
        let mut all: Vec<ContentDraft> = Bucket::SINGLE
            .iter()
            .filter_map(|b| doc.buckets.get(b).cloned())
            .collect();
        all.extend(doc.library.iter().map(|item| item.draft.clone()));
        Ok(all)
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        self.mutate(|doc| {
            *doc = StoreDocument::default();
            Ok(())
        })
        .await?;
        tracing::info!("cleared local draft store");
        Ok(())
    }

    async fn seed_library_if_empty(&self, items: Vec<SeedItem>) -> Result<usize, StoreError> {
        self.mutate(move |doc| {
            if !doc.library.is_empty() {
                return Ok(0);
            }
            let count = items.len();
            doc.library.extend(
                items
                    .into_iter()
                    .map(|seed| seed.into_library_item(Uuid::new_v4())),
            );
            Ok(count)
        })
        .await
    }
}

#[cfg(test)]
#[path = "local_test.rs"]
mod tests;
