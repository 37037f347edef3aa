//! Postgres-backed draft store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use socialspark_core::{
    ContentDraft, DraftStatus, Engagement, LibraryItem, LibraryPatch, NewDraft,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{check_version, require_single, Bucket, DraftStore, SeedItem, StoreError};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Relative to crates/socialspark-store/Cargo.toml.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

/// Connect to a Postgres pool.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Run all pending migrations and return how many were applied.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, sqlx::migrate::MigrateError> {
    // The bookkeeping table does not exist on a fresh database.
    let applied_before = applied_migrations(pool).await;
    MIGRATOR.run(pool).await?;
    let applied_after = applied_migrations(pool).await;
    Ok(usize::try_from((applied_after - applied_before).max(0)).unwrap_or(0))
}

async fn applied_migrations(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
        .fetch_one(pool)
        .await
        .unwrap_or(0)
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, sqlx::FromRow)]
struct BucketRow {
    bucket: String,
    draft_id: Uuid,
    created_at: DateTime<Utc>,
    content: Json<NewDraft>,
}

impl BucketRow {
    fn into_draft(self) -> ContentDraft {
        ContentDraft::new(self.content.0, self.draft_id, self.created_at)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LibraryRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    content: Json<NewDraft>,
    status: String,
    engagement: Json<Engagement>,
    version: i64,
}

impl LibraryRow {
    fn into_item(self) -> Result<LibraryItem, StoreError> {
        let status: DraftStatus = self
            .status
            .parse()
            .map_err(|e: socialspark_core::CoreError| StoreError::InvalidRow(e.to_string()))?;
        let version = u64::try_from(self.version).map_err(|_| {
            StoreError::InvalidRow(format!("negative version {} for {}", self.version, self.id))
        })?;
        Ok(LibraryItem {
            draft: ContentDraft::new(self.content.0, self.id, self.created_at),
            status,
            engagement: self.engagement.0,
            version,
        })
    }
}

const LIBRARY_COLUMNS: &str = "id, created_at, content, status, engagement, version";

fn db_version(version: u64) -> i64 {
    i64::try_from(version).unwrap_or(i64::MAX)
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Draft store over the `draft_buckets` and `library_items` tables.
#[derive(Debug, Clone)]
pub struct PgDraftStore {
    pool: PgPool,
}

impl PgDraftStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn bucket_rows(&self) -> Result<Vec<BucketRow>, StoreError> {
        let mut rows = sqlx::query_as::<_, BucketRow>(
            "SELECT bucket, draft_id, created_at, content FROM draft_buckets",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.sort_by_key(|row| {
            row.bucket
                .parse::<Bucket>()
                .map_or(usize::MAX, |b| {
                    Bucket::SINGLE.iter().position(|s| *s == b).unwrap_or(usize::MAX)
                })
        });
        Ok(rows)
    }

    async fn upsert_bucket(&self, bucket: Bucket, draft: &ContentDraft) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO draft_buckets (bucket, draft_id, created_at, content) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (bucket) DO UPDATE SET \
                 draft_id = EXCLUDED.draft_id, \
                 created_at = EXCLUDED.created_at, \
                 content = EXCLUDED.content, \
                 updated_at = NOW()",
        )
        .bind(bucket.as_str())
        .bind(draft.id)
        .bind(draft.created_at)
        .bind(Json(&draft.content))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl DraftStore for PgDraftStore {
    async fn save_content(&self, bucket: Bucket, draft: NewDraft) -> Result<Uuid, StoreError> {
        let saved = ContentDraft::new(draft, Uuid::new_v4(), Utc::now());
        if bucket.is_single() {
            self.upsert_bucket(bucket, &saved).await?;
        } else {
            sqlx::query(
                "INSERT INTO library_items (id, created_at, content, status, version) \
                 VALUES ($1, $2, $3, 'draft', 1)",
            )
            .bind(saved.id)
            .bind(saved.created_at)
            .bind(Json(&saved.content))
            .execute(&self.pool)
            .await?;
        }
        tracing::info!(%bucket, id = %saved.id, "saved draft");
        Ok(saved.id)
    }

    async fn put_content(&self, bucket: Bucket, draft: ContentDraft) -> Result<(), StoreError> {
        require_single(bucket)?;
        self.upsert_bucket(bucket, &draft).await?;
        tracing::info!(%bucket, id = %draft.id, "copied draft into bucket");
        Ok(())
    }

    async fn get_content(&self, bucket: Bucket) -> Result<Option<ContentDraft>, StoreError> {
        require_single(bucket)?;
        let row = sqlx::query_as::<_, BucketRow>(
            "SELECT bucket, draft_id, created_at, content FROM draft_buckets WHERE bucket = $1",
        )
        .bind(bucket.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(BucketRow::into_draft))
    }

    async fn find_content_by_id(&self, id: Uuid) -> Result<Option<ContentDraft>, StoreError> {
        if let Some(row) = self
            .bucket_rows()
            .await?
            .into_iter()
            .find(|row| row.draft_id == id)
        {
            return Ok(Some(row.into_draft()));
        }
        Ok(self.get_from_library(id).await?.map(|item| item.draft))
    }

    async fn get_library(&self) -> Result<Vec<LibraryItem>, StoreError> {
        let rows = sqlx::query_as::<_, LibraryRow>(&format!(
            "SELECT {LIBRARY_COLUMNS} FROM library_items ORDER BY position"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(LibraryRow::into_item).collect()
    }

    async fn get_from_library(&self, id: Uuid) -> Result<Option<LibraryItem>, StoreError> {
        let row = sqlx::query_as::<_, LibraryRow>(&format!(
            "SELECT {LIBRARY_COLUMNS} FROM library_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(LibraryRow::into_item).transpose()
    }

    async fn update_in_library(
        &self,
        id: Uuid,
        patch: LibraryPatch,
        expected_version: Option<u64>,
    ) -> Result<LibraryItem, StoreError> {
        let mut tx = self.pool.begin().await?;

        let mut item = sqlx::query_as::<_, LibraryRow>(&format!(
            "SELECT {LIBRARY_COLUMNS} FROM library_items WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound(id))?
        .into_item()?;

        check_version(&item, expected_version)?;
        let previous = item.version;
        patch.apply(&mut item);

        let result = sqlx::query(
            "UPDATE library_items \
             SET content = $3, status = $4, engagement = $5, version = $6, updated_at = NOW() \
             WHERE id = $1 AND version = $2",
        )
        .bind(id)
        .bind(db_version(previous))
        .bind(Json(&item.draft.content))
        .bind(item.status.to_string())
        .bind(Json(&item.engagement))
        .bind(db_version(item.version))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::VersionConflict {
                id,
                expected: previous,
                actual: previous + 1,
            });
        }

        tx.commit().await?;
        tracing::info!(%id, version = item.version, "updated library item");
        Ok(item)
    }

    async fn remove_from_library(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM library_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_all_content(&self) -> Result<Vec<ContentDraft>, StoreError> {
        let mut all: Vec<ContentDraft> = self
            .bucket_rows()
            .await?
            .into_iter()
            .map(BucketRow::into_draft)
            .collect();
        all.extend(self.get_library().await?.into_iter().map(|item| item.draft));
        Ok(all)
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM draft_buckets")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM library_items")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!("cleared postgres draft store");
        Ok(())
    }

    async fn seed_library_if_empty(&self, items: Vec<SeedItem>) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;
        // Serialises concurrent seeders so only one of them inserts.
        sqlx::query("LOCK TABLE library_items IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM library_items")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        let count = items.len();
        for seed in items {
            let item = seed.into_library_item(Uuid::new_v4());
            sqlx::query(
                "INSERT INTO library_items (id, created_at, content, status, engagement, version) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(item.id())
            .bind(item.draft.created_at)
            .bind(Json(&item.draft.content))
            .bind(item.status.to_string())
            .bind(Json(&item.engagement))
            .bind(db_version(item.version))
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        tracing::info!(count, "seeded library");
        Ok(count)
    }
}
