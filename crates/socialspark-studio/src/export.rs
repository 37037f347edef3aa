//! Exporting a stored draft as a downloadable asset.

use socialspark_api::{ExportRequest, ExportResponse, SocialSparkClient};
use socialspark_store::{Bucket, DraftStore, StoreError};
use uuid::Uuid;

use crate::StudioError;

/// Copies the draft into the `export` bucket, then asks the server to render
/// it and returns the server's answer.
///
/// # Errors
///
/// - [`StoreError::NotFound`] when no bucket or library item holds `draft_id`.
/// - [`StudioError::Api`] when the export request fails.
pub async fn export_draft(
    client: &SocialSparkClient,
    store: &dyn DraftStore,
    draft_id: Uuid,
) -> Result<ExportResponse, StudioError> {
    let draft = store
        .find_content_by_id(draft_id)
        .await?
        .ok_or(StoreError::NotFound(draft_id))?;
    store.put_content(Bucket::Export, draft).await?;

    let response = client
        .export_draft(&ExportRequest {
            draft_id: draft_id.to_string(),
        })
        .await?;
    tracing::info!(%draft_id, asset_url = %response.asset_url, "draft exported");
    Ok(response)
}
