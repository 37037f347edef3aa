use socialspark_core::{ContentType, DraftStatus, Engagement, Platform};

use super::*;
use crate::sample_library;

fn draft(title: &str) -> NewDraft {
    NewDraft {
        title: title.to_string(),
        caption: format!("{title} caption"),
        hashtags: vec!["Coffee".to_string()],
        image_url: Some("https://cdn.example.com/a.png".to_string()),
        video_url: None,
        platform: Platform::Instagram,
        content_type: ContentType::Image,
        storyboard: None,
        overlays: None,
    }
}

fn temp_store_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("socialspark-store-{}", Uuid::new_v4()))
        .join("drafts.json")
}

#[tokio::test]
async fn single_bucket_save_overwrites() {
    let store = LocalDraftStore::in_memory();
    let first = store.save_content(Bucket::Editor, draft("one")).await.unwrap();
    let second = store.save_content(Bucket::Editor, draft("two")).await.unwrap();

    let current = store.get_content(Bucket::Editor).await.unwrap().unwrap();
    assert_eq!(current.id, second);
    assert_eq!(current.content.title, "two");
    assert!(store.find_content_by_id(first).await.unwrap().is_none());
}

#[tokio::test]
async fn library_save_appends_with_distinct_ids() {
    let store = LocalDraftStore::in_memory();
    let a = store.save_content(Bucket::Library, draft("a")).await.unwrap();
    let b = store.save_content(Bucket::Library, draft("a")).await.unwrap();

    let library = store.get_library().await.unwrap();
    assert_eq!(library.len(), 2);
    assert_ne!(a, b);
    assert!(library.iter().all(|item| item.status == DraftStatus::Draft
        && item.version == 1
        && item.engagement == Engagement::default()));
}

#[tokio::test]
async fn save_then_find_round_trips_content() {
    let store = LocalDraftStore::in_memory();
    let original = draft("Weekend Special");
    let id = store
        .save_content(Bucket::Scheduler, original.clone())
        .await
        .unwrap();

    let found = store.find_content_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.content, original);
}

#[tokio::test]
async fn find_checks_library_after_buckets() {
    let store = LocalDraftStore::in_memory();
    let id = store.save_content(Bucket::Library, draft("lib")).await.unwrap();
    store.save_content(Bucket::Post, draft("post")).await.unwrap();

    let found = store.find_content_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.content.title, "lib");
    assert!(store.find_content_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn get_content_rejects_library_bucket() {
    let store = LocalDraftStore::in_memory();
    let err = store.get_content(Bucket::Library).await.unwrap_err();
    assert!(matches!(err, StoreError::NotSingleBucket(Bucket::Library)));
}

#[tokio::test]
async fn put_content_keeps_the_draft_id() {
    let store = LocalDraftStore::in_memory();
    let id = store.save_content(Bucket::Library, draft("keep")).await.unwrap();
    let item = store.get_from_library(id).await.unwrap().unwrap();

    store
        .put_content(Bucket::Scheduler, item.draft.clone())
        .await
        .unwrap();
    let copied = store.get_content(Bucket::Scheduler).await.unwrap().unwrap();
    assert_eq!(copied, item.draft);
}

#[tokio::test]
async fn update_applies_patch_and_bumps_version() {
    let store = LocalDraftStore::in_memory();
    let id = store.save_content(Bucket::Library, draft("x")).await.unwrap();

    let updated = store
        .update_in_library(id, LibraryPatch::status(DraftStatus::Scheduled), Some(1))
        .await
        .unwrap();
    assert_eq!(updated.status, DraftStatus::Scheduled);
    assert_eq!(updated.version, 2);
    assert_eq!(store.get_from_library(id).await.unwrap().unwrap(), updated);
}

#[tokio::test]
async fn stale_version_is_a_conflict() {
    let store = LocalDraftStore::in_memory();
    let id = store.save_content(Bucket::Library, draft("x")).await.unwrap();
    store
        .update_in_library(
            id,
            LibraryPatch {
                caption: Some("edited".to_string()),
                ..LibraryPatch::default()
            },
            None,
        )
        .await
        .unwrap();

    let err = store
        .update_in_library(id, LibraryPatch::status(DraftStatus::Published), Some(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::VersionConflict {
            expected: 1,
            actual: 2,
            ..
        }
    ));
    let item = store.get_from_library(id).await.unwrap().unwrap();
    assert_eq!(item.status, DraftStatus::Draft);
    assert_eq!(item.draft.content.caption, "edited");
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let store = LocalDraftStore::in_memory();
    let missing = Uuid::new_v4();
    let err = store
        .update_in_library(missing, LibraryPatch::status(DraftStatus::Published), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
}

#[tokio::test]
async fn remove_reports_whether_anything_was_removed() {
    let store = LocalDraftStore::in_memory();
    let id = store.save_content(Bucket::Library, draft("x")).await.unwrap();
    assert!(store.remove_from_library(id).await.unwrap());
    assert!(!store.remove_from_library(id).await.unwrap());
    assert!(store.get_library().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_all_lists_buckets_then_library() {
    let store = LocalDraftStore::in_memory();
    store.save_content(Bucket::Library, draft("lib")).await.unwrap();
    store.save_content(Bucket::Export, draft("export")).await.unwrap();
    store.save_content(Bucket::Scheduler, draft("sched")).await.unwrap();

    let titles: Vec<String> = store
        .get_all_content()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.content.title)
        .collect();
    assert_eq!(titles, vec!["sched", "export", "lib"]);
}

#[tokio::test]
async fn clear_all_empties_everything() {
    let store = LocalDraftStore::in_memory();
    store.save_content(Bucket::Library, draft("lib")).await.unwrap();
    store.save_content(Bucket::Editor, draft("ed")).await.unwrap();
    store.clear_all().await.unwrap();
    assert!(store.get_all_content().await.unwrap().is_empty());
}

#[tokio::test]
async fn seeding_only_happens_on_an_empty_library() {
    let store = LocalDraftStore::in_memory();
    assert_eq!(store.seed_library_if_empty(sample_library()).await.unwrap(), 4);
    assert_eq!(store.seed_library_if_empty(sample_library()).await.unwrap(), 0);

    let library = store.get_library().await.unwrap();
    assert_eq!(library.len(), 4);
    assert_eq!(library[0].draft.content.title, "Caramel Macadamia Latte");
    assert_eq!(library[0].status, DraftStatus::Published);
}

#[tokio::test]
async fn file_store_persists_across_reopen() {
    let path = temp_store_path();
    let id = {
        let store = LocalDraftStore::open(&path).await.unwrap();
        let id = store.save_content(Bucket::Library, draft("kept")).await.unwrap();
        store.save_content(Bucket::Editor, draft("editing")).await.unwrap();
        store
            .update_in_library(id, LibraryPatch::status(DraftStatus::Published), Some(1))
            .await
            .unwrap();
        id
    };

    let reopened = LocalDraftStore::open(&path).await.unwrap();
    let item = reopened.get_from_library(id).await.unwrap().unwrap();
    assert_eq!(item.status, DraftStatus::Published);
    assert_eq!(item.version, 2);
    assert_eq!(
        reopened
            .get_content(Bucket::Editor)
            .await
            .unwrap()
            .unwrap()
            .content
            .title,
        "editing"
    );

    if let Some(dir) = path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}

#[tokio::test]
async fn opening_a_missing_file_starts_empty() {
    let path = temp_store_path();
    let store = LocalDraftStore::open(&path).await.unwrap();
    assert_eq!(store.path(), Some(path.as_path()));
    assert!(store.get_all_content().await.unwrap().is_empty());
    assert!(!path.exists(), "nothing is written until the first mutation");
}

#[tokio::test]
async fn corrupt_file_is_a_serialize_error() {
    let path = temp_store_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).unwrap();
    }
    std::fs::write(&path, b"{ not json").unwrap();

    let result = LocalDraftStore::open(&path).await;
    assert!(matches!(result, Err(StoreError::Serialize(_))));

    if let Some(dir) = path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}
