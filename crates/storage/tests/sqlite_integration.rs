use std::sync::Arc;

use lingo_core::model::{LanguageCode, ProgressMap, ProgressRecord, Score};
use lingo_core::time::fixed_now;
use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteStore;
use storage::{LocalStore, PROGRESS_KEY};

#[tokio::test]
async fn sqlite_store_overwrites_and_removes() {
    let store = SqliteStore::connect("sqlite:file:memdb_kv_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    assert_eq!(store.get("lastLessonLang").await.unwrap(), None);
    store.set("lastLessonLang", "english").await.unwrap();
    store.set("lastLessonLang", "tamil").await.unwrap();
    assert_eq!(
        store.get("lastLessonLang").await.unwrap().as_deref(),
        Some("tamil")
    );

    store.remove("lastLessonLang").await.unwrap();
    assert_eq!(store.get("lastLessonLang").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let store = SqliteStore::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("first migrate");
    store.set("progress", "{}").await.unwrap();
    store.migrate().await.expect("second migrate");
    assert_eq!(store.get("progress").await.unwrap().as_deref(), Some("{}"));
}

#[tokio::test]
async fn local_store_persists_progress_through_sqlite() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_progress?mode=memory&cache=shared")
        .await
        .expect("open storage");
    let local = LocalStore::from_storage(&storage);

    let mut progress = ProgressMap::new();
    progress.record("english", ProgressRecord::completed(Score::new(1, 2), fixed_now()));
    local.save_progress(&progress).await.unwrap();
    local
        .save_last_language(&LanguageCode::new("english").unwrap())
        .await
        .unwrap();

    let reopened = LocalStore::new(Arc::clone(&storage.values));
    assert_eq!(reopened.load_progress().await.unwrap(), progress);
    assert_eq!(
        reopened.last_language().await.unwrap().map(|c| c.to_string()),
        Some("english".to_string())
    );

    let raw = storage.values.get(PROGRESS_KEY).await.unwrap().unwrap();
    assert!(raw.contains("\"lastScore\":1"), "unexpected blob {raw}");
}
