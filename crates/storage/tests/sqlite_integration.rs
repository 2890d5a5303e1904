use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Duration;
use fusha_core::model::{LessonId, UserId};
use fusha_core::time::{fixed_clock, fixed_now};
use storage::sqlite::SqliteRepository;
use storage::{InMemoryCatalog, KeyValueStore, PROGRESS_KEY, ProgressStore, Storage, ensure_user_id};

async fn repo(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_kv_upserts_and_removes() {
    let repo = repo("memdb_kv").await;

    repo.set("k", "one").await.unwrap();
    repo.set("k", "two").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("two"));

    repo.remove("k").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_repeatable() {
    let repo = repo("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
    repo.set("k", "v").await.unwrap();
}

#[tokio::test]
async fn progress_survives_a_new_store_handle() {
    let repo = repo("memdb_progress").await;
    let kv: Arc<dyn KeyValueStore> = Arc::new(repo.clone());
    let user = UserId::new("u1");

    let mut clock = fixed_clock();
    let store = ProgressStore::new(Arc::clone(&kv), clock);
    let first = store.mark_completed(&LessonId::new("a1-m1-l1"), &user).await;
    clock.advance(Duration::minutes(10));
    let store = ProgressStore::new(Arc::clone(&kv), clock);
    store.mark_completed(&LessonId::new("a1-m1-l2"), &user).await;

    let reopened = ProgressStore::new(kv, fixed_clock());
    assert_eq!(
        reopened.list_completed(&user).await,
        BTreeSet::from([LessonId::new("a1-m1-l1"), LessonId::new("a1-m1-l2")])
    );
    let again = reopened.mark_completed(&LessonId::new("a1-m1-l1"), &user).await;
    assert_eq!(again, first);
    assert_eq!(again.completed_at, fixed_now());

    let raw = repo.get(PROGRESS_KEY).await.unwrap().unwrap();
    assert!(raw.contains("\"userIdentifier\":\"u1\""));
}

#[tokio::test]
async fn storage_lifecycle_opens_and_closes() {
    let storage = Storage::sqlite(
        "sqlite:file:memdb_lifecycle?mode=memory&cache=shared",
        InMemoryCatalog::builtin().unwrap(),
    )
    .await
    .expect("open storage");

    let id = ensure_user_id(storage.kv.as_ref()).await;
    assert_eq!(ensure_user_id(storage.kv.as_ref()).await, id);

    storage.close().await;
}
