use super::*;
use tempfile::TempDir;

fn test_entry(id: &str, content: &str, source: &str) -> IndexEntry {
    // Small deterministic vector, varied slightly per id so results rank
    let seed: f32 = id.bytes().map(|b| f32::from(b)).sum::<f32>() / 1000.0;
    IndexEntry {
        id: id.to_string(),
        vector: vec![0.1 + seed, 0.2, 0.3, 0.4, 0.5],
        content: content.to_string(),
        source: source.to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn open_store() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let store = LanceStore::open(&temp_dir.path().join("vectors"))
        .await
        .expect("should open store");

    assert_eq!(store.table_name, KB_COLLECTION);
}

#[tokio::test]
async fn query_on_missing_collection_returns_empty() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let store = LanceStore::open(&temp_dir.path().join("vectors"))
        .await
        .expect("should open store");

    let results = store
        .query(&[0.1, 0.2, 0.3, 0.4, 0.5], 4)
        .await
        .expect("query should succeed");

    assert!(results.is_empty());
    assert_eq!(store.count().await.expect("count should succeed"), 0);
}

#[tokio::test]
async fn upsert_and_query() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let store = LanceStore::open(&temp_dir.path().join("vectors"))
        .await
        .expect("should open store");

    let entries = vec![
        test_entry("a", "Callers posing as bank staff", "bank-scams.md"),
        test_entry("b", "One-ring callback charges", "wangiri.md"),
        test_entry("c", "Parcel delivery fee fraud", "parcel.md"),
    ];
    store.upsert(entries).await.expect("upsert should succeed");

    assert_eq!(store.count().await.expect("count should succeed"), 3);

    let results = store
        .query(&[0.1, 0.2, 0.3, 0.4, 0.5], 2)
        .await
        .expect("query should succeed");

    assert_eq!(results.len(), 2);
    for chunk in &results {
        assert!(!chunk.content.is_empty());
        assert!(!chunk.source.is_empty());
    }
    // Results come back nearest first
    assert!(results[0].distance <= results[1].distance);
}

#[tokio::test]
async fn query_limit_caps_results() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let store = LanceStore::open(&temp_dir.path().join("vectors"))
        .await
        .expect("should open store");

    let entries = vec![
        test_entry("a", "first", "a.md"),
        test_entry("b", "second", "b.md"),
    ];
    store.upsert(entries).await.expect("upsert should succeed");

    let results = store
        .query(&[0.1, 0.2, 0.3, 0.4, 0.5], 10)
        .await
        .expect("query should succeed");

    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn delete_collection_then_query_is_empty() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let store = LanceStore::open(&temp_dir.path().join("vectors"))
        .await
        .expect("should open store");

    store
        .upsert(vec![test_entry("a", "content", "doc.md")])
        .await
        .expect("upsert should succeed");
    assert_eq!(store.count().await.expect("count should succeed"), 1);

    store
        .delete_collection()
        .await
        .expect("delete should succeed");

    assert_eq!(store.count().await.expect("count should succeed"), 0);
    let results = store
        .query(&[0.1, 0.2, 0.3, 0.4, 0.5], 4)
        .await
        .expect("query should succeed");
    assert!(results.is_empty());
}

#[tokio::test]
async fn delete_missing_collection_is_a_noop() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let store = LanceStore::open(&temp_dir.path().join("vectors"))
        .await
        .expect("should open store");

    store
        .delete_collection()
        .await
        .expect("delete of a missing collection should succeed");
}

#[tokio::test]
async fn empty_upsert_is_a_noop() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let store = LanceStore::open(&temp_dir.path().join("vectors"))
        .await
        .expect("should open store");

    store
        .upsert(Vec::new())
        .await
        .expect("empty upsert should succeed");
    assert_eq!(store.count().await.expect("count should succeed"), 0);
}
