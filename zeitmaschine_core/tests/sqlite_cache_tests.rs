//! Integration tests for the SQLite image cache

use bytes::Bytes;
use tempfile::TempDir;
use zeitmaschine_core::error::{CacheError, Error};
use zeitmaschine_core::{ImageCache, SqliteImageCache};

async fn open_cache(temp_dir: &TempDir) -> SqliteImageCache {
    SqliteImageCache::open(&temp_dir.path().join("zcache.db"))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_get_unknown_key_misses() {
    let temp_dir = TempDir::new().unwrap();
    let cache = open_cache(&temp_dir).await;

    let error = cache.get("image/thumbnail?name=a.jpg").await.unwrap_err();
    assert!(matches!(error, Error::Cache(CacheError::Miss { ref key }) if key == "image/thumbnail?name=a.jpg"));
}

#[tokio::test]
async fn test_set_then_get() {
    let temp_dir = TempDir::new().unwrap();
    let cache = open_cache(&temp_dir).await;
    let blob = Bytes::from_static(b"\x89PNG\r\n\x1a\n");

    let stored = cache
        .set("image/thumbnail?name=a.png", blob.clone())
        .await
        .unwrap();
    assert_eq!(stored, blob);

    let loaded = cache.get("image/thumbnail?name=a.png").await.unwrap();
    assert_eq!(loaded, blob);
}

#[tokio::test]
async fn test_set_is_add_only() {
    let temp_dir = TempDir::new().unwrap();
    let cache = open_cache(&temp_dir).await;
    let key = "image/thumbnail?name=a.jpg";

    cache.set(key, Bytes::from_static(b"first")).await.unwrap();
    let error = cache.set(key, Bytes::from_static(b"second")).await.unwrap_err();

    assert!(matches!(error, Error::Cache(CacheError::WriteConflict { .. })));
    assert_eq!(cache.get(key).await.unwrap(), Bytes::from_static(b"first"));
}

#[tokio::test]
async fn test_renditions_are_separate_entries() {
    let temp_dir = TempDir::new().unwrap();
    let cache = open_cache(&temp_dir).await;

    cache
        .set("image/thumbnail?name=a.jpg", Bytes::from_static(b"small"))
        .await
        .unwrap();
    cache
        .set("image/large?name=a.jpg", Bytes::from_static(b"large"))
        .await
        .unwrap();

    assert_eq!(
        cache.get("image/large?name=a.jpg").await.unwrap(),
        Bytes::from_static(b"large")
    );
    assert_eq!(cache.stats().await.unwrap().entry_count, 2);
}

#[tokio::test]
async fn test_remove() {
    let temp_dir = TempDir::new().unwrap();
    let cache = open_cache(&temp_dir).await;
    let key = "image/thumbnail?name=a.jpg";

    cache.set(key, Bytes::from_static(b"blob")).await.unwrap();

    assert!(cache.remove(key).await.unwrap());
    assert!(!cache.remove(key).await.unwrap());
    assert!(cache.get(key).await.unwrap_err().is_cache_miss());

    // The key can be written again after removal
    cache.set(key, Bytes::from_static(b"new")).await.unwrap();
    assert_eq!(cache.get(key).await.unwrap(), Bytes::from_static(b"new"));
}

#[tokio::test]
async fn test_stats_and_clear() {
    let temp_dir = TempDir::new().unwrap();
    let cache = open_cache(&temp_dir).await;

    assert_eq!(cache.stats().await.unwrap().entry_count, 0);
    assert_eq!(cache.stats().await.unwrap().total_bytes, 0);

    cache.set("a", Bytes::from_static(b"12345")).await.unwrap();
    cache.set("b", Bytes::from_static(b"123")).await.unwrap();

    let stats = cache.stats().await.unwrap();
    assert_eq!(stats.entry_count, 2);
    assert_eq!(stats.total_bytes, 8);

    assert_eq!(cache.clear().await.unwrap(), 2);
    assert_eq!(cache.stats().await.unwrap().entry_count, 0);
}

#[tokio::test]
async fn test_entries_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let blob = Bytes::from(vec![0u8, 1, 2, 255, 254]);

    {
        let cache = open_cache(&temp_dir).await;
        cache.set("image/thumbnail?name=a.jpg", blob.clone()).await.unwrap();
        cache.close().await;
    }

    let cache = open_cache(&temp_dir).await;
    assert_eq!(cache.get("image/thumbnail?name=a.jpg").await.unwrap(), blob);
}

#[tokio::test]
async fn test_open_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("dirs").join("zcache.db");

    let cache = SqliteImageCache::open(&db_path).await.unwrap();

    assert!(db_path.exists());
    assert_eq!(cache.path(), db_path.as_path());
}

#[tokio::test]
async fn test_open_fails_when_parent_is_a_file() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"file").unwrap();

    let result = SqliteImageCache::open(&blocker.join("zcache.db")).await;
    assert!(matches!(
        result,
        Err(Error::Cache(CacheError::Unavailable { .. }))
    ));
}

#[tokio::test]
async fn test_closed_cache_is_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let cache = open_cache(&temp_dir).await;
    cache.close().await;

    let error = cache.get("image/thumbnail?name=a.jpg").await.unwrap_err();
    assert!(matches!(error, Error::Cache(CacheError::Unavailable { .. })));

    let error = cache
        .set("image/thumbnail?name=a.jpg", Bytes::from_static(b"jpeg"))
        .await
        .unwrap_err();
    assert!(matches!(error, Error::Cache(CacheError::Unavailable { .. })));
}
