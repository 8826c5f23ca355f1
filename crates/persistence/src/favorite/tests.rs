use super::*;
use serial_test::serial;

// These tests require a local MongoDB (MONGO_HOST, default
// mongodb://localhost:27017/favorite).

async fn cleanup(file_id: &str) {
    let _ = delete_all(file_id).await;
}

#[tokio::test]
#[serial(favorite)]
async fn test_init_is_idempotent() {
    init().await.unwrap();
    // Creating the same index again must not fail or duplicate it.
    init().await.unwrap();
}

#[tokio::test]
#[serial(favorite)]
async fn test_insert_and_get_round_trip() {
    init().await.unwrap();
    cleanup("file-rt").await;

    let created = insert("file-rt", "user-rt").await.unwrap();
    assert_eq!(created.file_id, "file-rt");
    assert_eq!(created.user_id, "user-rt");

    let fetched = get("file-rt", "user-rt").await.unwrap();
    assert_eq!(fetched, created);

    cleanup("file-rt").await;
}

#[tokio::test]
#[serial(favorite)]
async fn test_insert_duplicate_pair_fails() {
    init().await.unwrap();
    cleanup("file-dup").await;

    insert("file-dup", "user-dup").await.unwrap();
    let second = insert("file-dup", "user-dup").await;
    assert!(matches!(second, Err(StoreError::Duplicate)));

    // The record was not silently overwritten or removed.
    let remaining = scan(&Query::ByFile {
        file_id: "file-dup".to_string(),
    })
    .await
    .unwrap();
    assert_eq!(remaining.len(), 1);

    cleanup("file-dup").await;
}

#[tokio::test]
#[serial(favorite)]
async fn test_delete_returns_snapshot_and_removes() {
    init().await.unwrap();
    cleanup("file-del").await;

    insert("file-del", "user-del").await.unwrap();
    let deleted = delete("file-del", "user-del").await.unwrap();
    assert_eq!(deleted.file_id, "file-del");
    assert_eq!(deleted.user_id, "user-del");

    let lookup = get("file-del", "user-del").await;
    assert!(matches!(lookup, Err(StoreError::NotFound)));
}

#[tokio::test]
#[serial(favorite)]
async fn test_delete_missing_pair_is_not_found() {
    init().await.unwrap();
    cleanup("file-missing").await;

    let result = delete("file-missing", "user-missing").await;
    assert!(matches!(result, Err(StoreError::NotFound)));
}

#[tokio::test]
#[serial(favorite)]
async fn test_delete_does_not_touch_other_records() {
    init().await.unwrap();
    cleanup("file-keep").await;

    insert("file-keep", "user-1").await.unwrap();
    insert("file-keep", "user-2").await.unwrap();

    delete("file-keep", "user-1").await.unwrap();

    let remaining = scan(&Query::ByFile {
        file_id: "file-keep".to_string(),
    })
    .await
    .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_id, "user-2");

    cleanup("file-keep").await;
}

#[tokio::test]
#[serial(favorite)]
async fn test_scan_by_user() {
    init().await.unwrap();
    cleanup("file-scan-1").await;
    cleanup("file-scan-2").await;
    cleanup("file-scan-3").await;

    insert("file-scan-1", "user-scan").await.unwrap();
    insert("file-scan-2", "user-scan").await.unwrap();
    insert("file-scan-3", "user-scan-other").await.unwrap();

    let mut file_ids: Vec<String> = scan(&Query::ByUser {
        user_id: "user-scan".to_string(),
    })
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.file_id)
    .collect();
    file_ids.sort();
    assert_eq!(file_ids, vec!["file-scan-1", "file-scan-2"]);

    let none = scan(&Query::ByUser {
        user_id: "user-scan-none".to_string(),
    })
    .await
    .unwrap();
    assert!(none.is_empty());

    cleanup("file-scan-1").await;
    cleanup("file-scan-2").await;
    cleanup("file-scan-3").await;
}

#[tokio::test]
#[serial(favorite)]
async fn test_delete_all_reports_outcome() {
    init().await.unwrap();
    cleanup("file-bulk").await;

    insert("file-bulk", "user-1").await.unwrap();
    insert("file-bulk", "user-2").await.unwrap();

    let outcome = delete_all("file-bulk").await.unwrap();
    assert!(outcome.acknowledged);
    assert_eq!(outcome.deleted_count, 2);

    // Second pass has nothing to remove; that is an outcome, not an error.
    let outcome = delete_all("file-bulk").await.unwrap();
    assert!(!outcome.acknowledged);
    assert_eq!(outcome.deleted_count, 0);
}

#[tokio::test]
#[serial(favorite)]
async fn test_probe_answers_within_timeout() {
    init().await.unwrap();
    let healthy = probe(Duration::from_secs(10)).await.unwrap();
    assert!(healthy);
}
