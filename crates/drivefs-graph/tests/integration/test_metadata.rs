//! Integration tests for metadata, upload sessions, URLs and visibility

use chrono::{TimeZone, Utc};
use drivefs_core::domain::{
    ConflictBehavior, MetadataKind, StorageAttributes, StorageError, Visibility,
};
use drivefs_core::ports::IStorageAdapter;
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{self, DRIVE};

// ============================================================================
// Metadata projections
// ============================================================================

#[tokio::test]
async fn test_metadata_projections() {
    let (server, adapter) = common::setup_adapter().await;
    let item = common::file_item("a.txt", 42);
    common::mount_item(&server, &format!("{DRIVE}/root:/docs/a.txt"), item).await;

    assert_eq!(adapter.file_size("docs/a.txt").await.unwrap(), 42);
    assert_eq!(adapter.mime_type("docs/a.txt").await.unwrap(), "text/plain");
    assert_eq!(
        adapter.last_modified("docs/a.txt").await.unwrap(),
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    );

    match adapter.metadata("/docs/a.txt").await.unwrap() {
        StorageAttributes::File(file) => {
            assert_eq!(file.path, "docs/a.txt");
            assert_eq!(file.name, "a.txt");
        }
        other => panic!("expected a file, got {:?}", other),
    }
}

#[tokio::test]
async fn test_folder_has_no_mime_type() {
    let (server, adapter) = common::setup_adapter().await;
    common::mount_item(&server, &format!("{DRIVE}/root:/docs"), common::folder_item("docs")).await;

    let err = adapter.mime_type("docs").await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::UnableToRetrieveMetadata {
            kind: MetadataKind::MimeType,
            source: None,
            ..
        }
    ));
}

#[tokio::test]
async fn test_missing_fields_are_errors() {
    let (server, adapter) = common::setup_adapter().await;
    common::mount_item(&server, &format!("{DRIVE}/root:/bare"), json!({ "name": "bare" })).await;

    assert!(matches!(
        adapter.file_size("bare").await,
        Err(StorageError::UnableToRetrieveMetadata { kind: MetadataKind::FileSize, .. })
    ));
    assert!(matches!(
        adapter.last_modified("bare").await,
        Err(StorageError::UnableToRetrieveMetadata { kind: MetadataKind::LastModified, .. })
    ));
}

#[tokio::test]
async fn test_metadata_lookup_failure() {
    let (server, adapter) = common::setup_adapter().await;
    common::mount_error(&server, "GET", &format!("{DRIVE}/root:/gone.txt"), 404).await;

    let err = adapter.file_size("gone.txt").await.unwrap_err();
    match err {
        StorageError::UnableToRetrieveMetadata {
            path, kind, source, ..
        } => {
            assert_eq!(path, "gone.txt");
            assert_eq!(kind, MetadataKind::FileSize);
            assert!(source.is_some());
        }
        other => panic!("unexpected error {:?}", other),
    }
}

// ============================================================================
// Upload sessions
// ============================================================================

#[tokio::test]
async fn test_upload_session_defaults_to_rename() {
    let (server, adapter) = common::setup_adapter().await;

    Mock::given(method("POST"))
        .and(path(format!("{DRIVE}/root:/big.iso:/createUploadSession")))
        .and(body_json(json!({
            "item": { "@microsoft.graph.conflictBehavior": "rename" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uploadUrl": "https://upload.example.com/session/1",
            "expirationDateTime": "2026-01-16T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = adapter
        .create_upload_session("big.iso", Map::new())
        .await
        .unwrap();

    assert_eq!(session.upload_url, "https://upload.example.com/session/1");
    assert_eq!(session.conflict_behavior, ConflictBehavior::Rename);
    assert_eq!(
        session.expiration,
        Some(Utc.with_ymd_and_hms(2026, 1, 16, 10, 0, 0).unwrap())
    );
    assert!(session.is_valid());
}

#[tokio::test]
async fn test_upload_session_overrides_are_merged() {
    let (server, adapter) = common::setup_adapter().await;

    Mock::given(method("POST"))
        .and(path(format!("{DRIVE}/root:/big.iso:/createUploadSession")))
        .and(body_json(json!({
            "item": {
                "@microsoft.graph.conflictBehavior": "replace",
                "description": "nightly build"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uploadUrl": "https://upload.example.com/session/2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut overrides = Map::new();
    overrides.insert(
        "@microsoft.graph.conflictBehavior".to_string(),
        Value::from("replace"),
    );
    overrides.insert("description".to_string(), Value::from("nightly build"));

    let session = adapter
        .create_upload_session("big.iso", overrides)
        .await
        .unwrap();
    assert_eq!(session.conflict_behavior, ConflictBehavior::Replace);
    assert!(session.expiration.is_none());
}

#[tokio::test]
async fn test_upload_session_without_url_is_invalid() {
    let (server, adapter) = common::setup_adapter().await;

    Mock::given(method("POST"))
        .and(path(format!("{DRIVE}/root:/big.iso:/createUploadSession")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let session = adapter
        .create_upload_session("big.iso", Map::new())
        .await
        .unwrap();
    assert!(!session.is_valid());
}

#[tokio::test]
async fn test_upload_session_failure() {
    let (server, adapter) = common::setup_adapter().await;
    common::mount_error(
        &server,
        "POST",
        &format!("{DRIVE}/root:/big.iso:/createUploadSession"),
        400,
    )
    .await;

    let err = adapter
        .create_upload_session("big.iso", Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::UnableToCreateUploadSession { .. }));
}

// ============================================================================
// URLs
// ============================================================================

#[tokio::test]
async fn test_get_url_creates_view_link() {
    let (server, adapter) = common::setup_adapter().await;
    let item = common::file_item("a.txt", 1);
    common::mount_item(&server, &format!("{DRIVE}/root:/a.txt"), item).await;

    Mock::given(method("POST"))
        .and(path(format!("{DRIVE}/items/id-a.txt/createLink")))
        .and(body_json(json!({ "type": "view", "scope": "anonymous" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "link": { "type": "view", "webUrl": "https://1drv.ms/t/s!share" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(adapter.get_url("a.txt").await.unwrap(), "https://1drv.ms/t/s!share");
}

#[tokio::test]
async fn test_get_url_falls_back_when_item_is_missing() {
    let (server, adapter) = common::setup_adapter().await;
    common::mount_error(&server, "GET", &format!("{DRIVE}/root:/docs/a.txt"), 404).await;

    assert_eq!(
        adapter.get_url("docs/a.txt").await.unwrap(),
        "https://onedrive.live.com/view.aspx?resid=user-1&path=docs%2Fa.txt"
    );
}

#[tokio::test]
async fn test_get_url_falls_back_when_link_has_no_url() {
    let (server, adapter) = common::setup_adapter().await;
    let item = common::file_item("a.txt", 1);
    common::mount_item(&server, &format!("{DRIVE}/root:/a.txt"), item).await;

    Mock::given(method("POST"))
        .and(path(format!("{DRIVE}/items/id-a.txt/createLink")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "link": {} })))
        .mount(&server)
        .await;

    assert_eq!(
        adapter.get_url("a.txt").await.unwrap(),
        "https://onedrive.live.com/view.aspx?resid=user-1&path=a.txt"
    );
}

// ============================================================================
// Visibility
// ============================================================================

#[tokio::test]
async fn test_visibility_never_touches_the_network() {
    let (server, adapter) = common::setup_adapter().await;

    assert!(matches!(
        adapter.set_visibility("a.txt", Visibility::Private).await,
        Err(StorageError::UnableToSetVisibility { .. })
    ));
    assert!(matches!(
        adapter.visibility("a.txt").await,
        Err(StorageError::UnableToRetrieveMetadata { kind: MetadataKind::Visibility, .. })
    ));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}
