//! Integration tests for copy and move
//!
//! Move is copy followed by delete; these tests pin down the request order
//! and what happens when either half fails.

use drivefs_core::domain::StorageError;
use drivefs_core::ports::IStorageAdapter;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{self, DRIVE};

async fn mount_copy_accepted(server: &MockServer, source: &str) {
    Mock::given(method("POST"))
        .and(path(format!("{DRIVE}/root:/{source}:/copy")))
        .respond_with(
            ResponseTemplate::new(202)
                .append_header("Location", "https://example.invalid/monitor/1"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_copy_into_subfolder() {
    let (server, adapter) = common::setup_adapter().await;

    Mock::given(method("POST"))
        .and(path(format!("{DRIVE}/root:/a.txt:/copy")))
        .and(body_json(json!({
            "parentReference": { "path": "/drive/root:/archive/2026" },
            "name": "b.txt"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    adapter.copy("a.txt", "archive/2026/b.txt").await.unwrap();
}

#[tokio::test]
async fn test_copy_into_root() {
    let (server, adapter) = common::setup_adapter().await;

    Mock::given(method("POST"))
        .and(path(format!("{DRIVE}/root:/docs/a.txt:/copy")))
        .and(body_json(json!({
            "parentReference": { "path": "/drive/root" },
            "name": "a-copy.txt"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    adapter.copy("docs/a.txt", "/a-copy.txt").await.unwrap();
}

#[tokio::test]
async fn test_copy_respects_base_path() {
    let (server, adapter) = common::setup_adapter_with_base("Apps/drivefs").await;

    Mock::given(method("POST"))
        .and(path(format!("{DRIVE}/root:/Apps/drivefs/a.txt:/copy")))
        .and(body_json(json!({
            "parentReference": { "path": "/drive/root:/Apps/drivefs" },
            "name": "b.txt"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    adapter.copy("a.txt", "b.txt").await.unwrap();
}

#[tokio::test]
async fn test_copy_failure() {
    let (server, adapter) = common::setup_adapter().await;
    common::mount_error(&server, "POST", &format!("{DRIVE}/root:/a.txt:/copy"), 404).await;

    let err = adapter.copy("a.txt", "b.txt").await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::UnableToCopyFile { ref from, ref to, .. } if from == "a.txt" && to == "b.txt"
    ));
}

#[tokio::test]
async fn test_move_copies_then_deletes() {
    let (server, adapter) = common::setup_adapter().await;
    mount_copy_accepted(&server, "a.txt").await;

    Mock::given(method("DELETE"))
        .and(path(format!("{DRIVE}/root:/a.txt")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    adapter.move_file("a.txt", "moved/a.txt").await.unwrap();

    let requests = server.received_requests().await.expect("recording enabled");
    let methods: Vec<&str> = requests.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, vec!["POST", "DELETE"]);
    assert!(requests[0].url.path().ends_with("/root:/a.txt:/copy"));
}

#[tokio::test]
async fn test_move_does_not_delete_when_copy_fails() {
    let (server, adapter) = common::setup_adapter().await;
    common::mount_error(&server, "POST", &format!("{DRIVE}/root:/a.txt:/copy"), 409).await;

    Mock::given(method("DELETE"))
        .and(path(format!("{DRIVE}/root:/a.txt")))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = adapter.move_file("a.txt", "b.txt").await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::UnableToMoveFile { partial: false, .. }
    ));
}

#[tokio::test]
async fn test_move_reports_partial_when_delete_fails() {
    let (server, adapter) = common::setup_adapter().await;
    mount_copy_accepted(&server, "a.txt").await;
    common::mount_error(&server, "DELETE", &format!("{DRIVE}/root:/a.txt"), 423).await;

    let err = adapter.move_file("a.txt", "b.txt").await.unwrap_err();
    match err {
        StorageError::UnableToMoveFile {
            from, to, partial, ..
        } => {
            assert_eq!(from, "a.txt");
            assert_eq!(to, "b.txt");
            assert!(partial);
        }
        other => panic!("expected move failure, got {:?}", other),
    }
}
