//! Integration tests for the client-credentials token provider
//!
//! Verifies token caching, renewal inside the expiry margin, request shape
//! and failure mapping against a mocked identity platform endpoint.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use drivefs_cache::MemoryTokenCache;
use drivefs_core::domain::AccessToken;
use drivefs_core::ports::{IStorageAdapter, ITokenCache};
use drivefs_graph::{GraphClient, GraphError, GraphStorageAdapter, TokenProvider};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{self, DRIVE};

const TOKEN_PATH: &str = "/tenant-1/oauth2/v2.0/token";

async fn mount_token_endpoint(server: &MockServer, token: &str, expires_in: u64, times: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": expires_in,
            "access_token": token
        })))
        .expect(times)
        .mount(server)
        .await;
}

fn provider(server: &MockServer, cache: Arc<MemoryTokenCache>) -> TokenProvider {
    TokenProvider::new(common::credentials(), cache).with_authority(server.uri())
}

// ============================================================================
// Caching
// ============================================================================

#[tokio::test]
async fn test_token_is_requested_once_and_cached() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "token-A", 3599, 1).await;

    let cache = Arc::new(MemoryTokenCache::new());
    let provider = provider(&server, cache.clone());

    let first = provider.get_access_token().await.expect("first token");
    let second = provider.get_access_token().await.expect("second token");

    assert_eq!(first, "token-A");
    assert_eq!(second, "token-A");

    let key = common::credentials().token_cache_key();
    assert!(cache.get(&key).await.unwrap().is_some());
    // `.expect(1)` is verified when the server drops
}

#[tokio::test]
async fn test_cached_token_skips_token_endpoint() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "unused", 3599, 0).await;

    let cache = Arc::new(MemoryTokenCache::new());
    let seeded = AccessToken::new("seeded-token", 3600);
    cache
        .put(
            &common::credentials().token_cache_key(),
            &serde_json::to_string(&seeded).unwrap(),
            Duration::from_secs(600),
        )
        .await
        .unwrap();

    let token = provider(&server, cache).get_access_token().await.unwrap();
    assert_eq!(token, "seeded-token");
}

#[tokio::test]
async fn test_token_inside_expiry_margin_is_renewed() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "fresh-token", 3599, 1).await;

    let cache = Arc::new(MemoryTokenCache::new());
    let expiring = AccessToken {
        access_token: "stale-token".to_string(),
        expires_at: Utc::now() + chrono::Duration::seconds(30),
    };
    cache
        .put(
            &common::credentials().token_cache_key(),
            &serde_json::to_string(&expiring).unwrap(),
            Duration::from_secs(600),
        )
        .await
        .unwrap();

    let token = provider(&server, cache).get_access_token().await.unwrap();
    assert_eq!(token, "fresh-token");
}

#[tokio::test]
async fn test_short_lived_token_is_not_cached() {
    let server = MockServer::start().await;
    // Lifetime below the margin: every call goes to the endpoint
    mount_token_endpoint(&server, "short-token", 30, 2).await;

    let cache = Arc::new(MemoryTokenCache::new());
    let provider = provider(&server, cache.clone());
    assert_eq!(provider.get_access_token().await.unwrap(), "short-token");
    assert_eq!(provider.get_access_token().await.unwrap(), "short-token");

    let key = common::credentials().token_cache_key();
    assert!(cache.get(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_expires_in_uses_default_lifetime() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": "no-expiry-token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server, Arc::new(MemoryTokenCache::new()));
    assert_eq!(provider.get_access_token().await.unwrap(), "no-expiry-token");
    assert_eq!(provider.get_access_token().await.unwrap(), "no-expiry-token");
}

#[tokio::test]
async fn test_invalidate_forces_new_request() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "token-B", 3599, 2).await;

    let provider = provider(&server, Arc::new(MemoryTokenCache::new()));
    provider.get_access_token().await.unwrap();
    provider.invalidate().await;
    provider.get_access_token().await.unwrap();
}

// ============================================================================
// Request shape and failures
// ============================================================================

#[tokio::test]
async fn test_token_request_uses_client_credentials_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=client-1"))
        .and(body_string_contains("client_secret=secret-1"))
        .and(body_string_contains(
            "scope=https%3A%2F%2Fgraph.microsoft.com%2F.default",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "granted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server, Arc::new(MemoryTokenCache::new()));
    assert_eq!(provider.get_access_token().await.unwrap(), "granted");
}

#[tokio::test]
async fn test_rejected_credentials_fail_with_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&server)
        .await;

    let cache = Arc::new(MemoryTokenCache::new());
    let result = provider(&server, cache.clone()).get_access_token().await;

    assert!(matches!(result, Err(GraphError::Auth(_))));
    let key = common::credentials().token_cache_key();
    assert!(cache.get(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_response_without_access_token_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599
        })))
        .mount(&server)
        .await;

    let result = provider(&server, Arc::new(MemoryTokenCache::new()))
        .get_access_token()
        .await;
    assert!(matches!(result, Err(GraphError::Auth(_))));
}

// ============================================================================
// Provider wired into the adapter
// ============================================================================

#[tokio::test]
async fn test_adapter_sends_provider_token_as_bearer() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "live-token", 3599, 1).await;

    Mock::given(method("GET"))
        .and(path(format!("{DRIVE}/root:/a.txt")))
        .and(header("authorization", "Bearer live-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::file_item("a.txt", 3)))
        .expect(2)
        .mount(&server)
        .await;

    let credentials = common::credentials();
    let tokens = Arc::new(provider(&server, Arc::new(MemoryTokenCache::new())));
    let client = GraphClient::with_base_url(&credentials, tokens, server.uri());
    let adapter = GraphStorageAdapter::new(client);

    assert!(adapter.file_exists("a.txt").await);
    assert_eq!(adapter.file_size("a.txt").await.unwrap(), 3);
}

#[tokio::test]
async fn test_token_failure_surfaces_as_operation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_request"
        })))
        .mount(&server)
        .await;

    let credentials = common::credentials();
    let tokens = Arc::new(provider(&server, Arc::new(MemoryTokenCache::new())));
    let client = GraphClient::with_base_url(&credentials, tokens, server.uri());
    let adapter = GraphStorageAdapter::new(client);

    let err = adapter.read("a.txt").await.unwrap_err();
    assert!(matches!(
        err,
        drivefs_core::domain::StorageError::UnableToReadFile { .. }
    ));
    assert!(!adapter.file_exists("a.txt").await);
}
