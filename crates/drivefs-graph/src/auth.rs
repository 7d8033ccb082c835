//! OAuth2 client-credentials authentication for Microsoft Graph
//!
//! Acquires application (daemon) tokens from the Microsoft identity platform
//! with the client-credentials grant and keeps them in an [`ITokenCache`] so
//! that every request does not hit the token endpoint.
//!
//! ## Components
//!
//! - [`ITokenSource`] - Anything that can hand out a bearer token
//! - [`TokenProvider`] - Client-credentials flow with cache fast path
//! - [`StaticToken`] - Fixed token, for tests and pre-issued credentials

use std::sync::Arc;

use async_trait::async_trait;
use drivefs_core::config::DEFAULT_AUTHORITY;
use drivefs_core::domain::{AccessToken, Credentials, TOKEN_EXPIRY_MARGIN};
use drivefs_core::ports::ITokenCache;
use oauth2::{
    basic::BasicClient, AuthType, ClientId, ClientSecret, Scope, TokenResponse, TokenUrl,
};
use tracing::{debug, info, warn};

use crate::GraphError;

/// Scope requesting every application permission granted to the app
const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Lifetime assumed when the token endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN: u64 = 3599;

// ============================================================================
// ITokenSource
// ============================================================================

/// Source of bearer tokens for Graph requests
#[async_trait]
pub trait ITokenSource: Send + Sync {
    /// Returns a token that is valid for at least the expiry margin
    async fn access_token(&self) -> Result<String, GraphError>;
}

/// A fixed bearer token
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken([REDACTED])")
    }
}

#[async_trait]
impl ITokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, GraphError> {
        Ok(self.0.clone())
    }
}

// ============================================================================
// TokenProvider
// ============================================================================

/// Client-credentials token provider
///
/// Looks the token up in the cache under [`Credentials::token_cache_key`]
/// first. On a miss (or when the cached token is inside the expiry margin)
/// it requests a new token for the `https://graph.microsoft.com/.default`
/// scope and stores it for `expires_in - 60` seconds.
///
/// Cache failures are logged and treated as a miss; they never fail a
/// token request on their own.
pub struct TokenProvider {
    credentials: Credentials,
    cache: Arc<dyn ITokenCache>,
    authority: String,
    http_client: reqwest::Client,
}

impl TokenProvider {
    /// Creates a provider against the public Microsoft authority
    pub fn new(credentials: Credentials, cache: Arc<dyn ITokenCache>) -> Self {
        Self {
            credentials,
            cache,
            authority: DEFAULT_AUTHORITY.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Overrides the authority (sovereign clouds, tests)
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    /// The tenant-specific v2.0 token endpoint
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority.trim_end_matches('/'),
            self.credentials.tenant_id()
        )
    }

    /// Returns a usable access token, fetching a new one when needed
    ///
    /// A freshly issued token that lives 60 seconds or less is still
    /// returned (it is the only one the endpoint will hand out), but it is
    /// never cached, so every call requests a new one.
    pub async fn get_access_token(&self) -> Result<String, GraphError> {
        let key = self.credentials.token_cache_key();

        if let Some(token) = self.cached_token(&key).await {
            debug!("Using cached access token");
            return Ok(token.access_token);
        }

        let token = self.fetch_token().await?;

        let ttl = token.usable_for();
        if ttl.is_zero() {
            warn!(
                expires_at = %token.expires_at,
                margin_secs = TOKEN_EXPIRY_MARGIN.num_seconds(),
                "Issued access token expires within the margin, not caching it"
            );
        } else {
            match serde_json::to_string(&token) {
                Ok(serialized) => {
                    if let Err(e) = self.cache.put(&key, &serialized, ttl).await {
                        warn!(error = %e, "Failed to store access token in cache");
                    }
                }
                Err(e) => warn!(error = %e, "Failed to serialize access token"),
            }
        }

        Ok(token.access_token)
    }

    /// Drops the cached token so the next call goes to the token endpoint
    pub async fn invalidate(&self) {
        let key = self.credentials.token_cache_key();
        if let Err(e) = self.cache.forget(&key).await {
            warn!(error = %e, "Failed to remove access token from cache");
        }
    }

    async fn cached_token(&self, key: &str) -> Option<AccessToken> {
        let raw = match self.cache.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Token cache lookup failed, requesting a new token");
                return None;
            }
        };

        match serde_json::from_str::<AccessToken>(&raw) {
            Ok(token) if token.is_usable() => Some(token),
            Ok(_) => {
                debug!(
                    margin_secs = TOKEN_EXPIRY_MARGIN.num_seconds(),
                    "Cached access token is about to expire"
                );
                None
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable cached access token");
                None
            }
        }
    }

    async fn fetch_token(&self) -> Result<AccessToken, GraphError> {
        let token_url = TokenUrl::new(self.token_url())
            .map_err(|e| GraphError::Auth(format!("Invalid token URL: {e}")))?;

        let client = BasicClient::new(ClientId::new(self.credentials.client_id().to_string()))
            .set_client_secret(ClientSecret::new(
                self.credentials.client_secret().to_string(),
            ))
            .set_auth_type(AuthType::RequestBody)
            .set_token_uri(token_url);

        let response = client
            .exchange_client_credentials()
            .add_scope(Scope::new(GRAPH_DEFAULT_SCOPE.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| GraphError::Auth(format!("Token request failed: {e}")))?;

        let access_token = response.access_token().secret().clone();
        if access_token.is_empty() {
            return Err(GraphError::Auth(
                "Token endpoint returned an empty access token".to_string(),
            ));
        }

        let expires_in = response
            .expires_in()
            .map(|d| d.as_secs())
            .unwrap_or(DEFAULT_EXPIRES_IN);

        info!(
            tenant_id = %self.credentials.tenant_id(),
            expires_in,
            "Acquired new access token"
        );

        Ok(AccessToken::new(access_token, expires_in))
    }
}

#[async_trait]
impl ITokenSource for TokenProvider {
    async fn access_token(&self) -> Result<String, GraphError> {
        self.get_access_token().await
    }
}
