//! Client-credential identity and the bearer token it yields
//!
//! [`Credentials`] is supplied once when the adapter is built and never
//! mutated. [`AccessToken`] is the value stored in the token cache.

use std::fmt::{self, Debug, Formatter};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::errors::DomainError;

/// A token within this margin of its expiry is treated as already expired
pub const TOKEN_EXPIRY_MARGIN: Duration = Duration::seconds(60);

/// Prefix of every token cache key
const CACHE_KEY_PREFIX: &str = "graph_access_token";

// ============================================================================
// Credentials
// ============================================================================

/// App-only credentials for the Microsoft identity platform
///
/// Holds the Azure AD application registration (client id, tenant id,
/// client secret), the user whose drive is addressed, and an optional base
/// path that every logical path is rooted under.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    tenant_id: String,
    client_secret: String,
    user_id: String,
    base_path: Option<String>,
}

impl Credentials {
    /// Creates a new set of credentials
    ///
    /// # Errors
    /// Returns `DomainError::ValidationFailed` if any required field is empty
    pub fn new(
        client_id: impl Into<String>,
        tenant_id: impl Into<String>,
        client_secret: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let credentials = Self {
            client_id: client_id.into(),
            tenant_id: tenant_id.into(),
            client_secret: client_secret.into(),
            user_id: user_id.into(),
            base_path: None,
        };

        for (field, value) in [
            ("client_id", &credentials.client_id),
            ("tenant_id", &credentials.tenant_id),
            ("client_secret", &credentials.client_secret),
            ("user_id", &credentials.user_id),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::ValidationFailed(format!(
                    "{field} must not be empty"
                )));
            }
        }

        Ok(credentials)
    }

    /// Roots every logical path under `base_path`
    ///
    /// An empty or `/`-only base path is the same as no base path.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        self.base_path = if base_path.trim_matches('/').is_empty() {
            None
        } else {
            Some(base_path)
        };
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    /// Cache key for tokens issued to this (client, tenant) pair
    ///
    /// Distinct credential sets never share a key; the secret and user are
    /// not part of it because the token is app-wide.
    pub fn token_cache_key(&self) -> String {
        let digest = Sha256::digest(format!("{}:{}", self.client_id, self.tenant_id).as_bytes());
        format!("{CACHE_KEY_PREFIX}:{digest:x}")
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("tenant_id", &self.tenant_id)
            .field("client_secret", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("base_path", &self.base_path)
            .finish()
    }
}

// ============================================================================
// AccessToken
// ============================================================================

/// A bearer token together with its absolute expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Bearer token for authenticating API requests
    pub access_token: String,
    /// When the token stops being accepted by the API
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Creates a token that expires `expires_in` seconds from now
    pub fn new(access_token: impl Into<String>, expires_in: u64) -> Self {
        let expires_in = i64::from(u32::try_from(expires_in).unwrap_or(u32::MAX));
        Self {
            access_token: access_token.into(),
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }

    /// Returns true if the token may still be handed to a caller
    ///
    /// False once `now` is within [`TOKEN_EXPIRY_MARGIN`] of `expires_at`.
    pub fn is_usable(&self) -> bool {
        Utc::now() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }

    /// Time left before the token becomes unusable (zero when already unusable)
    pub fn usable_for(&self) -> std::time::Duration {
        (self.expires_at - TOKEN_EXPIRY_MARGIN - Utc::now())
            .to_std()
            .unwrap_or_default()
    }
}
