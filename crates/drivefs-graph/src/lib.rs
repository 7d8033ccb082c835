//! DriveFS Graph - Microsoft Graph storage adapter
//!
//! Provides async components for:
//! - OAuth2 client-credentials token acquisition with cached, transparent renewal
//! - Mapping logical paths onto drive item locators
//! - Authenticated requests against the Graph drive API
//! - The [`IStorageAdapter`](drivefs_core::ports::IStorageAdapter) implementation
//!
//! ## Modules
//!
//! - [`auth`] - Token sources (client credentials, static bearer token)
//! - [`paths`] - Logical path to Graph URL resolution
//! - [`client`] - Authenticated HTTP client with uniform failure mapping
//! - [`item`] - Graph `driveItem` payloads and their canonical attributes
//! - [`adapter`] - Filesystem operations composed from the above

pub mod adapter;
pub mod auth;
pub mod client;
pub mod item;
pub mod paths;

pub use adapter::GraphStorageAdapter;
pub use auth::{ITokenSource, StaticToken, TokenProvider};
pub use client::GraphClient;
pub use paths::{PathResolver, RemotePath};

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when communicating with the Microsoft Graph API
#[derive(Debug, Error)]
pub enum GraphError {
    /// The token endpoint was unreachable, rejected the credentials, or
    /// returned a payload without an access token
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The API answered with a status >= 400, or the request never got an
    /// answer (connection error, timeout). `status` is `None` in the latter case.
    #[error("API request failed{}: {body}", fmt_status(.status))]
    RequestFailed {
        /// HTTP status, if a response was received
        status: Option<StatusCode>,
        /// Raw response body, or the transport error message
        body: String,
    },

    /// A successful response could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

fn fmt_status(status: &Option<StatusCode>) -> String {
    status
        .map(|s| format!(" with status {}", s.as_u16()))
        .unwrap_or_default()
}

impl GraphError {
    /// The HTTP status of a failed request, if one was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GraphError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// True for a 404 answer
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        GraphError::RequestFailed {
            status: err.status(),
            body: err.to_string(),
        }
    }
}
