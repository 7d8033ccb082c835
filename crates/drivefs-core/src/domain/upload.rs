//! Upload sessions for large files
//!
//! The adapter only opens the session; chunk sequencing and completion are
//! driven by whoever holds the returned URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the remote does when the target name already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictBehavior {
    Fail,
    #[default]
    Rename,
    Replace,
}

impl ConflictBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictBehavior::Fail => "fail",
            ConflictBehavior::Rename => "rename",
            ConflictBehavior::Replace => "replace",
        }
    }
}

impl std::str::FromStr for ConflictBehavior {
    type Err = super::errors::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(ConflictBehavior::Fail),
            "rename" => Ok(ConflictBehavior::Rename),
            "replace" => Ok(ConflictBehavior::Replace),
            other => Err(super::errors::DomainError::ValidationFailed(format!(
                "unknown conflict behavior: {other}"
            ))),
        }
    }
}

/// A remote-issued resumable upload target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSession {
    /// URL the caller PUTs byte ranges to; empty if the remote did not return one
    pub upload_url: String,
    /// Conflict policy the session was created with
    pub conflict_behavior: ConflictBehavior,
    /// When the session expires, if reported
    pub expiration: Option<DateTime<Utc>>,
}

impl UploadSession {
    /// False when the remote answered without an upload URL
    pub fn is_valid(&self) -> bool {
        !self.upload_url.is_empty()
    }
}
