//! Canonical file and directory attributes
//!
//! These records are what the storage adapter yields from listings and
//! metadata lookups, independent of the remote JSON schema they were
//! derived from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::StorageError;

/// Attributes of a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttributes {
    /// Logical path relative to the adapter root
    pub path: String,
    /// Item name as reported by the remote (relative to its parent)
    pub name: String,
    /// Size in bytes
    pub file_size: Option<u64>,
    /// Last modification instant, absent if the remote omitted it
    pub last_modified: Option<DateTime<Utc>>,
    /// MIME type reported by the remote
    pub mime_type: Option<String>,
}

/// Attributes of a single directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryAttributes {
    /// Logical path relative to the adapter root
    pub path: String,
    /// Item name as reported by the remote (relative to its parent)
    pub name: String,
    /// Last modification instant, absent if the remote omitted it
    pub last_modified: Option<DateTime<Utc>>,
}

/// A file or directory record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageAttributes {
    File(FileAttributes),
    Directory(DirectoryAttributes),
}

impl StorageAttributes {
    pub fn path(&self) -> &str {
        match self {
            StorageAttributes::File(f) => &f.path,
            StorageAttributes::Directory(d) => &d.path,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StorageAttributes::File(f) => &f.name,
            StorageAttributes::Directory(d) => &d.name,
        }
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        match self {
            StorageAttributes::File(f) => f.last_modified,
            StorageAttributes::Directory(d) => d.last_modified,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, StorageAttributes::File(_))
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, StorageAttributes::Directory(_))
    }
}

/// Per-object visibility
///
/// Only used to reject visibility requests: the remote drive exposes no
/// per-object ACL through this adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Private => f.write_str("private"),
        }
    }
}

/// The outcome of draining a listing stream
///
/// `entries` holds every record the walk produced. `errors` holds one
/// failure per directory that could not be listed, which distinguishes a
/// failed listing from an empty directory.
#[derive(Debug, Default)]
pub struct Listing {
    pub entries: Vec<StorageAttributes>,
    pub errors: Vec<StorageError>,
}

impl Listing {
    /// True if every directory in the walk was listed successfully
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts into a plain result carrying the first failure, discarding
    /// partial entries
    pub fn into_result(self) -> Result<Vec<StorageAttributes>, StorageError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.entries),
        }
    }
}
