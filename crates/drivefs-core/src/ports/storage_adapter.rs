//! Storage adapter port (driving contract exposed to host applications)
//!
//! This module defines the filesystem-style contract a host application
//! uses to store and retrieve files. The primary implementation targets a
//! OneDrive / SharePoint drive through Microsoft Graph, but nothing here is
//! Graph-specific.
//!
//! ## Design Notes
//!
//! - Paths are logical, slash-separated and relative to the adapter root.
//!   `""` and `"/"` both denote the root.
//! - `file_exists` / `directory_exists` never fail: any error means "no".
//! - `list_contents` returns a lazy stream. A directory that cannot be
//!   listed yields one `Err` item in place of its contents, so callers can
//!   tell an empty directory from a failed one. In a deep walk the
//!   remaining siblings are still listed after such an item. Use
//!   [`collect_listing`] to drain it.
//! - `move_file` is copy followed by delete and is not atomic. See
//!   [`StorageError::UnableToMoveFile`] for the partial-failure flag.
//! - `copy` returns once the remote accepted the request; the copy itself
//!   may still be running on the remote side.

use std::io::Cursor;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::stream::{BoxStream, StreamExt};
use serde_json::{Map, Value};

use crate::domain::{Listing, StorageAttributes, StorageError, UploadSession, Visibility};

/// Streamed request body for [`IStorageAdapter::write_stream`]
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Lazy sequence of listing records
pub type ListingStream<'a> = BoxStream<'a, Result<StorageAttributes, StorageError>>;

/// Port trait for filesystem operations over a remote drive
#[async_trait::async_trait]
pub trait IStorageAdapter: Send + Sync {
    /// Returns true if an item exists at `path`
    async fn file_exists(&self, path: &str) -> bool;

    /// Returns true if a folder exists at `path`
    async fn directory_exists(&self, path: &str) -> bool;

    /// Creates or replaces the file at `path`
    async fn write(&self, path: &str, contents: Bytes) -> Result<(), StorageError>;

    /// Creates or replaces the file at `path` without buffering the body
    async fn write_stream(&self, path: &str, contents: ByteStream) -> Result<(), StorageError>;

    /// Reads the whole file at `path`
    async fn read(&self, path: &str) -> Result<Bytes, StorageError>;

    /// Reads the whole file at `path` into a seekable in-memory reader
    async fn read_stream(&self, path: &str) -> Result<Cursor<Bytes>, StorageError>;

    /// Deletes the file at `path`
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Deletes the directory at `path` together with its contents
    async fn delete_directory(&self, path: &str) -> Result<(), StorageError>;

    /// Creates a directory at `path`; fails if it already exists
    async fn create_directory(&self, path: &str) -> Result<(), StorageError>;

    /// Lists the entries under `path`, descending depth-first when `deep`
    fn list_contents(&self, path: &str, deep: bool) -> ListingStream<'_>;

    /// Moves `source` to `destination` (copy, then delete)
    async fn move_file(&self, source: &str, destination: &str) -> Result<(), StorageError>;

    /// Copies `source` to `destination`
    async fn copy(&self, source: &str, destination: &str) -> Result<(), StorageError>;

    /// Returns the full attribute record for `path`
    async fn metadata(&self, path: &str) -> Result<StorageAttributes, StorageError>;

    async fn last_modified(&self, path: &str) -> Result<DateTime<Utc>, StorageError>;

    async fn file_size(&self, path: &str) -> Result<u64, StorageError>;

    async fn mime_type(&self, path: &str) -> Result<String, StorageError>;

    /// Opens a resumable upload session for `path`
    ///
    /// `overrides` are merged over the default item properties (conflict
    /// behavior `rename`).
    async fn create_upload_session(
        &self,
        path: &str,
        overrides: Map<String, Value>,
    ) -> Result<UploadSession, StorageError>;

    /// Returns a URL a browser can open to view the item
    async fn get_url(&self, path: &str) -> Result<String, StorageError>;

    async fn set_visibility(&self, path: &str, visibility: Visibility) -> Result<(), StorageError>;

    async fn visibility(&self, path: &str) -> Result<Visibility, StorageError>;
}

/// Drains a listing stream, keeping entries and failures apart
pub async fn collect_listing(mut stream: ListingStream<'_>) -> Listing {
    let mut listing = Listing::default();

    while let Some(item) = stream.next().await {
        match item {
            Ok(entry) => listing.entries.push(entry),
            Err(err) => listing.errors.push(err),
        }
    }

    listing
}
