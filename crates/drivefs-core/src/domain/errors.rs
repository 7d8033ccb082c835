//! Domain error types
//!
//! This module defines error types for domain validation and the
//! per-operation failure taxonomy of the storage adapter.
//!
//! Every [`StorageError`] variant names the logical path(s) involved and
//! carries the underlying cause (a transport or authentication failure from
//! the adapter crate) as its `source`.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// Boxed error used as the `source` of adapter-level failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Which piece of metadata a [`StorageError::UnableToRetrieveMetadata`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    Metadata,
    LastModified,
    FileSize,
    MimeType,
    Visibility,
    Url,
}

impl Display for MetadataKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            MetadataKind::Metadata => "metadata",
            MetadataKind::LastModified => "last_modified",
            MetadataKind::FileSize => "file_size",
            MetadataKind::MimeType => "mime_type",
            MetadataKind::Visibility => "visibility",
            MetadataKind::Url => "url",
        };
        f.write_str(s)
    }
}

/// Failures raised by [`IStorageAdapter`](crate::ports::IStorageAdapter) operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unable to read file from location: {path}. {source}")]
    UnableToReadFile { path: String, source: BoxError },

    #[error("Unable to write file at location: {path}. {source}")]
    UnableToWriteFile { path: String, source: BoxError },

    #[error("Unable to delete file located at: {path}. {source}")]
    UnableToDeleteFile { path: String, source: BoxError },

    #[error("Unable to delete directory located at: {path}. {source}")]
    UnableToDeleteDirectory { path: String, source: BoxError },

    #[error("Unable to create a directory at {path}. {source}")]
    UnableToCreateDirectory { path: String, source: BoxError },

    #[error("Unable to list contents of {path}. {source}")]
    UnableToListContents { path: String, source: BoxError },

    #[error("Unable to copy file from {from} to {to}. {source}")]
    UnableToCopyFile {
        from: String,
        to: String,
        source: BoxError,
    },

    /// `partial` is true when the copy succeeded but the source could not be
    /// removed, leaving the item present at both locations.
    #[error("Unable to move file from {from} to {to}. {source}")]
    UnableToMoveFile {
        from: String,
        to: String,
        partial: bool,
        source: BoxError,
    },

    #[error("Unable to retrieve the {kind} for file at location: {path}. {reason}")]
    UnableToRetrieveMetadata {
        path: String,
        kind: MetadataKind,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Unable to set visibility for file {path}. {reason}")]
    UnableToSetVisibility { path: String, reason: String },

    #[error("Failed to create upload session for {path}: {source}")]
    UnableToCreateUploadSession { path: String, source: BoxError },
}

impl StorageError {
    /// Builds a metadata failure that wraps an underlying cause
    pub fn metadata(
        path: impl Into<String>,
        kind: MetadataKind,
        source: impl Into<BoxError>,
    ) -> Self {
        let source = source.into();
        StorageError::UnableToRetrieveMetadata {
            path: path.into(),
            kind,
            reason: source.to_string(),
            source: Some(source),
        }
    }

    /// Builds a metadata failure for a field the remote did not report
    pub fn missing_metadata(path: impl Into<String>, kind: MetadataKind) -> Self {
        StorageError::UnableToRetrieveMetadata {
            path: path.into(),
            kind,
            reason: format!("{kind} is not available"),
            source: None,
        }
    }

    /// Returns the primary logical path this error refers to
    pub fn path(&self) -> &str {
        match self {
            StorageError::UnableToReadFile { path, .. }
            | StorageError::UnableToWriteFile { path, .. }
            | StorageError::UnableToDeleteFile { path, .. }
            | StorageError::UnableToDeleteDirectory { path, .. }
            | StorageError::UnableToCreateDirectory { path, .. }
            | StorageError::UnableToListContents { path, .. }
            | StorageError::UnableToRetrieveMetadata { path, .. }
            | StorageError::UnableToSetVisibility { path, .. }
            | StorageError::UnableToCreateUploadSession { path, .. } => path,
            StorageError::UnableToCopyFile { from, .. }
            | StorageError::UnableToMoveFile { from, .. } => from,
        }
    }
}
