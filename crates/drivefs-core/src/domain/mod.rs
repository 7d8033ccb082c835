//! Domain entities
//!
//! This module contains the core domain types for DriveFS:
//! - Credentials and access tokens for the client-credentials grant
//! - Canonical file/directory attributes produced by the storage adapter
//! - Upload session handles and conflict policies
//! - Domain-specific error types

pub mod attributes;
pub mod credentials;
pub mod errors;
pub mod upload;

// Re-export commonly used types
pub use attributes::{DirectoryAttributes, FileAttributes, Listing, StorageAttributes, Visibility};
pub use credentials::{AccessToken, Credentials, TOKEN_EXPIRY_MARGIN};
pub use errors::{BoxError, DomainError, MetadataKind, StorageError};
pub use upload::{ConflictBehavior, UploadSession};
