//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IStorageAdapter`] - Filesystem-style operations over a remote drive
//! - [`ITokenCache`] - Key-value store with expiry, used to cache access tokens

pub mod storage_adapter;
pub mod token_cache;

pub use storage_adapter::{collect_listing, ByteStream, IStorageAdapter, ListingStream};
pub use token_cache::ITokenCache;
