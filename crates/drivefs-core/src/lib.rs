//! DriveFS Core - Domain types and port definitions
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `Credentials`, `AccessToken`, `StorageAttributes`, `UploadSession`
//! - **Error taxonomy** - `StorageError` for filesystem operations, `DomainError` for validation
//! - **Port definitions** - Traits for adapters: `IStorageAdapter`, `ITokenCache`
//! - **Configuration** - YAML-backed settings for the Graph adapter and its token cache
//!
//! # Architecture
//!
//! The domain module contains plain data types with no I/O.
//! Ports define trait interfaces that adapter crates implement
//! (`drivefs-graph` for the storage adapter, `drivefs-cache` for token caches).

pub mod config;
pub mod domain;
pub mod ports;
