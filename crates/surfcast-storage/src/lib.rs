//! Surfcast Storage Library
//!
//! Object storage abstraction used by the upload orchestrator, with S3 and
//! local filesystem backends.
//!
//! # Storage key format
//!
//! Uploaded media lives under `{collection_id}/{uploader_id}/{file_id}.{ext}`;
//! its thumbnail is the sibling `{file_id}_thumb.jpg`. Prefixes are made
//! visible by a zero-byte `.keep` marker. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use surfcast_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
