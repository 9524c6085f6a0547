//! Surfcast Core Library
//!
//! This crate provides core domain models, error types, configuration and the
//! session context that are shared across all Surfcast components.

pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod session;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, SurfcastConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use geo::Coordinates;
pub use session::{SessionContext, SessionUser, UserMetadata};
pub use storage_types::StorageBackend;
