//! Database repositories for data access layer
//!
//! Each repository owns one table. Services depend on the `RecordStore` and
//! `BeachStore` traits so they can run against in-memory fakes.

pub mod beach;
pub mod nearby;
pub mod user;
pub mod video;

pub use beach::{BeachRepository, BeachStore};
pub use nearby::NearbyBeaches;
pub use user::UserRepository;
pub use video::{FeedVideo, RecordStore, VideoRepository};
