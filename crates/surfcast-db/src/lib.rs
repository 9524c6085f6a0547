//! Surfcast database layer
//!
//! Postgres repositories for beaches, user profiles and video records, plus
//! pool setup and migrations.

pub mod db;
pub mod setup;

pub use db::{
    BeachRepository, BeachStore, FeedVideo, NearbyBeaches, RecordStore, UserRepository,
    VideoRepository,
};
pub use setup::{connect, run_migrations, setup_database};
