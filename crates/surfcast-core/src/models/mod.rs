pub mod beach;
pub mod upload;
pub mod user;

pub use beach::{Beach, NearbyBeach};
pub use upload::{MediaAsset, NewUploadRecord, UploadRecord, UploadedAssets};
pub use user::UserProfile;
