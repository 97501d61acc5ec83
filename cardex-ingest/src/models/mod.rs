//! Data models for card resolution

pub mod card;
pub mod upload;

pub use card::{by_release_date_desc, CardVersion, ResolvedCard};
pub use upload::{UploadError, UploadedImage, ACCEPTED_CONTENT_TYPES};
