//! Plain-text renderings of the three application screens.

pub mod info;
pub mod landing;
pub mod list;
