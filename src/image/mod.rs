// src/image/mod.rs
//! Image resolution: choosing one displayable URL per business.
//!
//! Resolution is pure. The same photo, profile, and CDN base always produce
//! the same ordered candidate list. A [`ResolvedImage`] then walks that list
//! as images fail to load, without ever recomputing it.

mod profile;
mod resolver;

pub use profile::ImageProfile;
pub use resolver::{ImageResolver, ImageSource, ResolvedImage};

use crate::error::AppError;

/// Something that can mint a displayable URL for a storage key.
///
/// Used only as a last resort, once every recorded candidate has failed.
#[async_trait::async_trait]
pub trait ImageUrlSource: Send + Sync {
    async fn mint_url(&self, storage_key: &str) -> Result<String, AppError>;
}
