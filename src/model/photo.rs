// src/model/photo.rs
use serde::{Deserialize, Serialize};

/// A pre-generated resized copy of an image, addressed by size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CdnVariant {
    Thumbnail,
    Small,
    Medium,
    Large,
    Original,
}

/// CDN URLs generated server-side for each variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdnUrls {
    pub original: Option<String>,
    pub thumbnail: Option<String>,
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}

impl CdnUrls {
    pub fn variant(&self, variant: CdnVariant) -> Option<&str> {
        match variant {
            CdnVariant::Thumbnail => self.thumbnail.as_deref(),
            CdnVariant::Small => self.small.as_deref(),
            CdnVariant::Medium => self.medium.as_deref(),
            CdnVariant::Large => self.large.as_deref(),
            CdnVariant::Original => self.original.as_deref(),
        }
    }
}

/// A photo of a business. At most one photo per business is flagged main.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub business_id: String,
    pub source_id: Option<String>,
    pub source: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Generic URL of the photo as first imported.
    pub url: Option<String>,
    #[serde(default)]
    pub main_photo: bool,

    // Object-store keys, one per stored variant.
    pub s3_key: Option<String>,
    pub s3_key_thumbnail: Option<String>,
    pub s3_key_small: Option<String>,
    pub s3_key_medium: Option<String>,
    pub s3_key_large: Option<String>,

    pub cdn_urls: Option<CdnUrls>,
    /// External URL to use when no CDN copy exists.
    pub fallback_url: Option<String>,
}

impl Photo {
    pub fn cdn_url(&self, variant: CdnVariant) -> Option<&str> {
        self.cdn_urls.as_ref()?.variant(variant)
    }

    /// Storage key recorded for `variant`; the original has no suffix.
    pub fn storage_key(&self, variant: CdnVariant) -> Option<&str> {
        match variant {
            CdnVariant::Thumbnail => self.s3_key_thumbnail.as_deref(),
            CdnVariant::Small => self.s3_key_small.as_deref(),
            CdnVariant::Medium => self.s3_key_medium.as_deref(),
            CdnVariant::Large => self.s3_key_large.as_deref(),
            CdnVariant::Original => self.s3_key.as_deref(),
        }
    }
}
