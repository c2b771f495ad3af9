// src/image/profile.rs
use crate::model::CdnVariant;
use crate::types::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Named priority orders for picking a CDN variant.
///
/// Venue cards want a mid-sized image and fall back through smaller copies
/// before larger ones. Hero images on feature cards want the largest copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageProfile {
    #[default]
    Card,
    Hero,
}

impl ImageProfile {
    /// CDN variants in the order they are tried.
    pub fn cdn_order(&self) -> &'static [CdnVariant] {
        use CdnVariant::*;
        match self {
            Self::Card => &[Medium, Small, Thumbnail, Large, Original],
            Self::Hero => &[Large, Original, Medium, Small, Thumbnail],
        }
    }

    /// Storage keys in the order they are tried for URL construction.
    pub fn storage_key_order(&self) -> &'static [CdnVariant] {
        use CdnVariant::*;
        match self {
            Self::Card => &[Medium, Original],
            Self::Hero => &[Large, Original],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Hero => "hero",
        }
    }
}

impl fmt::Display for ImageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageProfile {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" | "profile:card" => Ok(Self::Card),
            "hero" | "profile:hero" => Ok(Self::Hero),
            other => Err(ValidationError::UnknownProfile(other.to_string())),
        }
    }
}
