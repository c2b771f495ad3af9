// src/image/resolver.rs
use super::{ImageProfile, ImageUrlSource};
use crate::constants::PLACEHOLDER_IMAGE;
use crate::model::{Business, Photo};
use crate::types::ValidatedUrl;

/// Builds ordered image candidates for photos.
#[derive(Debug, Clone, Default)]
pub struct ImageResolver {
    cdn_base_url: Option<ValidatedUrl>,
    profile: ImageProfile,
}

impl ImageResolver {
    /// `cdn_base_url` is needed to turn raw storage keys into URLs; without
    /// it storage keys only serve the remote lookup.
    pub fn new(cdn_base_url: Option<ValidatedUrl>) -> Self {
        Self {
            cdn_base_url,
            profile: ImageProfile::default(),
        }
    }

    pub fn with_profile(mut self, profile: ImageProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn profile(&self) -> ImageProfile {
        self.profile
    }

    /// Resolves the image for a business's main photo.
    pub fn resolve(&self, business: &Business) -> ResolvedImage {
        self.resolve_photos(&business.photos)
    }

    /// Resolves the main photo of `photos`, or the first one when none is flagged.
    pub fn resolve_photos(&self, photos: &[Photo]) -> ResolvedImage {
        let main = photos.iter().find(|p| p.main_photo).or_else(|| photos.first());
        match main {
            Some(photo) => self.resolve_photo(photo),
            None => ResolvedImage::placeholder(),
        }
    }

    pub fn resolve_photo(&self, photo: &Photo) -> ResolvedImage {
        let candidates = self.candidates(photo);
        let source = if candidates.is_empty() {
            ImageSource::Placeholder
        } else {
            ImageSource::Candidate(0)
        };
        ResolvedImage {
            candidates,
            source,
            storage_key: self.storage_key(photo).map(str::to_string),
            remote_attempted: false,
        }
    }

    /// Every present, non-blank URL for `photo`, best first, without duplicates.
    ///
    /// Order: CDN variants in profile order, the external fallback, the
    /// storage-key URL, the generic photo URL.
    pub fn candidates(&self, photo: &Photo) -> Vec<String> {
        let cdn = self
            .profile
            .cdn_order()
            .iter()
            .map(|variant| photo.cdn_url(*variant).map(str::to_string));
        let storage = self
            .storage_key(photo)
            .and_then(|key| self.storage_key_url(key));

        let mut candidates: Vec<String> = Vec::new();
        let ordered = cdn
            .chain(std::iter::once(photo.fallback_url.clone()))
            .chain(std::iter::once(storage))
            .chain(std::iter::once(photo.url.clone()));

        for url in ordered.flatten() {
            let url = url.trim();
            if url.is_empty() || candidates.iter().any(|c| c == url) {
                continue;
            }
            candidates.push(url.to_string());
        }
        candidates
    }

    /// `<cdn base>/<key>` with leading slashes stripped from the key.
    pub fn storage_key_url(&self, key: &str) -> Option<String> {
        let key = key.trim().trim_start_matches('/');
        if key.is_empty() {
            return None;
        }
        self.cdn_base_url.as_ref().map(|base| base.join_path(key))
    }

    fn storage_key<'a>(&self, photo: &'a Photo) -> Option<&'a str> {
        self.profile
            .storage_key_order()
            .iter()
            .filter_map(|variant| photo.storage_key(*variant))
            .find(|key| !key.trim().is_empty())
    }
}

/// What a [`ResolvedImage`] currently displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Index into the candidate list.
    Candidate(usize),
    Placeholder,
    /// URL minted by the backend after every candidate failed.
    Remote(String),
    /// Nothing left to try.
    Unavailable,
}

/// The chosen image URL plus the untried fallbacks behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    candidates: Vec<String>,
    source: ImageSource,
    storage_key: Option<String>,
    remote_attempted: bool,
}

impl ResolvedImage {
    pub fn placeholder() -> Self {
        Self {
            candidates: Vec::new(),
            source: ImageSource::Placeholder,
            storage_key: None,
            remote_attempted: false,
        }
    }

    /// URL to display, or `None` once the image is unavailable.
    pub fn url(&self) -> Option<&str> {
        match &self.source {
            ImageSource::Candidate(i) => self.candidates.get(*i).map(String::as_str),
            ImageSource::Placeholder => Some(PLACEHOLDER_IMAGE),
            ImageSource::Remote(url) => Some(url.as_str()),
            ImageSource::Unavailable => None,
        }
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Candidates not yet displayed.
    pub fn remaining(&self) -> &[String] {
        match self.source {
            ImageSource::Candidate(i) => &self.candidates[(i + 1).min(self.candidates.len())..],
            _ => &[],
        }
    }

    pub fn storage_key(&self) -> Option<&str> {
        self.storage_key.as_deref()
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == ImageSource::Placeholder
    }

    pub fn is_unavailable(&self) -> bool {
        self.source == ImageSource::Unavailable
    }

    /// Records that the displayed URL failed to load and moves to the next one.
    ///
    /// Past the last candidate (or after the placeholder or a minted URL
    /// fails) the image is unavailable and stays so.
    pub fn advance(&mut self) -> Option<&str> {
        self.source = match self.source {
            ImageSource::Candidate(i) if i + 1 < self.candidates.len() => {
                ImageSource::Candidate(i + 1)
            }
            _ => ImageSource::Unavailable,
        };
        self.url()
    }

    /// Like [`advance`](Self::advance), but once the candidates run out asks
    /// `source` to mint a URL for the photo's storage key.
    ///
    /// The lookup happens at most once per resolution. The minted URL is
    /// displayed but never added to the candidate list.
    pub async fn advance_or_mint(&mut self, source: &dyn ImageUrlSource) -> Option<&str> {
        let was_remote = matches!(self.source, ImageSource::Remote(_));
        self.advance();
        if !self.is_unavailable() || was_remote || self.remote_attempted {
            return self.url();
        }
        let Some(key) = self.storage_key.clone() else {
            return None;
        };

        self.remote_attempted = true;
        match source.mint_url(&key).await {
            Ok(url) if !url.trim().is_empty() => {
                log::debug!("Minted image URL for storage key {}", key);
                self.source = ImageSource::Remote(url.trim().to_string());
            }
            Ok(_) => log::warn!("Image URL lookup for {} returned an empty URL", key),
            Err(e) => log::warn!("Image URL lookup for {} failed: {}", key, e),
        }
        self.url()
    }
}
