// src/api/business.rs
//! Typed access to the backend's business endpoints.

use super::pipeline::RequestPipeline;
use super::request::RequestDescriptor;
use super::responses::{HealthStatus, ListPayload, MintedUrl};
use crate::constants::{BUSINESSES_PER_PAGE, HEALTH_CHECK_TIMEOUT};
use crate::error::AppError;
use crate::image::ImageUrlSource;
use crate::model::{Business, Photo};
use crate::types::BusinessId;

/// Optional filters for listing businesses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessFilter {
    pub is_bar: Option<bool>,
    pub is_restaurant: Option<bool>,
    pub price_level: Option<u8>,
    /// Free-text search.
    pub query: Option<String>,
}

impl BusinessFilter {
    fn apply(&self, request: RequestDescriptor) -> RequestDescriptor {
        request
            .with_optional_query("isBar", self.is_bar)
            .with_optional_query("isRestaurant", self.is_restaurant)
            .with_optional_query("priceLevel", self.price_level)
            .with_optional_query(
                "q",
                self.query.as_deref().filter(|q| !q.trim().is_empty()),
            )
    }
}

/// Business endpoints on top of a [`RequestPipeline`].
#[derive(Clone)]
pub struct BusinessApi {
    pipeline: RequestPipeline,
}

impl BusinessApi {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    /// One page of businesses. Pages are counted from 1.
    pub async fn list_businesses(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        filter: &BusinessFilter,
    ) -> Result<Vec<Business>, AppError> {
        let request = RequestDescriptor::get("/business")
            .with_optional_query("page", page)
            .with_optional_query("limit", limit);
        self.fetch_list(&filter.apply(request)).await
    }

    pub async fn get_business(&self, id: &BusinessId) -> Result<Business, AppError> {
        let request = RequestDescriptor::get(format!("/business/{}", id));
        self.pipeline.execute_json(&request).await
    }

    /// Businesses with at least one deal, optionally only on `day` (0 = Sunday).
    pub async fn businesses_with_deals(&self, day: Option<u32>) -> Result<Vec<Business>, AppError> {
        let request = RequestDescriptor::get("/business/deals").with_optional_query("day", day);
        self.fetch_list(&request).await
    }

    pub async fn search_by_location(
        &self,
        lat: f64,
        lng: f64,
        radius: Option<f64>,
    ) -> Result<Vec<Business>, AppError> {
        let request = RequestDescriptor::get("/business")
            .with_query("lat", lat)
            .with_query("lng", lng)
            .with_optional_query("radius", radius);
        self.fetch_list(&request).await
    }

    pub async fn search_by_category(&self, category: &str) -> Result<Vec<Business>, AppError> {
        let request = RequestDescriptor::get("/business").with_query("category", category.trim());
        self.fetch_list(&request).await
    }

    pub async fn business_photos(&self, id: &BusinessId) -> Result<Vec<Photo>, AppError> {
        let request = RequestDescriptor::get(format!("/business/{}/photos", id));
        self.fetch_list(&request).await
    }

    /// Backend liveness, with a short timeout.
    pub async fn health(&self) -> Result<HealthStatus, AppError> {
        let request = RequestDescriptor::get("/health").with_timeout(HEALTH_CHECK_TIMEOUT);
        self.pipeline.execute_json(&request).await
    }

    pub async fn admin_stats(&self) -> Result<serde_json::Value, AppError> {
        self.pipeline
            .execute_json(&RequestDescriptor::get("/admin/stats"))
            .await
    }

    pub async fn cost_report(&self) -> Result<serde_json::Value, AppError> {
        self.pipeline
            .execute_json(&RequestDescriptor::get("/admin/cost-report"))
            .await
    }

    /// Asks the backend for a displayable URL for a storage key.
    pub async fn mint_image_url(&self, storage_key: &str) -> Result<String, AppError> {
        let request = RequestDescriptor::get("/images/url").with_query("key", storage_key);
        let minted: MintedUrl = self.pipeline.execute_json(&request).await?;
        Ok(minted.url)
    }

    /// Infinite-scroll pager over `GET /business`.
    pub fn pager(&self, filter: BusinessFilter) -> BusinessPager {
        BusinessPager::new(self.clone(), filter)
    }

    async fn fetch_list<T: serde::de::DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> Result<Vec<T>, AppError> {
        let payload: ListPayload<T> = self.pipeline.execute_json(request).await?;
        Ok(payload.into_items())
    }
}

#[async_trait::async_trait]
impl ImageUrlSource for BusinessApi {
    async fn mint_url(&self, storage_key: &str) -> Result<String, AppError> {
        self.mint_image_url(storage_key).await
    }
}

/// Loads businesses page by page, the way an infinite-scroll list does.
///
/// A page shorter than the page size ends the stream. A failed load keeps
/// what was already loaded and can simply be retried.
pub struct BusinessPager {
    api: BusinessApi,
    filter: BusinessFilter,
    page_size: u32,
    next_page: u32,
    has_more: bool,
    loaded: Vec<Business>,
    last_error: Option<AppError>,
}

impl BusinessPager {
    pub fn new(api: BusinessApi, filter: BusinessFilter) -> Self {
        Self {
            api,
            filter,
            page_size: BUSINESSES_PER_PAGE,
            next_page: 1,
            has_more: true,
            loaded: Vec::new(),
            last_error: None,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn loaded(&self) -> &[Business] {
        &self.loaded
    }

    pub fn into_loaded(self) -> Vec<Business> {
        self.loaded
    }

    /// The error from the most recent load, cleared by the next success.
    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    /// Loads the next page and returns how many businesses it added.
    ///
    /// Returns `Ok(0)` once the stream is exhausted.
    pub async fn load_more(&mut self) -> Result<usize, &AppError> {
        if !self.has_more {
            return Ok(0);
        }

        let result = self
            .api
            .list_businesses(Some(self.next_page), Some(self.page_size), &self.filter)
            .await;

        match result {
            Ok(page) => {
                let added = page.len();
                self.has_more = added as u32 == self.page_size;
                if added > 0 {
                    self.next_page += 1;
                }
                self.loaded.extend(page);
                self.last_error = None;
                log::debug!(
                    "Loaded {} businesses (total {}, more: {})",
                    added,
                    self.loaded.len(),
                    self.has_more
                );
                Ok(added)
            }
            Err(e) => {
                log::warn!("Failed to load businesses page {}: {}", self.next_page, e);
                Err(self.last_error.insert(e))
            }
        }
    }

    /// Loads pages until the stream ends or `max_pages` pages were read.
    ///
    /// Stops at the first failure, keeping the pages already loaded.
    pub async fn load_all(&mut self, max_pages: Option<u32>) -> Result<&[Business], &AppError> {
        let mut pages = 0u32;
        while self.has_more {
            if let Some(max) = max_pages {
                if pages >= max {
                    log::debug!("Reached maximum page limit: {}", max);
                    break;
                }
            }
            if let Err(e) = self.load_more().await {
                log::warn!("Stopping after {} pages: {}", pages, e);
                break;
            }
            pages += 1;
        }

        match &self.last_error {
            Some(e) if self.loaded.is_empty() => Err(e),
            _ => Ok(&self.loaded),
        }
    }
}

/// Turns a failed list load into an empty list, logging the failure.
pub trait Degrade<T> {
    fn or_empty(self, context: &str) -> Vec<T>;
}

impl<T> Degrade<T> for Result<Vec<T>, AppError> {
    fn or_empty(self, context: &str) -> Vec<T> {
        match self {
            Ok(items) => items,
            Err(e) => {
                log::warn!("{} failed, showing no results: {}", context, e);
                Vec::new()
            }
        }
    }
}
