// src/api/mod.rs
//! Backend interaction: the ability to talk to the Hoppy Hour API.
//!
//! Layered from the wire up: a [`Transport`] moves one request, the
//! [`RequestPipeline`] turns outcomes into `ApiError`s and retries, and
//! [`BusinessApi`] gives the endpoints their types.

pub mod business;
pub mod client;
pub mod pipeline;
pub mod request;
pub mod responses;

use crate::error::ErrorCode;
use crate::types::AuthToken;

/// A response as received, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub url: String,
    pub body: String,
}

/// Why an attempt produced no response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub code: ErrorCode,
    pub message: String,
}

/// The ability to send one HTTP request.
///
/// Implementations report every response they receive, 2xx or not, and fail
/// only when no response arrived. The pipeline depends on this trait, never
/// on HTTP details.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &RequestDescriptor,
        token: Option<&AuthToken>,
    ) -> Result<RawResponse, TransportFailure>;
}

pub use business::{BusinessApi, BusinessFilter, BusinessPager, Degrade};
pub use client::HoppyHttpClient;
pub use pipeline::RequestPipeline;
pub use request::{HttpMethod, RequestDescriptor};
pub use responses::ApiResponse;
