// src/lib.rs
//! hoppyhour library: a resilient client for the Hoppy Hour venue API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `ApiError`, `AppError`, `ValidationError`
//! - **Configuration**: `ClientConfig`, `CommandLineInput`
//! - **Request pipeline**: `RequestPipeline`, `Transport`, `RetryPolicy`
//! - **Credentials**: `CredentialProvider`, `MemoryCredentials`, `FileCredentials`
//! - **Domain model**: `Business`, `DealInfo`, `Photo`, `CdnUrls`
//! - **Images**: `ImageResolver`, `ResolvedImage`, `ImageProfile`

pub mod api;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod error_recovery;
pub mod image;
pub mod model;
pub mod types;

// --- Error Handling ---
pub use crate::error::{ApiError, ApiErrorKind, AppError, ErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{ClientConfig, Command, CommandLineInput};

// --- Request Pipeline ---
pub use crate::api::{
    ApiResponse, BusinessApi, BusinessFilter, BusinessPager, Degrade, HoppyHttpClient,
    HttpMethod, RawResponse, RequestDescriptor, RequestPipeline, Transport, TransportFailure,
};
pub use crate::error_recovery::{retry_with_backoff, RetryPolicy};

// --- Credentials ---
pub use crate::credentials::{CredentialProvider, FileCredentials, MemoryCredentials};

// --- Domain Model ---
pub use crate::model::{format_deal_time, format_deals, Business, CdnUrls, CdnVariant, DealInfo, Photo};
pub use crate::types::{AuthToken, BusinessId, ValidatedUrl};

// --- Images ---
pub use crate::image::{ImageProfile, ImageResolver, ImageSource, ImageUrlSource, ResolvedImage};
