// src/constants.rs
//! Operational constants for the Hoppy Hour client.
//!
//! Each constant names the behavior it bounds. Reading them top to bottom
//! tells you how the client talks to the backend, how hard it tries before
//! giving up, and what it shows when no image can be found.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Backend boundaries
// ---------------------------------------------------------------------------

/// Backend used when neither a flag nor `HOPPY_API_URL` names one.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Environment variable selecting the backend base URL.
pub const API_URL_ENV: &str = "HOPPY_API_URL";

/// Environment variable selecting the CDN base for storage-key image URLs.
pub const CDN_BASE_URL_ENV: &str = "HOPPY_CDN_BASE_URL";

/// Environment variable that seeds the in-memory auth token.
pub const AUTH_TOKEN_ENV: &str = "HOPPY_AUTH_TOKEN";

/// Per-attempt timeout for ordinary requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-attempt timeout for the health endpoint.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Retry boundaries
// ---------------------------------------------------------------------------

/// Total attempts (first try included) before a transient failure surfaces.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay after the first failed attempt; doubles after each further failure.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Client-correctable statuses. Retrying cannot change their outcome.
pub const NON_RETRYABLE_STATUSES: [u16; 5] = [400, 401, 403, 404, 422];

// ---------------------------------------------------------------------------
// Local state
// ---------------------------------------------------------------------------

/// Key the auth token is stored under in the credentials file.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Directory name used under the user's config dir.
pub const APP_DIR_NAME: &str = "hoppyhour";

// ---------------------------------------------------------------------------
// Browsing
// ---------------------------------------------------------------------------

/// Businesses requested per infinite-scroll page.
pub const BUSINESSES_PER_PAGE: u32 = 12;

/// Image shown when a business has no usable photo URL.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-image.jpg";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters kept when an error body is not JSON.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
