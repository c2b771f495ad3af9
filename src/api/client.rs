// src/api/client.rs
//! Reqwest-backed transport for the Hoppy Hour backend.
//!
//! This layer only moves bytes: it builds the HTTP request, attaches the
//! bearer token it is handed, and reports either the response (whatever its
//! status) or the reason no response arrived. Classification of statuses
//! and retries live in the pipeline.

use super::request::RequestDescriptor;
use super::{RawResponse, Transport, TransportFailure};
use crate::error::{AppError, ErrorCode};
use crate::types::{AuthToken, ValidatedUrl};
use reqwest::{header, Client};
use std::error::Error as _;
use std::time::Duration;

/// A thin wrapper around reqwest Client bound to one backend.
#[derive(Clone)]
pub struct HoppyHttpClient {
    client: Client,
    base_url: ValidatedUrl,
    default_timeout: Duration,
}

impl HoppyHttpClient {
    /// Creates a client for `base_url` whose attempts time out after `default_timeout`
    /// unless a request overrides it.
    pub fn new(base_url: ValidatedUrl, default_timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers())
            .build()?;
        Ok(Self {
            client,
            base_url,
            default_timeout,
        })
    }

    /// JSON in both directions.
    fn create_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers
    }

    pub fn base_url(&self) -> &ValidatedUrl {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl Transport for HoppyHttpClient {
    async fn send(
        &self,
        request: &RequestDescriptor,
        token: Option<&AuthToken>,
    ) -> Result<RawResponse, TransportFailure> {
        let url = self.base_url.join_path(request.path());
        log::debug!("{} {}", request.method(), url);

        let mut builder = self
            .client
            .request(request.method().into(), &url)
            .timeout(request.timeout().unwrap_or(self.default_timeout));

        if !request.query().is_empty() {
            builder = builder.query(request.query());
        }
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token.bearer());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify_transport_error)?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = match response.text().await {
            Ok(body) => body,
            // A failed status still decides retry and 401 handling without its body.
            Err(err) if status >= 300 => {
                log::debug!("Discarding unreadable {} body from {}: {}", status, url, err);
                String::new()
            }
            Err(err) => return Err(classify_transport_error(err)),
        };

        log::debug!("{} {} -> {}", request.method(), url, status);
        Ok(RawResponse { status, url, body })
    }
}

/// Maps a reqwest failure onto the transport error codes.
pub(crate) fn classify_transport_error(err: reqwest::Error) -> TransportFailure {
    let code = if err.is_timeout() {
        ErrorCode::Timeout
    } else if err.is_builder() {
        ErrorCode::SetupError
    } else if is_connection_refused(&err) {
        ErrorCode::ConnectionRefused
    } else {
        ErrorCode::NetworkError
    };

    TransportFailure {
        code,
        message: err.to_string(),
    }
}

/// Walks the source chain looking for a refused connect.
fn is_connection_refused(err: &reqwest::Error) -> bool {
    if !err.is_connect() {
        return false;
    }

    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        if cause.to_string().to_lowercase().contains("connection refused") {
            return true;
        }
        source = cause.source();
    }
    false
}
