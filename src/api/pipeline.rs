// src/api/pipeline.rs
//! The request pipeline: one logical call, bounded automatic recovery.
//!
//! Each attempt reads the current token, sends the request through the
//! transport, and classifies the outcome. Failures whose status is in the
//! client-correctable set end the call at once; everything else is retried
//! with exponential backoff until the attempt budget runs out.

use super::request::RequestDescriptor;
use super::responses::ApiResponse;
use super::Transport;
use crate::credentials::CredentialProvider;
use crate::error::{ApiError, AppError, ErrorCode};
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Executes API calls with auth injection, error mapping, and retries.
#[derive(Clone)]
pub struct RequestPipeline {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialProvider>,
    retry: RetryPolicy,
}

impl RequestPipeline {
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            transport,
            credentials,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Runs `request` until it succeeds, fails terminally, or exhausts its attempts.
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<ApiResponse, ApiError> {
        // A 401 invalidates the token once per call, however many attempts run.
        let token_cleared = AtomicBool::new(false);
        let token_cleared = &token_cleared;

        retry_with_backoff(
            &self.retry,
            move |attempt| self.attempt(request, attempt, token_cleared),
            ApiError::is_retryable,
        )
        .await
    }

    async fn attempt(
        &self,
        request: &RequestDescriptor,
        attempt: u32,
        token_cleared: &AtomicBool,
    ) -> Result<ApiResponse, ApiError> {
        let token = self.credentials.token().await;
        log::debug!(
            "{} (attempt {}, {})",
            request,
            attempt,
            if token.is_some() { "authenticated" } else { "anonymous" }
        );

        let started = tokio::time::Instant::now();
        let outcome = self.transport.send(request, token.as_ref()).await;
        let duration = started.elapsed();

        match outcome {
            Ok(raw) if (200..300).contains(&raw.status) => Ok(ApiResponse {
                status: raw.status,
                url: raw.url,
                body: raw.body,
                duration,
                attempts: attempt,
            }),
            Ok(raw) => {
                let error = ApiError::from_response(raw.status, &raw.body, duration);
                if error.is_unauthorized() && !token_cleared.swap(true, Ordering::SeqCst) {
                    log::info!("{} was rejected with 401, clearing stored token", request);
                    self.credentials.clear().await;
                }
                Err(error)
            }
            Err(failure) => Err(ApiError::transport(failure.code, failure.message, duration)),
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.execute(&RequestDescriptor::get(path)).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse, ApiError> {
        let request = RequestDescriptor::post(path)
            .with_json(body)
            .map_err(setup_error)?;
        self.execute(&request).await
    }

    pub async fn put<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse, ApiError> {
        let request = RequestDescriptor::put(path)
            .with_json(body)
            .map_err(setup_error)?;
        self.execute(&request).await
    }

    pub async fn patch<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse, ApiError> {
        let request = RequestDescriptor::patch(path)
            .with_json(body)
            .map_err(setup_error)?;
        self.execute(&request).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.execute(&RequestDescriptor::delete(path)).await
    }

    /// Executes `request` and deserializes the JSON body.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> Result<T, AppError> {
        let response = self.execute(request).await?;
        response.json()
    }
}

fn setup_error(err: serde_json::Error) -> ApiError {
    ApiError::transport(
        ErrorCode::SetupError,
        format!("failed to serialize request body: {}", err),
        Duration::ZERO,
    )
}
