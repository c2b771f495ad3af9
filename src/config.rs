// src/config.rs
use crate::api::{BusinessApi, HoppyHttpClient, RequestPipeline};
use crate::constants::{
    API_URL_ENV, AUTH_TOKEN_ENV, CDN_BASE_URL_ENV, DEFAULT_API_URL, DEFAULT_BASE_DELAY,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT,
};
use crate::credentials::{CredentialProvider, FileCredentials, MemoryCredentials};
use crate::error::AppError;
use crate::error_recovery::RetryPolicy;
use crate::image::{ImageProfile, ImageResolver};
use crate::types::{AuthToken, ValidatedUrl};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Backend base URL (overrides HOPPY_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// CDN base URL for storage-key image URLs (overrides HOPPY_CDN_BASE_URL)
    #[arg(long, global = true)]
    pub cdn_base_url: Option<String>,

    /// Bearer token (overrides HOPPY_AUTH_TOKEN and the credentials file)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Credentials file holding {"authToken": "..."}
    #[arg(long, global = true)]
    pub credentials_file: Option<String>,

    /// Total attempts per request, the first one included
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Delay after the first failed attempt, in milliseconds; doubles each retry
    #[arg(long, global = true, default_value_t = DEFAULT_BASE_DELAY.as_millis() as u64)]
    pub base_delay_ms: u64,

    /// Per-attempt timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List businesses, one page or every page
    List {
        /// Fetch only this page (1-based)
        #[arg(long)]
        page: Option<u32>,
        /// Businesses per page
        #[arg(long)]
        limit: Option<u32>,
        /// Only bars
        #[arg(long)]
        bar: bool,
        /// Only restaurants
        #[arg(long)]
        restaurant: bool,
        #[arg(long)]
        price_level: Option<u8>,
        /// Free-text search
        #[arg(long)]
        query: Option<String>,
        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<u32>,
    },
    /// Show one business
    Get { id: String },
    /// Businesses with happy-hour deals
    Deals {
        /// Day of week, 0 = Sunday
        #[arg(long)]
        day: Option<u32>,
        /// Only deals running today
        #[arg(long, conflicts_with = "day")]
        today: bool,
    },
    /// Businesses near a location
    Near {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Businesses in a category
    Category { category: String },
    /// Photos of a business
    Photos { id: String },
    /// Resolve the display image of a business
    Image {
        id: String,
        /// Priority profile: card or hero
        #[arg(long, default_value = "card")]
        profile: ImageProfile,
        /// Download candidates and fall back until one loads
        #[arg(long)]
        verify: bool,
    },
    /// Backend health check
    Health,
    /// Admin statistics
    Stats,
    /// Admin cost report
    CostReport,
}

/// Resolved client configuration: flags over environment over defaults.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: ValidatedUrl,
    pub cdn_base_url: Option<ValidatedUrl>,
    pub token: Option<AuthToken>,
    pub credentials_file: PathBuf,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    pub verbose: bool,
}

impl ClientConfig {
    /// Resolves configuration from CLI input and the process environment.
    pub fn resolve(cli: &CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// Resolves configuration with `env` standing in for the environment.
    pub fn resolve_with<E>(cli: &CommandLineInput, env: E) -> Result<Self, AppError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let api_url = non_blank(cli.api_url.clone())
            .or_else(|| non_blank(env(API_URL_ENV)))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = ValidatedUrl::parse(&api_url)?;

        let cdn_base_url = non_blank(cli.cdn_base_url.clone())
            .or_else(|| non_blank(env(CDN_BASE_URL_ENV)))
            .map(|url| ValidatedUrl::parse(&url))
            .transpose()?;

        let token = non_blank(cli.token.clone())
            .or_else(|| non_blank(env(AUTH_TOKEN_ENV)))
            .map(AuthToken::new)
            .transpose()?;

        let credentials_file = cli
            .credentials_file
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(FileCredentials::default_path);

        if cli.timeout_secs == 0 {
            return Err(AppError::MissingConfiguration(
                "timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            api_url,
            cdn_base_url,
            token,
            credentials_file,
            retry: RetryPolicy::new(cli.max_attempts, Duration::from_millis(cli.base_delay_ms)),
            request_timeout: Duration::from_secs(cli.timeout_secs),
            verbose: cli.verbose,
        })
    }

    /// An explicit token lives in memory; otherwise the credentials file is used.
    pub fn credentials(&self) -> Arc<dyn CredentialProvider> {
        match &self.token {
            Some(token) => Arc::new(MemoryCredentials::new(Some(token.clone()))),
            None => Arc::new(FileCredentials::new(&self.credentials_file)),
        }
    }

    pub fn build_pipeline(&self) -> Result<RequestPipeline, AppError> {
        let transport = HoppyHttpClient::new(self.api_url.clone(), self.request_timeout)?;
        Ok(RequestPipeline::new(Arc::new(transport), self.credentials())
            .with_retry_policy(self.retry))
    }

    pub fn business_api(&self) -> Result<BusinessApi, AppError> {
        Ok(BusinessApi::new(self.build_pipeline()?))
    }

    pub fn image_resolver(&self, profile: ImageProfile) -> ImageResolver {
        ImageResolver::new(self.cdn_base_url.clone()).with_profile(profile)
    }
}
