// tests/common/mod.rs
//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use hoppyhour::{
    AuthToken, CredentialProvider, ErrorCode, RawResponse, RequestDescriptor, RequestPipeline,
    RetryPolicy, Transport, TransportFailure,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// One request as the transport saw it.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub at: Instant,
    pub description: String,
    pub token: Option<String>,
    pub timeout: Option<Duration>,
}

/// Transport that replays scripted outcomes; the last one repeats forever.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RawResponse, TransportFailure>>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<RawResponse, TransportFailure>>) -> Arc<Self> {
        assert!(!script.is_empty(), "script needs at least one outcome");
        Arc::new(Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn always(outcome: Result<RawResponse, TransportFailure>) -> Arc<Self> {
        Self::new(vec![outcome])
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().clone()
    }

    pub fn attempts(&self) -> usize {
        self.seen.lock().len()
    }

    /// Gaps between consecutive attempts.
    pub fn gaps(&self) -> Vec<Duration> {
        self.seen()
            .windows(2)
            .map(|pair| pair[1].at - pair[0].at)
            .collect()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
        token: Option<&AuthToken>,
    ) -> Result<RawResponse, TransportFailure> {
        self.seen.lock().push(SeenRequest {
            at: Instant::now(),
            description: request.to_string(),
            token: token.map(|t| t.as_str().to_string()),
            timeout: request.timeout(),
        });

        let mut script = self.script.lock();
        if script.len() > 1 {
            script.pop_front().expect("script is not empty")
        } else {
            script.front().cloned().expect("script is not empty")
        }
    }
}

pub fn status(code: u16, body: &str) -> Result<RawResponse, TransportFailure> {
    Ok(RawResponse {
        status: code,
        url: "http://test.invalid/".to_string(),
        body: body.to_string(),
    })
}

pub fn ok_json(body: serde_json::Value) -> Result<RawResponse, TransportFailure> {
    status(200, &body.to_string())
}

pub fn failure(code: ErrorCode) -> Result<RawResponse, TransportFailure> {
    Err(TransportFailure {
        message: format!("simulated {}", code),
        code,
    })
}

/// In-memory credentials that count how often they were cleared.
#[derive(Default)]
pub struct CountingCredentials {
    token: Mutex<Option<AuthToken>>,
    clears: AtomicU32,
}

impl CountingCredentials {
    pub fn with_token(token: &str) -> Arc<Self> {
        Arc::new(Self {
            token: Mutex::new(Some(AuthToken::new(token).expect("valid test token"))),
            clears: AtomicU32::new(0),
        })
    }

    pub fn anonymous() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn clears(&self) -> u32 {
        self.clears.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> Option<AuthToken> {
        self.token.lock().clone()
    }
}

#[async_trait::async_trait]
impl CredentialProvider for CountingCredentials {
    async fn token(&self) -> Option<AuthToken> {
        self.token.lock().clone()
    }

    async fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.token.lock().take();
    }
}

/// Pipeline with the default policy shape but the given attempts and base delay.
pub fn pipeline(
    transport: Arc<ScriptedTransport>,
    credentials: Arc<CountingCredentials>,
    max_attempts: u32,
    base_delay: Duration,
) -> RequestPipeline {
    RequestPipeline::new(transport, credentials)
        .with_retry_policy(RetryPolicy::new(max_attempts, base_delay))
}
