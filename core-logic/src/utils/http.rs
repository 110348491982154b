use crate::config::ProxyEndpoint;
use crate::error::NetworkError;
use crate::traits::EventSink;
use crate::utils::retry::{retry_fixed, RetryPolicy};
use anyhow::{Context, Result};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, warn};

/// One logical request: method, target and JSON body, fixed up front.
/// Proxy binding and the per-attempt timeout live on the client.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            body: Some(body),
        }
    }
}

/// Result of one logical request after the retry schedule has run its course.
/// A terminal failure is still an outcome, never a process error: callers
/// skip the step and keep the pipeline moving.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub succeeded: bool,
    pub payload: Option<Value>,
    pub error: Option<String>,
    pub attempts_used: u32,
}

impl RequestOutcome {
    /// Looks up `payload.data.<field>`, the envelope most endpoints use.
    pub fn data_field(&self, field: &str) -> Option<&Value> {
        self.payload.as_ref().and_then(|p| p.get("data")).and_then(|d| d.get(field))
    }
}

/// HTTP executor bound to an optional outbound proxy for its whole lifetime.
pub struct ResilientHttpClient {
    client: Client,
    policy: RetryPolicy,
    proxy_url: Option<String>,
}

impl ResilientHttpClient {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Builds a client tunnelling through `proxy` when one is assigned.
    /// An endpoint with an unsupported scheme degrades to a direct
    /// connection with a warning; it never fails construction.
    pub fn new(
        proxy: Option<&ProxyEndpoint>,
        timeout: Duration,
        policy: RetryPolicy,
    ) -> Result<Self> {
        let mut builder = Client::builder().timeout(timeout);
        let mut proxy_url = None;

        if let Some(endpoint) = proxy {
            if endpoint.scheme.is_supported() {
                let tunnel = reqwest::Proxy::all(&endpoint.url)
                    .with_context(|| format!("Invalid proxy url: {}", endpoint.url))?;
                builder = builder.proxy(tunnel);
                proxy_url = Some(endpoint.url.clone());
            } else {
                warn!("Unsupported proxy type: {}. Connecting directly.", endpoint.url);
            }
        }

        Ok(Self {
            client: builder.build().context("Failed to build HTTP client")?,
            policy,
            proxy_url,
        })
    }

    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy_url.as_deref()
    }

    /// Executes `spec` with the fixed retry schedule. Always returns an
    /// outcome; exhausting the ceiling yields `succeeded: false`.
    pub async fn execute(
        &self,
        operation: &str,
        spec: &RequestSpec,
        sink: &dyn EventSink,
    ) -> RequestOutcome {
        let result = retry_fixed(self.policy, operation, sink, || self.attempt(spec)).await;

        match result.outcome {
            Ok(payload) => RequestOutcome {
                succeeded: true,
                payload: Some(payload),
                error: None,
                attempts_used: result.attempts,
            },
            Err(e) => {
                error!("Max retries reached - {} failed: {:#}", operation, e);
                if let Some(proxy) = &self.proxy_url {
                    error!("Failed proxy: {}", proxy);
                }
                RequestOutcome {
                    succeeded: false,
                    payload: None,
                    error: Some(format!("{:#}", e)),
                    attempts_used: result.attempts,
                }
            }
        }
    }

    async fn attempt(&self, spec: &RequestSpec) -> Result<Value> {
        let mut request = self.client.request(spec.method.clone(), &spec.url);
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {} failed", spec.url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status_code: status.as_u16(),
                endpoint: spec.url.clone(),
            }
            .into());
        }

        response.json::<Value>().await.map_err(|e| {
            NetworkError::InvalidResponse {
                endpoint: spec.url.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
