//! HTTP client for the RideReady advisor backend.
//!
//! One [`ApiClient`] per session. Every call is a single request: no retry,
//! bounded by the configured request and connect timeouts. Non-2xx responses
//! become [`ApiError::Status`] carrying the server's `{error: {message}}` when
//! present, otherwise a capped excerpt of the body.

mod dto;

use std::time::Duration;

use futures_util::StreamExt;
use rideready_types::ChatPlan;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

pub use dto::{
    ChatRequest, Health, ImageHit, ImageRequest, ImageResponse, RecommendRequest,
    RecommendResponse, Whitelist,
};

const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;
const MAX_ERROR_MESSAGE_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid server URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: String,
    },
    #[error("{endpoint} returned malformed JSON: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}


/// Read at most [`MAX_ERROR_BODY_BYTES`] of an error response.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            return format!("{}...(truncated)", String::from_utf8_lossy(&body));
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{error: {message}}`, `{error: "..."}` and `{message}`; anything
/// else is returned as a trimmed excerpt.
#[must_use]
pub fn extract_error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        let error = value.get("error");
        error
            .and_then(|e| e.get("message"))
            .or_else(|| error.filter(|e| e.is_string()))
            .or_else(|| value.get("message"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
    });

    let message = from_json.unwrap_or_else(|| body.trim().to_string());
    if message.is_empty() {
        return "no details".to_string();
    }
    message.chars().take(MAX_ERROR_MESSAGE_CHARS).collect()
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, connect_timeout: Duration) -> Result<Self, ApiError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base = Url::parse(&normalized).map_err(|source| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(concat!("rideready/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: "client",
                source,
            })?;

        Ok(Self { http, base })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|source| ApiError::InvalidBaseUrl {
                url: format!("{}{path}", self.base),
                source,
            })
    }

    /// Make a server-relative URL (e.g. `/static/x.jpg`) absolute.
    /// Absolute URLs pass through untouched.
    #[must_use]
    pub fn resolve_url(&self, raw: &str) -> String {
        let raw = raw.trim();
        if Url::parse(raw).is_ok() {
            return raw.to_string();
        }
        self.base
            .join(raw)
            .map_or_else(|_| raw.to_string(), |url| url.to_string())
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = read_capped_error_body(response).await;
            let message = extract_error_message(&body);
            tracing::warn!(endpoint, status = status.as_u16(), %message, "Backend returned error");
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        serde_json::from_slice(&bytes).map_err(|source| {
            tracing::warn!(endpoint, "Malformed response body: {source}");
            ApiError::Decode { endpoint, source }
        })
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(endpoint)?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        Self::decode(endpoint, response).await
    }

    pub async fn health(&self) -> Result<Health, ApiError> {
        const ENDPOINT: &str = "/healthz";
        let url = self.endpoint(ENDPOINT)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: ENDPOINT,
                source,
            })?;
        let health: Health = Self::decode(ENDPOINT, response).await?;
        tracing::info!(
            status = %health.status,
            offline = health.offline_mode,
            bikes = health.whitelist.bikes,
            "Backend health"
        );
        Ok(health)
    }

    pub async fn recommend(&self, request: &RecommendRequest) -> Result<RecommendResponse, ApiError> {
        let response: RecommendResponse = self.post("/api/recommend", request).await?;
        tracing::debug!(
            items = response.items.len(),
            count = ?response.count,
            pins = request.pin_ids.len(),
            externals = request.external_items.len(),
            "Recommendations received"
        );
        Ok(response)
    }

    pub async fn images(&self, request: &ImageRequest) -> Result<ImageResponse, ApiError> {
        self.post("/api/images", request).await
    }

    pub async fn chat(&self, request: &ChatRequest<'_>) -> Result<ChatPlan, ApiError> {
        let plan: ChatPlan = self.post("/api/chat", request).await?;
        tracing::debug!(
            topic = ?plan.topic,
            actions = plan.actions.len(),
            "Chat plan received"
        );
        Ok(plan)
    }
}
