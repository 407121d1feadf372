//! HTTP client for the Almacen authentication service.
//!
//! # Architecture
//!
//! - [`AuthClient`] - owns a configured [`reqwest::Client`] and the service base URL
//! - [`AuthClient::sign_in`] - the single request/response exchange (`POST /auth/signin`)
//! - [`decode_signin_body`] - pure decoding of a 2xx response body
//!
//! # Response envelope
//!
//! The backend wraps payloads as `{ "data": ..., "error": bool, "status": .., "message": .. }`.
//! A top-level `"error": true` is a rejection even on HTTP 200. When no `data`
//! object is present the body itself is treated as the payload, so bare
//! `{ "roles": [...] }` responses decode too.
//!
//! # Error Handling
//!
//! Every failure is a [`SignInError`]. Callers that only need "did it work"
//! collapse them; the variants exist so the cause can be logged.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use url::Url;

pub use almacen_types::{Credentials, SignInPayload};

/// Path of the sign-in endpoint, relative to the service base URL.
pub const SIGNIN_PATH: &str = "/auth/signin";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

const USER_AGENT: &str = concat!("almacen/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("sign-in rejected: {}", .message.as_deref().unwrap_or("error flag set"))]
    Rejected { message: Option<String> },
    #[error("malformed sign-in response: {0}")]
    Malformed(String),
}

impl SignInError {
    /// Short stable label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidBaseUrl { .. } => "invalid_base_url",
            Self::Build(_) => "build",
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Rejected { .. } => "rejected",
            Self::Malformed(_) => "malformed",
        }
    }
}

/// Connection settings for [`AuthClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn client_builder(config: &ClientConfig) -> reqwest::ClientBuilder {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(config.connect_timeout)
        .timeout(config.timeout)
        .redirect(reqwest::redirect::Policy::none())
        .default_headers(default_headers)
}

fn signin_url(base_url: &str) -> Result<Url, SignInError> {
    let invalid = |reason: String| SignInError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let trimmed = base_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{trimmed}{SIGNIN_PATH}")).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other:?}"))),
    }
}

/// Client for the authentication endpoint.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    signin_url: Url,
}

impl AuthClient {
    pub fn new(config: &ClientConfig) -> Result<Self, SignInError> {
        let signin_url = signin_url(config.base_url())?;
        let http = client_builder(config).build().map_err(SignInError::Build)?;
        Ok(Self { http, signin_url })
    }

    #[must_use]
    pub fn signin_url(&self) -> &Url {
        &self.signin_url
    }

    /// Submit credentials once. No retry: a failed attempt is reported to the caller.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<SignInPayload, SignInError> {
        tracing::debug!(url = %self.signin_url, username = credentials.username(), "POST sign-in");

        let response = self
            .http
            .post(self.signin_url.clone())
            .json(credentials)
            .send()
            .await
            .map_err(SignInError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_error_body(response).await;
            return Err(SignInError::Status { status, body });
        }

        let bytes = response.bytes().await.map_err(SignInError::Transport)?;
        decode_signin_body(&bytes)
    }
}

/// Decode a 2xx sign-in response body.
pub fn decode_signin_body(bytes: &[u8]) -> Result<SignInPayload, SignInError> {
    let body: Value =
        serde_json::from_slice(bytes).map_err(|e| SignInError::Malformed(e.to_string()))?;

    if body.get("error").is_some_and(is_truthy) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(ToString::to_string);
        return Err(SignInError::Rejected { message });
    }

    let payload = match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data @ Value::Object(_)) => data,
            Some(other) => {
                map.insert("data".to_string(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => {
            return Err(SignInError::Malformed(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )));
        }
    };

    serde_json::from_value(payload).map_err(|e| SignInError::Malformed(e.to_string()))
}

/// An error flag counts unless it is absent, `null`, `false`, zero or `""`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n.is_normal() || n.is_subnormal()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
