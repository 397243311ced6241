pub mod accounts;
pub mod statuses;
pub mod types;

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::types::{Account, ErrorBody};
use crate::auth::{AuthError, AuthProvider};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate limited until {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },
    #[error("API error (status {status}): {detail}")]
    ApiError { status: u16, detail: String },
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
    #[error("deserialization error: {0}")]
    Deserialize(String),
}

// ---------------------------------------------------------------------------
// Rate limit tracking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub remaining: Option<u32>,
    pub reset_at: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

impl RateLimitInfo {
    /// Best-effort parse of Mastodon's `X-RateLimit-*` headers.
    fn from_headers(headers: &reqwest::header::HeaderMap) -> Self {
        let get = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        Self {
            remaining: get("x-ratelimit-remaining").and_then(|v| v.parse().ok()),
            reset_at: get("x-ratelimit-reset")
                .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            limit: get("x-ratelimit-limit").and_then(|v| v.parse().ok()),
        }
    }
}

/// Characters escaped when an identifier is spliced into a URL path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub(crate) fn encode_segment(s: &str) -> String {
    utf8_percent_encode(s, PATH_SEGMENT).to_string()
}

// ---------------------------------------------------------------------------
// API client
// ---------------------------------------------------------------------------

pub struct KronkClient {
    http_client: reqwest::Client,
    base_url: String,
    auth: AuthProvider,
    me: Option<Account>,
}

impl KronkClient {
    pub fn new(base_url: &str, auth: AuthProvider) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            me: None,
        }
    }

    pub fn signed_in(&self) -> bool {
        self.auth.signed_in()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach the bearer token when one is configured.
    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.auth.bearer_header() {
            Some(header) => req.header("Authorization", header),
            None => req,
        }
    }

    /// Issue a GET request, authenticated if a token is available.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiClientError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let resp = self.authorize(self.http_client.get(&url)).send().await?;
        self.handle_response(resp).await
    }

    /// Issue a JSON POST request. Requires an access token.
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiClientError> {
        let auth_header = self.auth.require_bearer_header()?;
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let resp = self
            .http_client
            .post(&url)
            .header("Authorization", &auth_header)
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Parse rate-limit headers, check status, and deserialize the body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: Response,
    ) -> Result<T, ApiClientError> {
        let rate_limit = RateLimitInfo::from_headers(resp.headers());
        if let Some(remaining) = rate_limit.remaining {
            tracing::trace!(remaining, limit = ?rate_limit.limit, "rate limit");
        }

        let status = resp.status();

        if status.as_u16() == 429 {
            let reset = rate_limit.reset_at.unwrap_or_else(Utc::now);
            return Err(ApiClientError::RateLimited { reset_at: reset });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ApiClientError::ApiError {
                status: status.as_u16(),
                detail,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str::<T>(&body)
            .map_err(|e| ApiClientError::Deserialize(format!("{e}: {body}")))
    }

    /// Build a full API URL from a path (e.g. "/api/v1/statuses/123").
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue};

    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let client = KronkClient::new("https://kronk.info/", AuthProvider::default());
        assert_eq!(
            client.url("/api/v1/statuses/1"),
            "https://kronk.info/api/v1/statuses/1"
        );
    }

    #[test]
    fn encodes_path_segments() {
        assert_eq!(encode_segment("123"), "123");
        assert_eq!(encode_segment("a/b?c"), "a%2Fb%3Fc");
    }

    #[test]
    fn parses_rate_limit_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("299"));
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("300"));
        headers.insert(
            "x-ratelimit-reset",
            HeaderValue::from_static("2024-03-01T12:05:00.000Z"),
        );
        let info = RateLimitInfo::from_headers(&headers);
        assert_eq!(info.remaining, Some(299));
        assert_eq!(info.limit, Some(300));
        assert_eq!(
            info.reset_at.map(|t| t.to_rfc3339()),
            Some("2024-03-01T12:05:00+00:00".to_string())
        );
    }
}
