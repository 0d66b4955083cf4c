//! GitHub API client
//!
//! Minimal GitHub REST client that classifies failures so callers can decide
//! whether a retry makes sense.

use chrono::{DateTime, Utc};
use core::fmt::{Display, Formatter};
use core::time::Duration;
use ohno::IntoAppError;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use url::Url;

const LOG_TARGET: &str = "    github";

/// Rate limit information from response headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub remaining: usize,
    pub reset_at: DateTime<Utc>,
}

/// Why a GitHub API call failed
#[derive(Debug)]
pub enum FetchError {
    /// The requested resource was not found (404)
    NotFound,

    /// The credential was rejected or the quota is exhausted (403/429)
    RateLimited(Option<RateLimitInfo>),

    /// Network, decode, or any other HTTP failure
    Unknown(ohno::AppError),
}

impl FetchError {
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::RateLimited(Some(rl)) => write!(f, "rate limited ({} remaining, resets at {})", rl.remaining, rl.reset_at),
            Self::RateLimited(None) => write!(f, "rate limited"),
            Self::Unknown(e) => write!(f, "{e:#}"),
        }
    }
}

pub type FetchResult<T> = core::result::Result<T, FetchError>;

/// GitHub API client
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a new client with an optional authentication token
    pub fn new(token: Option<&str>, base_url: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
        use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};

        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        if let Some(t) = token.filter(|t| !t.is_empty()) {
            let mut auth_val = HeaderValue::from_str(&format!("token {t}")).into_app_err("building authorization header")?;
            auth_val.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth_val);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("isitaccessible/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .into_app_err("creating GitHub HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL for this client
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL from a path (starting with `/`) and query parameters
    pub fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> FetchResult<Url> {
        let raw = format!("{}{path}", self.base_url);
        Url::parse_with_params(&raw, params)
            .into_app_err_with(|| format!("building GitHub API URL '{raw}'"))
            .map_err(FetchError::Unknown)
    }

    /// Perform a GET request and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> FetchResult<T> {
        log::trace!(target: LOG_TARGET, "GET {url}");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Unknown(e.into()))?;

        let rate_limit = extract_rate_limit_from_headers(resp.headers());
        if let Some(rl) = rate_limit {
            log::trace!(target: LOG_TARGET, "{} request(s) remaining until {}", rl.remaining, rl.reset_at);
        }

        classify_status(resp.status(), rate_limit)?;

        resp.json()
            .await
            .into_app_err_with(|| format!("decoding response from '{url}'"))
            .map_err(FetchError::Unknown)
    }
}

/// Map a non-success status code to a failure kind
fn classify_status(status: StatusCode, rate_limit: Option<RateLimitInfo>) -> FetchResult<()> {
    if status.is_success() {
        return Ok(());
    }

    match status.as_u16() {
        403 | 429 => Err(FetchError::RateLimited(rate_limit)),
        404 => Err(FetchError::NotFound),
        code => Err(FetchError::Unknown(ohno::app_err!("GitHub API returned HTTP {code}"))),
    }
}

/// Extract rate limit information from API response headers
fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<usize>().ok()?;
    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;
    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

    Some(RateLimitInfo { remaining, reset_at })
}
