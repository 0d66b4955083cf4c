//! npms.io client for package metadata and search suggestions.

use crate::Result;
use core::cmp::Ordering;
use core::time::Duration;
use ohno::IntoAppError;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

const LOG_TARGET: &str = "       npm";

/// Characters left alone by JavaScript's `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The package details the rest of the pipeline needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub repository_url: Option<String>,
}

/// One entry of the search suggestions list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
    pub search_score: f64,
    pub popularity: f64,
}

#[derive(Debug, Deserialize)]
struct PackageResponse {
    collected: Collected,
}

#[derive(Debug, Deserialize)]
struct Collected {
    metadata: RawMetadata,
    #[serde(default)]
    github: Option<RawGitHub>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    links: Option<RawLinks>,
    #[serde(default)]
    repository: Option<RawRepository>,
}

#[derive(Debug, Deserialize)]
struct RawLinks {
    #[serde(default)]
    homepage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGitHub {
    #[serde(default)]
    homepage: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestion {
    package: RawSuggestionPackage,
    score: RawScore,
    search_score: f64,
}

#[derive(Debug, Deserialize)]
struct RawSuggestionPackage {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawScore {
    detail: RawScoreDetail,
}

#[derive(Debug, Deserialize)]
struct RawScoreDetail {
    popularity: f64,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<PackageResponse> for PackageMetadata {
    fn from(resp: PackageResponse) -> Self {
        let Collected { metadata, github } = resp.collected;

        let homepage = non_empty(github.and_then(|g| g.homepage)).or_else(|| non_empty(metadata.links.and_then(|l| l.homepage)));

        Self {
            name: metadata.name,
            description: non_empty(metadata.description),
            homepage,
            repository_url: non_empty(metadata.repository.and_then(|r| r.url)),
        }
    }
}

impl From<RawSuggestion> for Suggestion {
    fn from(raw: RawSuggestion) -> Self {
        Self {
            name: raw.package.name,
            description: non_empty(raw.package.description),
            version: raw.package.version,
            search_score: raw.search_score,
            popularity: raw.score.detail.popularity,
        }
    }
}

/// Prefix `http://` onto homepage URLs that lack a scheme.
#[must_use]
pub fn normalize_homepage(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

/// Rank closely matching packages first, then the most popular ones.
///
/// Two suggestions whose search scores differ by more than a factor of `e` are ordered by
/// search score; otherwise the more popular one wins.
fn compare_suggestions(a: &Suggestion, b: &Suggestion) -> Ordering {
    if (b.search_score.ln() - a.search_score.ln()).abs() > 1.0 {
        b.search_score.total_cmp(&a.search_score)
    } else {
        b.popularity.total_cmp(&a.popularity)
    }
}

/// Order suggestions for display.
///
/// The comparison is not transitive, so this uses a simple stable insertion sort
/// rather than `sort_by`, which requires a total order.
#[must_use]
pub fn rank_suggestions(suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    let mut ranked: Vec<Suggestion> = Vec::with_capacity(suggestions.len());
    for suggestion in suggestions {
        let pos = ranked
            .iter()
            .position(|existing| compare_suggestions(&suggestion, existing) == Ordering::Less)
            .unwrap_or(ranked.len());
        ranked.insert(pos, suggestion);
    }
    ranked
}

/// npms.io API client
#[derive(Debug, Clone)]
pub struct Registry {
    client: reqwest::Client,
    base_url: String,
}

impl Registry {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("isitaccessible/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .into_app_err("creating npms.io HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Look up a package by name, returning `None` when npms.io does not know it.
    pub async fn get_package(&self, name: &str) -> Result<Option<PackageMetadata>> {
        let encoded: String = utf8_percent_encode(name, COMPONENT).collect();
        let raw = format!("{}/v2/package/{encoded}", self.base_url);
        let url = Url::parse(&raw).into_app_err_with(|| format!("building npms.io URL '{raw}'"))?;

        log::info!(target: LOG_TARGET, "Querying npms.io for package '{name}'");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .into_app_err_with(|| format!("requesting package '{name}' from npms.io"))?;

        if resp.status() != StatusCode::OK {
            log::debug!(target: LOG_TARGET, "npms.io returned HTTP {} for package '{name}'", resp.status());
            return Ok(None);
        }

        let body: PackageResponse = resp
            .json()
            .await
            .into_app_err_with(|| format!("decoding npms.io metadata for package '{name}'"))?;

        Ok(Some(body.into()))
    }

    /// Fetch ranked search suggestions for a partial package name.
    pub async fn get_suggestions(&self, query: &str) -> Result<Vec<Suggestion>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let raw = format!("{}/v2/search/suggestions", self.base_url);
        let url = Url::parse_with_params(&raw, &[("q", query)]).into_app_err_with(|| format!("building npms.io URL '{raw}'"))?;

        log::info!(target: LOG_TARGET, "Querying npms.io for suggestions matching '{query}'");

        let suggestions: Vec<RawSuggestion> = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .into_app_err_with(|| format!("requesting suggestions for '{query}' from npms.io"))?
            .json()
            .await
            .into_app_err_with(|| format!("decoding npms.io suggestions for '{query}'"))?;

        Ok(rank_suggestions(suggestions.into_iter().map(Suggestion::from).collect()))
    }
}
