use super::aggregate::AggregationResult;
use super::github::IssueState;
use super::npm::{PackageMetadata, normalize_homepage};
use super::repo_ref::RepoRef;
use super::warnings::ACCESSIBILITY_KEYWORDS;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Everything known about one package, ready to be rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageReport {
    pub metadata: PackageMetadata,

    /// The repository the issues were fetched from, after following any rename
    pub repo: Option<RepoRef>,

    pub links: PackageLinks,
    pub result: AggregationResult,

    /// Reference time used to age open issues
    pub generated_at: DateTime<Utc>,
}

/// External links shown alongside a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLinks {
    pub npm: String,
    pub github: Option<String>,
    pub homepage: Option<String>,
    pub open_issues: Option<String>,
    pub closed_issues: Option<String>,
}

impl PackageLinks {
    #[must_use]
    pub fn new(metadata: &PackageMetadata, repo: Option<&RepoRef>) -> Self {
        Self {
            npm: format!("https://www.npmjs.com/package/{}", metadata.name),
            github: repo.map(|r| format!("https://github.com/{r}")),
            homepage: metadata.homepage.as_deref().map(normalize_homepage),
            open_issues: repo.and_then(|r| issue_search_url(r, IssueState::Open)),
            closed_issues: repo.and_then(|r| issue_search_url(r, IssueState::Closed)),
        }
    }
}

/// Link to the GitHub issue search for accessibility issues in the given state.
#[must_use]
pub fn issue_search_url(repo: &RepoRef, state: IssueState) -> Option<String> {
    let state = match state {
        IssueState::Open => "open",
        IssueState::Closed => "closed",
    };

    let query = format!("is:issue is:{state} {}", ACCESSIBILITY_KEYWORDS.join(" OR "));
    Url::parse_with_params(&format!("https://github.com/{repo}/issues"), &[("q", query)])
        .ok()
        .map(String::from)
}
