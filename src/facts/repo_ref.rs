use core::fmt::{Display, Formatter};
use ohno::app_err;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

/// Locates `github.com`, then captures the owner after the next `/` or `:` and the
/// repository name up to an optional `.git` suffix.
static GITHUB_REPO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u:github\.com)[/:]([^/:]+)/([^/#?]+?)(?:\.git)?(?:[/#?].*)?$").expect("invalid regex")
});

/// A GitHub repository identified by `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoRef {
    owner: Arc<str>,
    repo: Arc<str>,
}

impl RepoRef {
    /// Extract the GitHub repository from a free-form repository URL.
    ///
    /// Handles the forms found in npm metadata, such as `git+https://github.com/owner/repo.git`
    /// and `git@github.com:owner/repo.git`. Returns `None` when the URL does not point at GitHub,
    /// which callers treat as "no repository known".
    #[must_use]
    pub fn resolve(url: &str) -> Option<Self> {
        let captures = GITHUB_REPO_REGEX.captures(url.trim())?;
        let owner = captures.get(1)?.as_str();
        let repo = captures.get(2)?.as_str();

        Some(Self {
            owner: Arc::from(owner),
            repo: Arc::from(repo),
        })
    }

    /// Parse an `owner/repo` pair, as reported in the `full_name` field of the GitHub API.
    #[must_use]
    pub fn from_full_name(full_name: &str) -> Option<Self> {
        let (owner, repo) = full_name.split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }

        Some(Self {
            owner: Arc::from(owner),
            repo: Arc::from(repo),
        })
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// The `owner/repo` string.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl Display for RepoRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl TryFrom<String> for RepoRef {
    type Error = ohno::AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_full_name(&value).ok_or_else(|| app_err!("invalid repository name '{value}', expected 'owner/repo'"))
    }
}

impl From<RepoRef> for String {
    fn from(value: RepoRef) -> Self {
        value.full_name()
    }
}
