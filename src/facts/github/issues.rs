//! Accessibility issue search for a single repository.

use super::client::{Client, FetchError, FetchResult};
use crate::facts::RepoRef;
use crate::facts::warnings::ACCESSIBILITY_KEYWORDS;
use chrono::{DateTime, Utc};
use core::ops::ControlFlow;
use serde::{Deserialize, Serialize};

const LOG_TARGET: &str = "    issues";

/// Number of issues requested per page (the search API maximum)
pub const PAGE_SIZE: usize = 100;

/// The search API refuses to return results beyond this many matches
pub const RESULT_CEILING: usize = 1000;

/// One issue matched by the accessibility search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub html_url: String,
    pub title: String,
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Enforce that `closed_at` is present exactly when the issue is closed.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        match self.state {
            IssueState::Open => self.closed_at = None,
            IssueState::Closed => {
                if self.closed_at.is_none() {
                    self.closed_at = Some(self.created_at);
                }
            }
        }
        self
    }
}

/// Issue state: open or closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// One page of search results
#[derive(Debug, Deserialize)]
pub struct IssuePage {
    pub total_count: u64,
    pub items: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
struct RepositoryInfo {
    full_name: String,
}

/// Outcome of a complete search run
#[derive(Debug, Clone)]
pub struct IssueFetch {
    /// Issues in the order the pages were fetched
    pub issues: Vec<Issue>,

    /// The repository the final results were fetched from, which differs from the
    /// requested one when the repository has been renamed
    pub repo: RepoRef,

    /// Number of search requests issued
    pub requests: u32,
}

/// Build the search query for a repository
#[must_use]
pub fn search_query(repo: &RepoRef) -> String {
    format!("{} repo:{repo} type:issue", ACCESSIBILITY_KEYWORDS.join(" OR "))
}

/// Pagination state threaded through the fetch loop
#[derive(Debug)]
struct Pagination {
    repo: RepoRef,
    page: usize,
    issues: Vec<Issue>,
    requests: u32,
    renamed: bool,
}

impl Pagination {
    fn new(repo: RepoRef) -> Self {
        Self {
            repo,
            page: 1,
            issues: Vec::with_capacity(PAGE_SIZE),
            requests: 0,
            renamed: false,
        }
    }

    /// Fold a fetched page into the state and decide whether another page is needed.
    fn accept(mut self, page: IssuePage) -> ControlFlow<Self, Self> {
        let received = page.items.len();
        self.issues.extend(page.items.into_iter().map(Issue::normalized));

        if self.issues.len() >= RESULT_CEILING {
            if self.issues.len() > RESULT_CEILING {
                self.issues.truncate(RESULT_CEILING);
            }
            log::warn!(target: LOG_TARGET, "Reached the {RESULT_CEILING} result ceiling for '{}' ({} reported)", self.repo, page.total_count);
            return ControlFlow::Break(self);
        }

        let total = usize::try_from(page.total_count).unwrap_or(usize::MAX);
        let more_pages = total > self.page * PAGE_SIZE;
        let next_within_ceiling = self.page * PAGE_SIZE < RESULT_CEILING;

        if received == 0 || !more_pages || !next_within_ceiling {
            return ControlFlow::Break(self);
        }

        self.page += 1;
        ControlFlow::Continue(self)
    }

    /// Switch to a renamed repository and start over from the first page.
    fn restart_as(mut self, repo: RepoRef) -> Self {
        self.repo = repo;
        self.page = 1;
        self.issues.clear();
        self.renamed = true;
        self
    }

    fn finish(self) -> IssueFetch {
        IssueFetch {
            issues: self.issues,
            repo: self.repo,
            requests: self.requests,
        }
    }
}

/// Fetches accessibility-related issues from the GitHub search API
#[derive(Debug, Clone)]
pub struct IssueFetcher {
    client: Client,
}

impl IssueFetcher {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch every matching issue for a repository, up to the result ceiling.
    ///
    /// Failures never propagate: the issues gathered so far are returned instead. When a page
    /// request fails, the repository is looked up once to detect a rename, in which case the
    /// search restarts from the first page under the new name.
    pub async fn fetch_issues(&self, repo: &RepoRef) -> IssueFetch {
        log::info!(target: LOG_TARGET, "Searching GitHub for accessibility issues in '{repo}'");

        let mut state = Pagination::new(repo.clone());

        loop {
            state.requests += 1;
            let result = self.fetch_page(&state.repo, state.page).await;

            state = match result {
                Ok(page) => {
                    log::debug!(
                        target: LOG_TARGET,
                        "Page {} for '{}' returned {} of {} issue(s)",
                        state.page,
                        state.repo,
                        page.items.len(),
                        page.total_count
                    );

                    match state.accept(page) {
                        ControlFlow::Continue(next) => next,
                        ControlFlow::Break(done) => break done.finish(),
                    }
                }

                Err(e) => {
                    log::debug!(target: LOG_TARGET, "Page {} for '{}' failed: {e}", state.page, state.repo);

                    if e.is_rate_limited() || state.renamed {
                        break state.finish();
                    }

                    match self.canonical_repo(repo).await {
                        Some(canonical) if !canonical.full_name().eq_ignore_ascii_case(&state.repo.full_name()) => {
                            log::warn!(target: LOG_TARGET, "Repository '{repo}' has moved to '{canonical}', searching again");
                            state.restart_as(canonical)
                        }
                        _ => break state.finish(),
                    }
                }
            };
        }
    }

    async fn fetch_page(&self, repo: &RepoRef, page: usize) -> FetchResult<IssuePage> {
        let query = search_query(repo);
        let per_page = PAGE_SIZE.to_string();
        let page = page.to_string();

        let url = self
            .client
            .endpoint("/search/issues", &[("q", query.as_str()), ("per_page", per_page.as_str()), ("page", page.as_str())])?;

        self.client.get_json(url).await
    }

    /// Look up the current name of a repository, which differs from the given one after a rename.
    async fn canonical_repo(&self, repo: &RepoRef) -> Option<RepoRef> {
        let path = format!("/repos/{}/{}", repo.owner(), repo.repo());
        let result = match self.client.endpoint(&path, &[]) {
            Ok(url) => self.client.get_json::<RepositoryInfo>(url).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(info) => RepoRef::from_full_name(&info.full_name),
            Err(FetchError::NotFound) => {
                log::debug!(target: LOG_TARGET, "Repository '{repo}' does not exist");
                None
            }
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Could not look up repository '{repo}': {e}");
                None
            }
        }
    }
}
