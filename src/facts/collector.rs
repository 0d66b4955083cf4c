use super::aggregate::aggregate;
use super::github::{Client, IssueFetcher, ManifestFetcher};
use super::npm::{Registry, Suggestion};
use super::report::{PackageLinks, PackageReport};
use super::repo_ref::RepoRef;
use crate::Result;
use chrono::{DateTime, Utc};
use core::time::Duration;

const LOG_TARGET: &str = " collector";

/// Where to reach the external services
#[derive(Debug, Clone)]
pub struct Endpoints<'a> {
    pub github_api_url: &'a str,
    pub npms_api_url: &'a str,
    pub request_timeout: Duration,
}

/// Gathers the data behind a package report
#[derive(Debug, Clone)]
pub struct Collector {
    registry: Registry,
    issue_fetcher: IssueFetcher,
    manifest_fetcher: ManifestFetcher,
}

impl Collector {
    pub fn new(github_token: Option<&str>, endpoints: &Endpoints<'_>) -> Result<Self> {
        let client = Client::new(github_token, endpoints.github_api_url, endpoints.request_timeout)?;

        Ok(Self {
            registry: Registry::new(endpoints.npms_api_url, endpoints.request_timeout)?,
            issue_fetcher: IssueFetcher::new(client.clone()),
            manifest_fetcher: ManifestFetcher::new(client),
        })
    }

    /// Build the report for one package.
    ///
    /// Returns `Ok(None)` when the registry does not know the package. GitHub failures never
    /// surface here; they only reduce what the report contains.
    pub async fn collect(&self, package_name: &str, now: DateTime<Utc>) -> Result<Option<PackageReport>> {
        let Some(metadata) = self.registry.get_package(package_name).await? else {
            log::info!(target: LOG_TARGET, "Package '{package_name}' not found");
            return Ok(None);
        };

        let resolved = metadata.repository_url.as_deref().and_then(RepoRef::resolve);

        let (issues, manifest, repo) = match resolved {
            Some(repo) => {
                let (fetch, manifest) = tokio::join!(self.issue_fetcher.fetch_issues(&repo), self.manifest_fetcher.fetch_manifest(&repo));

                log::debug!(
                    target: LOG_TARGET,
                    "Fetched {} issue(s) for '{}' in {} request(s)",
                    fetch.issues.len(),
                    fetch.repo,
                    fetch.requests
                );

                (fetch.issues, manifest, Some(fetch.repo))
            }
            None => {
                log::info!(target: LOG_TARGET, "No GitHub repository known for package '{}'", metadata.name);
                (Vec::new(), None, None)
            }
        };

        let result = aggregate(issues, manifest.as_ref(), &metadata.name, metadata.description.as_deref(), now);
        let links = PackageLinks::new(&metadata, repo.as_ref());

        Ok(Some(PackageReport {
            metadata,
            repo,
            links,
            result,
            generated_at: now,
        }))
    }

    /// Ranked package name suggestions for a partial query.
    pub async fn suggestions(&self, query: &str) -> Result<Vec<Suggestion>> {
        self.registry.get_suggestions(query).await
    }
}
