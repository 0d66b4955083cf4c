//! Data collection and aggregation for npm packages
//!
//! A package report is assembled in a few steps:
//!
//! - **Registry**: npms.io supplies the package name, description, homepage, and repository URL
//! - **Repository**: the repository URL is resolved to a GitHub `owner/repo`
//! - **Issues**: the GitHub search API is paged through for issues mentioning accessibility
//!   keywords, following a repository rename once if a request fails
//! - **Manifest**: the repository's `package.json` is read to spot monorepos
//! - **Aggregation**: issues are split into open and closed, and summarized as a score and a
//!   median age, with warnings about likely false positives
//!
//! Only the registry lookup can fail the whole run. Everything GitHub-related degrades to
//! empty results instead.

mod aggregate;
mod collector;
pub mod github;
pub mod npm;
mod report;
mod repo_ref;
pub mod warnings;

pub use aggregate::{AggregationResult, age_in_days, aggregate, format_stat, median, score};
pub use collector::{Collector, Endpoints};
pub use report::{PackageLinks, PackageReport, issue_search_url};
pub use repo_ref::RepoRef;
pub use warnings::WarningTag;
