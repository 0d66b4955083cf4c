mod client;
mod issues;
mod manifest;

pub use client::{Client, FetchError, FetchResult, RateLimitInfo};
pub use issues::{Issue, IssueFetch, IssueFetcher, IssuePage, IssueState, PAGE_SIZE, RESULT_CEILING, search_query};
pub use manifest::{ManifestFetcher, PackageManifest};
