use super::github::{Issue, IssueState, PackageManifest};
use super::warnings::{WarningTag, collect_warnings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Summary of a package's accessibility issues, as consumed by the report renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Open issues, oldest first
    pub open_issues: Vec<Issue>,

    /// Closed issues, in fetch order
    pub closed_issues: Vec<Issue>,

    /// Advisory warnings, without duplicates
    pub warnings: Vec<WarningTag>,

    /// Percentage of issues that are closed, rounded to one decimal place
    pub score: Option<f64>,

    /// Median number of days an issue stayed (or has been) open
    pub median_age_days: Option<f64>,
}

impl AggregationResult {
    #[must_use]
    pub fn total_issues(&self) -> usize {
        self.open_issues.len() + self.closed_issues.len()
    }
}

/// Partition, sort, and summarize the fetched issues.
///
/// `now` is the reference time used to age open issues.
#[must_use]
pub fn aggregate(
    raw_issues: Vec<Issue>,
    manifest: Option<&PackageManifest>,
    package_name: &str,
    description: Option<&str>,
    now: DateTime<Utc>,
) -> AggregationResult {
    let (mut open_issues, closed_issues): (Vec<_>, Vec<_>) = raw_issues.into_iter().partition(|i| i.state == IssueState::Open);

    // stable, so ties keep fetch order
    open_issues.sort_by_key(|i| i.created_at);

    let ages = open_issues.iter().chain(&closed_issues).map(|i| age_in_days(i, now)).collect();

    AggregationResult {
        score: score(open_issues.len(), closed_issues.len()),
        median_age_days: median(ages),
        warnings: collect_warnings(manifest, package_name, description),
        open_issues,
        closed_issues,
    }
}

/// Percentage of closed issues, or `None` when there are no issues at all.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "issue counts are far below f64 precision limits")]
pub fn score(open: usize, closed: usize) -> Option<f64> {
    let total = open + closed;
    if total == 0 {
        return None;
    }

    let percentage = closed as f64 / total as f64 * 100.0;
    Some((percentage * 10.0).round() / 10.0)
}

/// Fractional days from creation until the issue was closed, or until `now` if still open.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "acceptable for duration")]
pub fn age_in_days(issue: &Issue, now: DateTime<Utc>) -> f64 {
    let end = match issue.state {
        IssueState::Closed => issue.closed_at.unwrap_or(issue.created_at),
        IssueState::Open => now,
    };

    (end - issue.created_at).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Standard median, averaging the two middle values for an even count.
#[must_use]
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values.get(mid).copied()
    } else {
        Some((values.get(mid - 1)? + values.get(mid)?) / 2.0)
    }
}

/// Render a statistic for display, using `N/A` when it does not apply.
#[must_use]
pub fn format_stat(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.precision$}"))
}
