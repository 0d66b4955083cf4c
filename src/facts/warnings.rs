//! Heuristics that flag packages whose issue counts are likely to include false positives.
//!
//! An accessibility testing tool mentions the search keywords everywhere without that
//! saying anything about its own accessibility bugs. Similarly, a monorepo's issues cover
//! far more than the one package being looked at.

use super::github::PackageManifest;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Terms used to find accessibility-related issues
pub const ACCESSIBILITY_KEYWORDS: [&str; 4] = ["accessibility", "a11y", "aria", "screenreader"];

/// Packages whose presence in a manifest indicates a monorepo
pub const MONOREPO_TOOLS: [&str; 9] = [
    "lerna",
    "nx",
    "turbo",
    "@nrwl/workspace",
    "@nrwl/cli",
    "@nx/workspace",
    "@microsoft/rush",
    "@changesets/cli",
    "@manypkg/cli",
];

/// Advisory label attached to a package report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WarningTag {
    /// The repository hosts several packages, so its issues are not specific to this one
    Monorepo,

    /// The package name mentions accessibility
    PackageName,

    /// The package description mentions accessibility
    PackageDescription,
}

impl WarningTag {
    /// Text explaining the warning to a reader.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Monorepo => "This package appears to live in a monorepo, so the issues may relate to other packages.",
            Self::PackageName => {
                "This package's name mentions accessibility, so many issues may mention it without being accessibility bugs."
            }
            Self::PackageDescription => {
                "This package's description mentions accessibility, so many issues may mention it without being accessibility bugs."
            }
        }
    }
}

/// Case-insensitive check for any accessibility keyword within `text`.
#[must_use]
pub fn mentions_accessibility(text: &str) -> bool {
    let text = text.to_lowercase();
    ACCESSIBILITY_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

/// Whether a package name suggests an accessibility-focused package.
#[must_use]
pub fn name_mentions_accessibility(name: &str) -> bool {
    mentions_accessibility(name)
}

/// Whether a package description suggests an accessibility-focused package.
#[must_use]
pub fn description_mentions_accessibility(description: Option<&str>) -> bool {
    description.is_some_and(mentions_accessibility)
}

/// Derive warnings from a set of dependency names.
#[must_use]
pub fn classify<'a>(dependency_names: impl IntoIterator<Item = &'a str>) -> Vec<WarningTag> {
    let is_monorepo = dependency_names
        .into_iter()
        .any(|dep| MONOREPO_TOOLS.iter().any(|tool| tool.eq_ignore_ascii_case(dep)));

    if is_monorepo { vec![WarningTag::Monorepo] } else { Vec::new() }
}

/// Combine every warning check into one list without duplicates.
#[must_use]
pub fn collect_warnings(manifest: Option<&PackageManifest>, name: &str, description: Option<&str>) -> Vec<WarningTag> {
    let mut tags = Vec::new();

    if let Some(manifest) = manifest {
        tags.extend(classify(manifest.dependency_names()));
        if manifest.has_workspaces() {
            tags.push(WarningTag::Monorepo);
        }
    }

    if name_mentions_accessibility(name) {
        tags.push(WarningTag::PackageName);
    }

    if description_mentions_accessibility(description) {
        tags.push(WarningTag::PackageDescription);
    }

    dedup_in_order(tags)
}

/// Parse warning tags from strings, dropping unrecognized values and duplicates.
#[must_use]
pub fn parse_tags<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<WarningTag> {
    dedup_in_order(values.into_iter().filter_map(|v| v.parse().ok()))
}

fn dedup_in_order(tags: impl IntoIterator<Item = WarningTag>) -> Vec<WarningTag> {
    let mut result: Vec<WarningTag> = Vec::new();
    for tag in tags {
        if !result.contains(&tag) {
            result.push(tag);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_tag_names() {
        let names: Vec<String> = WarningTag::iter().map(|t| t.to_string()).collect();
        assert_eq!(names, vec!["monorepo", "package-name", "package-description"]);
        assert_eq!(serde_json::to_string(&WarningTag::PackageName).unwrap(), r#""package-name""#);
    }

    #[test]
    fn test_mentions_accessibility_is_case_insensitive() {
        assert!(mentions_accessibility("Accessible React components with ARIA support"));
        assert!(mentions_accessibility("A11Y helpers"));
        assert!(mentions_accessibility("ScreenReader announcer"));
        assert!(!mentions_accessibility("A fast HTTP router"));
    }

    #[test]
    fn test_package_name_only() {
        let tags = collect_warnings(None, "aria-live-announcer", Some("Announce updates politely"));
        assert_eq!(tags, vec![WarningTag::PackageName]);
    }

    #[test]
    fn test_package_description_only() {
        let tags = collect_warnings(None, "live-announcer", Some("Screenreader announcements"));
        assert_eq!(tags, vec![WarningTag::PackageDescription]);
    }

    #[test]
    fn test_missing_description() {
        assert!(!description_mentions_accessibility(None));
        assert!(collect_warnings(None, "left-pad", None).is_empty());
    }

    #[test]
    fn test_classify_monorepo_dependency() {
        assert_eq!(classify(["react", "lerna"]), vec![WarningTag::Monorepo]);
        assert_eq!(classify(["@NRWL/Workspace"]), vec![WarningTag::Monorepo]);
    }

    #[test]
    fn test_classify_no_monorepo_dependency() {
        assert!(classify(["react", "lerna-changelog-helper", "next"]).is_empty());
        assert!(classify([]).is_empty());
    }

    #[test]
    fn test_collect_warnings_from_manifest() {
        let manifest = PackageManifest::parse(r#"{ "devDependencies": { "turbo": "^1.0.0" } }"#).unwrap();
        let tags = collect_warnings(Some(&manifest), "react", Some("A JavaScript library for building UIs"));
        assert_eq!(tags, vec![WarningTag::Monorepo]);
    }

    #[test]
    fn test_collect_warnings_deduplicates() {
        let manifest = PackageManifest::parse(r#"{ "workspaces": ["packages/*"], "devDependencies": { "lerna": "*" } }"#).unwrap();
        let tags = collect_warnings(Some(&manifest), "a11y-toolkit", Some("Accessibility tools"));
        assert_eq!(tags, vec![WarningTag::Monorepo, WarningTag::PackageName, WarningTag::PackageDescription]);
    }

    #[test]
    fn test_parse_tags_drops_unknown_values() {
        let tags = parse_tags(["monorepo", "bogus", "package-name", "monorepo"]);
        assert_eq!(tags, vec![WarningTag::Monorepo, WarningTag::PackageName]);
    }

    #[test]
    fn test_every_tag_has_a_message() {
        for tag in WarningTag::iter() {
            assert!(!tag.message().is_empty());
        }
    }
}
