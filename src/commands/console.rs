use crate::Result;
use crate::facts::npm::Suggestion;
use crate::facts::{PackageReport, age_in_days, format_stat};
use core::fmt::Write;
use owo_colors::OwoColorize;

const DISCLAIMER: &str = "The content of this report should be used as a guide only. A package with no \
accessibility-related GitHub issues does not guarantee an accessible package, and an accessible \
package can still be used to build something inaccessible.";

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors { text.bold().to_string() } else { text.to_string() }
}

/// Render a package report as plain text.
pub fn generate_report<W: Write>(report: &PackageReport, use_colors: bool, writer: &mut W) -> Result<()> {
    let metadata = &report.metadata;
    let result = &report.result;

    writeln!(writer, "{}", heading(&metadata.name, use_colors))?;
    if let Some(description) = &metadata.description {
        writeln!(writer, "{description}")?;
    }

    writeln!(writer)?;
    writeln!(writer, "{}", heading("Links", use_colors))?;
    writeln!(writer, "  npm      : {}", report.links.npm)?;
    if let Some(github) = &report.links.github {
        writeln!(writer, "  GitHub   : {github}")?;
    }
    if let Some(homepage) = &report.links.homepage {
        writeln!(writer, "  Homepage : {homepage}")?;
    }

    writeln!(writer)?;
    writeln!(writer, "{}", heading("GitHub issues", use_colors))?;

    if report.repo.is_none() {
        writeln!(writer, "  No GitHub repository is known for this package.")?;
    } else {
        writeln!(writer, "  Mentioning 'accessibility', 'a11y', 'aria', or 'screenreader'.")?;
        writeln!(writer, "  Open       : {}", result.open_issues.len())?;
        writeln!(writer, "  Closed     : {}", result.closed_issues.len())?;

        let score = result.score.map_or_else(|| "N/A".to_string(), |s| format!("{s:.1}%"));
        writeln!(writer, "  Score      : {score}")?;

        let median = result.median_age_days.map_or_else(|| "N/A".to_string(), |d| format!("{} days", format_stat(Some(d), 0)));
        writeln!(writer, "  Median age : {median}")?;
    }

    if !result.warnings.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", heading("Warnings", use_colors))?;
        for tag in &result.warnings {
            let label = if use_colors { tag.to_string().yellow().to_string() } else { tag.to_string() };
            writeln!(writer, "  ! {label}: {}", tag.message())?;
        }
    }

    if !result.open_issues.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", heading("Open issues (oldest first)", use_colors))?;
        for issue in &result.open_issues {
            let days = age_in_days(issue, report.generated_at).ceil();
            writeln!(writer, "  - {} ({days:.0} days old)", issue.title)?;
            writeln!(writer, "    {}", issue.html_url)?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "Disclaimer: {DISCLAIMER}")?;
    Ok(())
}

/// Render search suggestions, one per line.
pub fn generate_suggestions<W: Write>(suggestions: &[Suggestion], use_colors: bool, writer: &mut W) -> Result<()> {
    if suggestions.is_empty() {
        writeln!(writer, "No matching packages found.")?;
        return Ok(());
    }

    let width = suggestions.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for suggestion in suggestions {
        let padded = format!("{:<width$}", suggestion.name);
        let name = if use_colors { padded.cyan().to_string() } else { padded };
        match &suggestion.description {
            Some(description) => writeln!(writer, "{name}  {description}")?,
            None => writeln!(writer, "{name}")?,
        }
    }

    Ok(())
}
