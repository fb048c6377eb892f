//! Pure formatting functions for operator-facing output.
//!
//! `format_*` functions build the text and are tested; `display_*` functions
//! only print it.

use console::style;

use crate::analyzer::Classification;
use crate::boundary::BoundaryWarning;
use crate::domain::{ChangeSet, Version};
use crate::release::{Baseline, Changelog};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the operator.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Describe where the release starts from.
pub fn format_baseline(baseline: &Baseline) -> String {
    match &baseline.tag {
        Some(tag) => format!("Last release: {} (tag {})", baseline.version, tag),
        None => format!(
            "No previous release; starting from {} at root commit {}",
            baseline.version,
            short_hash(&baseline.commit.to_string())
        ),
    }
}

/// List the pull requests in a change set, at most `limit` of them.
pub fn format_change_set(change_set: &ChangeSet, limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = change_set
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, pr)| format!("  {}. #{} {}", i + 1, pr.number, truncate(&pr.title, 60)))
        .collect();

    if change_set.len() > limit {
        lines.push(format!(
            "  ... and {} more pull requests",
            change_set.len() - limit
        ));
    }
    lines
}

/// One-line summary of the version decision.
pub fn format_version_decision(
    baseline: &Version,
    classification: &Classification,
    next: &Version,
) -> String {
    format!(
        "{} bump (from #{}): {} -> {}",
        classification.category, classification.decided_by, baseline, next
    )
}

/// Display the change set being released.
pub fn display_change_set(change_set: &ChangeSet) {
    println!(
        "\n{}",
        style(format!("Pull requests in this release ({}):", change_set.len())).bold()
    );
    for line in format_change_set(change_set, 10) {
        println!("{}", line);
    }
}

/// Display the proposed version change.
pub fn display_version_decision(
    baseline: &Version,
    classification: &Classification,
    next: &Version,
) {
    println!(
        "\n{} {}",
        style("Version:").bold(),
        style(format_version_decision(baseline, classification, next)).green()
    );
}

/// Display the rendered changelog.
pub fn display_changelog(changelog: &Changelog) {
    println!("\n{}", style("Changelog:").bold());
    for line in changelog.lines() {
        println!("  {}", line);
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut)
}
