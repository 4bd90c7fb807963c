//! Formatted output helpers for CLI commands.
//!
//! Renders the end-of-run summary: one line per function with a status
//! marker, followed by totals.

use fnstack_common::types::{OperationResult, Outcome, Report};

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Prints the summary for `report` to stderr.
pub fn print_summary(report: &Report) {
    if report.results.is_empty() {
        return;
    }
    eprintln!();
    for result in &report.results {
        eprintln!("  {}", format_result(result));
    }
    eprintln!();
    eprintln!("  {}", format_totals(report));
}

/// Formats one result line, e.g. `✔ url-ping deploy`.
#[must_use]
pub fn format_result(result: &OperationResult) -> String {
    let (color, marker) = match result.outcome {
        Outcome::Success => (GREEN, "\u{2714}"),
        Outcome::Skipped => (DIM, "-"),
        Outcome::Failure => (RED, "\u{2718}"),
        Outcome::Cancelled => (YELLOW, "\u{25cb}"),
    };
    let detail = result
        .detail
        .as_deref()
        .map_or_else(String::new, |d| format!(" {DIM}({d}){RESET}"));
    format!(
        "{color}{marker}{RESET} {} {}{detail}",
        result.name, result.operation
    )
}

/// Formats the totals line, e.g. `2 succeeded, 1 failed`.
#[must_use]
pub fn format_totals(report: &Report) -> String {
    let parts: Vec<String> = [
        (Outcome::Success, "succeeded"),
        (Outcome::Skipped, "skipped"),
        (Outcome::Failure, "failed"),
        (Outcome::Cancelled, "cancelled"),
    ]
    .into_iter()
    .map(|(outcome, label)| (report.count(outcome), label))
    .filter(|(count, _)| *count > 0)
    .map(|(count, label)| format!("{count} {label}"))
    .collect();
    parts.join(", ")
}
