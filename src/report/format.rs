//! Formatted terminal output.
//!
//! All operator-facing text lives here so output changes stay localized.

use crate::domain::{RateGroups, TaskOutcome};
use crate::report::{FailureDetail, Summary};

/// Pre-run breakdown: how many groups and locations, per rate ascending.
pub fn format_plan(groups: &RateGroups) -> String {
    let mut out = String::new();

    out.push_str("Summary of rates to be created:\n");
    out.push_str(&format!("Total unique rates: {}\n", groups.len()));
    out.push_str(&format!("Total locations to process: {}\n", groups.total_locations()));

    if groups.is_empty() {
        return out;
    }

    out.push_str("\nBreakdown by rate:\n");
    for group in groups.sorted_by_rate() {
        out.push_str(&format!(
            "  ${}: {} {}\n",
            group.rate,
            group.locations.len(),
            plural(group.locations.len(), "location", "locations")
        ));
    }

    out
}

/// `Progress: 3/10 (30.0%) - rate $85.5 ok`
pub fn format_progress_line(completed: usize, total: usize, outcome: &TaskOutcome) -> String {
    let pct = if total == 0 {
        100.0
    } else {
        completed as f64 / total as f64 * 100.0
    };

    let status = match outcome.error() {
        None => "ok".to_string(),
        Some(e) => format!("FAILED: {e}"),
    };

    format!(
        "Progress: {completed}/{total} ({pct:.1}%) - rate ${} ({} {}) {status}",
        outcome.rate,
        outcome.location_count,
        plural(outcome.location_count, "location", "locations"),
    )
}

/// Final tally plus a table of failed groups.
pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();

    out.push_str("\nProcessing complete:\n");
    out.push_str(&format!("  Successful: {}\n", summary.successful));
    out.push_str(&format!("  Failed: {}\n", summary.failed));
    out.push_str(&format!("  Total: {}\n", summary.total));

    if !summary.failures.is_empty() {
        out.push_str("\nFailed groups:\n");
        out.push_str(&format_failure_table(&summary.failures));
    }

    out
}

fn format_failure_table(rows: &[FailureDetail]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:>12} {:>10} {}", "rate", "locations", "error").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<10} {:-<40}", "", "", "").trim_end());
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:>12} {:>10} {}",
                truncate(&r.rate.to_string(), 12),
                r.location_count,
                truncate(&single_line(&r.error), 160),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Rate;
    use crate::grouping::group_pairs;

    #[test]
    fn plan_lists_rates_ascending() {
        let groups = group_pairs([("23451", "100.0"), ("23452", "100.0"), ("23460", "85.5")]).unwrap();
        let text = format_plan(&groups);
        assert!(text.contains("Total unique rates: 2\n"));
        assert!(text.contains("Total locations to process: 3\n"));
        let low = text.find("  $85.5: 1 location\n").unwrap();
        let high = text.find("  $100.0: 2 locations\n").unwrap();
        assert!(low < high);
    }

    #[test]
    fn plan_for_empty_input_has_no_breakdown() {
        let text = format_plan(&RateGroups::default());
        assert!(text.contains("Total unique rates: 0"));
        assert!(!text.contains("Breakdown"));
    }

    #[test]
    fn summary_lists_failures() {
        let summary = Summary {
            successful: 1,
            failed: 1,
            total: 2,
            failures: vec![FailureDetail {
                rate: Rate::parse("85.5").unwrap(),
                location_count: 4,
                error: "remote service returned HTTP 500:\n  boom".to_string(),
            }],
        };
        let text = format_summary(&summary);
        assert!(text.contains("  Successful: 1\n  Failed: 1\n  Total: 2\n"));
        assert!(text.contains("Failed groups:"));
        assert!(text.contains("85.5          4 remote service returned HTTP 500: boom"));
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
