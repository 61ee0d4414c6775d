//! Extraction of key metrics from a rendered Markdown report.
//!
//! Grounded on `original_source/src/notifiers/base.py`'s
//! `_extract_daily_data`/`_extract_weekly_data`/`_extract_monthly_data`,
//! which regex-scrape the same report bodies the reporter family renders.
//! The three Python variants read overlapping but non-identical fields
//! (see spec.md §9's note on the divergent notifier bases); this module
//! scans for the union of them in a single pass and leaves whatever a
//! given report type doesn't carry as `None` rather than forking into one
//! function per report kind.

use regex::Regex;
use std::sync::OnceLock;

/// A single contributor line lifted from a productivity or contributor
/// table, used as the "top contributor" field in a notification payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TopContributor {
    pub name: String,
    pub commits: u64,
    pub net_lines: Option<i64>,
}

/// Best-effort fields scraped out of a rendered report, per spec.md §6
/// ("commit counts, health score, top contributor, abnormal-time
/// counts"). Every field not present in a given report's sections is
/// `None` rather than a guessed zero, so callers can render "n/a".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyMetrics {
    pub commits: Option<u64>,
    pub active_authors: Option<u64>,
    pub repos_touched: Option<u64>,
    pub net_lines: Option<i64>,
    pub health_score: Option<u8>,
    pub severity: Option<String>,
    pub churn_rate: Option<f64>,
    pub rework_rate: Option<f64>,
    pub message_quality: Option<f64>,
    pub late_night_count: Option<u64>,
    pub weekend_count: Option<u64>,
    pub large_commit_count: Option<u64>,
    pub top_contributor: Option<TopContributor>,
}

fn capture_u64(re: &Regex, content: &str) -> Option<u64> {
    re.captures(content)?.get(1)?.as_str().replace(',', "").parse().ok()
}

fn capture_i64(re: &Regex, content: &str) -> Option<i64> {
    re.captures(content)?.get(1)?.as_str().replace(',', "").replace('+', "").parse().ok()
}

fn capture_f64(re: &Regex, content: &str) -> Option<f64> {
    re.captures(content)?.get(1)?.as_str().parse().ok()
}

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("static regex is valid"))
        }
    };
}

cached_regex!(re_commits, r"(?m)^- Commits:\s*([\d,]+)\s*$");
cached_regex!(re_active_authors, r"(?m)^- Active authors:\s*(\d+)\s*$");
cached_regex!(re_repos_touched, r"(?m)^- Repositories touched:\s*(\d+)\s*$");
cached_regex!(re_net_lines, r"(?m)^- Net lines:\s*([+-]?[\d,]+)\s*$");
cached_regex!(re_late_night, r"(?m)^- Late-night commits:\s*(\d+)\s*$");
cached_regex!(re_weekend, r"(?m)^- Weekend commits:\s*(\d+)\s*$");
cached_regex!(re_large_commit_daily, r"Large commits \(> \d+ lines changed\):\s*(\d+)");
cached_regex!(re_large_commit_weekly, r"(?m)^- Large commits:\s*(\d+)\s*$");
cached_regex!(re_health_score, r"\*\*(\d+)/100\*\*\s*\(([a-z]+)\)");
cached_regex!(re_message_quality, r"Message quality:\s*([\d.]+)%");
cached_regex!(re_churn_rate, r"Churn rate is ([\d.]+)%");
cached_regex!(re_rework_rate, r"Rework rate is ([\d.]+)%");
cached_regex!(re_daily_top_contributor, r"(?m)^### ([^\n(]+?) \((\d+) commits?,\s*([+-]?[\d,]+) net lines?\)");

/// Pulls the first data row (skipping the header and alignment rows) out
/// of the first Markdown table found under `## {heading}`.
fn first_table_row<'a>(content: &'a str, heading: &str) -> Option<Vec<&'a str>> {
    let start = content.find(&format!("## {heading}"))?;
    let mut lines = content[start..].lines();
    lines.next(); // the heading itself
    let mut seen_alignment = false;
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if seen_alignment {
                return None;
            }
            continue;
        }
        if !trimmed.starts_with('|') {
            return None;
        }
        if trimmed.chars().all(|c| "|-: ".contains(c)) {
            seen_alignment = true;
            continue;
        }
        if seen_alignment {
            return Some(trimmed.trim_matches('|').split('|').map(str::trim).collect());
        }
    }
    None
}

fn parse_net_lines_cell(cell: &str) -> Option<i64> {
    cell.replace(',', "").replace('+', "").replace('*', "").parse().ok()
}

/// Top contributor from the weekly "Productivity Ranking" table (columns
/// `Author | Commits | Added | Repos | Composite`, added lines not net).
fn weekly_top_contributor(content: &str) -> Option<TopContributor> {
    let row = first_table_row(content, "Productivity Ranking")?;
    Some(TopContributor {
        name: row.first()?.to_string(),
        commits: row.get(1)?.replace(',', "").parse().ok()?,
        net_lines: None,
    })
}

/// Top contributor from the monthly "Top Contributors" table (columns
/// `Author | Commits | Net Lines | Repos`).
fn monthly_top_contributor(content: &str) -> Option<TopContributor> {
    let row = first_table_row(content, "Top Contributors")?;
    Some(TopContributor {
        name: row.first()?.to_string(),
        commits: row.get(1)?.replace(',', "").parse().ok()?,
        net_lines: row.get(2).and_then(|c| parse_net_lines_cell(c)),
    })
}

/// Top contributor from the daily "Per-Author Detail" section's first
/// `### Name (N commits, +M net lines)` heading.
fn daily_top_contributor(content: &str) -> Option<TopContributor> {
    let caps = re_daily_top_contributor().captures(content)?;
    Some(TopContributor {
        name: caps.get(1)?.as_str().trim().to_string(),
        commits: caps.get(2)?.as_str().parse().ok()?,
        net_lines: caps.get(3).and_then(|m| parse_net_lines_cell(m.as_str())),
    })
}

/// Scans a rendered daily/weekly/monthly report for the fields a
/// notification payload needs. Every field is best-effort: a report
/// section that doesn't exist in this report kind yields `None` rather
/// than a fabricated zero.
pub fn extract_key_metrics(report: &str) -> KeyMetrics {
    let health_caps = re_health_score().captures(report);
    let health_score = health_caps.as_ref().and_then(|c| c.get(1)?.as_str().parse().ok());
    let severity = health_caps.and_then(|c| c.get(2).map(|m| m.as_str().to_string()));

    let large_commit_count =
        capture_u64(re_large_commit_daily(), report).or_else(|| capture_u64(re_large_commit_weekly(), report));

    let top_contributor = daily_top_contributor(report)
        .or_else(|| monthly_top_contributor(report))
        .or_else(|| weekly_top_contributor(report));

    KeyMetrics {
        commits: capture_u64(re_commits(), report),
        active_authors: capture_u64(re_active_authors(), report),
        repos_touched: capture_u64(re_repos_touched(), report),
        net_lines: capture_i64(re_net_lines(), report),
        health_score,
        severity,
        churn_rate: capture_f64(re_churn_rate(), report),
        rework_rate: capture_f64(re_rework_rate(), report),
        message_quality: capture_f64(re_message_quality(), report),
        late_night_count: capture_u64(re_late_night(), report),
        weekend_count: capture_u64(re_weekend(), report),
        large_commit_count,
        top_contributor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAILY: &str = "\
# Daily Report: 2025-01-10 (proj)

## Overview

- Commits: 2
- Active authors: 1
- Repositories touched: 1

## Code Change Totals

- Lines added: 610
- Lines deleted: 0
- Net lines: +610

## Risk Alerts

- Late-night commits: 0
- Weekend commits: 0
- Large commits (> 500 lines changed): 1

## Health Score

**95/100** (excellent)

- large commit (-5)

## Per-Author Detail

### A (2 commits, +610 net lines)

- `h1` feat: thing (+600)
";

    const WEEKLY: &str = "\
# Weekly Report: 2025-W02 (proj)

## Productivity Ranking

| Author | Commits | Added | Repos | Composite |
| --- | --- | --- | --- | --- |
| X | 10 | 2,000 | 2 | 100.0 |
| Y | 5 | 500 | 1 | 37.5 |

## Quality

- Large commits: 0
- Tiny commits: 0
- Message quality: 100.0%

## Health Score

**100/100** (excellent)

No deductions.
";

    const MONTHLY: &str = "\
# Monthly Report: 2025-01 (proj)

## Core Totals

- Commits: 42
- Active authors: 3
- Lines added: 5,000
- Lines deleted: 1,200
- Net lines: +3,800

## Top Contributors

| Author | Commits | Net Lines | Repos |
| --- | --- | --- | --- |
| Z | 20 | +2,500 | 2 |

## Health Score

**72/100** (good)

- churn rate tier (-10)
";

    #[test]
    fn daily_report_extracts_overview_and_top_contributor() {
        let m = extract_key_metrics(DAILY);
        assert_eq!(m.commits, Some(2));
        assert_eq!(m.active_authors, Some(1));
        assert_eq!(m.net_lines, Some(610));
        assert_eq!(m.health_score, Some(95));
        assert_eq!(m.severity.as_deref(), Some("excellent"));
        assert_eq!(m.large_commit_count, Some(1));
        let top = m.top_contributor.unwrap();
        assert_eq!(top.name, "A");
        assert_eq!(top.commits, 2);
        assert_eq!(top.net_lines, Some(610));
    }

    #[test]
    fn weekly_report_reads_productivity_table_for_top_contributor() {
        let m = extract_key_metrics(WEEKLY);
        assert_eq!(m.commits, None);
        assert_eq!(m.message_quality, Some(100.0));
        assert_eq!(m.large_commit_count, Some(0));
        let top = m.top_contributor.unwrap();
        assert_eq!(top.name, "X");
        assert_eq!(top.commits, 10);
        assert_eq!(top.net_lines, None);
    }

    #[test]
    fn monthly_report_reads_top_contributors_table() {
        let m = extract_key_metrics(MONTHLY);
        assert_eq!(m.commits, Some(42));
        assert_eq!(m.health_score, Some(72));
        assert_eq!(m.severity.as_deref(), Some("good"));
        let top = m.top_contributor.unwrap();
        assert_eq!(top.name, "Z");
        assert_eq!(top.net_lines, Some(2500));
    }

    #[test]
    fn missing_fields_yield_none_rather_than_zero() {
        let m = extract_key_metrics("# Daily Report: empty\n\n## Health Score\n\n**100/100** (excellent)\n");
        assert_eq!(m.commits, None);
        assert_eq!(m.top_contributor, None);
        assert_eq!(m.health_score, Some(100));
    }
}
