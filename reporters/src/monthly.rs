//! Monthly reporter: one calendar month.
//!
//! Sections: core totals, top-10 contributor table, per-repository
//! contribution, weekly trend, health metrics, commit-size distribution,
//! file hot-list, next-month recommendations keyed off computed ratios.

use std::sync::Arc;

use commit_model::{weeks_in_month, TimeWindow};
use config::RepositoryConfig;
use providers::GitProvider;

use crate::base::{analyze, gather, Analysis};
use crate::context::ReportContext;
use crate::errors::ReporterResult;
use crate::format::{signed, table, thousands};

/// Generates the monthly Markdown report for `year`/`month`.
pub async fn generate(
    ctx: &ReportContext,
    provider: Arc<GitProvider>,
    repo_configs: &[RepositoryConfig],
    year: i32,
    month: u32,
    tz: chrono::FixedOffset,
) -> ReporterResult<String> {
    let window = TimeWindow::for_month(year, month, tz);
    let fetch = gather(ctx, provider, repo_configs, window).await?;
    let analysis = analyze(ctx, window, fetch);
    Ok(render(ctx, year, month, &analysis))
}

fn commit_size_bucket(total_lines: u32) -> &'static str {
    if total_lines < 50 {
        "small"
    } else if total_lines <= 200 {
        "medium"
    } else {
        "large"
    }
}

fn recommendations(ctx: &ReportContext, analysis: &Analysis) -> Vec<String> {
    let mut items = Vec::new();
    if analysis.churn.churn_rate > ctx.thresholds.churn_rate_warning {
        items.push(format!(
            "Churn rate is {:.1}%; prioritize stabilizing the files in this month's hot-list before adding new surface area.",
            analysis.churn.churn_rate
        ));
    }
    if analysis.rework.rate > ctx.thresholds.rework_rate_warning {
        items.push(format!(
            "Rework rate is {:.1}%; favor smaller, more deliberate PRs over rapid follow-up edits.",
            analysis.rework.rate
        ));
    }
    if analysis.message_quality < 60.0 {
        items.push(format!(
            "Commit message quality is {:.0}%; adopt a conventional-commit prefix convention.",
            analysis.message_quality
        ));
    }
    if items.is_empty() {
        items.push("Metrics are within normal ranges; maintain current practices next month.".to_string());
    }
    items
}

fn render(ctx: &ReportContext, year: i32, month: u32, analysis: &Analysis) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Monthly Report: {year}-{month:02} ({})\n\n", ctx.project_name));

    if !analysis.warnings.is_empty() {
        out.push_str("> **Warning:** this report is based on partial data:\n");
        for warning in &analysis.warnings {
            out.push_str(&format!("> - {warning}\n"));
        }
        out.push('\n');
    }

    let total_added: i64 = analysis.by_author.values().map(|a| a.added as i64).sum();
    let total_deleted: i64 = analysis.by_author.values().map(|a| a.deleted as i64).sum();
    out.push_str("## Core Totals\n\n");
    out.push_str(&format!(
        "- Commits: {}\n- Active authors: {}\n- Lines added: {}\n- Lines deleted: {}\n- Net lines: {}\n\n",
        thousands(analysis.all_window_commits.len() as i64),
        analysis.by_author.len(),
        thousands(total_added),
        thousands(total_deleted),
        signed(total_added - total_deleted),
    ));

    out.push_str("## Top Contributors\n\n");
    let mut authors: Vec<_> = analysis.by_author.values().collect();
    authors.sort_by(|a, b| b.commit_count.cmp(&a.commit_count).then_with(|| a.name.cmp(&b.name)));
    let rows: Vec<Vec<String>> = authors
        .iter()
        .take(10)
        .map(|a| {
            vec![
                a.name.clone(),
                thousands(a.commit_count as i64),
                signed(a.net),
                a.repos.len().to_string(),
            ]
        })
        .collect();
    out.push_str(&table(&["Author", "Commits", "Net Lines", "Repos"], &rows));
    out.push('\n');

    out.push_str("## Per-Repository Contribution\n\n");
    let repo_rows: Vec<Vec<String>> = analysis
        .by_repo
        .values()
        .map(|r| {
            vec![
                r.repo_id.clone(),
                thousands(r.commit_count as i64),
                signed(r.added as i64 - r.deleted as i64),
                r.authors.len().to_string(),
            ]
        })
        .collect();
    out.push_str(&table(&["Repository", "Commits", "Net Lines", "Authors"], &repo_rows));
    out.push('\n');

    out.push_str("## Weekly Trend\n\n");
    let mut trend_rows = Vec::new();
    for (iso_year, iso_week) in weeks_in_month(year, month) {
        let week_window = TimeWindow::for_iso_week(iso_year, iso_week, analysis.window.start.timezone());
        let count = analysis
            .all_window_commits
            .iter()
            .filter(|c| week_window.contains(&c.timestamp))
            .count();
        trend_rows.push(vec![format!("{iso_year}-W{iso_week:02}"), thousands(count as i64)]);
    }
    out.push_str(&table(&["Week", "Commits"], &trend_rows));
    out.push('\n');

    out.push_str(&crate::base::health_section(&analysis.health_score));

    out.push_str("## Commit Size Distribution\n\n");
    let mut small = 0u32;
    let mut medium = 0u32;
    let mut large = 0u32;
    for commit in &analysis.all_window_commits {
        match commit_size_bucket(commit.total_lines_changed()) {
            "small" => small += 1,
            "medium" => medium += 1,
            _ => large += 1,
        }
    }
    out.push_str(&format!(
        "- Small (< 50 lines): {small}\n- Medium (50-200 lines): {medium}\n- Large (> 200 lines): {large}\n\n"
    ));

    if !analysis.hotspots.is_empty() {
        out.push_str("## File Hot-List\n\n");
        let hotspot_rows: Vec<Vec<String>> = analysis
            .hotspots
            .iter()
            .take(10)
            .map(|h| {
                vec![
                    h.file.path.clone(),
                    format!("{:.2}", h.file.risk_score),
                    h.file.suggestion.to_string(),
                ]
            })
            .collect();
        out.push_str(&table(&["File", "Risk", "Suggestion"], &hotspot_rows));
        out.push('\n');
    }

    out.push_str("## Next Month Recommendations\n\n");
    for (i, rec) in recommendations(ctx, analysis).into_iter().enumerate() {
        out.push_str(&format!("{}. {rec}\n", i + 1));
    }
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn b2_empty_month_renders_zeroed_sections() {
        let ctx = ReportContext::new("proj", config::Thresholds::default(), Default::default(), Default::default());
        let window = TimeWindow::for_month(2025, 2, chrono::FixedOffset::east_opt(0).unwrap());
        let analysis = analyze(&ctx, window, crate::fetch::FetchOutcome::default());
        let rendered = render(&ctx, 2025, 2, &analysis);
        assert!(rendered.contains("Commits: 0"));
        assert!(rendered.contains("## Weekly Trend"));
        assert!(rendered.contains("## Next Month Recommendations"));
    }

    #[test]
    fn commit_size_buckets_match_spec_thresholds() {
        assert_eq!(commit_size_bucket(10), "small");
        assert_eq!(commit_size_bucket(50), "medium");
        assert_eq!(commit_size_bucket(200), "medium");
        assert_eq!(commit_size_bucket(201), "large");
    }
}
