//! Daily reporter: one calendar day in local time.
//!
//! Sections: overview, code-change totals, risk alerts (work-time anomalies,
//! large commits), health score, per-author detail with per-commit lines.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate};
use commit_model::TimeWindow;
use config::RepositoryConfig;
use providers::GitProvider;

use crate::base::{analyze, gather, Analysis};
use crate::context::ReportContext;
use crate::errors::ReporterResult;
use crate::format::{signed, thousands};

/// Generates the daily Markdown report for `date` (local time, `tz`).
pub async fn generate(
    ctx: &ReportContext,
    provider: Arc<GitProvider>,
    repo_configs: &[RepositoryConfig],
    date: NaiveDate,
    tz: FixedOffset,
) -> ReporterResult<String> {
    let window = TimeWindow::for_day(date, tz);
    let fetch = gather(ctx, provider, repo_configs, window).await?;
    let analysis = analyze(ctx, window, fetch);
    Ok(render(ctx, &date, &analysis))
}

fn render(ctx: &ReportContext, date: &NaiveDate, analysis: &Analysis) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Daily Report: {date} ({})\n\n", ctx.project_name));

    if !analysis.warnings.is_empty() {
        out.push_str("> **Warning:** this report is based on partial data:\n");
        for warning in &analysis.warnings {
            out.push_str(&format!("> - {warning}\n"));
        }
        out.push('\n');
    }

    out.push_str("## Overview\n\n");
    out.push_str(&format!(
        "- Commits: {}\n- Active authors: {}\n- Repositories touched: {}\n\n",
        thousands(analysis.all_window_commits.len() as i64),
        analysis.by_author.len(),
        analysis.by_repo.len(),
    ));

    let total_added: i64 = analysis.by_author.values().map(|a| a.added as i64).sum();
    let total_deleted: i64 = analysis.by_author.values().map(|a| a.deleted as i64).sum();
    out.push_str("## Code Change Totals\n\n");
    out.push_str(&format!(
        "- Lines added: {}\n- Lines deleted: {}\n- Net lines: {}\n\n",
        thousands(total_added),
        thousands(total_deleted),
        signed(total_added - total_deleted),
    ));

    out.push_str("## Risk Alerts\n\n");
    out.push_str(&format!(
        "- Late-night commits: {}\n- Weekend commits: {}\n- Large commits (> {} lines changed): {}\n\n",
        analysis.late_night_count,
        analysis.weekend_count,
        ctx.thresholds.large_commit,
        analysis.large_commit_count,
    ));
    if analysis.large_commit_count > 0 {
        out.push_str("Large commits:\n\n");
        for commit in analysis
            .all_window_commits
            .iter()
            .filter(|c| c.total_lines_changed() > ctx.thresholds.large_commit)
        {
            out.push_str(&format!(
                "- `{}` {} by {} ({} lines changed)\n",
                &commit.hash[..commit.hash.len().min(10)],
                commit.message,
                commit.author_name,
                thousands(commit.total_lines_changed() as i64),
            ));
        }
        out.push('\n');
    }

    out.push_str(&crate::base::health_section(&analysis.health_score));

    out.push_str("## Per-Author Detail\n\n");
    let mut authors: Vec<_> = analysis.by_author.values().collect();
    authors.sort_by(|a, b| b.commit_count.cmp(&a.commit_count).then_with(|| a.name.cmp(&b.name)));
    for author in authors {
        out.push_str(&format!(
            "### {} ({} commits, {} net lines)\n\n",
            author.name,
            author.commit_count,
            signed(author.net),
        ));
        for commit in analysis.all_window_commits.iter().filter(|c| c.author_name == author.name) {
            out.push_str(&format!(
                "- `{}` {} ({})\n",
                &commit.hash[..commit.hash.len().min(10)],
                commit.message,
                signed(commit.net_lines()),
            ));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyzers::health_score;
    use chrono::TimeZone;
    use commit_model::{Commit, FileChange, HealthMetrics};

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn commit(hash: &str, author: &str, added: u32, deleted: u32, hour: u32) -> Commit {
        Commit {
            hash: hash.to_string(),
            author_name: author.to_string(),
            author_email: format!("{author}@example.com"),
            timestamp: tz().with_ymd_and_hms(2025, 1, 10, hour, 0, 0).unwrap(),
            message: "feat: thing".to_string(),
            files: vec![FileChange::new("f.rs", added, deleted)],
        }
    }

    #[test]
    fn e1_large_commit_deducts_five_points_and_is_listed() {
        let ctx = ReportContext::new("proj", config::Thresholds::default(), Default::default(), Default::default());
        let commits = vec![commit("h1", "A", 600, 0, 10), commit("h2", "A", 10, 0, 11)];

        let repo = commit_model::Repository::new(
            "r1",
            "r1",
            "https://example.com/r1.git",
            "main",
            commit_model::RepoType::Unknown,
            false,
        );
        let window = TimeWindow::for_day(chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), tz());
        let fetch = crate::fetch::FetchOutcome { per_repo: vec![(repo, commits)], warnings: vec![] };
        let analysis = analyze(&ctx, window, fetch);

        assert_eq!(analysis.large_commit_count, 1);
        assert_eq!(analysis.health_score.score, 95);
        assert_eq!(analysis.health_score.severity, commit_model::Severity::Excellent);

        let total_net: i64 = analysis.all_window_commits.iter().map(|c| c.net_lines()).sum();
        assert_eq!(total_net, 610);

        let rendered = render(&ctx, &chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), &analysis);
        assert!(rendered.contains("Large commits:"));
        assert!(rendered.contains("+610"));
    }

    #[test]
    fn b2_empty_window_renders_zeroed_sections() {
        let ctx = ReportContext::new("proj", config::Thresholds::default(), Default::default(), Default::default());
        let window = TimeWindow::for_day(chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), tz());
        let analysis = analyze(&ctx, window, crate::fetch::FetchOutcome::default());
        let rendered = render(&ctx, &chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), &analysis);
        assert!(rendered.contains("Commits: 0"));
        assert!(rendered.contains("## Health Score"));
        let _ = health_score::calculate(&HealthMetrics::default(), &ctx.thresholds);
    }
}
