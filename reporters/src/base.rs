//! Shared helpers the daily/weekly/monthly reporters build on: window-scoped
//! commit slicing, cross-repository analyzer fusion, and aggregate
//! construction.
//!
//! Mirrors how the original `reporters/base.py` factors shared helpers for
//! its daily/weekly/monthly subclasses, translated from inheritance to a
//! module of free functions plus the `ReportContext` value type (the
//! corpus's own preference for enums/structs over trait objects).

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use analyzers::{HotspotFile, HotspotThresholds};
use commit_model::{
    build_aggregates, AuthorAggregate, Commit, HealthMetrics, HealthScore, RepoAggregate,
    Repository, TimeWindow,
};
use config::{RepositoryConfig, Thresholds};
use providers::GitProvider;

use crate::context::{resolve_repositories, ReportContext};
use crate::errors::{ReporterError, ReporterResult};
use crate::fetch::{self, FetchOutcome};

/// A hotspot file annotated with the repository it belongs to, for reports
/// that span more than one repository.
#[derive(Debug, Clone)]
pub struct HotspotEntry {
    pub repo_id: String,
    pub file: HotspotFile,
}

#[derive(Debug, Clone, Default)]
pub struct ChurnSummary {
    pub churn_rate: f64,
    pub files: Vec<(String, analyzers::ChurnFile)>,
}

#[derive(Debug, Clone, Default)]
pub struct ReworkSummary {
    pub total_rework_lines: u64,
    pub total_added_lines: u64,
    pub rate: f64,
}

/// The full set of computed metrics a reporter needs, fused across every
/// repository in the run.
pub struct Analysis {
    pub window: TimeWindow,
    pub warnings: Vec<String>,
    pub window_commits_by_repo: Vec<(Repository, Vec<Commit>)>,
    pub all_window_commits: Vec<Commit>,
    pub by_author: BTreeMap<String, AuthorAggregate>,
    pub by_repo: BTreeMap<String, RepoAggregate>,
    pub churn: ChurnSummary,
    pub rework: ReworkSummary,
    pub hotspots: Vec<HotspotEntry>,
    pub large_commit_count: u32,
    pub late_night_count: u32,
    pub weekend_count: u32,
    pub message_quality: f64,
    pub health_metrics: HealthMetrics,
    pub health_score: HealthScore,
}

/// Widest trailing window (in days, ending at `window.end`) that covers the
/// report window itself plus every analyzer's own trailing window
/// (churn/hotspot/rework), so a single fetch serves both the report's
/// aggregates and the analyzers' independent lookback periods.
pub fn analysis_span_days(window: &TimeWindow, thresholds: &Thresholds) -> i64 {
    let mut days = window.duration_days().max(1);
    days = days.max(i64::from(thresholds.churn_days));
    days = days.max(i64::from(thresholds.hotspot_days));
    days = days.max(i64::from(thresholds.rework_add_days) + i64::from(thresholds.rework_delete_days));
    days
}

fn filter_window(commits: &[Commit], window: &TimeWindow) -> Vec<Commit> {
    commits.iter().filter(|c| window.contains(&c.timestamp)).cloned().collect()
}

/// Resolves repositories, fetches the widest trailing window a reporter
/// needs, and returns the raw per-repository commit sets. Reporters then
/// call [`analyze`] to fuse them into the metrics every section needs.
pub async fn gather(
    ctx: &ReportContext,
    provider: Arc<GitProvider>,
    repo_configs: &[RepositoryConfig],
    window: TimeWindow,
) -> ReporterResult<FetchOutcome> {
    let repos = resolve_repositories(&provider, repo_configs).await?;
    if repos.is_empty() {
        return Err(ReporterError::NoRepositories);
    }

    let fetch_window = TimeWindow::trailing_days(analysis_span_days(&window, &ctx.thresholds), window.end);
    Ok(fetch::fetch_all(provider, repos, fetch_window, ctx.concurrency, ctx.timeout).await)
}

/// Fuses per-repository commit sets into the cross-repository metrics every
/// reporter section needs: churn/rework/hotspot are computed per repository
/// (spec §4.2.a: "Input: repository, window size...") then combined by
/// summing raw counts rather than averaging percentages, so the fused rate
/// reflects the true combined denominator.
pub fn analyze(ctx: &ReportContext, window: TimeWindow, fetch: FetchOutcome) -> Analysis {
    let thresholds = &ctx.thresholds;

    let churn_window = TimeWindow::trailing_days(i64::from(thresholds.churn_days), window.end);
    let hotspot_window = TimeWindow::trailing_days(i64::from(thresholds.hotspot_days), window.end);
    let rework_window = TimeWindow::trailing_days(
        i64::from(thresholds.rework_add_days) + i64::from(thresholds.rework_delete_days),
        window.end,
    );

    let mut churn_files: Vec<(String, analyzers::ChurnFile)> = Vec::new();
    let mut total_churn_files = 0usize;
    let mut total_modified_files = 0usize;

    let mut total_rework_lines: u64 = 0;
    let mut total_added_lines: u64 = 0;

    let mut hotspots: Vec<HotspotEntry> = Vec::new();

    let mut large_commit_count: u32 = 0;
    let mut late_night_count: u32 = 0;
    let mut weekend_count: u32 = 0;
    let mut messages: Vec<String> = Vec::new();

    let mut window_commits_by_repo: Vec<(Repository, Vec<Commit>)> = Vec::new();

    for (repo, commits) in &fetch.per_repo {
        let window_commits = filter_window(commits, &window);
        let churn_commits = filter_window(commits, &churn_window);
        let hotspot_commits = filter_window(commits, &hotspot_window);
        let rework_commits = filter_window(commits, &rework_window);

        let modified_in_repo: HashSet<&str> = churn_commits
            .iter()
            .flat_map(|c| c.files.iter().map(|f| f.path.as_str()))
            .collect();
        total_modified_files += modified_in_repo.len();

        let churn_result = analyzers::churn::analyze(&churn_commits, thresholds.churn_count);
        total_churn_files += churn_result.files.len();
        churn_files.extend(churn_result.files.into_iter().map(|f| (repo.id.clone(), f)));

        let rework_result = analyzers::rework::analyze(
            &rework_commits,
            i64::from(thresholds.rework_add_days),
            i64::from(thresholds.rework_delete_days),
        );
        total_rework_lines += rework_result.total_rework_lines;
        total_added_lines += rework_result.total_added_lines;

        let hotspot_thresholds = HotspotThresholds {
            high_churn: thresholds.churn_count,
            large_file: thresholds.large_file,
            multi_author: thresholds.multi_author_count,
            display_floor: 40.0,
        };
        let hotspot_files = analyzers::hotspot::analyze(
            &hotspot_commits,
            repo.repo_type,
            &hotspot_thresholds,
            &ctx.analysis.exclude_patterns,
            &ctx.analysis.exclude_dirs,
        );
        hotspots.extend(hotspot_files.into_iter().map(|file| HotspotEntry {
            repo_id: repo.id.clone(),
            file,
        }));

        for commit in &window_commits {
            if commit.total_lines_changed() > thresholds.large_commit {
                large_commit_count += 1;
            }
            let classes = analyzers::work_time::classify(&commit.timestamp, &ctx.working_hours);
            if classes.late_night {
                late_night_count += 1;
            }
            if classes.weekend {
                weekend_count += 1;
            }
            messages.push(commit.message.clone());
        }

        window_commits_by_repo.push((repo.clone(), window_commits));
    }

    hotspots.sort_by(|a, b| {
        b.file
            .risk_score
            .partial_cmp(&a.file.risk_score)
            .unwrap()
            .then_with(|| a.file.path.cmp(&b.file.path))
    });
    churn_files.sort_by(|a, b| b.1.modify_count.cmp(&a.1.modify_count).then_with(|| a.1.path.cmp(&b.1.path)));

    let churn_rate = if total_modified_files == 0 {
        0.0
    } else {
        (total_churn_files as f64 / total_modified_files as f64) * 100.0
    };
    let rework_rate = if total_added_lines == 0 {
        0.0
    } else {
        ((total_rework_lines as f64 / total_added_lines as f64) * 100.0).min(100.0)
    };

    let messages_ref: Vec<&str> = messages.iter().map(String::as_str).collect();
    let message_quality = analyzers::message_quality::message_quality(&messages_ref);

    let health_metrics = HealthMetrics {
        large_commit_count,
        churn_rate,
        rework_rate,
        message_quality,
        late_night_count,
        weekend_count,
        high_risk_file_count: hotspots.len() as u32,
    };
    let health_score = analyzers::health_score::calculate(&health_metrics, thresholds);

    let per_repo_refs: Vec<(&str, commit_model::RepoType, &[Commit])> = window_commits_by_repo
        .iter()
        .map(|(repo, commits)| (repo.id.as_str(), repo.repo_type, commits.as_slice()))
        .collect();
    let (by_author, by_repo) = build_aggregates(per_repo_refs);

    let mut all_window_commits: Vec<Commit> =
        window_commits_by_repo.iter().flat_map(|(_, c)| c.clone()).collect();
    commit_model::sort_commits_desc(&mut all_window_commits);

    Analysis {
        window,
        warnings: fetch.warnings,
        window_commits_by_repo,
        all_window_commits,
        by_author,
        by_repo,
        churn: ChurnSummary { churn_rate, files: churn_files },
        rework: ReworkSummary { total_rework_lines, total_added_lines, rate: rework_rate },
        hotspots,
        large_commit_count,
        late_night_count,
        weekend_count,
        message_quality,
        health_metrics,
        health_score,
    }
}

/// Renders the header shared by every report's health-score section.
pub fn health_section(score: &HealthScore) -> String {
    let mut out = String::new();
    out.push_str("## Health Score\n\n");
    out.push_str(&format!("**{}/100** ({})\n\n", score.score, score.severity));
    if score.reasons.is_empty() {
        out.push_str("No deductions.\n");
    } else {
        for (reason, deduction) in &score.reasons {
            out.push_str(&format!("- {reason} (-{deduction})\n"));
        }
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn window() -> TimeWindow {
        let tz = FixedOffset::east_opt(0).unwrap();
        TimeWindow::for_day(chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), tz)
    }

    #[test]
    fn analysis_span_covers_widest_analyzer_window() {
        let thresholds = Thresholds { hotspot_days: 30, churn_days: 14, rework_add_days: 7, rework_delete_days: 3, ..Thresholds::default() };
        assert_eq!(analysis_span_days(&window(), &thresholds), 30);
    }

    #[test]
    fn empty_fetch_yields_zeroed_analysis() {
        let ctx = ReportContext::new("proj", Thresholds::default(), Default::default(), Default::default());
        let analysis = analyze(&ctx, window(), FetchOutcome::default());
        assert_eq!(analysis.health_score.score, 100);
        assert!(analysis.by_author.is_empty());
        assert_eq!(analysis.message_quality, 100.0);
    }
}
