//! Weekly reporter: ISO week, Monday 00:00 to the following Monday 00:00.
//!
//! Sections: productivity ranking, quality, time-of-day histogram, health
//! score, three prioritized action items.

use std::sync::Arc;

use commit_model::TimeWindow;
use config::RepositoryConfig;
use providers::GitProvider;

use crate::base::{analyze, gather, Analysis};
use crate::context::ReportContext;
use crate::errors::ReporterResult;
use crate::format::{table, thousands};

/// Seven fixed hour bands used by the activity heatmap (spec §4.3 common
/// rules): 00-06, 06-09, 09-12, 12-14, 14-18, 18-22, 22-24.
const HOUR_BANDS: [(&str, u32, u32); 7] = [
    ("00-06", 0, 6),
    ("06-09", 6, 9),
    ("09-12", 9, 12),
    ("12-14", 12, 14),
    ("14-18", 14, 18),
    ("18-22", 18, 22),
    ("22-24", 22, 24),
];

/// Generates the weekly Markdown report for ISO `year`/`week`.
pub async fn generate(
    ctx: &ReportContext,
    provider: Arc<GitProvider>,
    repo_configs: &[RepositoryConfig],
    iso_year: i32,
    iso_week: u32,
    tz: chrono::FixedOffset,
) -> ReporterResult<String> {
    let window = TimeWindow::for_iso_week(iso_year, iso_week, tz);
    let fetch = gather(ctx, provider, repo_configs, window).await?;
    let analysis = analyze(ctx, window, fetch);
    Ok(render(ctx, iso_year, iso_week, &analysis))
}

struct Productivity {
    name: String,
    commits: u32,
    added: u64,
    repos: usize,
    composite: f64,
}

fn productivity_ranking(analysis: &Analysis) -> Vec<Productivity> {
    let max_commits = analysis.by_author.values().map(|a| a.commit_count).max().unwrap_or(0).max(1) as f64;
    let max_added = analysis.by_author.values().map(|a| a.added).max().unwrap_or(0).max(1) as f64;
    let max_repos = analysis.by_author.values().map(|a| a.repos.len()).max().unwrap_or(0).max(1) as f64;

    let mut ranking: Vec<Productivity> = analysis
        .by_author
        .values()
        .map(|a| {
            let composite = 0.30 * (a.commit_count as f64 / max_commits)
                + 0.50 * (a.added as f64 / max_added)
                + 0.20 * (a.repos.len() as f64 / max_repos);
            Productivity {
                name: a.name.clone(),
                commits: a.commit_count,
                added: a.added,
                repos: a.repos.len(),
                composite: composite * 100.0,
            }
        })
        .collect();

    ranking.sort_by(|a, b| b.composite.partial_cmp(&a.composite).unwrap().then_with(|| a.name.cmp(&b.name)));
    ranking
}

fn hour_histogram(analysis: &Analysis) -> [u32; 7] {
    let mut counts = [0u32; 7];
    for commit in &analysis.all_window_commits {
        let hour = chrono::Timelike::hour(&commit.timestamp);
        for (i, (_, start, end)) in HOUR_BANDS.iter().enumerate() {
            if hour >= *start && hour < *end {
                counts[i] += 1;
                break;
            }
        }
    }
    counts
}

fn action_items(analysis: &Analysis) -> Vec<String> {
    let mut items: Vec<String> = analysis
        .health_score
        .reasons
        .iter()
        .take(3)
        .map(|(reason, _)| format!("Address: {reason}"))
        .collect();
    if items.is_empty() {
        items.push("No major risk signals this week; maintain current practices.".to_string());
    }
    while items.len() < 3 {
        items.push("Continue monitoring churn and rework trends next week.".to_string());
    }
    items
}

fn render(ctx: &ReportContext, iso_year: i32, iso_week: u32, analysis: &Analysis) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Weekly Report: {iso_year}-W{iso_week:02} ({})\n\n", ctx.project_name));

    if !analysis.warnings.is_empty() {
        out.push_str("> **Warning:** this report is based on partial data:\n");
        for warning in &analysis.warnings {
            out.push_str(&format!("> - {warning}\n"));
        }
        out.push('\n');
    }

    out.push_str("## Productivity Ranking\n\n");
    let ranking = productivity_ranking(analysis);
    let rows: Vec<Vec<String>> = ranking
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                thousands(p.commits as i64),
                thousands(p.added as i64),
                p.repos.to_string(),
                format!("{:.1}", p.composite),
            ]
        })
        .collect();
    out.push_str(&table(&["Author", "Commits", "Added", "Repos", "Composite"], &rows));
    out.push('\n');

    out.push_str("## Quality\n\n");
    let large = analysis.large_commit_count;
    let tiny = analysis
        .all_window_commits
        .iter()
        .filter(|c| c.total_lines_changed() < ctx.thresholds.tiny_commit)
        .count();
    out.push_str(&format!(
        "- Large commits: {large}\n- Tiny commits: {tiny}\n- Message quality: {:.1}%\n\n",
        analysis.message_quality,
    ));
    if !analysis.hotspots.is_empty() {
        out.push_str("### File Hot-List\n\n");
        let rows: Vec<Vec<String>> = analysis
            .hotspots
            .iter()
            .take(10)
            .map(|h| {
                vec![
                    h.file.path.clone(),
                    format!("{:.2}", h.file.risk_score),
                    h.file.tags.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", "),
                ]
            })
            .collect();
        out.push_str(&table(&["File", "Risk", "Tags"], &rows));
        out.push('\n');
    }

    out.push_str("## Time-of-Day Activity\n\n");
    let counts = hour_histogram(analysis);
    for ((label, _, _), count) in HOUR_BANDS.iter().zip(counts.iter()) {
        out.push_str(&format!("- {label}: {count}\n"));
    }
    out.push('\n');

    out.push_str(&crate::base::health_section(&analysis.health_score));

    out.push_str("## Action Items\n\n");
    for (i, item) in action_items(analysis).into_iter().enumerate() {
        out.push_str(&format!("{}. {item}\n", i + 1));
    }
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use commit_model::{Commit, FileChange, Repository};

    fn tz() -> chrono::FixedOffset {
        chrono::FixedOffset::east_opt(0).unwrap()
    }

    fn commit(hash: &str, author: &str, added: u32, repo: &str) -> (Repository, Commit) {
        let repo_obj = Repository::new(repo, repo, format!("https://example.com/{repo}.git"), "main", commit_model::RepoType::Unknown, false);
        let c = Commit {
            hash: hash.to_string(),
            author_name: author.to_string(),
            author_email: format!("{author}@example.com"),
            timestamp: tz().with_ymd_and_hms(2025, 1, 7, 10, 0, 0).unwrap(),
            message: "feat: thing".to_string(),
            files: vec![FileChange::new("f.rs", added, 0)],
        };
        (repo_obj, c)
    }

    #[test]
    fn e5_productivity_ranking_matches_composite_formula() {
        let ctx = ReportContext::new("proj", config::Thresholds::default(), Default::default(), Default::default());
        let window = TimeWindow::for_iso_week(2025, 2, tz());

        let mut per_repo: std::collections::HashMap<String, (Repository, Vec<Commit>)> = std::collections::HashMap::new();
        for i in 0..10 {
            let (repo, c) = commit(&format!("x{i}"), "X", 200, if i % 2 == 0 { "repo-a" } else { "repo-b" });
            per_repo.entry(repo.id.clone()).or_insert((repo, Vec::new())).1.push(c);
        }
        for i in 0..5 {
            let (repo, c) = commit(&format!("y{i}"), "Y", 100, "repo-a");
            per_repo.entry(repo.id.clone()).or_insert((repo, Vec::new())).1.push(c);
        }

        let fetch = crate::fetch::FetchOutcome { per_repo: per_repo.into_values().collect(), warnings: vec![] };
        let analysis = analyze(&ctx, window, fetch);
        let ranking = productivity_ranking(&analysis);

        assert_eq!(ranking[0].name, "X");
        assert!((ranking[0].composite - 100.0).abs() < 0.01);
        assert!((ranking[1].composite - 37.5).abs() < 0.01);
    }

    #[test]
    fn hour_histogram_buckets_into_seven_fixed_bands() {
        let ctx = ReportContext::new("proj", config::Thresholds::default(), Default::default(), Default::default());
        let window = TimeWindow::for_iso_week(2025, 2, tz());
        let analysis = analyze(&ctx, window, crate::fetch::FetchOutcome::default());
        assert_eq!(hour_histogram(&analysis), [0; 7]);
    }
}
