//! Dashboard generation: one HTML file per preset window, charts inlined
//! as JSON, with a redirect file when a preset exceeds the project's
//! actual history.
//!
//! Grounded on `original_source/src/utils/dashboard_generator.py`
//! (`generate_dashboard`/`generate_dashboard_html`/`generate_redirect_html`),
//! consolidated with its `scripts/dashboard-generator-range.py` sibling per
//! spec §9 into one implementation parameterized by the preset list. The
//! fixed-year bug in the older variant is not carried over (spec §9):
//! "current" is always the caller-supplied `now`.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};
use serde::Serialize;

use analyzers::{churn, health_score, message_quality, rework, work_time};
use commit_model::{Commit, HealthMetrics, TimeWindow};
use config::{Thresholds, WorkingHours};

/// One of the fixed dashboard ranges, spec §4.4.c / GLOSSARY "Preset".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardPreset {
    Days(u32),
    All,
}

impl DashboardPreset {
    pub const ALL: [DashboardPreset; 6] = [
        DashboardPreset::Days(7),
        DashboardPreset::Days(14),
        DashboardPreset::Days(30),
        DashboardPreset::Days(60),
        DashboardPreset::Days(90),
        DashboardPreset::All,
    ];

    pub fn filename(&self) -> String {
        match self {
            DashboardPreset::Days(7) => "index.html".to_string(),
            DashboardPreset::Days(n) => format!("index-{n}d.html"),
            DashboardPreset::All => "index-all.html".to_string(),
        }
    }

    fn label(&self) -> String {
        match self {
            DashboardPreset::Days(n) => format!("Last {n} days"),
            DashboardPreset::All => "All time".to_string(),
        }
    }
}

/// Everything a dashboard run needs: the full commit set already fetched
/// across all repositories (deduplicated, any window wide enough to cover
/// every requested preset), the analyzer thresholds, and links to the
/// latest report files actually present on disk.
pub struct DashboardInputs<'a> {
    pub commits: &'a [Commit],
    /// Commits grouped by owning repository's display name, for the
    /// "repositories" pie chart (spec §4.4.c). Covers the same commit set
    /// as `commits`, just not flattened, so per-repo counts survive.
    pub per_repo: &'a [(String, Vec<Commit>)],
    pub thresholds: &'a Thresholds,
    pub working_hours: &'a WorkingHours,
    /// Earliest dated daily report file present on disk, per spec §4.4.c
    /// ("measured from the earliest dated daily report file present").
    pub project_start: Option<NaiveDate>,
    pub now: DateTime<FixedOffset>,
    pub latest_daily: Option<String>,
    pub latest_weekly: Option<String>,
    pub latest_monthly: Option<String>,
}

/// A generated dashboard output file, ready to be written to disk by the
/// caller.
pub struct GeneratedFile {
    pub filename: String,
    pub contents: String,
}

/// Generates every preset file plus the `all` dashboard. Presets whose
/// requested length exceeds the project's actual history become a fixed
/// redirect to `index-all.html` (spec §4.4.c, B3).
pub fn generate_all(inputs: &DashboardInputs) -> Vec<GeneratedFile> {
    DashboardPreset::ALL.iter().map(|preset| generate_one(inputs, *preset)).collect()
}

/// Generates a single preset's file, applying the redirect rule.
pub fn generate_one(inputs: &DashboardInputs, preset: DashboardPreset) -> GeneratedFile {
    let project_days = inputs.project_start.map(|start| (inputs.now.date_naive() - start).num_days() + 1);

    if let DashboardPreset::Days(requested) = preset {
        if let Some(project_days) = project_days {
            if i64::from(requested) > project_days {
                return GeneratedFile {
                    filename: preset.filename(),
                    contents: redirect_html(requested, project_days),
                };
            }
        }
    }

    let window_start = match preset {
        DashboardPreset::Days(n) => {
            let candidate = inputs.now - chrono::Duration::days(i64::from(n) - 1);
            match inputs.project_start {
                Some(start) => {
                    let start_dt = inputs.now.timezone().from_local_datetime(&start.and_hms_opt(0, 0, 0).unwrap()).single().unwrap();
                    candidate.max(start_dt)
                }
                None => candidate,
            }
        }
        DashboardPreset::All => match inputs.project_start {
            Some(start) => inputs
                .now
                .timezone()
                .from_local_datetime(&start.and_hms_opt(0, 0, 0).unwrap())
                .single()
                .unwrap(),
            None => inputs.commits.iter().map(|c| c.timestamp).min().unwrap_or(inputs.now),
        },
    };

    let window = TimeWindow::new(window_start, inputs.now);
    let data = collect(inputs.commits, inputs.per_repo, window, inputs.thresholds, inputs.working_hours);

    GeneratedFile {
        filename: preset.filename(),
        contents: render_dashboard_html(inputs, preset, &window, &data),
    }
}

fn redirect_html(requested_days: u32, project_days: i64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta http-equiv="refresh" content="0; url=index-all.html">
<title>Redirecting...</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif; background: #f6f8fa; display: flex; align-items: center; justify-content: center; min-height: 100vh; margin: 0; }}
.message {{ background: white; padding: 2.5rem; border-radius: 12px; text-align: center; box-shadow: 0 1px 3px rgba(0,0,0,0.12); }}
</style>
</head>
<body>
<div class="message">
<h2>Redirecting...</h2>
<p>This project has only {project_days} days of history, fewer than the requested {requested_days} days.</p>
<p>Continuing to <a href="index-all.html">the all-time dashboard</a>.</p>
</div>
</body>
</html>
"#
    )
}

#[derive(Debug, Default)]
struct DashboardData {
    dates: Vec<String>,
    commits_by_date: BTreeMap<String, u32>,
    added_by_date: BTreeMap<String, u64>,
    deleted_by_date: BTreeMap<String, u64>,
    health_by_date: BTreeMap<String, f64>,
    authors: BTreeMap<String, (u32, u64, u64)>,
    repos: BTreeMap<String, u32>,
    hour_distribution: [u32; 24],
    total_commits: usize,
}

fn day_key(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

fn collect(
    commits: &[Commit],
    per_repo: &[(String, Vec<Commit>)],
    window: TimeWindow,
    thresholds: &Thresholds,
    working_hours: &WorkingHours,
) -> DashboardData {
    let mut data = DashboardData::default();

    let mut cursor = window.start.date_naive();
    let end_date = window.end.date_naive();
    while cursor < end_date {
        data.dates.push(cursor.format("%Y-%m-%d").to_string());
        data.commits_by_date.insert(cursor.format("%Y-%m-%d").to_string(), 0);
        data.added_by_date.insert(cursor.format("%Y-%m-%d").to_string(), 0);
        data.deleted_by_date.insert(cursor.format("%Y-%m-%d").to_string(), 0);
        cursor += chrono::Duration::days(1);
    }

    let window_commits: Vec<&Commit> = commits.iter().filter(|c| window.contains(&c.timestamp)).collect();
    data.total_commits = window_commits.len();

    for commit in &window_commits {
        let key = day_key(&commit.timestamp);
        *data.commits_by_date.entry(key.clone()).or_insert(0) += 1;
        *data.added_by_date.entry(key.clone()).or_insert(0) += u64::from(commit.lines_added());
        *data.deleted_by_date.entry(key).or_insert(0) += u64::from(commit.lines_deleted());

        let author = data.authors.entry(commit.author_name.clone()).or_insert((0, 0, 0));
        author.0 += 1;
        author.1 += u64::from(commit.lines_added());
        author.2 += u64::from(commit.lines_deleted());

        data.hour_distribution[commit.timestamp.hour() as usize] += 1;
    }

    for (repo_name, repo_commits) in per_repo {
        let count = repo_commits.iter().filter(|c| window.contains(&c.timestamp)).count() as u32;
        if count > 0 {
            *data.repos.entry(repo_name.clone()).or_insert(0) += count;
        }
    }

    for date in &data.dates {
        let day_start = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let day_window = TimeWindow::for_day(day_start, window.start.timezone());
        let day_commits: Vec<Commit> = commits.iter().filter(|c| day_window.contains(&c.timestamp)).cloned().collect();
        data.health_by_date.insert(date.clone(), day_health_score(&day_commits, &window, thresholds, working_hours));
    }

    data
}

/// A per-day health score reusing the same `HealthScoreCalculator` as the
/// reporters, with churn/rework computed from the preset's own trailing
/// window (not a fresh per-day lookback) to keep the dashboard's O(days)
/// cost bounded; `high_risk_file_count` is omitted because hotspot scoring
/// needs a single repository's `RepoType` and the dashboard spans every
/// configured repository at once.
fn day_health_score(
    day_commits: &[Commit],
    trailing_window: &TimeWindow,
    thresholds: &Thresholds,
    working_hours: &WorkingHours,
) -> f64 {
    let large_commit_count = day_commits.iter().filter(|c| c.total_lines_changed() > thresholds.large_commit).count() as u32;

    let mut late_night_count = 0;
    let mut weekend_count = 0;
    let mut messages = Vec::new();
    for commit in day_commits {
        let classes = work_time::classify(&commit.timestamp, working_hours);
        if classes.late_night {
            late_night_count += 1;
        }
        if classes.weekend {
            weekend_count += 1;
        }
        messages.push(commit.message.as_str());
    }
    let quality = message_quality::message_quality(&messages);

    let churn_result = churn::analyze(day_commits, thresholds.churn_count);
    let modified: std::collections::HashSet<&str> = day_commits.iter().flat_map(|c| c.files.iter().map(|f| f.path.as_str())).collect();
    let churn_rate = if modified.is_empty() { 0.0 } else { (churn_result.files.len() as f64 / modified.len() as f64) * 100.0 };

    let rework_result = rework::analyze(
        day_commits,
        i64::from(thresholds.rework_add_days).max(trailing_window.duration_days()),
        i64::from(thresholds.rework_delete_days),
    );

    let metrics = HealthMetrics {
        large_commit_count,
        churn_rate,
        rework_rate: rework_result.rate,
        message_quality: quality,
        late_night_count,
        weekend_count,
        high_risk_file_count: 0,
    };
    let score = health_score::calculate(&metrics, thresholds);
    f64::from(score.score)
}

#[derive(Serialize)]
struct ChartSeries<T: Serialize> {
    dates: Vec<String>,
    values: Vec<T>,
}

fn render_dashboard_html(inputs: &DashboardInputs, preset: DashboardPreset, window: &TimeWindow, data: &DashboardData) -> String {
    let commits_series: Vec<u32> = data.dates.iter().map(|d| *data.commits_by_date.get(d).unwrap_or(&0)).collect();
    let added_series: Vec<u64> = data.dates.iter().map(|d| *data.added_by_date.get(d).unwrap_or(&0)).collect();
    let deleted_series: Vec<u64> = data.dates.iter().map(|d| *data.deleted_by_date.get(d).unwrap_or(&0)).collect();
    let health_series: Vec<f64> = data.dates.iter().map(|d| *data.health_by_date.get(d).unwrap_or(&0.0)).collect();

    let mut top_authors: Vec<(&String, &(u32, u64, u64))> = data.authors.iter().collect();
    top_authors.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then_with(|| a.0.cmp(b.0)));
    top_authors.truncate(10);
    let authors_by_commits_names: Vec<&str> = top_authors.iter().map(|(n, _)| n.as_str()).collect();
    let authors_by_commits_values: Vec<u32> = top_authors.iter().map(|(_, s)| s.0).collect();

    let mut top_net: Vec<(&String, &(u32, u64, u64))> = data.authors.iter().collect();
    top_net.sort_by(|a, b| {
        let net_a = a.1 .1 as i64 - a.1 .2 as i64;
        let net_b = b.1 .1 as i64 - b.1 .2 as i64;
        net_b.cmp(&net_a).then_with(|| a.0.cmp(b.0))
    });
    top_net.truncate(10);
    let authors_by_net_names: Vec<&str> = top_net.iter().map(|(n, _)| n.as_str()).collect();
    let authors_by_net_values: Vec<i64> = top_net.iter().map(|(_, s)| s.1 as i64 - s.2 as i64).collect();

    let repo_names: Vec<&str> = data.repos.keys().map(String::as_str).collect();
    let repo_values: Vec<u32> = data.repos.values().copied().collect();

    let average_health = if health_series.is_empty() {
        0.0
    } else {
        health_series.iter().sum::<f64>() / health_series.len() as f64
    };
    let net_lines: i64 = added_series.iter().sum::<u64>() as i64 - deleted_series.iter().sum::<u64>() as i64;

    let select_options = render_range_select(inputs, preset);
    let quick_links = render_quick_links(inputs);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Code Health Dashboard</title>
<script src="https://cdn.jsdelivr.net/npm/echarts@5.4.3/dist/echarts.min.js"></script>
<style>
* {{ box-sizing: border-box; }}
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif; background: #f6f8fa; margin: 0; padding: 2rem; }}
.container {{ max-width: 1400px; margin: 0 auto; }}
.header, .card {{ background: white; border-radius: 12px; padding: 1.6rem; margin-bottom: 1.2rem; box-shadow: 0 1px 3px rgba(0,0,0,0.12); }}
.stats-grid {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem; margin-bottom: 1.2rem; }}
.stat-card {{ background: white; border-radius: 12px; padding: 1.2rem; box-shadow: 0 1px 3px rgba(0,0,0,0.12); text-align: center; }}
.stat-card .value {{ font-size: 1.8rem; font-weight: bold; }}
.charts-grid {{ display: grid; grid-template-columns: repeat(2, 1fr); gap: 1.2rem; }}
.chart-container {{ width: 100%; height: 320px; }}
select {{ padding: 0.5rem; border-radius: 6px; border: 1px solid #d0d7de; }}
@media (max-width: 768px) {{ .charts-grid {{ grid-template-columns: 1fr; }} }}
</style>
</head>
<body>
<div class="container">
<div class="header">
<h1>Code Health Dashboard</h1>
<p>{label} &middot; {start} to {end}</p>
<select onchange="window.location.href=this.value;">
{select_options}
</select>
<p>{quick_links}</p>
</div>
<div class="stats-grid">
<div class="stat-card"><div class="value">{total_commits}</div><div>Total commits</div></div>
<div class="stat-card"><div class="value">{active_authors}</div><div>Active authors</div></div>
<div class="stat-card"><div class="value">{net_lines:+}</div><div>Net lines</div></div>
<div class="stat-card"><div class="value">{average_health:.0}</div><div>Avg health score</div></div>
</div>
<div class="charts-grid">
<div class="card"><h2>Health score trend</h2><div id="healthChart" class="chart-container"></div></div>
<div class="card"><h2>Commits per day</h2><div id="commitsChart" class="chart-container"></div></div>
<div class="card"><h2>Lines added/deleted</h2><div id="linesChart" class="chart-container"></div></div>
<div class="card"><h2>Top 10 authors by commits</h2><div id="authorCommitsChart" class="chart-container"></div></div>
<div class="card"><h2>Top 10 authors by net lines</h2><div id="authorNetChart" class="chart-container"></div></div>
<div class="card"><h2>Repositories</h2><div id="reposChart" class="chart-container"></div></div>
<div class="card"><h2>Hour of day</h2><div id="hourChart" class="chart-container"></div></div>
</div>
</div>
<script>
const dates = {dates_json};
const health = {health_json};
const commits = {commits_json};
const added = {added_json};
const deleted = {deleted_json};
const authorCommitNames = {author_commit_names_json};
const authorCommitValues = {author_commit_values_json};
const authorNetNames = {author_net_names_json};
const authorNetValues = {author_net_values_json};
const repoNames = {repo_names_json};
const repoValues = {repo_values_json};
const hours = {hours_json};
const hourCounts = {hour_counts_json};

echarts.init(document.getElementById('healthChart')).setOption({{
  tooltip: {{ trigger: 'axis' }},
  xAxis: {{ type: 'category', data: dates }},
  yAxis: {{ type: 'value', min: 0, max: 100 }},
  series: [{{ type: 'line', data: health, smooth: true }}]
}});
echarts.init(document.getElementById('commitsChart')).setOption({{
  tooltip: {{ trigger: 'axis' }},
  xAxis: {{ type: 'category', data: dates }},
  yAxis: {{ type: 'value' }},
  series: [{{ type: 'bar', data: commits }}]
}});
echarts.init(document.getElementById('linesChart')).setOption({{
  tooltip: {{ trigger: 'axis' }},
  legend: {{ data: ['Added', 'Deleted'] }},
  xAxis: {{ type: 'category', data: dates }},
  yAxis: {{ type: 'value' }},
  series: [
    {{ name: 'Added', type: 'line', areaStyle: {{}}, data: added }},
    {{ name: 'Deleted', type: 'line', areaStyle: {{}}, data: deleted }}
  ]
}});
echarts.init(document.getElementById('authorCommitsChart')).setOption({{
  tooltip: {{ trigger: 'axis' }},
  xAxis: {{ type: 'value' }},
  yAxis: {{ type: 'category', data: authorCommitNames.slice().reverse() }},
  series: [{{ type: 'bar', data: authorCommitValues.slice().reverse() }}]
}});
echarts.init(document.getElementById('authorNetChart')).setOption({{
  tooltip: {{ trigger: 'axis' }},
  xAxis: {{ type: 'value' }},
  yAxis: {{ type: 'category', data: authorNetNames.slice().reverse() }},
  series: [{{ type: 'bar', data: authorNetValues.slice().reverse() }}]
}});
echarts.init(document.getElementById('reposChart')).setOption({{
  tooltip: {{ trigger: 'item' }},
  series: [{{ type: 'pie', radius: '60%', data: repoNames.map((n, i) => ({{ name: n, value: repoValues[i] }})) }}]
}});
echarts.init(document.getElementById('hourChart')).setOption({{
  tooltip: {{ trigger: 'axis' }},
  xAxis: {{ type: 'category', data: hours }},
  yAxis: {{ type: 'value' }},
  series: [{{ type: 'bar', data: hourCounts }}]
}});
</script>
</body>
</html>
"#,
        label = preset.label(),
        start = window.start.format("%Y-%m-%d"),
        end = window.end.format("%Y-%m-%d"),
        total_commits = data.total_commits,
        active_authors = data.authors.len(),
        net_lines = net_lines,
        average_health = average_health,
        dates_json = serde_json::to_string(&data.dates).unwrap(),
        health_json = serde_json::to_string(&health_series).unwrap(),
        commits_json = serde_json::to_string(&commits_series).unwrap(),
        added_json = serde_json::to_string(&added_series).unwrap(),
        deleted_json = serde_json::to_string(&deleted_series).unwrap(),
        author_commit_names_json = serde_json::to_string(&authors_by_commits_names).unwrap(),
        author_commit_values_json = serde_json::to_string(&authors_by_commits_values).unwrap(),
        author_net_names_json = serde_json::to_string(&authors_by_net_names).unwrap(),
        author_net_values_json = serde_json::to_string(&authors_by_net_values).unwrap(),
        repo_names_json = serde_json::to_string(&repo_names).unwrap(),
        repo_values_json = serde_json::to_string(&repo_values).unwrap(),
        hours_json = serde_json::to_string(&(0..24).collect::<Vec<u32>>()).unwrap(),
        hour_counts_json = serde_json::to_string(&data.hour_distribution).unwrap(),
    )
}

/// Builds the time-range `<option>` list, reflecting only the presets the
/// project actually supports (spec §4.4.c).
fn render_range_select(inputs: &DashboardInputs, current: DashboardPreset) -> String {
    let project_days = inputs.project_start.map(|start| (inputs.now.date_naive() - start).num_days() + 1);

    DashboardPreset::ALL
        .iter()
        .map(|preset| {
            let filename = preset.filename();
            let selected = if *preset == current { " selected" } else { "" };
            let label = match (preset, project_days) {
                (DashboardPreset::Days(n), Some(pd)) if i64::from(*n) > pd => {
                    format!("Last {n} days (only {pd} available)")
                }
                _ => preset.label(),
            };
            format!(r#"<option value="{filename}"{selected}>{label}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_quick_links(inputs: &DashboardInputs) -> String {
    let daily = inputs
        .latest_daily
        .as_ref()
        .map(|d| format!(r#"<a href="../reports/daily/{d}.html">Latest daily ({d})</a>"#))
        .unwrap_or_else(|| "No daily reports yet".to_string());
    let weekly = inputs
        .latest_weekly
        .as_ref()
        .map(|w| format!(r#"<a href="../reports/weekly/{w}.html">Latest weekly ({w})</a>"#))
        .unwrap_or_else(|| "No weekly reports yet".to_string());
    let monthly = inputs
        .latest_monthly
        .as_ref()
        .map(|m| format!(r#"<a href="../reports/monthly/{m}.html">Latest monthly ({m})</a>"#))
        .unwrap_or_else(|| "No monthly reports yet".to_string());
    format!("{daily} | {weekly} | {monthly}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use commit_model::FileChange;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn commit(hash: &str, day: u32, added: u32) -> Commit {
        Commit {
            hash: hash.to_string(),
            author_name: "A".to_string(),
            author_email: "a@example.com".to_string(),
            timestamp: tz().with_ymd_and_hms(2025, 1, day, 10, 0, 0).unwrap(),
            message: "feat: x".to_string(),
            files: vec![FileChange::new("f.rs", added, 0)],
        }
    }

    fn inputs<'a>(
        commits: &'a [Commit],
        per_repo: &'a [(String, Vec<Commit>)],
        project_start: Option<NaiveDate>,
        now: DateTime<FixedOffset>,
    ) -> DashboardInputs<'a> {
        DashboardInputs {
            commits,
            per_repo,
            thresholds: &Thresholds::default(),
            working_hours: &WorkingHours::default(),
            project_start,
            now,
            latest_daily: None,
            latest_weekly: None,
            latest_monthly: None,
        }
    }

    #[test]
    fn b3_preset_exceeding_history_redirects_to_all() {
        let commits = vec![commit("a", 10, 100)];
        let per_repo = vec![("repo-a".to_string(), commits.clone())];
        let now = tz().with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let inputs = inputs(&commits, &per_repo, Some(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()), now);

        let file = generate_one(&inputs, DashboardPreset::Days(90));
        assert_eq!(file.filename, "index-90d.html");
        assert!(file.contents.contains(r#"url=index-all.html"#));
        assert!(!file.contents.contains("echarts.init"));
    }

    #[test]
    fn e6_thirty_day_preset_redirects_when_history_is_fifteen_days() {
        let commits = vec![commit("a", 10, 100)];
        let per_repo = vec![("repo-a".to_string(), commits.clone())];
        let now = tz().with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let inputs = inputs(&commits, &per_repo, Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()), now);

        let file = generate_one(&inputs, DashboardPreset::Days(30));
        assert!(file.contents.contains("Redirecting"));
    }

    #[test]
    fn preset_within_history_renders_full_dashboard() {
        let commits = vec![commit("a", 10, 100), commit("b", 12, 50)];
        let per_repo = vec![("repo-a".to_string(), commits.clone())];
        let now = tz().with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let inputs = inputs(&commits, &per_repo, Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), now);

        let file = generate_one(&inputs, DashboardPreset::Days(7));
        assert_eq!(file.filename, "index.html");
        assert!(file.contents.contains("echarts.init"));
    }

    #[test]
    fn repos_pie_reflects_per_repository_breakdown() {
        let repo_a_commits = vec![commit("a1", 10, 100), commit("a2", 11, 50)];
        let repo_b_commits = vec![commit("b1", 12, 20)];
        let mut commits = repo_a_commits.clone();
        commits.extend(repo_b_commits.clone());
        let per_repo = vec![("repo-a".to_string(), repo_a_commits), ("repo-b".to_string(), repo_b_commits)];
        let now = tz().with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let window = TimeWindow::new(tz().with_ymd_and_hms(2025, 1, 9, 0, 0, 0).unwrap(), now);

        let data = collect(&commits, &per_repo, window, &Thresholds::default(), &WorkingHours::default());
        assert_eq!(data.repos.get("repo-a"), Some(&2));
        assert_eq!(data.repos.get("repo-b"), Some(&1));
    }

    #[test]
    fn p4_health_bounds_hold_for_every_day_in_series() {
        let commits = vec![commit("a", 10, 5000), commit("b", 10, 50)];
        let per_repo = vec![("repo-a".to_string(), commits.clone())];
        let now = tz().with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let window = TimeWindow::new(tz().with_ymd_and_hms(2025, 1, 9, 0, 0, 0).unwrap(), now);
        let data = collect(&commits, &per_repo, window, &Thresholds::default(), &WorkingHours::default());
        for (_date, score) in &data.health_by_date {
            assert!(*score >= 0.0 && *score <= 100.0);
        }
    }
}
