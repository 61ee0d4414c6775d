//! Implementations of the seven CLI verbs (spec.md §6).
//!
//! Each verb wires together `config` → `providers` → `reporters` →
//! `rendering`/`notifier`, writing Markdown/HTML under the fixed
//! `reports/`/`dashboard/` layout from spec.md §6.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone};
use commit_model::TimeWindow;
use config::{Config, RepositoryConfig};
use notifier::Notifier as _;
use providers::GitProvider;
use reporters::ReportContext;
use tracing::{info, instrument, warn};

use crate::error::{CliResult, CodeHealthError};

pub struct App {
    pub config: Config,
    pub provider: Arc<GitProvider>,
    pub ctx: ReportContext,
    pub tz: FixedOffset,
    pub reports_dir: PathBuf,
    pub dashboard_dir: PathBuf,
}

impl App {
    pub fn repo_configs(&self) -> &[RepositoryConfig] {
        &self.config.repositories
    }
}

fn write_file(path: &Path, contents: &str) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| CodeHealthError::Filesystem {
            path: parent.display().to_string(),
            source,
        })?;
    }
    std::fs::write(path, contents).map_err(|source| CodeHealthError::Filesystem {
        path: path.display().to_string(),
        source,
    })
}

fn read_file(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|source| CodeHealthError::Filesystem {
        path: path.display().to_string(),
        source,
    })
}

pub fn parse_date(s: &str) -> CliResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| CodeHealthError::InvalidArgument(format!("expected YYYY-MM-DD, got {s}")))
}

/// Parses an ISO week identifier of the form `YYYY-Www`, per spec.md §6's
/// filesystem layout (`weekly/YYYY-Www.{md,html}`).
pub fn parse_iso_week(s: &str) -> CliResult<(i32, u32)> {
    let (year_str, week_str) = s
        .split_once("-W")
        .ok_or_else(|| CodeHealthError::InvalidArgument(format!("expected YYYY-Www, got {s}")))?;
    let year: i32 = year_str
        .parse()
        .map_err(|_| CodeHealthError::InvalidArgument(format!("expected YYYY-Www, got {s}")))?;
    let week: u32 = week_str
        .parse()
        .map_err(|_| CodeHealthError::InvalidArgument(format!("expected YYYY-Www, got {s}")))?;
    Ok((year, week))
}

pub fn parse_month(s: &str) -> CliResult<(i32, u32)> {
    let (year_str, month_str) = s
        .split_once('-')
        .ok_or_else(|| CodeHealthError::InvalidArgument(format!("expected YYYY-MM, got {s}")))?;
    let year: i32 = year_str
        .parse()
        .map_err(|_| CodeHealthError::InvalidArgument(format!("expected YYYY-MM, got {s}")))?;
    let month: u32 = month_str
        .parse()
        .map_err(|_| CodeHealthError::InvalidArgument(format!("expected YYYY-MM, got {s}")))?;
    Ok((year, month))
}

fn iso_week_stem(year: i32, week: u32) -> String {
    format!("{year}-W{week:02}")
}

fn month_stem(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

#[instrument(skip(app))]
pub async fn run_daily(app: &App, date: Option<String>) -> CliResult<()> {
    let date = date.map(|d| parse_date(&d)).transpose()?.unwrap_or_else(|| app.tz_now().date_naive());
    let markdown =
        reporters::generate_daily(&app.ctx, Arc::clone(&app.provider), app.repo_configs(), date, app.tz).await?;
    write_report(app, "daily", &date.to_string(), &markdown, &format!("Daily Report: {date}"))?;
    info!(%date, "daily report written");
    Ok(())
}

#[instrument(skip(app))]
pub async fn run_weekly(app: &App, week: Option<String>) -> CliResult<()> {
    let (year, week) = match week {
        Some(w) => parse_iso_week(&w)?,
        None => {
            let today = app.tz_now().date_naive();
            (today.iso_week().year(), today.iso_week().week())
        }
    };
    let markdown =
        reporters::generate_weekly(&app.ctx, Arc::clone(&app.provider), app.repo_configs(), year, week, app.tz)
            .await?;
    let stem = iso_week_stem(year, week);
    write_report(app, "weekly", &stem, &markdown, &format!("Weekly Report: {stem}"))?;
    info!(%stem, "weekly report written");
    Ok(())
}

#[instrument(skip(app))]
pub async fn run_monthly(app: &App, month: Option<String>) -> CliResult<()> {
    let (year, month) = match month {
        Some(m) => parse_month(&m)?,
        None => {
            let today = app.tz_now().date_naive();
            (today.year(), today.month())
        }
    };
    let markdown =
        reporters::generate_monthly(&app.ctx, Arc::clone(&app.provider), app.repo_configs(), year, month, app.tz)
            .await?;
    let stem = month_stem(year, month);
    write_report(app, "monthly", &stem, &markdown, &format!("Monthly Report: {stem}"))?;
    info!(%stem, "monthly report written");
    Ok(())
}

fn write_report(app: &App, period: &str, stem: &str, markdown: &str, title: &str) -> CliResult<()> {
    let dir = app.reports_dir.join(period);
    write_file(&dir.join(format!("{stem}.md")), markdown)?;
    let html = rendering::render_report(title, markdown);
    write_file(&dir.join(format!("{stem}.html")), &html)?;
    Ok(())
}

#[instrument(skip(app))]
pub async fn run_html(app: &App) -> CliResult<()> {
    let mut count = 0u32;
    for period in ["daily", "weekly", "monthly"] {
        let dir = app.reports_dir.join(period);
        if !dir.is_dir() {
            continue;
        }
        let entries = std::fs::read_dir(&dir).map_err(|source| CodeHealthError::Filesystem {
            path: dir.display().to_string(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| CodeHealthError::Filesystem {
                path: dir.display().to_string(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string();
            let markdown = read_file(&path)?;
            let title = format!("{} Report: {stem}", capitalize(period));
            let html = rendering::render_report(&title, &markdown);
            write_file(&path.with_extension("html"), &html)?;
            count += 1;
        }
    }

    let today = app.tz_now().date_naive();
    let index = rendering::generate_index(&app.reports_dir, &app.config.project.name, today)?;
    write_file(&app.reports_dir.join("index.html"), &index)?;
    info!(converted = count, "html verb regenerated reports and index");
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Earliest date among the `daily/*.md` stems on disk, per spec.md §4.4.c
/// ("measured from the earliest dated daily report file present").
fn earliest_daily_report_date(reports_dir: &Path) -> Option<NaiveDate> {
    let dir = reports_dir.join("daily");
    let entries = std::fs::read_dir(&dir).ok()?;
    entries
        .filter_map(Result::ok)
        .filter_map(|e| e.path().file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .filter_map(|stem| NaiveDate::parse_from_str(&stem, "%Y-%m-%d").ok())
        .min()
}

fn latest_stem(reports_dir: &Path, period: &str) -> Option<String> {
    let dir = reports_dir.join(period);
    let entries = std::fs::read_dir(&dir).ok()?;
    entries
        .filter_map(Result::ok)
        .filter_map(|e| {
            let path = e.path();
            (path.extension().and_then(|x| x.to_str()) == Some("md"))
                .then(|| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .flatten()
        })
        .max()
}

#[instrument(skip(app))]
pub async fn run_dashboard(app: &App, days: Option<u32>) -> CliResult<()> {
    let now = app.tz_now();
    let project_start = earliest_daily_report_date(&app.reports_dir);
    let fetch_window = match project_start {
        Some(start) => TimeWindow::new(
            app.tz.from_local_datetime(&start.and_hms_opt(0, 0, 0).unwrap()).single().unwrap(),
            now,
        ),
        None => TimeWindow::trailing_days(90, now),
    };

    let repos = reporters::resolve_repositories(&app.provider, app.repo_configs()).await?;
    if repos.is_empty() {
        return Err(CodeHealthError::InvalidArgument("no repositories configured or reachable".to_string()));
    }
    let fetch = reporters::fetch_all(Arc::clone(&app.provider), repos, fetch_window, app.ctx.concurrency, app.ctx.timeout).await;
    for warning in &fetch.warnings {
        warn!(%warning, "dashboard fetch warning");
    }
    let per_repo: Vec<(String, Vec<commit_model::Commit>)> =
        fetch.per_repo.iter().map(|(repo, commits)| (repo.display_name.clone(), commits.clone())).collect();
    let mut commits: Vec<commit_model::Commit> = fetch.per_repo.into_iter().flat_map(|(_, c)| c).collect();
    commit_model::sort_commits_desc(&mut commits);

    let inputs = rendering::DashboardInputs {
        commits: &commits,
        per_repo: &per_repo,
        thresholds: &app.ctx.thresholds,
        working_hours: &app.ctx.working_hours,
        project_start,
        now,
        latest_daily: latest_stem(&app.reports_dir, "daily"),
        latest_weekly: latest_stem(&app.reports_dir, "weekly"),
        latest_monthly: latest_stem(&app.reports_dir, "monthly"),
    };

    let files = match days {
        Some(n) => vec![rendering::generate_dashboard_one(&inputs, rendering::DashboardPreset::Days(n))],
        None => rendering::generate_dashboard_all(&inputs),
    };
    for file in &files {
        write_file(&app.dashboard_dir.join(&file.filename), &file.contents)?;
    }
    info!(generated = files.len(), "dashboard verb complete");
    Ok(())
}

#[instrument(skip(app, report_file))]
pub async fn run_notify(app: &App, period: &str, report_file: Option<String>) -> CliResult<()> {
    let path = match report_file {
        Some(p) => PathBuf::from(p),
        None => {
            let stem = latest_stem(&app.reports_dir, period).ok_or_else(|| CodeHealthError::ReportFileNotFound {
                period: period.to_string(),
            })?;
            app.reports_dir.join(period).join(format!("{stem}.md"))
        }
    };
    let markdown = read_file(&path)?;
    let metrics = notifier::extract_key_metrics(&markdown);

    let title = format!("Code Health {} Report", capitalize(period));
    let body = format_notification_body(period, &metrics, &markdown);

    let webhook_url = std::env::var("NOTIFIER_WEBHOOK_URL").ok();
    let mentions: Vec<String> = std::env::var("NOTIFIER_AT_MENTIONS")
        .ok()
        .map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect())
        .unwrap_or_default();

    match webhook_url {
        Some(url) => {
            let token = std::env::var("NOTIFIER_TOKEN").ok();
            let sink = notifier::WebhookNotifier::new(url, token);
            sink.send(&title, &body, &mentions).await?;
        }
        None => {
            let sink = notifier::NoopNotifier;
            sink.send(&title, &body, &mentions).await?;
        }
    }
    Ok(())
}

fn format_notification_body(period: &str, metrics: &notifier::KeyMetrics, report_title_line: &str) -> String {
    let heading = report_title_line.lines().next().unwrap_or_default().trim_start_matches('#').trim();
    let mut out = format!("{heading}\n\n");
    if let Some(commits) = metrics.commits {
        out.push_str(&format!("Commits: {commits}\n"));
    }
    if let Some(score) = metrics.health_score {
        let severity = metrics.severity.as_deref().unwrap_or("unknown");
        out.push_str(&format!("Health score: {score}/100 ({severity})\n"));
    }
    if let Some(top) = &metrics.top_contributor {
        out.push_str(&format!("Top contributor: {} ({} commits)\n", top.name, top.commits));
    }
    if let (Some(late_night), Some(weekend)) = (metrics.late_night_count, metrics.weekend_count) {
        out.push_str(&format!("Abnormal-time commits: {late_night} late-night, {weekend} weekend\n"));
    }
    if out.trim() == heading {
        out.push_str(&format!("(no {period} metrics could be extracted from the report)\n"));
    }
    out
}

/// Fetches the full commit history across configured repositories to find
/// the earliest observed commit timestamp, per spec.md §6's `backfill`
/// verb ("iterate dates/weeks from the earliest observed commit to today").
async fn earliest_observed_commit_date(app: &App) -> CliResult<Option<NaiveDate>> {
    let repos = reporters::resolve_repositories(&app.provider, app.repo_configs()).await?;
    if repos.is_empty() {
        return Ok(None);
    }
    let epoch = app
        .tz
        .from_local_datetime(&NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap())
        .single()
        .unwrap();
    let window = TimeWindow::new(epoch, app.tz_now());
    let fetch = reporters::fetch_all(Arc::clone(&app.provider), repos, window, app.ctx.concurrency, app.ctx.timeout).await;
    for warning in &fetch.warnings {
        warn!(%warning, "backfill history scan warning");
    }
    Ok(fetch
        .per_repo
        .iter()
        .flat_map(|(_, commits)| commits.iter().map(|c| c.timestamp.date_naive()))
        .min())
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip(app))]
pub async fn run_backfill(
    app: &App,
    from: Option<String>,
    daily_only: bool,
    weekly_only: bool,
    dry_run: bool,
    yes: bool,
) -> CliResult<()> {
    let today = app.tz_now().date_naive();
    let start = match from {
        Some(f) => parse_date(&f)?,
        None => earliest_observed_commit_date(app)
            .await?
            .unwrap_or_else(|| today - chrono::Duration::days(29)),
    };
    if start > today {
        return Err(CodeHealthError::InvalidArgument(format!("--from {start} is after today ({today})")));
    }

    let mut missing_days: Vec<NaiveDate> = Vec::new();
    if !weekly_only {
        let mut d = start;
        while d <= today {
            if !app.reports_dir.join("daily").join(format!("{d}.md")).is_file() {
                missing_days.push(d);
            }
            d += chrono::Duration::days(1);
        }
    }

    let mut missing_weeks: Vec<(i32, u32)> = Vec::new();
    if !daily_only {
        let mut seen = std::collections::HashSet::new();
        let mut d = start;
        while d <= today {
            let key = (d.iso_week().year(), d.iso_week().week());
            if seen.insert(key) {
                let stem = iso_week_stem(key.0, key.1);
                if !app.reports_dir.join("weekly").join(format!("{stem}.md")).is_file() {
                    missing_weeks.push(key);
                }
            }
            d += chrono::Duration::days(1);
        }
    }

    let total = missing_days.len() + missing_weeks.len();
    info!(missing_days = missing_days.len(), missing_weeks = missing_weeks.len(), "backfill plan computed");

    if total == 0 {
        println!("Nothing to backfill: every day/week from {start} to {today} already has a report.");
        return Ok(());
    }

    println!("Backfill plan ({start} .. {today}): {} daily, {} weekly report(s) missing.", missing_days.len(), missing_weeks.len());
    if dry_run {
        for d in &missing_days {
            println!("  would generate daily/{d}.md");
        }
        for (y, w) in &missing_weeks {
            println!("  would generate weekly/{}.md", iso_week_stem(*y, *w));
        }
        return Ok(());
    }

    if !yes {
        print!("Proceed with {total} report generation run(s)? [y/N] ");
        std::io::stdout().flush().ok();
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map_err(|source| CodeHealthError::Filesystem {
            path: "<stdin>".to_string(),
            source,
        })?;
        if !matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    for d in missing_days {
        if let Err(err) = run_daily(app, Some(d.to_string())).await {
            warn!(%d, error = %err, "backfill: failed to generate daily report, continuing");
        }
    }
    for (y, w) in missing_weeks {
        let week_str = format!("{y}-W{w:02}");
        if let Err(err) = run_weekly(app, Some(week_str)).await {
            warn!(year = y, week = w, error = %err, "backfill: failed to generate weekly report, continuing");
        }
    }
    Ok(())
}

impl App {
    fn tz_now(&self) -> DateTime<FixedOffset> {
        chrono::Utc::now().with_timezone(&self.tz)
    }
}
