//! `code-health`: engineering-health metrics and reports from commit
//! history, driven by the seven verbs in `cli::Command`.

mod cli;
mod commands;
mod error;

use std::sync::Arc;

use clap::Parser;
use commands::App;
use reporters::ReportContext;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Fine if absent; config/secrets may come from the real environment instead.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = cli::Cli::parse();

    let config_path = config::default_path();
    let config = config::load(&config_path)?;

    let provider = Arc::new(providers::GitProvider::from_config(&config.git)?);
    let ctx = ReportContext::new(
        config.project.name.clone(),
        config.thresholds.clone(),
        config.working_hours.clone(),
        config.analysis.clone(),
    );
    let tz = *chrono::Local::now().fixed_offset().offset();

    let app = App {
        config,
        provider,
        ctx,
        tz,
        reports_dir: std::path::PathBuf::from("reports"),
        dashboard_dir: std::path::PathBuf::from("dashboard"),
    };

    let result = match cli.command {
        cli::Command::Daily { date } => commands::run_daily(&app, date).await,
        cli::Command::Weekly { week } => commands::run_weekly(&app, week).await,
        cli::Command::Monthly { month } => commands::run_monthly(&app, month).await,
        cli::Command::Notify { period, report_file } => {
            commands::run_notify(&app, period.as_str(), report_file).await
        }
        cli::Command::Html => commands::run_html(&app).await,
        cli::Command::Dashboard { days } => commands::run_dashboard(&app, days).await,
        cli::Command::Backfill { from, daily_only, weekly_only, dry_run, yes } => {
            commands::run_backfill(&app, from, daily_only, weekly_only, dry_run, yes).await
        }
    };

    // All per-call `Arc::clone`s are dropped by the time their owning call
    // returns, so the `App`'s own handle is the sole survivor here; release
    // scoped provider resources (e.g. LocalClone's scratch clone directory)
    // exactly once per run, regardless of outcome.
    let App { provider, .. } = app;
    if let Ok(provider) = Arc::try_unwrap(provider) {
        if let Err(err) = provider.cleanup() {
            tracing::warn!(%err, "provider cleanup failed");
        }
    }

    result?;
    Ok(())
}
