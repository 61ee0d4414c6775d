//! CLI surface: the seven verbs from spec.md §6, via `clap` derive macros.
//!
//! Introduced fresh from `vowstar-llm-git`'s CLI idiom: the teacher's own
//! `main.rs` takes no arguments, so this is the one seam with no direct
//! imitation target in the teacher itself.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "code-health", about = "Engineering-health metrics and reports from commit history.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Emit a daily report for one calendar day (default: today).
    Daily {
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,
    },
    /// Emit a weekly report for one ISO week (default: the current week).
    Weekly {
        #[arg(long, value_name = "YYYY-Www")]
        week: Option<String>,
    },
    /// Emit a monthly report for one calendar month (default: this month).
    Monthly {
        #[arg(long, value_name = "YYYY-MM")]
        month: Option<String>,
    },
    /// Read a rendered report and hand its key metrics to the notifier.
    Notify {
        period: NotifyPeriod,
        #[arg(long, value_name = "PATH")]
        report_file: Option<String>,
    },
    /// Convert all existing Markdown reports to HTML and regenerate the index.
    Html,
    /// Generate one dashboard preset, or all of them if `--days` is omitted.
    Dashboard {
        #[arg(long)]
        days: Option<u32>,
    },
    /// Backfill missing daily/weekly reports from the earliest observed commit to today.
    Backfill {
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: Option<String>,
        #[arg(long)]
        daily_only: bool,
        #[arg(long)]
        weekly_only: bool,
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum NotifyPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl NotifyPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            NotifyPeriod::Daily => "daily",
            NotifyPeriod::Weekly => "weekly",
            NotifyPeriod::Monthly => "monthly",
        }
    }
}
