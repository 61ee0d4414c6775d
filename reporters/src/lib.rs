//! Reporter strategies: daily, weekly, monthly.
//!
//! Each reporter resolves a [`commit_model::TimeWindow`], fetches commits for
//! every configured repository through [`providers::GitProvider`], fuses
//! them into cross-repository metrics via [`base::analyze`], and assembles a
//! fixed set of Markdown sections. Shared plumbing lives in `base`/`context`/
//! `fetch`; `daily`/`weekly`/`monthly` each contribute only their section
//! layout.

mod base;
mod context;
mod daily;
mod errors;
mod fetch;
mod format;
mod monthly;
mod weekly;

pub use base::{analyze, gather, Analysis, ChurnSummary, HotspotEntry, ReworkSummary};
pub use context::{resolve_repositories, ReportContext};
pub use daily::generate as generate_daily;
pub use errors::{ReporterError, ReporterResult};
pub use fetch::{fetch_all, FetchOutcome, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
pub use monthly::generate as generate_monthly;
pub use weekly::generate as generate_weekly;
