//! Stateless, pure-function metric analyzers over commit sets.
//!
//! Every analyzer here is I/O-free: callers (the `reporters` crate) fetch
//! commits through `providers` first and pass plain `&[Commit]` in.

pub mod churn;
pub mod health_score;
pub mod hotspot;
pub mod message_quality;
pub mod rework;
pub mod work_time;

pub use churn::{ChurnFile, ChurnResult};
pub use hotspot::{HotspotFile, HotspotTag, HotspotThresholds};
pub use rework::ReworkResult;
pub use work_time::WorkTimeClasses;
