//! Notifier seam: consumed by the `notify` CLI verb, not designed by this
//! specification (spec.md §6). Exposes the `Notifier` trait, one concrete
//! webhook implementation, and `extract_key_metrics` for scraping a
//! rendered report down to the fields a notification payload needs.

mod error;
mod metrics;
mod notifier;

pub use error::{NotifierError, NotifierResult};
pub use metrics::{extract_key_metrics, KeyMetrics, TopContributor};
pub use notifier::{NoopNotifier, Notifier, WebhookNotifier};
