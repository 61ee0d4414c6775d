//! The `Notifier` seam consumed by the `notify` CLI verb.
//!
//! Per spec.md §6, the notifier is "consumed, not designed here": callers
//! depend only on `send(title, markdown_body, at_mentions)`. `WebhookNotifier`
//! is the one concrete channel this crate ships — a generic JSON-webhook
//! sink modeled on `GitProvider`'s bearer-header `reqwest::Client` usage —
//! so the CLI has something real to drive; any richer channel (DingTalk,
//! Feishu, ...) implements the same trait against its own payload shape.

use serde::Serialize;
use tracing::{instrument, warn};

use crate::error::{NotifierError, NotifierResult};

/// A notification channel. Implementations own their own transport and
/// authentication; `send` is fire-and-forget from the caller's point of
/// view — failures are reported, never panicked on.
pub trait Notifier {
    /// Sends one notification. `at_mentions` is a list of opaque handles
    /// the implementation renders in whatever form its channel expects
    /// (`@name`, a user-id array, ...); an empty slice sends no mentions.
    #[allow(async_fn_in_trait)]
    async fn send(&self, title: &str, markdown_body: &str, at_mentions: &[String]) -> NotifierResult<()>;
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    title: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    at_mentions: &'a [String],
}

/// Posts a JSON payload to a configured webhook URL. Bearer token is
/// optional since many internal webhook sinks (DingTalk/Feishu custom
/// robots) authenticate via a secret embedded in the URL itself.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: reqwest::Client,
    webhook_url: String,
    bearer_token: Option<String>,
}

impl WebhookNotifier {
    pub fn new(webhook_url: impl Into<String>, bearer_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
            bearer_token,
        }
    }
}

impl Notifier for WebhookNotifier {
    #[instrument(skip(self, markdown_body), fields(title))]
    async fn send(&self, title: &str, markdown_body: &str, at_mentions: &[String]) -> NotifierResult<()> {
        let payload = WebhookPayload { title, text: markdown_body, at_mentions };
        let mut request = self.http.post(&self.webhook_url).json(&payload);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifierError::Rejected { status, body });
        }
        Ok(())
    }
}

/// A channel that logs the notification and reports success without
/// sending anything, used when no webhook is configured. Keeps the
/// `notify` verb usable in environments without an outbound channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    async fn send(&self, title: &str, markdown_body: &str, at_mentions: &[String]) -> NotifierResult<()> {
        warn!(title, body_len = markdown_body.len(), mentions = at_mentions.len(), "no notifier configured, dropping notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_notifier_always_succeeds() {
        let n = NoopNotifier;
        assert!(n.send("t", "body", &[]).await.is_ok());
    }

    #[tokio::test]
    async fn webhook_notifier_reports_transport_error_for_unreachable_host() {
        let n = WebhookNotifier::new("http://127.0.0.1:1/hook", None);
        let result = n.send("t", "body", &[]).await;
        assert!(result.is_err());
    }
}
