//! Run notifications
//!
//! Each provider implements [`Notifier`] and is only built when its
//! credentials are configured. Delivery is fire-and-forget: failures are
//! logged and never change the outcome of a run.

pub(crate) mod discord;
pub(crate) mod registry;
pub(crate) mod ses;
pub(crate) mod slack;
pub(crate) mod telegram;

use std::time::Duration;

use crate::error::NotifyError;

pub(crate) use registry::build_notifiers;

/// Keeps error excerpts under the smallest provider message limit
const MAX_MESSAGE_CHARS: usize = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunStatus {
    Success,
    Error,
}

impl RunStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Notification<'a> {
    pub(crate) status: RunStatus,
    /// Image URL on success, diagnostic text on error
    pub(crate) message: &'a str,
    pub(crate) prompt: &'a str,
}

impl Notification<'_> {
    /// Plain-text body shared by all providers
    pub(crate) fn text(&self) -> String {
        let headline = match self.status {
            RunStatus::Success => "✅ Daily image generated",
            RunStatus::Error => "❌ Daily image generation failed",
        };
        format!(
            "{headline}\nPrompt: {}\n{}",
            self.prompt,
            truncate_chars(self.message, MAX_MESSAGE_CHARS)
        )
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

/// A delivery target
pub(crate) trait Notifier {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    fn deliver(&self, notification: &Notification<'_>) -> Result<(), NotifyError>;
}

pub(crate) type BoxedNotifier = Box<dyn Notifier>;

pub(crate) fn http_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

pub(crate) fn post_json(
    agent: &ureq::Agent,
    provider: &'static str,
    url: &str,
    payload: &serde_json::Value,
) -> Result<(), NotifyError> {
    agent
        .post(url)
        .send_json(payload)
        .map(|_| ())
        .map_err(|source| NotifyError::Http { provider, source })
}

/// Send to every target. Returns how many deliveries succeeded.
pub(crate) fn dispatch(notifiers: &[BoxedNotifier], notification: &Notification<'_>) -> usize {
    let mut delivered = 0;
    for notifier in notifiers {
        match notifier.deliver(notification) {
            Ok(()) => {
                tracing::info!(
                    "Sent {} notification via {}",
                    notification.status.as_str(),
                    notifier.name()
                );
                delivered += 1;
            }
            Err(e) => tracing::warn!("Notification via {} failed: {e}", notifier.name()),
        }
    }
    delivered
}
