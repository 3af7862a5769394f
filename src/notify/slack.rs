use serde_json::json;

use crate::error::NotifyError;

use super::{Notification, Notifier, post_json};

/// Incoming webhook
pub(crate) struct SlackNotifier {
    agent: ureq::Agent,
    webhook_url: String,
}

impl SlackNotifier {
    pub(crate) fn new(agent: ureq::Agent, webhook_url: String) -> Self {
        Self { agent, webhook_url }
    }

    fn payload(notification: &Notification<'_>) -> serde_json::Value {
        json!({ "text": notification.text() })
    }
}

impl Notifier for SlackNotifier {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn deliver(&self, notification: &Notification<'_>) -> Result<(), NotifyError> {
        post_json(
            &self.agent,
            self.name(),
            &self.webhook_url,
            &Self::payload(notification),
        )
    }
}
