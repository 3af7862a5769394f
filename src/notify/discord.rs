use serde_json::json;

use crate::error::NotifyError;

use super::{Notification, Notifier, post_json};

const USERNAME: &str = "dailyshot";

/// Channel webhook
pub(crate) struct DiscordNotifier {
    agent: ureq::Agent,
    webhook_url: String,
}

impl DiscordNotifier {
    pub(crate) fn new(agent: ureq::Agent, webhook_url: String) -> Self {
        Self { agent, webhook_url }
    }

    fn payload(notification: &Notification<'_>) -> serde_json::Value {
        json!({
            "username": USERNAME,
            "content": notification.text(),
        })
    }
}

impl Notifier for DiscordNotifier {
    fn name(&self) -> &'static str {
        "discord"
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
