use serde_json::json;

use crate::config::TelegramCredentials;
use crate::error::NotifyError;

use super::{Notification, Notifier, post_json};

const API_BASE: &str = "https://api.telegram.org";

/// Bot API `sendMessage`
pub(crate) struct TelegramNotifier {
    agent: ureq::Agent,
    credentials: TelegramCredentials,
}

impl TelegramNotifier {
    pub(crate) fn new(agent: ureq::Agent, credentials: TelegramCredentials) -> Self {
        Self { agent, credentials }
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/bot{}/sendMessage", self.credentials.bot_token)
    }

    fn payload(&self, notification: &Notification<'_>) -> serde_json::Value {
        json!({
            "chat_id": self.credentials.chat_id,
            "text": notification.text(),
            "disable_web_page_preview": false,
        })
    }
}

impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn deliver(&self, notification: &Notification<'_>) -> Result<(), NotifyError> {
        post_json(
            &self.agent,
            self.name(),
            &self.endpoint(),
            &self.payload(notification),
        )
    }
}
