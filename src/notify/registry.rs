//! Builds the active notifier list from configuration

use crate::config::NotifyConfig;

use super::discord::DiscordNotifier;
use super::ses::SesNotifier;
use super::slack::SlackNotifier;
use super::telegram::TelegramNotifier;
use super::{BoxedNotifier, http_agent};

/// One notifier per configured provider; none when notifications are off.
pub(crate) fn build_notifiers(config: &NotifyConfig) -> Vec<BoxedNotifier> {
    if !config.enabled {
        return Vec::new();
    }

    let agent = http_agent(config.timeout);
    let mut notifiers: Vec<BoxedNotifier> = Vec::new();

    if let Some(credentials) = &config.telegram {
        notifiers.push(Box::new(TelegramNotifier::new(
            agent.clone(),
            credentials.clone(),
        )));
    }
    if let Some(url) = &config.slack_webhook {
        notifiers.push(Box::new(SlackNotifier::new(agent.clone(), url.clone())));
    }
    if let Some(url) = &config.discord_webhook {
        notifiers.push(Box::new(DiscordNotifier::new(agent.clone(), url.clone())));
    }
    if let Some(ses) = &config.ses {
        notifiers.push(Box::new(SesNotifier::new(agent, ses.clone())));
    }

    notifiers
}
