//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::BotConfig;
use crate::slack::SlackClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It is immutable: the bot keeps
/// no per-request state, everything about a request lives in Slack's copy of
/// the messages it sent.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BotConfig,
    slack: SlackClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: BotConfig) -> Self {
        let slack = SlackClient::new(
            config.slack.api_base_url.clone(),
            config.slack.bot_token.clone(),
            config.slack.signing_secret.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner { config, slack }),
        }
    }

    /// Get a reference to the bot configuration.
    #[must_use]
    pub fn config(&self) -> &BotConfig {
        &self.inner.config
    }

    /// Get a reference to the Slack API client.
    #[must_use]
    pub fn slack(&self) -> &SlackClient {
        &self.inner.slack
    }
}
