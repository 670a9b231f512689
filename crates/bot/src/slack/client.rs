//! Slack Web API client.
//!
//! Provides methods for opening modals, sending and updating messages, and
//! verifying webhook signatures.

use approval_bot_core::{ChannelId, MessageTs, TriggerId};
use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use tracing::{debug, error, instrument};

use super::error::SlackError;
use super::types::{
    ApiResponse, Block, OpenView, OpenViewResponse, PostMessage, PostMessageResponse,
    UpdateMessage, UpdateMessageResponse, View,
};

/// Slack Web API base URL.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Maximum age of a signed request before it is treated as a replay.
const MAX_REQUEST_AGE_SECS: u64 = 60 * 5;

/// Slack API client.
#[derive(Clone)]
pub struct SlackClient {
    /// HTTP client.
    client: Client,
    /// Web API base URL, without trailing slash.
    api_base: String,
    /// Bot token for authentication.
    bot_token: SecretString,
    /// Signing secret for verifying webhooks.
    signing_secret: SecretString,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_base", &self.api_base)
            .field("bot_token", &"[REDACTED]")
            .field("signing_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    /// Create a new Slack client.
    #[must_use]
    pub fn new(
        api_base: impl Into<String>,
        bot_token: SecretString,
        signing_secret: SecretString,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token,
            signing_secret,
        }
    }

    /// Open a modal in response to a command or interaction.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or Slack returns an error
    /// (e.g. `expired_trigger_id` when called too late).
    #[instrument(skip(self, view), fields(callback_id = %view.callback_id))]
    pub async fn open_view(
        &self,
        trigger_id: &TriggerId,
        view: View,
    ) -> Result<OpenViewResponse, SlackError> {
        let request = OpenView {
            trigger_id: trigger_id.clone(),
            view,
        };

        let result: OpenViewResponse = self.call("views.open", &request).await?;

        debug!(
            view_id = ?result.view.as_ref().map(|v| v.id.as_str()),
            "Modal opened in Slack"
        );

        Ok(result)
    }

    /// Post a message to a channel (or a user id, for a direct message).
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or Slack returns an error.
    #[instrument(skip(self, blocks, fallback_text), fields(channel = %channel))]
    pub async fn post_message(
        &self,
        channel: &ChannelId,
        blocks: Vec<Block>,
        fallback_text: Option<&str>,
    ) -> Result<PostMessageResponse, SlackError> {
        let message = PostMessage {
            channel: channel.clone(),
            blocks,
            text: fallback_text.map(String::from),
        };

        let result: PostMessageResponse = self.call("chat.postMessage", &message).await?;

        debug!(
            ts = ?result.ts,
            channel = ?result.channel,
            "Message posted to Slack"
        );

        Ok(result)
    }

    /// Post a plain text message (convenience method).
    ///
    /// # Errors
    ///
    /// Returns error if posting fails.
    pub async fn post_text(
        &self,
        channel: &ChannelId,
        text: &str,
    ) -> Result<PostMessageResponse, SlackError> {
        self.post_message(channel, Vec::new(), Some(text)).await
    }

    /// Replace an existing message.
    ///
    /// Passing no blocks leaves only `text`, which strips any buttons.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or Slack returns an error.
    #[instrument(skip(self, blocks, text), fields(channel = %channel, ts = %ts))]
    pub async fn update_message(
        &self,
        channel: &ChannelId,
        ts: &MessageTs,
        blocks: Vec<Block>,
        text: Option<&str>,
    ) -> Result<UpdateMessageResponse, SlackError> {
        let message = UpdateMessage {
            channel: channel.clone(),
            ts: ts.clone(),
            blocks,
            text: text.map(String::from),
        };

        let result: UpdateMessageResponse = self.call("chat.update", &message).await?;

        debug!(ts = %ts, "Message updated in Slack");

        Ok(result)
    }

    /// POST a JSON body to a Web API method and check the `ok` flag.
    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, SlackError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + ApiResponse,
    {
        let response = self
            .client
            .post(format!("{}/{method}", self.api_base))
            .bearer_auth(self.bot_token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| SlackError::Request(e.to_string()))?;

        let result: R = response
            .json()
            .await
            .map_err(|e| SlackError::Response(e.to_string()))?;

        let status = result.status();
        if !status.ok {
            error!(method, error = ?status.error, "Slack API error");
            return Err(SlackError::Api(
                status
                    .error
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        Ok(result)
    }

    /// Verify a Slack webhook signature.
    ///
    /// This implements Slack's signature verification:
    /// <https://api.slack.com/authentication/verifying-requests-from-slack>
    ///
    /// # Arguments
    ///
    /// * `timestamp` - The `X-Slack-Request-Timestamp` header value
    /// * `body` - The raw request body
    /// * `signature` - The `X-Slack-Signature` header value
    ///
    /// # Errors
    ///
    /// Returns error if the timestamp is stale or the signature does not match.
    #[instrument(skip(self, body, signature))]
    pub fn verify_signature(
        &self,
        timestamp: &str,
        body: &str,
        signature: &str,
    ) -> Result<(), SlackError> {
        let ts: i64 = timestamp
            .parse()
            .map_err(|_| SlackError::InvalidSignature("Invalid timestamp".to_string()))?;

        let now_secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| SlackError::InvalidSignature(e.to_string()))?
            .as_secs();

        let now = i64::try_from(now_secs)
            .map_err(|_| SlackError::InvalidSignature("System time overflow".to_string()))?;

        if now.abs_diff(ts) > MAX_REQUEST_AGE_SECS {
            return Err(SlackError::InvalidSignature(
                "Request timestamp too old".to_string(),
            ));
        }

        let provided = signature
            .strip_prefix("v0=")
            .and_then(|hex_sig| hex::decode(hex_sig).ok())
            .ok_or_else(|| SlackError::InvalidSignature("Malformed signature".to_string()))?;

        let mut mac =
            Hmac::<Sha256>::new_from_slice(self.signing_secret.expose_secret().as_bytes())
                .map_err(|e| SlackError::InvalidSignature(e.to_string()))?;
        mac.update(format!("v0:{timestamp}:{body}").as_bytes());

        // Constant-time comparison
        mac.verify_slice(&provided)
            .map_err(|_| SlackError::InvalidSignature("Signature mismatch".to_string()))?;

        debug!("Slack signature verified");

        Ok(())
    }
}
