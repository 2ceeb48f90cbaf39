//! # Messenger API Client
//!
//! Client for the Messenger Platform Graph API. It sends messages and
//! templates, reads user profiles and updates the page thread settings.
//!
//! Every call is a single request: there are no retries, and timeouts are the
//! ones configured on the transport.

use super::{
    errors::ClientError,
    schemas::{
        Content, GraphErrorEnvelope, Message, NotificationType, Profile, Recipient, SendRequest,
        SendResponse, SettingResult, ThreadSetting,
    },
    transport::{GraphResponse, ImplGraphTransport, ReqwestTransport},
};
use crate::{bot::BotConfig, consts};
use log::debug;
use serde::de::DeserializeOwned;

/// Messenger API client for sending messages and configuring the page
pub struct MessengerClient {
    /// Transport used to reach the Graph API
    transport: ImplGraphTransport,
    /// Graph API base url
    graph_api_url: String,
    /// Page access token
    access_token: String,
    /// Page id, needed only for the welcome message
    page_id: Option<String>,
    /// Logs request payloads and error bodies
    debug: bool,
}

impl MessengerClient {
    /// Creates a client backed by reqwest, using the configured request timeout
    pub fn new(config: &BotConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(config.request_timeout)?;

        Ok(Self::with_transport(config, Box::new(transport)))
    }

    pub fn with_transport(config: &BotConfig, transport: ImplGraphTransport) -> Self {
        Self {
            transport,
            graph_api_url: config.graph_api_url.clone(),
            access_token: config.access_token.clone(),
            page_id: config.page_id.clone(),
            debug: config.debug,
        }
    }

    /// Sends a text message
    pub async fn send_text(
        &self,
        recipient: &Recipient,
        text: impl Into<String>,
        notification_type: NotificationType,
    ) -> Result<SendResponse, ClientError> {
        self.send(recipient, Message::text(text), notification_type)
            .await
    }

    /// Sends an image attachment by url
    pub async fn send_image(
        &self,
        recipient: &Recipient,
        url: impl Into<String>,
        notification_type: NotificationType,
    ) -> Result<SendResponse, ClientError> {
        self.send(recipient, Message::image(url), notification_type)
            .await
    }

    /// Sends a message or a template.
    ///
    /// Templates are not validated here; call `validate` on them first if the
    /// content was not built from trusted input.
    ///
    /// # Returns
    /// * `Ok(SendResponse)` - recipient id and message id on a 200 response
    /// * `Err(ClientError::Remote)` - the Graph API answered with an error envelope
    /// * `Err(ClientError::Transport)` - the request could not be performed
    pub async fn send(
        &self,
        recipient: &Recipient,
        content: impl Into<Content>,
        notification_type: NotificationType,
    ) -> Result<SendResponse, ClientError> {
        let request = SendRequest {
            recipient,
            message: content.into().into_message(),
            notification_type,
        };

        let payload = serde_json::to_vec(&request).map_err(ClientError::Serialize)?;
        if self.debug {
            debug!("Payload: {}", String::from_utf8_lossy(&payload));
        }

        let url = self.endpoint(&["me", "messages"], &[])?;
        let response = self.transport.post_json(&url, payload).await?;

        self.parse_response(response)
    }

    /// Sends untyped content.
    ///
    /// Fails with [`ClientError::UnsupportedContent`] before any request is made
    /// when `content` is neither a message object nor a known template.
    pub async fn send_raw(
        &self,
        recipient: &Recipient,
        content: serde_json::Value,
        notification_type: NotificationType,
    ) -> Result<SendResponse, ClientError> {
        let content = Content::try_from(content)?;

        self.send(recipient, content, notification_type).await
    }

    /// Fetches the public profile of a page scoped user id
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, ClientError> {
        let url = self.endpoint(&[user_id], &[("fields", consts::PROFILE_FIELDS)])?;
        let response = self.transport.get(&url).await?;

        self.parse_response(response)
    }

    /// Sets the greeting text shown before a user starts a conversation
    pub async fn set_greeting(&self, text: &str) -> Result<(), ClientError> {
        let result = self
            .post_thread_setting("me", &ThreadSetting::greeting(text))
            .await?;
        debug!("Greeting updated: {}", result.result);

        Ok(())
    }

    /// Sets the payload posted back when a user taps the get started button
    pub async fn set_get_started(&self, payload: &str) -> Result<(), ClientError> {
        let result = self
            .post_thread_setting("me", &ThreadSetting::get_started(payload))
            .await?;
        debug!("Get started button updated: {}", result.result);

        Ok(())
    }

    /// Sets the message sent first on new threads. `None` removes it.
    ///
    /// Needs a page id in the bot configuration.
    pub async fn set_welcome_message(&self, message: Option<Message>) -> Result<(), ClientError> {
        let page_id = self.page_id.as_deref().ok_or(ClientError::MissingPageId)?;
        let removing = message.is_none();

        let result = self
            .post_thread_setting(page_id, &ThreadSetting::welcome_message(message))
            .await?;

        if !removing && result.result != consts::WELCOME_MESSAGE_SUCCESS_RESULT {
            return Err(ClientError::UnexpectedResult(result.result));
        }

        Ok(())
    }

    async fn post_thread_setting(
        &self,
        node: &str,
        setting: &ThreadSetting,
    ) -> Result<SettingResult, ClientError> {
        let payload = serde_json::to_vec(setting).map_err(ClientError::Serialize)?;
        if self.debug {
            debug!("Payload: {}", String::from_utf8_lossy(&payload));
        }

        let url = self.endpoint(&[node, "thread_settings"], &[])?;
        let response = self.transport.post_json(&url, payload).await?;

        self.parse_response(response)
    }

    /// Builds `{graph_api_url}/{segments..}?{params}&access_token=..`
    fn endpoint(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<String, ClientError> {
        let mut url = reqwest::Url::parse(&self.graph_api_url)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.graph_api_url.clone()))?
            .pop_if_empty()
            .extend(segments);

        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("access_token", &self.access_token);

        Ok(url.to_string())
    }

    fn parse_response<T: DeserializeOwned>(&self, response: GraphResponse) -> Result<T, ClientError> {
        if !response.is_ok() {
            if self.debug {
                debug!("Response: {}", String::from_utf8_lossy(&response.body));
            }

            let envelope: GraphErrorEnvelope =
                serde_json::from_slice(&response.body).unwrap_or_default();

            return Err(ClientError::Remote {
                status: response.status,
                error: envelope.error,
            });
        }

        serde_json::from_slice(&response.body).map_err(ClientError::Decode)
    }
}
