//! # Messenger Bot
//!
//! The bot ties together its configuration, the Graph API client and the
//! handlers called for every webhook event. Build it once at startup,
//! register the handlers, then share it as an `Arc`.

use crate::{
    consts,
    messenger::{client::MessengerClient, errors::ClientError, transport::ImplGraphTransport},
    webhook::{
        dispatch::{EventContext, Handlers},
        events::{Delivery, EventKind, Optin, Postback, ReceivedMessage},
    },
};
use futures::FutureExt;
use std::{fmt, future::Future, sync::Arc, time::Duration};

/// Settings of a bot
///
/// # Security
/// `access_token`, `verify_token` and `app_secret` are secrets; the `Debug`
/// output redacts them.
#[derive(Clone)]
pub struct BotConfig {
    /// Page access token used on every Graph API call
    pub access_token: String,
    /// Token expected on the webhook subscription challenge
    pub verify_token: String,
    /// App secret; when present every webhook POST must be signed with it
    pub app_secret: Option<String>,
    /// Page id, needed to set the welcome message
    pub page_id: Option<String>,
    /// Logs outgoing payloads and Graph API error bodies
    pub debug: bool,
    pub graph_api_url: String,
    pub request_timeout: Duration,
}

impl BotConfig {
    pub fn new(access_token: impl Into<String>, verify_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            verify_token: verify_token.into(),
            app_secret: None,
            page_id: None,
            debug: false,
            graph_api_url: consts::GRAPH_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_app_secret(mut self, app_secret: impl Into<String>) -> Self {
        self.app_secret = Some(app_secret.into()).filter(|s: &String| !s.is_empty());
        self
    }

    pub fn with_page_id(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into()).filter(|s: &String| !s.is_empty());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_graph_api_url(mut self, graph_api_url: impl Into<String>) -> Self {
        self.graph_api_url = graph_api_url.into();
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("access_token", &"<redacted>")
            .field("verify_token", &"<redacted>")
            .field("app_secret", &self.app_secret.as_ref().map(|_| "<redacted>"))
            .field("page_id", &self.page_id)
            .field("debug", &self.debug)
            .field("graph_api_url", &self.graph_api_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

pub struct MessengerBot {
    config: BotConfig,
    client: MessengerClient,
    handlers: Handlers,
}

impl MessengerBot {
    /// Creates a bot talking to the Graph API through reqwest
    pub fn new(config: BotConfig) -> Result<Self, ClientError> {
        let client = MessengerClient::new(&config)?;

        Ok(Self::with_client(config, client))
    }

    /// Creates a bot sending its requests through `transport`
    pub fn with_transport(config: BotConfig, transport: ImplGraphTransport) -> Self {
        let client = MessengerClient::with_transport(&config, transport);

        Self::with_client(config, client)
    }

    pub fn with_client(config: BotConfig, client: MessengerClient) -> Self {
        Self {
            config,
            client,
            handlers: Handlers::default(),
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn client(&self) -> &MessengerClient {
        &self.client
    }

    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// Handler for messages sent by users
    pub fn on_message<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Arc<MessengerBot>, EventContext, ReceivedMessage) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.handlers.message = Some(Arc::new(move |bot, ctx, message| {
            handler(bot, ctx, message).boxed()
        }));
        self
    }

    /// Handler for delivery receipts of messages sent by the page
    pub fn on_delivery<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Arc<MessengerBot>, EventContext, Delivery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.handlers.delivery = Some(Arc::new(move |bot, ctx, delivery| {
            handler(bot, ctx, delivery).boxed()
        }));
        self
    }

    /// Handler for postback button taps
    pub fn on_postback<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Arc<MessengerBot>, EventContext, Postback) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.handlers.postback = Some(Arc::new(move |bot, ctx, postback| {
            handler(bot, ctx, postback).boxed()
        }));
        self
    }

    /// Handler for optins (authentication through the Send to Messenger plugin)
    pub fn on_optin<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Arc<MessengerBot>, EventContext, Option<Optin>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.handlers.optin = Some(Arc::new(move |bot, ctx, optin| {
            handler(bot, ctx, optin).boxed()
        }));
        self
    }

    /// Called with every error returned by the other handlers
    pub fn on_handler_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(EventKind, anyhow::Error) + Send + Sync + 'static,
    {
        self.handlers.error = Some(Arc::new(handler));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_config_defaults() {
        let config = BotConfig::new("token", "verify");

        assert_eq!(config.graph_api_url, "https://graph.facebook.com/v2.6/");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.app_secret.is_none());
        assert!(config.page_id.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn test_bot_config_ignores_empty_optionals() {
        let config = BotConfig::new("token", "verify")
            .with_app_secret("")
            .with_page_id("");

        assert!(config.app_secret.is_none());
        assert!(config.page_id.is_none());
    }

    #[test]
    fn test_bot_config_debug_redacts_secrets() {
        let config = BotConfig::new("EAAB-secret-token", "verify-me").with_app_secret("s3cr3t");
        let output = format!("{config:?}");

        assert!(!output.contains("EAAB-secret-token"));
        assert!(!output.contains("verify-me"));
        assert!(!output.contains("s3cr3t"));
        assert!(output.contains("graph.facebook.com"));
    }

    #[test]
    fn test_handler_registration() {
        let bot = MessengerBot::new(BotConfig::new("token", "verify"))
            .unwrap()
            .on_postback(|_, _, _| async { anyhow::Ok(()) });

        assert!(bot.handlers().postback.is_some());
        assert!(bot.handlers().message.is_none());
        assert!(bot.handlers().error.is_none());
    }
}
