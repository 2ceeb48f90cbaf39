//! Configuration of the `messenger-bot` binary, read from the environment.
//!
//! # Security Notes
//! - The access token, verify token and app secret must never be logged
//! - Production should feed them from a secret manager, not a checked-in `.env`

use crate::bot::BotConfig;
use anyhow::Context;
use envconfig::Envconfig;
use std::{sync::OnceLock, time::Duration};

#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name (NON-SENSITIVE)
    /// Values: "local", "dev", "prod". "prod" serves the webhook over TLS.
    #[envconfig(from = "ENV", default = "local")]
    pub env: String,

    /// 🔒 SENSITIVE: page access token
    #[envconfig(from = "MESSENGER_ACCESS_TOKEN")]
    pub access_token: String,

    /// 🔒 SENSITIVE: token echoed back by the subscription challenge
    #[envconfig(from = "MESSENGER_VERIFY_TOKEN")]
    pub verify_token: String,

    /// 🔒 SENSITIVE: app secret signing the webhook payloads.
    /// Signature checks are skipped when unset.
    #[envconfig(from = "MESSENGER_APP_SECRET")]
    pub app_secret: Option<String>,

    /// Page id (NON-SENSITIVE), required by the welcome message setting
    #[envconfig(from = "MESSENGER_PAGE_ID")]
    pub page_id: Option<String>,

    #[envconfig(from = "MESSENGER_DEBUG", default = "false")]
    pub debug: bool,

    #[envconfig(from = "MESSENGER_GRAPH_API_URL", default = "https://graph.facebook.com/v2.6/")]
    pub graph_api_url: String,

    #[envconfig(from = "MESSENGER_REQUEST_TIMEOUT_SECS", default = "30")]
    pub request_timeout_secs: u64,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(from = "WEB_SERVER_HOST", default = "0.0.0.0")]
    pub web_server_host: String,

    #[envconfig(from = "WEB_SERVER_PORT", default = "8080")]
    pub web_server_port: u16,

    /// Path the webhook is mounted on
    #[envconfig(from = "WEBHOOK_PATH", default = "/webhook")]
    pub webhook_path: String,

    /// Path to SSL private key file (SENSITIVE PATH), used in prod only
    #[envconfig(from = "PRIVATE_KEY_PATH", default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file, used in prod only
    #[envconfig(from = "CERTIFICATE_PATH", default = "server.crt")]
    pub certificate_path: String,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    pub fn server_addr(&self) -> (String, u16) {
        (self.web_server_host.clone(), self.web_server_port)
    }

    /// Library settings of the bot. Empty optional values count as unset.
    pub fn bot_config(&self) -> BotConfig {
        let mut config = BotConfig::new(&self.access_token, &self.verify_token)
            .with_debug(self.debug)
            .with_graph_api_url(&self.graph_api_url)
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs));

        if let Some(app_secret) = &self.app_secret {
            config = config.with_app_secret(app_secret);
        }
        if let Some(page_id) = &self.page_id {
            config = config.with_page_id(page_id);
        }

        config
    }
}

pub static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

pub fn init_config() -> anyhow::Result<&'static AppConfig> {
    let config = AppConfig::init_from_env().context("failed to load app config from env")?;

    Ok(APP_CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::init_from_hashmap(&env(&[
            ("MESSENGER_ACCESS_TOKEN", "token"),
            ("MESSENGER_VERIFY_TOKEN", "verify"),
        ]))
        .unwrap();

        assert!(!config.is_prod());
        assert_eq!(config.server_addr(), ("0.0.0.0".to_string(), 8080));
        assert_eq!(config.webhook_path, "/webhook");

        let bot_config = config.bot_config();
        assert_eq!(bot_config.access_token, "token");
        assert_eq!(bot_config.verify_token, "verify");
        assert_eq!(bot_config.graph_api_url, consts::GRAPH_API_URL);
        assert_eq!(bot_config.request_timeout, Duration::from_secs(30));
        assert!(bot_config.app_secret.is_none());
        assert!(bot_config.page_id.is_none());
        assert!(!bot_config.debug);
    }

    #[test]
    fn test_full_config() {
        let config = AppConfig::init_from_hashmap(&env(&[
            ("ENV", "PROD"),
            ("MESSENGER_ACCESS_TOKEN", "token"),
            ("MESSENGER_VERIFY_TOKEN", "verify"),
            ("MESSENGER_APP_SECRET", "secret"),
            ("MESSENGER_PAGE_ID", "1234"),
            ("MESSENGER_DEBUG", "true"),
            ("MESSENGER_REQUEST_TIMEOUT_SECS", "5"),
            ("WEB_SERVER_PORT", "443"),
        ]))
        .unwrap();

        assert!(config.is_prod());

        let bot_config = config.bot_config();
        assert_eq!(bot_config.app_secret.as_deref(), Some("secret"));
        assert_eq!(bot_config.page_id.as_deref(), Some("1234"));
        assert_eq!(bot_config.request_timeout, Duration::from_secs(5));
        assert!(bot_config.debug);
    }

    #[test]
    fn test_empty_app_secret_disables_signature_check() {
        let config = AppConfig::init_from_hashmap(&env(&[
            ("MESSENGER_ACCESS_TOKEN", "token"),
            ("MESSENGER_VERIFY_TOKEN", "verify"),
            ("MESSENGER_APP_SECRET", ""),
        ]))
        .unwrap();

        assert!(config.bot_config().app_secret.is_none());
    }

    #[test]
    fn test_missing_tokens() {
        assert!(AppConfig::init_from_hashmap(&env(&[("MESSENGER_VERIFY_TOKEN", "verify")])).is_err());
    }
}
