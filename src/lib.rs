//! # Messenger Bot
//!
//! Binding for the Facebook Messenger Platform.
//!
//! - [`webhook`] receives the platform callbacks, checks their signature and
//!   dispatches every event to the handlers registered on a [`bot::MessengerBot`].
//! - [`messenger`] holds the outgoing message model and the Graph API client
//!   used to send messages, read profiles and configure thread settings.

pub mod action;
pub mod bot;
pub mod config;
pub mod consts;
pub mod logger;
pub mod messenger;
pub mod server;
pub mod webhook;

pub use bot::{BotConfig, MessengerBot};
pub use messenger::{
    client::MessengerClient,
    errors::{ClientError, ValidationError},
    schemas::*,
};
