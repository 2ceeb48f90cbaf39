//! # Messenger Outgoing Message Schemas
//!
//! JSON payloads for the `me/messages` endpoint.

use super::templates::{ButtonTemplate, GenericTemplate, ReceiptTemplate, Template};
use crate::messenger::errors::{ClientError, ValidationError};
use serde::{Deserialize, Serialize};

/// Message recipient, addressed either by page scoped id or by phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipient {
    Id { id: String },
    PhoneNumber { phone_number: String },
}

impl Recipient {
    pub fn from_id(id: impl Into<String>) -> Self {
        Self::Id { id: id.into() }
    }

    pub fn from_phone(phone_number: impl Into<String>) -> Self {
        Self::PhoneNumber {
            phone_number: phone_number.into(),
        }
    }
}

/// Push notification behaviour on the recipient's device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// Regular sound, vibrate and phone alert
    #[default]
    Regular,
    /// Phone notification only, no sound or vibrate alert
    SilentPush,
    /// No sound or phone notification
    NoPush,
}

/// Message body: either plain text or a single attachment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Text { text: String },
    Attachment { attachment: Attachment },
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::Attachment {
            attachment: Attachment::Image(MediaPayload { url: url.into() }),
        }
    }

    pub fn template(template: impl Into<Template>) -> Self {
        Self::Attachment {
            attachment: Attachment::Template(template.into()),
        }
    }
}

/// Attachment sent inside a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Attachment {
    Image(MediaPayload),
    Template(Template),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPayload {
    pub url: String,
}

/// Anything that can be sent through [`crate::MessengerClient::send`]
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Message(Message),
    Generic(GenericTemplate),
    Button(ButtonTemplate),
    Receipt(ReceiptTemplate),
}

impl Content {
    /// Checks the platform limits of template content. Plain messages and
    /// receipts have no limits.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Content::Generic(template) => template.validate(),
            Content::Button(template) => template.validate(),
            Content::Message(_) | Content::Receipt(_) => Ok(()),
        }
    }

    /// Wraps template content into a template attachment
    pub fn into_message(self) -> Message {
        match self {
            Content::Message(message) => message,
            Content::Generic(template) => Message::template(template),
            Content::Button(template) => Message::template(template),
            Content::Receipt(template) => Message::template(template),
        }
    }
}

impl From<Message> for Content {
    fn from(message: Message) -> Self {
        Content::Message(message)
    }
}

impl From<GenericTemplate> for Content {
    fn from(template: GenericTemplate) -> Self {
        Content::Generic(template)
    }
}

impl From<ButtonTemplate> for Content {
    fn from(template: ButtonTemplate) -> Self {
        Content::Button(template)
    }
}

impl From<ReceiptTemplate> for Content {
    fn from(template: ReceiptTemplate) -> Self {
        Content::Receipt(template)
    }
}

impl From<Template> for Content {
    fn from(template: Template) -> Self {
        match template {
            Template::Generic(t) => Content::Generic(t),
            Template::Button(t) => Content::Button(t),
            Template::Receipt(t) => Content::Receipt(t),
        }
    }
}

/// Untyped content is accepted when it is a message object (`text` or
/// `attachment`) or a template object with a known `template_type`.
impl TryFrom<serde_json::Value> for Content {
    type Error = ClientError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let Some(object) = value.as_object() else {
            return Err(ClientError::UnsupportedContent);
        };

        if object.contains_key("template_type") {
            return serde_json::from_value::<Template>(value)
                .map(Content::from)
                .map_err(|_| ClientError::UnsupportedContent);
        }

        if object.contains_key("text") || object.contains_key("attachment") {
            return serde_json::from_value::<Message>(value)
                .map(Content::Message)
                .map_err(|_| ClientError::UnsupportedContent);
        }

        Err(ClientError::UnsupportedContent)
    }
}

/// Body posted to `me/messages`
#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    pub recipient: &'a Recipient,
    pub message: Message,
    pub notification_type: NotificationType,
}

/// Successful response from `me/messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    pub recipient_id: String,
    pub message_id: String,
}

/// Error envelope returned by the Graph API on non 200 responses
#[derive(Debug, Default, Deserialize)]
pub struct GraphErrorEnvelope {
    #[serde(default)]
    pub error: GraphError,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphError {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_data: Option<serde_json::Value>,
    #[serde(default)]
    pub fbtrace_id: String,
}
