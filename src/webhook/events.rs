//! # Messenger Webhook Schemas
//!
//! Payload posted by the Messenger Platform to the webhook. Every entry holds
//! a batch of messaging events; each event carries exactly one of a received
//! message, a delivery receipt, a postback or an optin.

use crate::messenger::schemas::MediaPayload;
use serde::{Deserialize, Serialize};

/// Root webhook payload
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// The object type, `page` for Messenger
    pub object: String,
    /// Array of entries containing the actual events
    #[serde(default)]
    pub entry: Vec<Entry>,
}

/// Entry for one page, with the events batched in it
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    /// Page id
    pub id: String,
    /// Time of the update in milliseconds since the epoch
    pub time: i64,
    #[serde(default)]
    pub messaging: Vec<Messaging>,
}

impl Entry {
    pub fn event(&self) -> Event {
        Event {
            id: self.id.clone(),
            time: self.time,
        }
    }
}

/// Identity of the entry an event was delivered in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
}

/// Sender, recipient and time shared by every messaging event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageOpts {
    pub sender: Participant,
    pub recipient: Participant,
    #[serde(default)]
    pub timestamp: i64,
}

/// One messaging event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawMessaging")]
pub struct Messaging {
    pub opts: MessageOpts,
    pub event: MessagingEvent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessagingEvent {
    Message(ReceivedMessage),
    Delivery(Delivery),
    Postback(Postback),
    /// Authentication through the "Send to Messenger" plugin. The platform may
    /// omit the optin body, in which case there is no reference to report.
    Optin(Option<Optin>),
}

impl MessagingEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MessagingEvent::Message(_) => EventKind::Message,
            MessagingEvent::Delivery(_) => EventKind::Delivery,
            MessagingEvent::Postback(_) => EventKind::Postback,
            MessagingEvent::Optin(_) => EventKind::Optin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum EventKind {
    #[display("message")]
    Message,
    #[display("delivery")]
    Delivery,
    #[display("postback")]
    Postback,
    #[display("optin")]
    Optin,
}

/// Wire shape of a messaging event: the event body is one of four nullable fields
#[derive(Deserialize)]
struct RawMessaging {
    sender: Participant,
    recipient: Participant,
    #[serde(default)]
    timestamp: i64,
    message: Option<ReceivedMessage>,
    delivery: Option<Delivery>,
    postback: Option<Postback>,
    optin: Option<Optin>,
}

impl From<RawMessaging> for Messaging {
    fn from(raw: RawMessaging) -> Self {
        // delivery wins over message, message over postback; anything else is an optin
        let event = match (raw.delivery, raw.message, raw.postback) {
            (Some(delivery), _, _) => MessagingEvent::Delivery(delivery),
            (None, Some(message), _) => MessagingEvent::Message(message),
            (None, None, Some(postback)) => MessagingEvent::Postback(postback),
            (None, None, None) => MessagingEvent::Optin(raw.optin),
        };

        Messaging {
            opts: MessageOpts {
                sender: raw.sender,
                recipient: raw.recipient,
                timestamp: raw.timestamp,
            },
            event,
        }
    }
}

/// Message received from a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivedMessage {
    #[serde(rename = "mid", default)]
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<ReceivedAttachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_reply: Option<QuickReply>,
    /// Set when the message was sent by the page itself
    #[serde(default)]
    pub is_echo: bool,
}

/// Attachment sent by a user (image, audio, video, file, location, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivedAttachment {
    #[serde(rename = "type")]
    pub attachment_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ReceivedAttachmentPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReceivedAttachmentPayload {
    Location { coordinates: Coordinates },
    Media(MediaPayload),
    /// Template echoes, fallback links and any payload shape not modeled above
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub payload: String,
}

/// Delivery receipt: every message sent before `watermark` was delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(rename = "mids", default)]
    pub message_ids: Vec<String>,
    #[serde(default)]
    pub watermark: i64,
    #[serde(default)]
    pub seq: i64,
}

/// Button tap reporting the payload configured on the button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Postback {
    pub payload: String,
}

/// `ref` comes from the Send to Messenger plugin, `user_ref` from the checkbox plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Optin {
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ref: Option<String>,
}
