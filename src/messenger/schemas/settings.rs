//! # Thread Settings Schemas
//!
//! Payloads for the `thread_settings` endpoint: greeting text, the get started
//! button and the welcome message shown when a new thread is opened.

use super::outgoing::Message;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "setting_type", rename_all = "snake_case")]
pub enum ThreadSetting {
    Greeting {
        greeting: Greeting,
    },
    CallToActions {
        thread_state: ThreadState,
        call_to_actions: Vec<CallToAction>,
    },
}

impl ThreadSetting {
    pub fn greeting(text: impl Into<String>) -> Self {
        Self::Greeting {
            greeting: Greeting { text: text.into() },
        }
    }

    pub fn get_started(payload: impl Into<String>) -> Self {
        Self::CallToActions {
            thread_state: ThreadState::NewThread,
            call_to_actions: vec![CallToAction::Payload {
                payload: payload.into(),
            }],
        }
    }

    /// Welcome message for new threads. `None` removes the current one.
    pub fn welcome_message(message: Option<Message>) -> Self {
        Self::CallToActions {
            thread_state: ThreadState::NewThread,
            call_to_actions: message
                .map(|m| CallToAction::Message {
                    message: Box::new(m),
                })
                .into_iter()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Greeting {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadState {
    NewThread,
    ExistingThread,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CallToAction {
    Payload { payload: String },
    Message { message: Box<Message> },
}

/// Response of a successful thread settings update
#[derive(Debug, Default, Deserialize)]
pub struct SettingResult {
    #[serde(default)]
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_greeting_setting_serialization() {
        assert_eq!(
            serde_json::to_value(ThreadSetting::greeting("Welcome to the bot")).unwrap(),
            json!({
                "setting_type": "greeting",
                "greeting": {"text": "Welcome to the bot"}
            })
        );
    }

    #[test]
    fn test_get_started_setting_serialization() {
        assert_eq!(
            serde_json::to_value(ThreadSetting::get_started("GetStarted")).unwrap(),
            json!({
                "setting_type": "call_to_actions",
                "thread_state": "new_thread",
                "call_to_actions": [{"payload": "GetStarted"}]
            })
        );
    }

    #[test]
    fn test_welcome_message_setting_serialization() {
        assert_eq!(
            serde_json::to_value(ThreadSetting::welcome_message(Some(Message::text("hi"))))
                .unwrap(),
            json!({
                "setting_type": "call_to_actions",
                "thread_state": "new_thread",
                "call_to_actions": [{"message": {"text": "hi"}}]
            })
        );

        assert_eq!(
            serde_json::to_value(ThreadSetting::welcome_message(None)).unwrap(),
            json!({
                "setting_type": "call_to_actions",
                "thread_state": "new_thread",
                "call_to_actions": []
            })
        );
    }
}
