//! # Messenger Message Schemas
//!
//! Data structures sent to and received from the Graph API.
//!
//! - `outgoing`: recipients, messages, send request/response envelopes
//! - `templates`: generic, button and receipt templates with their limits
//! - `profile`: user profile returned by the Graph API
//! - `settings`: thread settings (greeting, get started, welcome message)

pub mod outgoing;
pub mod profile;
pub mod settings;
pub mod templates;

// Re-export commonly used types
pub use outgoing::*;
pub use profile::*;
pub use settings::*;
pub use templates::*;
