//! Webhook side of the bot: endpoint, signature checks, event schemas and
//! the dispatch of events to the registered handlers.

pub mod dispatch;
pub mod errors;
pub mod events;
pub mod routes;
pub mod security;

pub use routes::messenger;
