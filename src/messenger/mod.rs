//! Messenger Platform Graph API integration
//!
//! ## Submodules
//!
//! - [`schemas`] - Outgoing messages, templates, profile and thread settings payloads
//! - [`client`] - Graph API client for sending messages and configuring the page
//! - [`transport`] - HTTP transport seam used by the client
//! - [`errors`] - Validation and client errors

pub mod client;
pub mod errors;
pub mod schemas;
pub mod transport;
