//! Telegram Bot API transport for the sift relay.
//!
//! Provides the update/message wire types, a minimal HTTP client over the
//! Bot API, and the [`ChatGateway`] seam the runtime consumes.

pub mod client;
pub mod gateway;
pub mod types;

pub use client::TelegramClient;
pub use gateway::ChatGateway;
pub use types::{Chat, IncomingMessage, Sender, Update};
