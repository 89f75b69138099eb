//! Wire types for the Telegram Bot API update stream.
//!
//! Only the fields the relay consumes are modeled; everything else in the
//! provider payload is ignored on deserialization.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Update {
    pub update_id: u64,
    /// A message in a group or private chat (commands and flow replies).
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    /// A post published in a channel.
    #[serde(default)]
    pub channel_post: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomingMessage {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<Sender>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chat {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sender {
    #[serde(default)]
    pub username: Option<String>,
}
