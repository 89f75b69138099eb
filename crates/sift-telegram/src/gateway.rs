//! Narrow transport seam consumed by the relay runtime.

use anyhow::Result;
use async_trait::async_trait;

use crate::client::TelegramClient;

/// The operations the command engine and the post dispatcher need from the
/// chat platform. Production uses [`TelegramClient`]; tests substitute a
/// recording fake.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Resolves a channel id to its display title.
    async fn resolve_channel(&self, channel_id: &str) -> Result<String>;
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<()>;
    async fn forward_post(
        &self,
        dest_channel_id: &str,
        source_channel_id: &str,
        message_id: i64,
    ) -> Result<()>;
    async fn reply(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()>;
}

#[async_trait]
impl ChatGateway for TelegramClient {
    async fn resolve_channel(&self, channel_id: &str) -> Result<String> {
        let chat = self.get_chat(channel_id).await?;
        Ok(chat.title.unwrap_or_else(|| channel_id.to_string()))
    }

    async fn send_text(&self, channel_id: &str, text: &str) -> Result<()> {
        self.send_message(channel_id, text).await
    }

    async fn forward_post(
        &self,
        dest_channel_id: &str,
        source_channel_id: &str,
        message_id: i64,
    ) -> Result<()> {
        self.forward_message(dest_channel_id, source_channel_id, message_id)
            .await
    }

    async fn reply(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
        self.reply_to(chat_id, message_id, text).await
    }
}
