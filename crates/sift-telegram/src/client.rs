//! Minimal Telegram Bot API client.
//!
//! Every call POSTs JSON to `{base}/bot{token}/{method}` and unwraps the
//! standard `{"ok": true, "result": ...}` envelope; a false `ok` surfaces the
//! provider's description as the error.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Client;
use serde_json::{json, Value};

use crate::types::{Chat, Update};

// Must stay above the long-poll timeout handed to getUpdates.
const HTTP_TIMEOUT_SECS: u64 = 50;

#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: Client,
    api_base: String,
    token: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, token: &str) -> Result<Self> {
        let api_base = api_base.trim().trim_end_matches('/').to_string();
        if api_base.is_empty() {
            bail!("telegram api base cannot be empty");
        }
        let token = token.trim().to_string();
        if token.is_empty() {
            bail!("telegram bot token cannot be empty");
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .context("failed to build telegram http client")?;
        Ok(Self {
            http,
            api_base,
            token,
        })
    }

    async fn call(&self, method: &str, body: Value) -> Result<Value> {
        let url = format!("{}/bot{}/{}", self.api_base, self.token, method);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("telegram {method} request failed"))?;
        let status = response.status();
        let payload = response
            .json::<Value>()
            .await
            .with_context(|| format!("telegram {method} returned a non-JSON body"))?;
        if !payload.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            let description = payload
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("no description");
            bail!("telegram {method} failed: http {status}, {description}");
        }
        payload
            .get("result")
            .cloned()
            .ok_or_else(|| anyhow!("telegram {method} response missing result"))
    }

    /// Long-polls getUpdates starting at `offset`.
    pub async fn get_updates(&self, offset: u64, timeout_secs: u64) -> Result<Vec<Update>> {
        let result = self
            .call(
                "getUpdates",
                json!({"offset": offset, "timeout": timeout_secs}),
            )
            .await?;
        serde_json::from_value(result).context("failed to parse getUpdates result")
    }

    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        self.call(
            "sendMessage",
            json!({"chat_id": chat_id, "text": text, "disable_web_page_preview": true}),
        )
        .await
        .map(|_| ())
    }

    /// Replies in-thread to a message the bot received.
    pub async fn reply_to(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
        self.call(
            "sendMessage",
            json!({"chat_id": chat_id, "text": text, "reply_to_message_id": message_id}),
        )
        .await
        .map(|_| ())
    }

    /// Native copy of a channel post into another chat.
    pub async fn forward_message(
        &self,
        dest_chat_id: &str,
        source_chat_id: &str,
        message_id: i64,
    ) -> Result<()> {
        self.call(
            "forwardMessage",
            json!({"chat_id": dest_chat_id, "from_chat_id": source_chat_id, "message_id": message_id}),
        )
        .await
        .map(|_| ())
    }

    pub async fn get_chat(&self, chat_id: &str) -> Result<Chat> {
        let result = self.call("getChat", json!({"chat_id": chat_id})).await?;
        serde_json::from_value(result).context("failed to parse getChat result")
    }
}
