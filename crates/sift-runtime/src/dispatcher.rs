//! Channel-post evaluation and fan-out.

use anyhow::Result;
use sift_core::rules;
use sift_store::{AuditLog, ConfigRepository};
use sift_telegram::{ChatGateway, IncomingMessage};

/// Copies a monitored-channel post to every sending channel when the rule
/// engine approves it. Destinations are attempted independently; one failed
/// delivery never blocks the rest.
pub async fn dispatch_channel_post(
    gateway: &dyn ChatGateway,
    repository: &ConfigRepository,
    audit: &AuditLog,
    post: &IncomingMessage,
) -> Result<()> {
    let config = repository.load_or_default()?;
    let source = post.chat.id.to_string();
    if config.monitor_channel.as_deref() != Some(source.as_str()) {
        return Ok(());
    }
    let text = post.text.as_deref().unwrap_or("");
    let decision = rules::decide(text, &config);
    if !decision.forward {
        return Ok(());
    }
    for destination in &config.sending_channels {
        if let Err(error) = gateway.send_text(destination, text).await {
            tracing::warn!(
                "delivery of message {} to {} failed: {:#}",
                post.message_id,
                destination,
                error
            );
        }
    }
    let reason = decision.matched_keyword.as_deref().unwrap_or("default");
    audit.record(&format!(
        "forwarded message {} from {} to [{}] (matched: {})",
        post.message_id,
        source,
        config.sending_channels.join(", "),
        reason,
    ))
}
