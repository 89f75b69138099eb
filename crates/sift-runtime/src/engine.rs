//! Command protocol and interactive flow controller.
//!
//! Every mutating command passes the authorization gate, prompts for its
//! input, and registers a one-shot continuation for the conversation. The
//! continuation validates, applies the mutation through the repository, and
//! reports back in-channel. Validation failures consume the flow; the user
//! reissues the command to retry.

use std::sync::Arc;

use anyhow::{Context, Result};
use sift_core::{
    is_admin, normalize_handle, RelayConfig, MAX_CONTAIN_KEYWORDS, MAX_PREFIX_KEYWORDS,
    MAX_SENDING_CHANNELS,
};
use sift_store::{AuditLog, ConfigRepository};
use sift_telegram::{ChatGateway, IncomingMessage, Update};

use crate::commands::{parse_command, Command};
use crate::dispatcher::dispatch_channel_post;
use crate::flows::{FlowRegistry, PendingInput};

/// Literal reply that clears a keyword list instead of replacing it.
pub const KEYWORD_CLEAR_SENTINEL: &str = "clear";

const HELP_TEXT: &str = "Commands:
/help - show this guide
/status - show the current relay configuration
/get_group_id - show this chat's id (no permission needed)
/set_monitor_channel - choose the channel to monitor
/set_keyword_initial - replace the prefix keyword rules (max 5)
/set_keyword_contain - replace the substring keyword rules (max 5)
/set_sending_channel - replace the forwarding destinations (max 3)
/add_admin - add an admin handle
/rm_admin - remove an admin by list number";

pub struct RelayEngine {
    gateway: Arc<dyn ChatGateway>,
    repository: ConfigRepository,
    audit: AuditLog,
    super_admins: Vec<String>,
    flows: FlowRegistry,
}

impl RelayEngine {
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        repository: ConfigRepository,
        audit: AuditLog,
        super_admins: Vec<String>,
    ) -> Self {
        Self {
            gateway,
            repository,
            audit,
            super_admins,
            flows: FlowRegistry::new(),
        }
    }

    /// Routes one inbound update: channel posts to the dispatcher, chat
    /// messages to the pending continuation or the command table.
    pub async fn handle_update(&self, update: &Update) -> Result<()> {
        if let Some(post) = &update.channel_post {
            return dispatch_channel_post(
                self.gateway.as_ref(),
                &self.repository,
                &self.audit,
                post,
            )
            .await;
        }
        let Some(message) = &update.message else {
            return Ok(());
        };
        if let Some(pending) = self.flows.take(message.chat.id)? {
            return self.run_continuation(pending, message).await;
        }
        let Some(command) = parse_command(message.text.as_deref().unwrap_or("")) else {
            return Ok(());
        };
        self.run_command(command, message).await
    }

    async fn run_command(&self, command: Command, message: &IncomingMessage) -> Result<()> {
        let actor = actor_label(message);
        if !command.is_open() {
            let config = self.repository.load_or_default()?;
            if !is_admin(raw_handle(message), &config, &self.super_admins) {
                self.reply(
                    message,
                    &format!("Sorry {actor}, you are not allowed to run this command."),
                )
                .await?;
                self.audit
                    .record(&format!("denied {actor} for {}", command.verb()))?;
                return Ok(());
            }
        }
        match command {
            Command::Help => self.handle_help(message).await,
            Command::Status => self.handle_status(message).await,
            Command::GetGroupId => self.handle_get_group_id(message).await,
            Command::SetMonitorChannel => {
                self.prompt(
                    message,
                    PendingInput::MonitorChannel,
                    "Reply with the channel id to monitor (for example -1001234567890).",
                )
                .await
            }
            Command::SetKeywordInitial => {
                self.prompt(
                    message,
                    PendingInput::KeywordInitial,
                    "Reply with up to 5 comma-separated prefix keywords, or 'clear' to remove them all.",
                )
                .await
            }
            Command::SetKeywordContain => {
                self.prompt(
                    message,
                    PendingInput::KeywordContain,
                    "Reply with up to 5 comma-separated substring keywords, or 'clear' to remove them all.",
                )
                .await
            }
            Command::SetSendingChannel => {
                self.prompt(
                    message,
                    PendingInput::SendingChannels,
                    "Reply with up to 3 comma-separated channel ids to forward into.",
                )
                .await
            }
            Command::AddAdmin => {
                self.prompt(
                    message,
                    PendingInput::AdminHandle,
                    "Reply with the handle to add as admin (for example @username).",
                )
                .await
            }
            Command::RmAdmin => self.handle_rm_admin(message).await,
        }
    }

    async fn run_continuation(&self, pending: PendingInput, message: &IncomingMessage) -> Result<()> {
        let input = message.text.as_deref().unwrap_or("").trim().to_string();
        match pending {
            PendingInput::MonitorChannel => self.apply_monitor_channel(message, &input).await,
            PendingInput::KeywordInitial => {
                self.apply_keyword_list(message, &input, "prefix", MAX_PREFIX_KEYWORDS, |config| {
                    &mut config.keyword_initial
                })
                .await
            }
            PendingInput::KeywordContain => {
                self.apply_keyword_list(
                    message,
                    &input,
                    "substring",
                    MAX_CONTAIN_KEYWORDS,
                    |config| &mut config.keyword_contain,
                )
                .await
            }
            PendingInput::SendingChannels => self.apply_sending_channels(message, &input).await,
            PendingInput::AdminHandle => self.apply_admin_handle(message, &input).await,
            PendingInput::AdminRemovalIndex => self.apply_admin_removal(message, &input).await,
        }
    }

    async fn prompt(
        &self,
        message: &IncomingMessage,
        pending: PendingInput,
        text: &str,
    ) -> Result<()> {
        self.reply(message, text).await?;
        self.flows.register(message.chat.id, pending)
    }

    async fn handle_help(&self, message: &IncomingMessage) -> Result<()> {
        self.reply(message, HELP_TEXT).await?;
        self.audit
            .record(&format!("{} ran /help", actor_label(message)))
    }

    async fn handle_get_group_id(&self, message: &IncomingMessage) -> Result<()> {
        self.reply(message, &format!("This chat's id is: {}", message.chat.id))
            .await?;
        self.audit.record(&format!(
            "{} requested chat id {}",
            actor_label(message),
            message.chat.id
        ))
    }

    async fn handle_status(&self, message: &IncomingMessage) -> Result<()> {
        let actor = actor_label(message);
        let config = self.repository.load_or_default()?;
        let monitor = match config.monitor_channel.as_deref() {
            Some(id) => self.render_channel(id).await,
            None => "not set".to_string(),
        };
        let prefix = render_keywords(&config.keyword_initial);
        let substring = render_keywords(&config.keyword_contain);
        let sending = if config.sending_channels.is_empty() {
            "not set".to_string()
        } else {
            let mut lines = Vec::with_capacity(config.sending_channels.len());
            for (index, id) in config.sending_channels.iter().enumerate() {
                lines.push(format!("[{}] {}", index + 1, self.render_channel(id).await));
            }
            lines.join("\n")
        };
        let text = format!(
            "Monitored channel:\n{monitor}\n\nKeyword rules:\n> prefix: {prefix}\n> substring: {substring}\n\nSending channels:\n{sending}"
        );
        self.reply(message, &text).await?;
        self.audit.record(&format!(
            "{actor} viewed status: monitor={monitor}, prefix=[{prefix}], substring=[{substring}]"
        ))
    }

    async fn handle_rm_admin(&self, message: &IncomingMessage) -> Result<()> {
        let actor = actor_label(message);
        let config = self.repository.load_or_default()?;
        if config.admins.is_empty() {
            return self.reply(message, "There are no admins to remove.").await;
        }
        let listing = config
            .admins
            .iter()
            .enumerate()
            .map(|(index, handle)| format!("{}. {handle}", index + 1))
            .collect::<Vec<String>>()
            .join("\n");
        self.reply(
            message,
            &format!("Current admins:\n{listing}\nReply with the number of the admin to remove."),
        )
        .await?;
        self.flows
            .register(message.chat.id, PendingInput::AdminRemovalIndex)?;
        self.audit.record(&format!(
            "{actor} requested admin removal, admins: [{}]",
            config.admins.join(", ")
        ))
    }

    async fn apply_monitor_channel(&self, message: &IncomingMessage, input: &str) -> Result<()> {
        let actor = actor_label(message);
        if input.is_empty() {
            return self
                .reply(message, "Expected a channel id; nothing was changed.")
                .await;
        }
        let title = match self.gateway.resolve_channel(input).await {
            Ok(title) => title,
            Err(_) => {
                return self
                    .reply(
                        message,
                        &format!("Could not resolve channel {input}; nothing was changed."),
                    )
                    .await;
            }
        };
        let mut config = self.repository.load_or_default()?;
        let previous = config
            .monitor_channel
            .replace(input.to_string())
            .unwrap_or_else(|| "none".to_string());
        self.repository.save(&config)?;
        self.reply(
            message,
            &format!("Monitored channel set to {title} ({input})."),
        )
        .await?;
        self.audit.record(&format!(
            "{actor} changed monitor channel from {previous} to {input}"
        ))
    }

    async fn apply_keyword_list(
        &self,
        message: &IncomingMessage,
        input: &str,
        label: &str,
        max: usize,
        select: fn(&mut RelayConfig) -> &mut Vec<String>,
    ) -> Result<()> {
        let actor = actor_label(message);
        if input == KEYWORD_CLEAR_SENTINEL {
            let mut config = self.repository.load_or_default()?;
            select(&mut config).clear();
            self.repository.save(&config)?;
            self.reply(message, &format!("All {label} keywords cleared."))
                .await?;
            return self
                .audit
                .record(&format!("{actor} cleared the {label} keywords"));
        }
        let keywords = parse_comma_list(input);
        if keywords.is_empty() {
            return self
                .reply(message, "No keywords found in the reply; nothing was changed.")
                .await;
        }
        if keywords.len() > max {
            return self
                .reply(
                    message,
                    &format!(
                        "Too many keywords: {} exceeds the limit of {max}; nothing was changed.",
                        keywords.len()
                    ),
                )
                .await;
        }
        let mut config = self.repository.load_or_default()?;
        *select(&mut config) = keywords.clone();
        self.repository.save(&config)?;
        let joined = keywords.join(", ");
        self.reply(message, &format!("{label} keywords set to: {joined}"))
            .await?;
        self.audit
            .record(&format!("{actor} set the {label} keywords to [{joined}]"))
    }

    async fn apply_sending_channels(&self, message: &IncomingMessage, input: &str) -> Result<()> {
        let actor = actor_label(message);
        let channels = parse_comma_list(input);
        if channels.is_empty() {
            return self
                .reply(
                    message,
                    "No channel ids found in the reply; nothing was changed.",
                )
                .await;
        }
        if channels.len() > MAX_SENDING_CHANNELS {
            return self
                .reply(
                    message,
                    &format!(
                        "Too many sending channels: {} exceeds the limit of {MAX_SENDING_CHANNELS}; nothing was changed.",
                        channels.len()
                    ),
                )
                .await;
        }
        for channel in &channels {
            if self.gateway.resolve_channel(channel).await.is_err() {
                return self
                    .reply(
                        message,
                        &format!("Could not resolve channel {channel}; nothing was changed."),
                    )
                    .await;
            }
        }
        let mut config = self.repository.load_or_default()?;
        config.sending_channels = channels.clone();
        self.repository.save(&config)?;
        let joined = channels.join(", ");
        self.reply(message, &format!("Sending channels set to: {joined}"))
            .await?;
        self.audit
            .record(&format!("{actor} set the sending channels to [{joined}]"))
    }

    async fn apply_admin_handle(&self, message: &IncomingMessage, input: &str) -> Result<()> {
        let actor = actor_label(message);
        let Some(handle) = normalize_handle(input) else {
            return self
                .reply(
                    message,
                    "Expected a handle like @username; nothing was changed.",
                )
                .await;
        };
        let mut config = self.repository.load_or_default()?;
        let already = config
            .admins
            .iter()
            .filter_map(|entry| normalize_handle(entry))
            .any(|entry| entry == handle);
        if already {
            return self
                .reply(message, &format!("{handle} is already an admin."))
                .await;
        }
        config.admins.push(handle.clone());
        self.repository.save(&config)?;
        self.reply(message, &format!("Added admin {handle}.")).await?;
        self.audit.record(&format!(
            "{actor} added admin {handle}, admins now [{}]",
            config.admins.join(", ")
        ))
    }

    async fn apply_admin_removal(&self, message: &IncomingMessage, input: &str) -> Result<()> {
        let actor = actor_label(message);
        let Ok(position) = input.parse::<i64>() else {
            return self
                .reply(
                    message,
                    "Reply with a plain number (for example 1); nothing was changed.",
                )
                .await;
        };
        let mut config = self.repository.load_or_default()?;
        if position < 1 || position as usize > config.admins.len() {
            return self
                .reply(
                    message,
                    &format!("{position} is not a valid admin number; nothing was changed."),
                )
                .await;
        }
        let removed = config.admins.remove(position as usize - 1);
        self.repository.save(&config)?;
        self.reply(message, &format!("Removed admin {removed}."))
            .await?;
        self.audit.record(&format!(
            "{actor} removed admin {removed}, admins now [{}]",
            config.admins.join(", ")
        ))
    }

    async fn reply(&self, message: &IncomingMessage, text: &str) -> Result<()> {
        self.gateway
            .reply(message.chat.id, message.message_id, text)
            .await
            .context("failed to reply in conversation")
    }

    async fn render_channel(&self, channel_id: &str) -> String {
        match self.gateway.resolve_channel(channel_id).await {
            Ok(title) => format!("{title} ({channel_id})"),
            Err(_) => format!("unknown channel ({channel_id})"),
        }
    }
}

fn actor_label(message: &IncomingMessage) -> String {
    raw_handle(message)
        .and_then(normalize_handle)
        .unwrap_or_else(|| "(unknown)".to_string())
}

fn raw_handle(message: &IncomingMessage) -> Option<&str> {
    message
        .from
        .as_ref()
        .and_then(|sender| sender.username.as_deref())
}

fn render_keywords(keywords: &[String]) -> String {
    if keywords.is_empty() {
        "not set".to_string()
    } else {
        keywords.join(", ")
    }
}

fn parse_comma_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use sift_core::RelayConfig;

    use crate::testing::{channel_post, command_message, harness, message_update, Harness};

    async fn send(harness: &Harness, username: &str, text: &str) {
        harness
            .engine
            .handle_update(&command_message(username, text))
            .await
            .expect("handle update");
    }

    fn config_of(harness: &Harness) -> RelayConfig {
        harness.repository.load_or_default().expect("load config")
    }

    #[tokio::test]
    async fn functional_prompt_then_reply_replaces_prefix_keywords() {
        let harness = harness(&["@boss"]);
        send(&harness, "boss", "/set_keyword_initial").await;
        assert!(harness
            .gateway
            .last_reply()
            .contains("up to 5 comma-separated prefix keywords"));
        send(&harness, "boss", " Alpha , Beta ").await;
        assert_eq!(config_of(&harness).keyword_initial, vec!["Alpha", "Beta"]);
        assert_eq!(
            harness.gateway.last_reply(),
            "prefix keywords set to: Alpha, Beta"
        );
        assert!(harness
            .audit_body()
            .contains("@boss set the prefix keywords to [Alpha, Beta]"));
    }

    #[tokio::test]
    async fn functional_clear_sentinel_empties_the_keyword_list() {
        let harness = harness(&["@boss"]);
        let mut config = config_of(&harness);
        config.keyword_contain = vec!["ca".to_string(), "news".to_string()];
        harness.repository.save(&config).expect("seed");
        send(&harness, "boss", "/set_keyword_contain").await;
        send(&harness, "boss", "clear").await;
        assert!(config_of(&harness).keyword_contain.is_empty());
        assert_eq!(harness.gateway.last_reply(), "All substring keywords cleared.");
    }

    #[tokio::test]
    async fn regression_oversized_keyword_reply_leaves_the_list_unchanged() {
        let harness = harness(&["@boss"]);
        let stored: Vec<String> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|kw| kw.to_string())
            .collect();
        let mut config = config_of(&harness);
        config.keyword_initial = stored.clone();
        harness.repository.save(&config).expect("seed");
        send(&harness, "boss", "/set_keyword_initial").await;
        send(&harness, "boss", "1,2,3,4,5,6").await;
        assert_eq!(config_of(&harness).keyword_initial, stored);
        assert!(harness.gateway.last_reply().contains("exceeds the limit of 5"));
    }

    #[tokio::test]
    async fn regression_failed_validation_consumes_the_flow() {
        let harness = harness(&["@boss"]);
        send(&harness, "boss", "/set_keyword_initial").await;
        send(&harness, "boss", "1,2,3,4,5,6").await;
        // The flow was consumed; this reply is neither continuation nor command.
        send(&harness, "boss", "a,b").await;
        assert!(config_of(&harness).keyword_initial.is_empty());
        assert_eq!(harness.gateway.replies().len(), 2);
    }

    #[tokio::test]
    async fn unit_blank_keyword_reply_is_a_format_error() {
        let harness = harness(&["@boss"]);
        send(&harness, "boss", "/set_keyword_initial").await;
        send(&harness, "boss", " , , ").await;
        assert!(config_of(&harness).keyword_initial.is_empty());
        assert!(harness.gateway.last_reply().contains("No keywords found"));
    }

    #[tokio::test]
    async fn functional_monitor_channel_requires_a_resolvable_id() {
        let harness = harness(&["@boss"]);
        send(&harness, "boss", "/set_monitor_channel").await;
        send(&harness, "boss", "-100999").await;
        assert_eq!(config_of(&harness).monitor_channel, None);
        assert!(harness
            .gateway
            .last_reply()
            .contains("Could not resolve channel -100999"));

        harness.gateway.add_channel("-100111", "Alerts");
        send(&harness, "boss", "/set_monitor_channel").await;
        send(&harness, "boss", "-100111").await;
        assert_eq!(
            config_of(&harness).monitor_channel.as_deref(),
            Some("-100111")
        );
        assert_eq!(
            harness.gateway.last_reply(),
            "Monitored channel set to Alerts (-100111)."
        );
    }

    #[tokio::test]
    async fn functional_monitor_channel_set_always_overwrites() {
        let harness = harness(&["@boss"]);
        harness.gateway.add_channel("-100111", "Alerts");
        harness.gateway.add_channel("-100112", "Backup");
        for id in ["-100111", "-100112"] {
            send(&harness, "boss", "/set_monitor_channel").await;
            send(&harness, "boss", id).await;
        }
        assert_eq!(
            config_of(&harness).monitor_channel.as_deref(),
            Some("-100112")
        );
        assert!(harness
            .audit_body()
            .contains("@boss changed monitor channel from -100111 to -100112"));
    }

    #[tokio::test]
    async fn functional_sending_channels_replace_wholesale_when_all_resolve() {
        let harness = harness(&["@boss"]);
        harness.gateway.add_channel("-100222", "Out one");
        harness.gateway.add_channel("-100333", "Out two");
        send(&harness, "boss", "/set_sending_channel").await;
        send(&harness, "boss", "-100222, -100333").await;
        assert_eq!(
            config_of(&harness).sending_channels,
            vec!["-100222", "-100333"]
        );
        assert_eq!(
            harness.gateway.last_reply(),
            "Sending channels set to: -100222, -100333"
        );
    }

    #[tokio::test]
    async fn regression_one_unresolvable_sending_channel_rejects_the_batch() {
        let harness = harness(&["@boss"]);
        harness.gateway.add_channel("-100222", "Out one");
        harness.gateway.add_channel("-100444", "Out three");
        send(&harness, "boss", "/set_sending_channel").await;
        send(&harness, "boss", "-100222,-100333,-100444").await;
        assert!(config_of(&harness).sending_channels.is_empty());
        assert!(harness
            .gateway
            .last_reply()
            .contains("Could not resolve channel -100333"));
    }

    #[tokio::test]
    async fn regression_four_sending_channels_exceed_the_limit() {
        let harness = harness(&["@boss"]);
        send(&harness, "boss", "/set_sending_channel").await;
        send(&harness, "boss", "-1,-2,-3,-4").await;
        assert!(config_of(&harness).sending_channels.is_empty());
        assert!(harness.gateway.last_reply().contains("exceeds the limit of 3"));
    }

    #[tokio::test]
    async fn functional_add_admin_normalizes_and_is_idempotent() {
        let harness = harness(&["@boss"]);
        send(&harness, "boss", "/add_admin").await;
        send(&harness, "boss", "NewAdmin").await;
        assert_eq!(config_of(&harness).admins, vec!["@boss", "@newadmin"]);

        send(&harness, "boss", "/add_admin").await;
        send(&harness, "boss", "@newadmin").await;
        assert_eq!(config_of(&harness).admins, vec!["@boss", "@newadmin"]);
        assert_eq!(harness.gateway.last_reply(), "@newadmin is already an admin.");
    }

    #[tokio::test]
    async fn functional_rm_admin_lists_then_removes_by_one_based_index() {
        let harness = harness(&["@boss"]);
        let mut config = config_of(&harness);
        config.admins = vec!["@a".to_string(), "@b".to_string(), "@c".to_string()];
        harness.repository.save(&config).expect("seed");
        send(&harness, "boss", "/rm_admin").await;
        assert!(harness.gateway.last_reply().contains("1. @a"));
        send(&harness, "boss", "1").await;
        assert_eq!(config_of(&harness).admins, vec!["@b", "@c"]);
        assert_eq!(harness.gateway.last_reply(), "Removed admin @a.");
    }

    #[tokio::test]
    async fn regression_rm_admin_rejects_an_out_of_range_index() {
        let harness = harness(&["@boss"]);
        let mut config = config_of(&harness);
        config.admins = vec!["@a".to_string(), "@b".to_string(), "@c".to_string()];
        harness.repository.save(&config).expect("seed");
        send(&harness, "boss", "/rm_admin").await;
        send(&harness, "boss", "4").await;
        assert_eq!(config_of(&harness).admins, vec!["@a", "@b", "@c"]);
        assert!(harness
            .gateway
            .last_reply()
            .contains("4 is not a valid admin number"));
    }

    #[tokio::test]
    async fn regression_rm_admin_rejects_a_non_integer_reply() {
        let harness = harness(&["@boss"]);
        send(&harness, "boss", "/rm_admin").await;
        send(&harness, "boss", "first").await;
        assert_eq!(config_of(&harness).admins, vec!["@boss"]);
        assert!(harness.gateway.last_reply().contains("plain number"));
    }

    #[tokio::test]
    async fn unit_rm_admin_with_no_admins_registers_no_flow() {
        let harness = harness(&["@boss"]);
        let mut config = config_of(&harness);
        config.admins.clear();
        harness.repository.save(&config).expect("seed");
        // Gate passes via the super-admin set even with an empty admin list.
        send(&harness, "boss", "/rm_admin").await;
        assert_eq!(harness.gateway.last_reply(), "There are no admins to remove.");
        send(&harness, "boss", "1").await;
        assert_eq!(harness.gateway.replies().len(), 1);
    }

    #[tokio::test]
    async fn unit_non_admin_is_denied_and_the_denial_is_logged() {
        let harness = harness(&["@boss"]);
        send(&harness, "stranger", "/set_keyword_initial").await;
        assert!(harness
            .gateway
            .last_reply()
            .contains("Sorry @stranger, you are not allowed"));
        assert!(harness
            .audit_body()
            .contains("denied @stranger for /set_keyword_initial"));
        // No flow was registered for the denied prompt.
        send(&harness, "stranger", "a,b").await;
        assert!(config_of(&harness).keyword_initial.is_empty());
    }

    #[tokio::test]
    async fn functional_help_and_group_id_require_no_authorization() {
        let harness = harness(&["@boss"]);
        send(&harness, "stranger", "/help").await;
        assert!(harness.gateway.last_reply().contains("/set_monitor_channel"));
        send(&harness, "stranger", "/get_group_id").await;
        assert!(harness.gateway.last_reply().contains("10"));
    }

    #[tokio::test]
    async fn functional_status_degrades_to_unknown_channel_labels() {
        let harness = harness(&["@boss"]);
        harness.gateway.add_channel("-100222", "Out one");
        let mut config = config_of(&harness);
        config.monitor_channel = Some("-100999".to_string());
        config.keyword_initial = vec!["alpha".to_string()];
        config.sending_channels = vec!["-100222".to_string(), "-100333".to_string()];
        harness.repository.save(&config).expect("seed");
        send(&harness, "boss", "/status").await;
        let status = harness.gateway.last_reply();
        assert!(status.contains("unknown channel (-100999)"));
        assert!(status.contains("> prefix: alpha"));
        assert!(status.contains("[1] Out one (-100222)"));
        assert!(status.contains("[2] unknown channel (-100333)"));
    }

    #[tokio::test]
    async fn unit_plain_chatter_and_messages_without_text_are_ignored() {
        let harness = harness(&["@boss"]);
        send(&harness, "boss", "good morning").await;
        let mut update = message_update(10, "boss", "ignored");
        update.message.as_mut().expect("message").text = None;
        harness.engine.handle_update(&update).await.expect("handle");
        assert!(harness.gateway.replies().is_empty());
    }

    #[tokio::test]
    async fn integration_monitored_post_flows_end_to_end() {
        let harness = harness(&["@boss"]);
        let mut config = config_of(&harness);
        config.monitor_channel = Some("-100111".to_string());
        config.sending_channels = vec!["-100222".to_string()];
        harness.repository.save(&config).expect("seed");
        harness
            .engine
            .handle_update(&channel_post(-100_111, 5, Some("anything")))
            .await
            .expect("handle post");
        assert_eq!(
            harness.gateway.sent(),
            vec![("-100222".to_string(), "anything".to_string())]
        );
    }

    #[tokio::test]
    async fn regression_pending_flow_swallows_text_that_looks_like_a_command() {
        let harness = harness(&["@boss"]);
        harness.gateway.add_channel("/status", "Oddly named");
        send(&harness, "boss", "/set_monitor_channel").await;
        send(&harness, "boss", "/status").await;
        // The reply was consumed by the continuation, not parsed as a command.
        assert_eq!(
            config_of(&harness).monitor_channel.as_deref(),
            Some("/status")
        );
    }
}
