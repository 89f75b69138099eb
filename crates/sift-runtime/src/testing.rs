//! Test doubles and fixture builders shared by the runtime tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::TimeZone;
use sift_core::FixedClock;
use sift_store::{AuditLog, ConfigRepository, MemoryObjectStore, ObjectStore};
use sift_telegram::{Chat, ChatGateway, IncomingMessage, Sender, Update};

use crate::engine::RelayEngine;

/// Recording gateway: resolution succeeds only for channels added with
/// [`FakeGateway::add_channel`], and sends fail for destinations marked with
/// [`FakeGateway::fail_destination`].
#[derive(Default)]
pub(crate) struct FakeGateway {
    known_channels: Mutex<HashMap<String, String>>,
    failing_destinations: Mutex<HashSet<String>>,
    replies: Mutex<Vec<(i64, String)>>,
    sent: Mutex<Vec<(String, String)>>,
}

impl FakeGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_channel(&self, id: &str, title: &str) {
        self.known_channels
            .lock()
            .unwrap()
            .insert(id.to_string(), title.to_string());
    }

    pub(crate) fn fail_destination(&self, id: &str) {
        self.failing_destinations
            .lock()
            .unwrap()
            .insert(id.to_string());
    }

    pub(crate) fn replies(&self) -> Vec<String> {
        self.replies
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub(crate) fn last_reply(&self) -> String {
        self.replies().last().cloned().unwrap_or_default()
    }

    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatGateway for FakeGateway {
    async fn resolve_channel(&self, channel_id: &str) -> Result<String> {
        match self.known_channels.lock().unwrap().get(channel_id) {
            Some(title) => Ok(title.clone()),
            None => bail!("chat not found: {channel_id}"),
        }
    }

    async fn send_text(&self, channel_id: &str, text: &str) -> Result<()> {
        if self
            .failing_destinations
            .lock()
            .unwrap()
            .contains(channel_id)
        {
            bail!("delivery refused for {channel_id}");
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn forward_post(
        &self,
        _dest_channel_id: &str,
        _source_channel_id: &str,
        _message_id: i64,
    ) -> Result<()> {
        Ok(())
    }

    async fn reply(&self, chat_id: i64, _message_id: i64, text: &str) -> Result<()> {
        self.replies
            .lock()
            .unwrap()
            .push((chat_id, text.to_string()));
        Ok(())
    }
}

pub(crate) const ADMIN_CHAT: i64 = 10;

pub(crate) fn command_message(username: &str, text: &str) -> Update {
    message_update(ADMIN_CHAT, username, text)
}

pub(crate) fn message_update(chat_id: i64, username: &str, text: &str) -> Update {
    Update {
        update_id: 1,
        message: Some(IncomingMessage {
            message_id: 100,
            chat: Chat {
                id: chat_id,
                title: None,
                kind: "group".to_string(),
            },
            from: Some(Sender {
                username: Some(username.to_string()),
            }),
            text: Some(text.to_string()),
        }),
        channel_post: None,
    }
}

pub(crate) fn channel_post(chat_id: i64, message_id: i64, text: Option<&str>) -> Update {
    Update {
        update_id: 2,
        message: None,
        channel_post: Some(IncomingMessage {
            message_id,
            chat: Chat {
                id: chat_id,
                title: Some("Source".to_string()),
                kind: "channel".to_string(),
            },
            from: None,
            text: text.map(str::to_string),
        }),
    }
}

pub(crate) struct Harness {
    pub(crate) gateway: Arc<FakeGateway>,
    pub(crate) engine: RelayEngine,
    pub(crate) repository: ConfigRepository,
    pub(crate) store: Arc<MemoryObjectStore>,
}

impl Harness {
    pub(crate) fn audit_body(&self) -> String {
        self.store
            .get("logs/2025-01-10.log")
            .expect("get audit log")
            .map(|bytes| String::from_utf8(bytes).expect("utf8"))
            .unwrap_or_default()
    }
}

pub(crate) fn harness(super_admins: &[&str]) -> Harness {
    let gateway = Arc::new(FakeGateway::new());
    let store = Arc::new(MemoryObjectStore::new());
    let super_admins: Vec<String> = super_admins.iter().map(|handle| handle.to_string()).collect();
    let repository = ConfigRepository::new(store.clone(), super_admins.clone());
    let instant = chrono_tz::Asia::Shanghai
        .with_ymd_and_hms(2025, 1, 10, 12, 0, 0)
        .unwrap();
    let audit = AuditLog::new(store.clone(), Arc::new(FixedClock(instant)));
    let engine = RelayEngine::new(gateway.clone(), repository.clone(), audit, super_admins);
    Harness {
        gateway,
        engine,
        repository,
        store,
    }
}
