//! Per-conversation interactive flow state.
//!
//! A prompt command moves its conversation from idle to awaiting one reply;
//! the next message consumes the registration exactly once, whether the
//! continuation succeeds or fails validation. Retrying means reissuing the
//! original command.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};

/// Continuation expected to consume the next message of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingInput {
    MonitorChannel,
    KeywordInitial,
    KeywordContain,
    SendingChannels,
    AdminHandle,
    AdminRemovalIndex,
}

#[derive(Debug, Default)]
pub struct FlowRegistry {
    pending: Mutex<HashMap<i64, PendingInput>>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `input` as the consumer of the next message in
    /// `conversation`, replacing any earlier registration there.
    pub fn register(&self, conversation: i64, input: PendingInput) -> Result<()> {
        self.lock()?.insert(conversation, input);
        Ok(())
    }

    /// Takes and clears the registration for `conversation`, if any.
    pub fn take(&self, conversation: i64) -> Result<Option<PendingInput>> {
        Ok(self.lock()?.remove(&conversation))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<i64, PendingInput>>> {
        self.pending
            .lock()
            .map_err(|_| anyhow!("flow registry mutex is poisoned"))
    }
}
