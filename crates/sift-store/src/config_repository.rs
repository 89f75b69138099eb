//! Load/save of the persisted relay configuration document.

use std::sync::Arc;

use anyhow::{Context, Result};
use sift_core::{RelayConfig, CONFIG_STORE_KEY};

use crate::object_store::ObjectStore;

/// Repository for the single `config.json` document.
///
/// The store is the sole source of truth: every mutation is a full read then
/// a full write, last write wins. Races between two concurrent admins are an
/// accepted part of the contract.
#[derive(Clone)]
pub struct ConfigRepository {
    store: Arc<dyn ObjectStore>,
    super_admins: Vec<String>,
}

impl ConfigRepository {
    pub fn new(store: Arc<dyn ObjectStore>, super_admins: Vec<String>) -> Self {
        Self {
            store,
            super_admins,
        }
    }

    /// Returns the stored document, or the bootstrap defaults when none has
    /// been written yet. The default is not persisted until the first
    /// mutation.
    pub fn load_or_default(&self) -> Result<RelayConfig> {
        match self.store.get(CONFIG_STORE_KEY)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .context("failed to parse stored relay configuration"),
            None => Ok(RelayConfig::bootstrap(&self.super_admins)),
        }
    }

    pub fn save(&self, config: &RelayConfig) -> Result<()> {
        let mut payload = serde_json::to_string_pretty(config)
            .context("failed to serialize relay configuration")?;
        payload.push('\n');
        self.store.put(CONFIG_STORE_KEY, payload.as_bytes())
    }
}
