//! Persisted relay configuration document.
//!
//! One document per deployment, stored at [`CONFIG_STORE_KEY`]. List fields
//! carry hard cardinality caps; command handlers enforce them before any
//! persisted write.

use serde::{Deserialize, Serialize};

pub const CONFIG_STORE_KEY: &str = "config.json";

pub const MAX_PREFIX_KEYWORDS: usize = 5;
pub const MAX_CONTAIN_KEYWORDS: usize = 5;
pub const MAX_SENDING_CHANNELS: usize = 3;

/// The relay's runtime-mutable configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayConfig {
    /// The single channel whose posts are evaluated for forwarding.
    #[serde(default)]
    pub monitor_channel: Option<String>,
    /// Prefix-match rules, in precedence order.
    #[serde(default)]
    pub keyword_initial: Vec<String>,
    /// Substring-match rules, tested after every prefix rule.
    #[serde(default)]
    pub keyword_contain: Vec<String>,
    /// Destinations receiving copies of matched posts.
    #[serde(default)]
    pub sending_channels: Vec<String>,
    /// Handles allowed to mutate this document.
    #[serde(default)]
    pub admins: Vec<String>,
}

impl RelayConfig {
    /// Document used when the store has no configuration yet: nothing
    /// monitored, no rules, and the super admins seeded as the admin list.
    pub fn bootstrap(super_admins: &[String]) -> Self {
        Self {
            admins: super_admins.to_vec(),
            ..Self::default()
        }
    }
}
