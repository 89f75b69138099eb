//! Core decision logic for the sift relay.
//!
//! Holds the persisted configuration document, the keyword rule engine, the
//! authorization gate, and the injectable clock. Everything here is pure with
//! respect to I/O; transports and stores live in sibling crates.

pub mod admin;
pub mod clock;
pub mod config;
pub mod rules;

pub use admin::{is_admin, normalize_handle};
pub use clock::{Clock, FixedClock, LocalClock};
pub use config::{
    RelayConfig, CONFIG_STORE_KEY, MAX_CONTAIN_KEYWORDS, MAX_PREFIX_KEYWORDS,
    MAX_SENDING_CHANNELS,
};
pub use rules::{decide, RuleDecision};
