//! Authorization gate for mutating commands.
//!
//! Handles are compared in one canonical form: `@`-prefixed and
//! Unicode-lowercased. The gate never errors; an absent handle is simply
//! unauthorized.

use crate::config::RelayConfig;

/// Canonicalizes a handle: trims, prepends the `@` sigil when missing, and
/// lowercases via Unicode `to_lowercase`. Returns `None` for empty input.
pub fn normalize_handle(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "@" {
        return None;
    }
    let with_sigil = if trimmed.starts_with('@') {
        trimmed.to_string()
    } else {
        format!("@{trimmed}")
    };
    Some(with_sigil.to_lowercase())
}

/// Returns true when `handle` may mutate configuration: its canonical form
/// appears in the persisted admin list or in the process-lifetime super-admin
/// set.
pub fn is_admin(handle: Option<&str>, config: &RelayConfig, super_admins: &[String]) -> bool {
    let Some(normalized) = handle.and_then(normalize_handle) else {
        return false;
    };
    config
        .admins
        .iter()
        .chain(super_admins.iter())
        .filter_map(|entry| normalize_handle(entry))
        .any(|entry| entry == normalized)
}
