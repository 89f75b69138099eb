//! Append-only audit log with per-day retention units.
//!
//! Each calendar day (in the configured timezone) maps to one plain-text
//! object under `logs/`; records are read-modify-write appends against the
//! store. Units older than the trailing retention window are deleted.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use sift_core::Clock;

use crate::object_store::ObjectStore;

pub const LOG_KEY_PREFIX: &str = "logs/";
pub const LOG_RETENTION_DAYS: i64 = 3;

/// Human-readable audit trail of every user-visible action.
#[derive(Clone)]
pub struct AuditLog {
    store: Arc<dyn ObjectStore>,
    clock: Arc<dyn Clock>,
}

impl AuditLog {
    pub fn new(store: Arc<dyn ObjectStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Appends `event` to today's retention unit.
    pub fn record(&self, event: &str) -> Result<()> {
        let now = self.clock.now();
        let key = day_key(now.date_naive());
        let line = format!("{} - {event}\n", now.format("%Y-%m-%d %H:%M:%S"));
        let mut content = match self.store.get(&key)? {
            Some(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            None => String::new(),
        };
        content.push_str(&line);
        self.store
            .put(&key, content.as_bytes())
            .with_context(|| format!("failed to append audit log {key}"))
    }

    /// Deletes retention units whose day is older than the trailing
    /// [`LOG_RETENTION_DAYS`] window and returns the removed keys. Keys whose
    /// stem does not parse as a day are left alone.
    pub fn prune_expired(&self) -> Result<Vec<String>> {
        let cutoff = self.clock.now().date_naive() - Duration::days(LOG_RETENTION_DAYS);
        let mut removed = Vec::new();
        for key in self.store.list(LOG_KEY_PREFIX)? {
            let Some(day) = parse_day_key(&key) else {
                continue;
            };
            if day < cutoff {
                self.store.delete(&key)?;
                removed.push(key);
            }
        }
        for key in &removed {
            self.record(&format!("removed expired audit log {key}"))?;
        }
        Ok(removed)
    }
}

fn day_key(day: NaiveDate) -> String {
    format!("{LOG_KEY_PREFIX}{}.log", day.format("%Y-%m-%d"))
}

fn parse_day_key(key: &str) -> Option<NaiveDate> {
    let stem = key.strip_prefix(LOG_KEY_PREFIX)?.strip_suffix(".log")?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use sift_core::FixedClock;

    use crate::object_store::MemoryObjectStore;

    use super::*;

    fn audit_at(day: u32, hour: u32) -> (Arc<MemoryObjectStore>, AuditLog) {
        let instant = chrono_tz::Asia::Shanghai
            .with_ymd_and_hms(2025, 1, day, hour, 15, 30)
            .unwrap();
        let store = Arc::new(MemoryObjectStore::new());
        let audit = AuditLog::new(store.clone(), Arc::new(FixedClock(instant)));
        (store, audit)
    }

    fn content(store: &MemoryObjectStore, key: &str) -> String {
        String::from_utf8(store.get(key).expect("get").expect("present")).expect("utf8")
    }

    #[test]
    fn functional_record_appends_timestamped_lines_to_day_key() {
        let (store, audit) = audit_at(10, 12);
        audit.record("first event").expect("record");
        audit.record("second event").expect("record");
        let body = content(&store, "logs/2025-01-10.log");
        assert_eq!(
            body,
            "2025-01-10 12:15:30 - first event\n2025-01-10 12:15:30 - second event\n"
        );
    }

    #[test]
    fn functional_prune_removes_only_days_past_the_window() {
        let (store, audit) = audit_at(10, 0);
        for stem in ["2025-01-06", "2025-01-07", "2025-01-08", "2025-01-10"] {
            store
                .put(&format!("logs/{stem}.log"), b"line\n")
                .expect("seed");
        }
        let removed = audit.prune_expired().expect("prune");
        assert_eq!(removed, vec!["logs/2025-01-06.log"]);
        assert_eq!(store.get("logs/2025-01-06.log").expect("get"), None);
        assert!(store.get("logs/2025-01-07.log").expect("get").is_some());
        assert!(content(&store, "logs/2025-01-10.log").contains("removed expired audit log"));
    }

    #[test]
    fn regression_prune_skips_keys_without_a_day_stem() {
        let (store, audit) = audit_at(10, 0);
        store.put("logs/notes.txt", b"keep me\n").expect("seed");
        store.put("logs/2024-12-01.log", b"old\n").expect("seed");
        let removed = audit.prune_expired().expect("prune");
        assert_eq!(removed, vec!["logs/2024-12-01.log"]);
        assert!(store.get("logs/notes.txt").expect("get").is_some());
    }

    #[test]
    fn unit_prune_with_nothing_expired_is_quiet() {
        let (store, audit) = audit_at(10, 0);
        store.put("logs/2025-01-09.log", b"fresh\n").expect("seed");
        assert!(audit.prune_expired().expect("prune").is_empty());
        assert_eq!(store.get("logs/2025-01-10.log").expect("get"), None);
    }
}
