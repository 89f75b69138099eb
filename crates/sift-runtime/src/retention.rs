//! Daily audit-log cleanup scheduling.
//!
//! The loop polls once per minute and runs a cleanup whenever the local
//! calendar date differs from the date of the last run, which also fires one
//! cleanup unconditionally at startup.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use sift_core::Clock;
use sift_store::AuditLog;

const CLEANUP_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// True when a cleanup should run now: never run before, or the local day
/// has rolled over since the last run.
pub fn cleanup_due(last_run: Option<NaiveDate>, today: NaiveDate) -> bool {
    last_run != Some(today)
}

/// Drives [`AuditLog::prune_expired`] for the process lifetime. Errors are
/// logged and the loop keeps going.
pub async fn run_retention_loop(audit: AuditLog, clock: Arc<dyn Clock>) {
    let mut last_run: Option<NaiveDate> = None;
    loop {
        let today = clock.now().date_naive();
        if cleanup_due(last_run, today) {
            match audit.prune_expired() {
                Ok(removed) if !removed.is_empty() => {
                    tracing::info!("removed {} expired audit log(s)", removed.len());
                }
                Ok(_) => {}
                Err(error) => tracing::warn!("audit log cleanup failed: {:#}", error),
            }
            last_run = Some(today);
        }
        tokio::time::sleep(CLEANUP_POLL_INTERVAL).await;
    }
}
