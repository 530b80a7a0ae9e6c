//! Periodic background work.
//!
//! Both loops run for the life of the process and never stop on error.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, interval, interval_at};
use tracing::{error, info};

use crate::database::{AfkRepository, Database, afk_cutoff};

const AFK_SWEEP_EVERY: Duration = Duration::from_secs(60);
const AFK_SWEEP_DELAY: Duration = Duration::from_secs(10);
const CLEANUP_EVERY: Duration = Duration::from_secs(24 * 60 * 60);

/// Drop AFK records older than `timeout`.
pub fn spawn_afk_sweep(afk: Arc<AfkRepository>, timeout: Duration) {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + AFK_SWEEP_DELAY, AFK_SWEEP_EVERY);
        loop {
            ticker.tick().await;
            let cutoff = afk_cutoff(chrono::Utc::now().timestamp(), timeout);
            match afk.sweep(cutoff).await {
                Ok(0) => {}
                Ok(n) => info!("AFK sweep cleared {} expired record(s)", n),
                Err(e) => error!("AFK sweep failed: {}", e),
            }
        }
    });
}

/// Delete warns, notes and filters past the retention window, daily.
pub fn spawn_retention_cleanup(db: Arc<Database>) {
    tokio::spawn(async move {
        let mut ticker = interval(CLEANUP_EVERY);
        loop {
            ticker.tick().await;
            match db.cleanup_old_data(chrono::Utc::now().timestamp()).await {
                Ok(report) => info!(
                    "Retention cleanup removed {} document(s) (warns: {}, notes: {}, filters: {})",
                    report.total(),
                    report.warns,
                    report.notes,
                    report.filters
                ),
                Err(e) => error!("Retention cleanup failed: {}", e),
            }
        }
    });
}
