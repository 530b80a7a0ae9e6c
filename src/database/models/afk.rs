//! AFK status model.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A user who declared themselves away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AfkStatus {
    pub user_id: u64,
    pub reason: String,
    /// Unix timestamp when the user went AFK.
    pub since: i64,
}

impl AfkStatus {
    pub fn new(user_id: u64, reason: impl Into<String>) -> Self {
        Self {
            user_id,
            reason: reason.into(),
            since: chrono::Utc::now().timestamp(),
        }
    }

    /// Seconds spent AFK as of `now`. Clock skew clamps to zero.
    pub fn elapsed(&self, now: i64) -> u64 {
        now.saturating_sub(self.since).max(0) as u64
    }

    /// Past the timeout the status is no longer announced.
    pub fn is_expired(&self, now: i64, timeout: Duration) -> bool {
        self.elapsed(now) >= timeout.as_secs()
    }
}

/// Oldest `since` that is still live.
pub fn afk_cutoff(now: i64, timeout: Duration) -> i64 {
    let secs = i64::try_from(timeout.as_secs()).unwrap_or(i64::MAX);
    now.saturating_sub(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(since: i64) -> AfkStatus {
        AfkStatus {
            user_id: 1,
            reason: "lunch".into(),
            since,
        }
    }

    #[test]
    fn test_elapsed() {
        assert_eq!(status(1_000).elapsed(1_090), 90);
        assert_eq!(status(2_000).elapsed(1_000), 0);
    }

    #[test]
    fn test_expiry_boundary() {
        let timeout = Duration::from_secs(3600);
        let afk = status(10_000);
        assert!(!afk.is_expired(10_000 + 3599, timeout));
        assert!(afk.is_expired(10_000 + 3600, timeout));
    }

    #[test]
    fn test_cutoff_matches_expiry() {
        let timeout = Duration::from_secs(600);
        let now = 50_000;
        let cutoff = afk_cutoff(now, timeout);
        assert!(status(cutoff).is_expired(now, timeout));
        assert!(!status(cutoff + 1).is_expired(now, timeout));
    }

    #[test]
    fn test_cutoff_saturates() {
        let now = 1_700_000_000;
        assert_eq!(afk_cutoff(now, Duration::from_secs(u64::MAX)), now - i64::MAX);
        assert_eq!(afk_cutoff(-10, Duration::from_secs(u64::MAX)), i64::MIN);
        assert!(afk_cutoff(now, Duration::from_secs(u64::MAX)) < now);
    }
}
