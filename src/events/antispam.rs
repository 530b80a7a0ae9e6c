//! Per-user anti-spam counter.
//!
//! Two messages closer than [`RAPID_GAP`] count as rapid. Once a user
//! reaches [`SUPPRESS_AFTER`] rapid messages, everything they send is
//! ignored until they pause.

use std::time::{Duration, Instant};

use teloxide::types::UserId;
use tracing::debug;

use crate::cache::{CacheConfig, TypedCache};

pub const RAPID_GAP: Duration = Duration::from_secs(2);
pub const SUPPRESS_AFTER: u32 = 5;

/// Users idle for this long are forgotten.
const IDLE_EVICT: Duration = Duration::from_secs(60);
const MAX_TRACKED_USERS: u64 = 10_000;

#[derive(Debug, Clone, Copy)]
struct Burst {
    last: Instant,
    rapid: u32,
    warned: bool,
}

/// What to do with one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpamVerdict {
    Allow,
    /// First suppressed message of a burst: tell the user to slow down.
    Warn,
    /// Suppressed, already told.
    Silence,
}

impl SpamVerdict {
    pub fn is_suppressed(self) -> bool {
        self != Self::Allow
    }
}

#[derive(Clone)]
pub struct SpamGuard {
    bursts: TypedCache<u64, Burst>,
}

impl SpamGuard {
    pub fn new() -> Self {
        Self {
            bursts: TypedCache::new(
                "antispam",
                CacheConfig::scratch(MAX_TRACKED_USERS, IDLE_EVICT),
            ),
        }
    }

    pub fn check(&self, user_id: UserId) -> SpamVerdict {
        self.record_at(user_id.0, Instant::now())
    }

    fn record_at(&self, user_id: u64, now: Instant) -> SpamVerdict {
        let burst = match self.bursts.get(&user_id) {
            Some(prev) if now.saturating_duration_since(prev.last) < RAPID_GAP => Burst {
                last: now,
                rapid: prev.rapid + 1,
                warned: prev.warned,
            },
            _ => Burst {
                last: now,
                rapid: 0,
                warned: false,
            },
        };

        let verdict = if burst.rapid < SUPPRESS_AFTER {
            SpamVerdict::Allow
        } else if burst.warned {
            SpamVerdict::Silence
        } else {
            debug!("User {} is sending too fast, suppressing", user_id);
            SpamVerdict::Warn
        };

        self.bursts.insert(
            user_id,
            Burst {
                warned: burst.warned || verdict == SpamVerdict::Warn,
                ..burst
            },
        );
        verdict
    }
}

impl Default for SpamGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(start: Instant, millis: u64) -> Instant {
        start + Duration::from_millis(millis)
    }

    #[test]
    fn test_burst_is_suppressed_after_five_rapid_messages() {
        let guard = SpamGuard::new();
        let start = Instant::now();

        // First message plus four rapid ones pass
        for i in 0..5 {
            assert_eq!(guard.record_at(1, at(start, i * 100)), SpamVerdict::Allow);
        }
        assert_eq!(guard.record_at(1, at(start, 500)), SpamVerdict::Warn);
        assert_eq!(guard.record_at(1, at(start, 600)), SpamVerdict::Silence);
        assert_eq!(guard.record_at(1, at(start, 700)), SpamVerdict::Silence);
    }

    #[test]
    fn test_quiet_window_resets() {
        let guard = SpamGuard::new();
        let start = Instant::now();

        for i in 0..7 {
            guard.record_at(1, at(start, i * 100));
        }
        assert!(guard.record_at(1, at(start, 800)).is_suppressed());

        // A pause of at least two seconds starts over
        assert_eq!(guard.record_at(1, at(start, 2_800)), SpamVerdict::Allow);
        for i in 1..5 {
            assert_eq!(guard.record_at(1, at(start, 2_800 + i * 100)), SpamVerdict::Allow);
        }
        assert_eq!(guard.record_at(1, at(start, 3_300)), SpamVerdict::Warn);
    }

    #[test]
    fn test_users_are_tracked_independently() {
        let guard = SpamGuard::new();
        let start = Instant::now();

        for i in 0..6 {
            guard.record_at(1, at(start, i * 100));
        }
        assert!(guard.record_at(1, at(start, 650)).is_suppressed());
        assert_eq!(guard.record_at(2, at(start, 650)), SpamVerdict::Allow);
    }

    #[test]
    fn test_spaced_messages_never_suppressed() {
        let guard = SpamGuard::new();
        let start = Instant::now();

        for i in 0..20 {
            assert_eq!(guard.record_at(1, at(start, i * 2_000)), SpamVerdict::Allow);
        }
    }
}
