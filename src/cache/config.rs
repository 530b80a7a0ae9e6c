//! Cache configuration.

use std::time::Duration;

/// Configuration for a cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Time-to-live for cache entries.
    /// After this duration, entries are automatically evicted.
    pub ttl: Option<Duration>,

    /// Time-to-idle for cache entries.
    /// Entries are evicted if not accessed within this duration.
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)), // 5 minutes
            tti: None,
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with the given max capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    /// Set time-to-idle for cache entries.
    #[must_use]
    pub fn tti(mut self, duration: Duration) -> Self {
        self.tti = Some(duration);
        self
    }

    /// Disable TTL (entries never expire based on time).
    #[must_use]
    pub fn no_ttl(mut self) -> Self {
        self.ttl = None;
        self
    }

    /// Per-user scratch counters: idle users drop out on their own.
    pub fn scratch(max_capacity: u64, idle: Duration) -> Self {
        Self::with_capacity(max_capacity).no_ttl().tti(idle)
    }

    /// Short-lived one-shot tokens.
    pub fn tokens(ttl: Duration) -> Self {
        Self::with_capacity(1_000).ttl(ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_preset() {
        let config = CacheConfig::scratch(500, Duration::from_secs(60));
        assert_eq!(config.max_capacity, 500);
        assert!(config.ttl.is_none());
        assert_eq!(config.tti, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_tokens_preset() {
        let config = CacheConfig::tokens(Duration::from_secs(600));
        assert_eq!(config.ttl, Some(Duration::from_secs(600)));
        assert!(config.tti.is_none());
    }
}
