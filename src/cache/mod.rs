//! In-memory caches built on Moka.
//!
//! Persistent data is never cached here; these caches only hold
//! process-local scratch state that must stay bounded:
//! - anti-spam counters per user
//! - pending broadcast/post confirmations
//!
//! ## Usage
//!
//! ```rust,ignore
//! let cache: TypedCache<u64, SpamState> = TypedCache::new("spam", CacheConfig::with_capacity(10_000));
//! cache.insert(user_id, state);
//! let state = cache.get(&user_id);
//! ```

mod config;
mod typed;

pub use config::CacheConfig;
pub use typed::TypedCache;
