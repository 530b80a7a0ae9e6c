//! Typed cache wrapper around Moka.

use std::hash::Hash;
use std::sync::Arc;

use moka::sync::Cache;

use super::CacheConfig;

/// A named, bounded cache.
///
/// Cloning is cheap and shares the same underlying store.
pub struct TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Cache<K, V>>,
    name: Arc<str>,
}

// Manual Clone implementation that doesn't require K: Clone, V: Clone
impl<K, V> Clone for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            name: Arc::clone(&self.name),
        }
    }
}

impl<K, V> TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a new typed cache with the given name and config.
    pub fn new(name: impl Into<Arc<str>>, config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        Self {
            inner: Arc::new(builder.build()),
            name: name.into(),
        }
    }

    /// Insert a key-value pair into the cache.
    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    /// Get a value from the cache.
    ///
    /// Returns `Some(value)` if the key exists and hasn't expired.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    /// Remove a key and hand back its value, if still live.
    pub fn take(&self, key: &K) -> Option<V> {
        self.inner.remove(key)
    }

}

impl<K, V> std::fmt::Debug for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedCache")
            .field("name", &self.name)
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_consumes_entry() {
        let cache: TypedCache<String, u32> = TypedCache::new("test", CacheConfig::with_capacity(10));
        cache.insert("a".to_string(), 1);

        assert_eq!(cache.take(&"a".to_string()), Some(1));
        assert_eq!(cache.take(&"a".to_string()), None);
    }

    #[test]
    fn test_clone_shares_store() {
        let cache: TypedCache<u64, u64> = TypedCache::new("shared", CacheConfig::default());
        let other = cache.clone();
        other.insert(7, 49);
        assert_eq!(cache.get(&7), Some(49));

        cache.take(&7);
        assert_eq!(other.get(&7), None);
    }
}
