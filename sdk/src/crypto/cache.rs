//! # Keypair Cache
//!
//! Deriving a keypair costs a hash, a ladder and a scalar inversion. Wallets
//! that sign repeatedly for the same passphrase keep the result here.
//!
//! The cache is an explicit object: nothing in the crate holds one globally.
//! Entries are keyed by the SHA-256 of the passphrase (the derivation seed),
//! so the passphrase text itself is never stored. When full, the oldest
//! entry is evicted first.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::hash::{sha256, Digest32};
use super::keys::KeyPair;
use crate::config::DEFAULT_KEY_CACHE_CAPACITY;

/// Tunable parameters for a [`KeyCache`].
#[derive(Debug, Clone)]
pub struct KeyCacheConfig {
    /// Maximum number of keypairs held at once. Zero disables caching.
    pub capacity: usize,
}

impl Default for KeyCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_KEY_CACHE_CAPACITY,
        }
    }
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<Digest32, Arc<KeyPair>>,
    order: VecDeque<Digest32>,
}

/// Thread-safe passphrase to keypair memo.
pub struct KeyCache {
    config: KeyCacheConfig,
    inner: Mutex<CacheInner>,
}

impl KeyCache {
    pub fn new(config: KeyCacheConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Return the cached keypair for `passphrase`, deriving it on a miss.
    pub fn get_or_derive(&self, passphrase: &str) -> Arc<KeyPair> {
        let seed = sha256(passphrase.as_bytes());

        if let Some(kp) = self.inner.lock().entries.get(&seed) {
            trace!(public_key = %kp.public_key(), "key cache hit");
            return Arc::clone(kp);
        }

        // Derive outside the lock; a racing thread may derive the same pair.
        let kp = Arc::new(KeyPair::from_private_key(seed));
        if self.config.capacity == 0 {
            return kp;
        }

        let mut inner = self.inner.lock();
        if let Some(existing) = inner.entries.get(&seed) {
            return Arc::clone(existing);
        }
        while inner.entries.len() >= self.config.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
            debug!(capacity = self.config.capacity, "key cache full, evicted oldest entry");
        }
        inner.entries.insert(seed, Arc::clone(&kp));
        inner.order.push_back(seed);
        kp
    }

    /// Drop the entry for `passphrase`. Returns whether one was present.
    pub fn evict(&self, passphrase: &str) -> bool {
        let seed = sha256(passphrase.as_bytes());
        let mut inner = self.inner.lock();
        inner.order.retain(|s| *s != seed);
        inner.entries.remove(&seed).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
        debug!("key cache cleared");
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }
}

impl Default for KeyCache {
    fn default() -> Self {
        Self::new(KeyCacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn hit_returns_same_allocation() {
        let cache = KeyCache::default();
        let a = cache.get_or_derive("user1");
        let b = cache.get_or_derive("user1");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, KeyPair::from_passphrase("user1"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn oldest_entry_is_evicted() {
        let cache = KeyCache::new(KeyCacheConfig { capacity: 2 });
        let first = cache.get_or_derive("one");
        cache.get_or_derive("two");
        cache.get_or_derive("three");
        assert_eq!(cache.len(), 2);
        // "one" was evicted, so this is a fresh derivation.
        let again = cache.get_or_derive("one");
        assert!(!Arc::ptr_eq(&first, &again));
        assert_eq!(*first, *again);
    }

    #[test]
    fn explicit_evict_and_clear() {
        let cache = KeyCache::default();
        cache.get_or_derive("a");
        cache.get_or_derive("b");
        assert!(cache.evict("a"));
        assert!(!cache.evict("a"));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_never_stores() {
        let cache = KeyCache::new(KeyCacheConfig { capacity: 0 });
        let kp = cache.get_or_derive("user3");
        assert_eq!(kp.account_id().to_string(), "1522541402758811473");
        assert!(cache.is_empty());
    }

    #[test]
    fn shared_across_threads() {
        let cache = Arc::new(KeyCache::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get_or_derive("shared").public_key())
            })
            .collect();
        let keys: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(keys.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(cache.len(), 1);
    }
}
