//! Handshake configuration cache.
//!
//! Entries are keyed by block name, pinned block version and trigger name, so
//! a block upgrade (new version) always misses. Both "configured" and "not
//! configured" answers are cached; lookup failures never are.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use flowhook_types::config::CacheSettings;
use flowhook_types::handshake::HandshakeConfiguration;

/// Cache key for a trigger's handshake configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandshakeCacheKey {
    pub block_name: String,
    pub block_version: String,
    pub trigger_name: String,
}

impl HandshakeCacheKey {
    pub fn new(block_name: &str, block_version: &str, trigger_name: &str) -> Self {
        Self {
            block_name: block_name.to_string(),
            block_version: block_version.to_string(),
            trigger_name: trigger_name.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    config: Option<HandshakeConfiguration>,
    inserted_at: Instant,
}

/// Concurrent, optionally time-bounded cache of handshake configurations.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct HandshakeConfigCache {
    entries: Arc<DashMap<HandshakeCacheKey, CacheEntry>>,
    ttl: Option<Duration>,
}

impl HandshakeConfigCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Build a cache from settings, `None` when caching is disabled.
    pub fn from_settings(settings: &CacheSettings) -> Option<Self> {
        settings.enabled.then(|| Self::new(settings.ttl()))
    }

    /// Look up a cached answer.
    ///
    /// The outer `Option` is the cache hit; the inner one is the cached
    /// configuration, `None` when the trigger declares no handshake.
    pub fn get(&self, key: &HandshakeCacheKey) -> Option<Option<HandshakeConfiguration>> {
        {
            let entry = self.entries.get(key)?;
            if !self.is_expired(&entry) {
                return Some(entry.config.clone());
            }
        }
        self.entries.remove_if(key, |_, entry| self.is_expired(entry));
        None
    }

    pub fn insert(&self, key: HandshakeCacheKey, config: Option<HandshakeConfiguration>) {
        self.entries.insert(
            key,
            CacheEntry {
                config,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.ttl
            .is_some_and(|ttl| entry.inserted_at.elapsed() >= ttl)
    }
}

impl Default for HandshakeConfigCache {
    fn default() -> Self {
        Self::new(None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use flowhook_types::handshake::HandshakeStrategy;

    fn challenge_config() -> HandshakeConfiguration {
        HandshakeConfiguration::new(HandshakeStrategy::BodyParamPresent, "challenge")
    }

    #[test]
    fn test_cache_hit_and_miss() {
        let cache = HandshakeConfigCache::default();
        let key = HandshakeCacheKey::new("slack", "1.0.0", "newMessage");

        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), Some(challenge_config()));
        assert_eq!(cache.get(&key), Some(Some(challenge_config())));
    }

    #[test]
    fn test_cache_stores_absent_configuration() {
        let cache = HandshakeConfigCache::default();
        let key = HandshakeCacheKey::new("slack", "1.0.0", "newReaction");

        cache.insert(key.clone(), None);
        assert_eq!(cache.get(&key), Some(None));
    }

    #[test]
    fn test_cache_key_includes_version_and_trigger() {
        let cache = HandshakeConfigCache::default();
        cache.insert(
            HandshakeCacheKey::new("slack", "1.0.0", "newMessage"),
            Some(challenge_config()),
        );

        assert!(cache.get(&HandshakeCacheKey::new("slack", "1.1.0", "newMessage")).is_none());
        assert!(cache.get(&HandshakeCacheKey::new("slack", "1.0.0", "newReaction")).is_none());
        assert!(cache.get(&HandshakeCacheKey::new("stripe", "1.0.0", "newMessage")).is_none());
    }

    #[test]
    fn test_cache_entries_expire() {
        let cache = HandshakeConfigCache::new(Some(Duration::ZERO));
        let key = HandshakeCacheKey::new("slack", "1.0.0", "newMessage");

        cache.insert(key.clone(), Some(challenge_config()));
        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_from_settings_disabled() {
        assert!(HandshakeConfigCache::from_settings(&CacheSettings::default()).is_none());

        let settings = CacheSettings {
            enabled: true,
            ttl_secs: Some(60),
        };
        let cache = HandshakeConfigCache::from_settings(&settings).unwrap();
        assert_eq!(cache.ttl, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = HandshakeConfigCache::default();
        let shared = cache.clone();
        shared.insert(HandshakeCacheKey::new("slack", "1.0.0", "a"), None);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&HandshakeCacheKey::new("slack", "1.0.0", "a")).is_some());
    }
}
