/*!
 * Query translation caching.
 *
 * This module memoizes recent query translations so repeated searches in a
 * session do not hit the provider again.
 */

use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::language::Lang;

/// Cache key: the query text plus its source language. The target is
/// implied, since translation always goes to the other indexed language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Query text as typed
    text: String,
    /// Language the text is in
    source: Lang,
}

/// Memoization cache for translated queries
pub struct TranslationCache {
    /// Internal cache storage
    entries: Arc<RwLock<HashMap<CacheKey, String>>>,
    /// Cache hit counter
    hits: Arc<AtomicUsize>,
    /// Cache miss counter
    misses: Arc<AtomicUsize>,
    /// Whether caching is enabled
    enabled: bool,
}

impl TranslationCache {
    /// Create a new cache
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
            enabled,
        }
    }

    /// Look up a translation
    pub fn get(&self, text: &str, source: Lang) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey {
            text: text.to_string(),
            source,
        };

        match self.entries.read().get(&key) {
            Some(translation) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Translation cache hit for '{}' ({})", truncate(text, 30), source);
                Some(translation.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a translation
    pub fn store(&self, text: &str, source: Lang, translation: &str) {
        if !self.enabled {
            return;
        }

        let key = CacheKey {
            text: text.to_string(),
            source,
        };
        self.entries.write().insert(key, translation.to_string());
    }

    /// (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Drop all entries and reset the counters
    pub fn clear(&self) {
        self.entries.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Number of cached translations
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds nothing
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Whether the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
            enabled: self.enabled,
        }
    }
}

/// Truncate text to a maximum length with ellipsis
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
