//! In-memory interpretation cache
//!
//! Bounded by both age and size:
//! - Entries older than `ttl` are treated as misses and dropped on access
//! - At capacity, expired entries are purged first, then the oldest entry
//!   is evicted

use crate::interpretation::AIInterpretation;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default entry lifetime (one day)
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default maximum number of entries
pub const DEFAULT_MAX_ENTRIES: usize = 1_000;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: AIInterpretation,
    inserted_at: Instant,
}

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups served from cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

/// TTL + capacity bounded cache of accepted interpretations
#[derive(Debug, Clone)]
pub struct InterpretationCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl InterpretationCache {
    /// Create cache with default bounds
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_TTL, DEFAULT_MAX_ENTRIES)
    }

    /// Create cache with custom bounds (capacity of at least one)
    pub fn with_limits(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up a fresh entry, counting the hit or miss
    pub fn get(&mut self, key: &str) -> Option<AIInterpretation> {
        let ttl = self.ttl;
        let lookup = self
            .entries
            .get(key)
            .map(|entry| (entry.inserted_at.elapsed() < ttl, entry.value.clone()));

        match lookup {
            Some((true, value)) => {
                self.hits += 1;
                Some(value)
            }
            Some((false, _)) => {
                self.entries.remove(key);
                self.evictions += 1;
                self.misses += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store an entry, evicting if the cache is full
    pub fn insert(&mut self, key: String, value: AIInterpretation) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.purge_expired();

            if self.entries.len() >= self.max_entries {
                self.evict_oldest();
            }
        }

        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop every expired entry; returns how many were removed
    pub fn purge_expired(&mut self) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        let removed = before - self.entries.len();
        self.evictions += removed as u64;
        removed
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted_at)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.evictions += 1;
        }
    }

    /// Remove all entries and reset counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }
}

impl Default for InterpretationCache {
    fn default() -> Self {
        Self::new()
    }
}
