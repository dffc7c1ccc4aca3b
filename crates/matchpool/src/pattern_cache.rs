// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Compiled-pattern caching.
//!
//! Caches compiled matchers keyed by [`PatternKey`] with a bounded capacity
//! and first-in-first-out eviction. Hits never promote an entry, so the
//! survivors after any run of insertions are exactly the most recently
//! inserted keys.
//!
//! Two backings share one [`FifoCache`] core:
//! - [`LocalPatternCache`]: owned by a single thread, no locking.
//! - [`SharedPatternCache`]: process-wide, serialized by a mutex. Compilation
//!   runs outside the lock, so concurrent misses on the same key may each
//!   compile; the last insert wins.

use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::key::PatternKey;
use crate::limit::CacheLimit;

/// Processed ledger prefix length that allows compaction.
const COMPACT_MIN_HEAD: usize = 64;

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: usize,
    /// Number of cache misses.
    pub misses: usize,
    /// Number of entries in cache.
    pub entries: usize,
}

/// Map plus insertion-order ledger with FIFO eviction.
///
/// The ledger is append-only. Evicted slots become `None` tombstones behind
/// `head`; once the processed prefix is both longer than
/// [`COMPACT_MIN_HEAD`] and more than half the ledger, it is drained.
#[derive(Debug)]
pub struct FifoCache<K, V> {
    map: FxHashMap<K, V>,
    order: Vec<Option<K>>,
    head: usize,
    limit: CacheLimit,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(limit: CacheLimit) -> Self {
        Self {
            map: FxHashMap::default(),
            order: Vec::new(),
            head: 0,
            limit,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn limit(&self) -> CacheLimit {
        self.limit
    }

    /// Insert `value`, evicting the oldest entries to make room.
    ///
    /// Returns `false` when the value was not stored: caching is disabled, or
    /// the bookkeeping allocation failed.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if !self.limit.allows_caching() {
            return false;
        }

        if let Some(slot) = self.map.get_mut(&key) {
            *slot = value;
            return true;
        }

        while self.limit.is_full(self.map.len()) {
            if !self.evict_one() {
                break;
            }
        }

        if self.map.try_reserve(1).is_err() || self.order.try_reserve(1).is_err() {
            tracing::debug!("pattern cache bookkeeping allocation failed, returning uncached");
            return false;
        }

        self.order.push(Some(key.clone()));
        self.map.insert(key, value);
        true
    }

    /// Evict the oldest live entry. Returns `false` when nothing was evicted.
    pub fn evict_one(&mut self) -> bool {
        while self.head < self.order.len() {
            let index = self.head;
            self.head += 1;
            let Some(candidate) = self.order[index].take() else {
                continue;
            };
            if self.map.remove(&candidate).is_some() {
                self.compact();
                return true;
            }
        }
        self.compact();
        false
    }

    /// Change the limit, evicting down to it immediately.
    pub fn set_limit(&mut self, limit: CacheLimit) {
        self.limit = limit;
        if !limit.allows_caching() {
            self.clear();
            return;
        }
        while limit.is_exceeded_by(self.map.len()) {
            if !self.evict_one() {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
        self.head = 0;
    }

    /// Live keys from oldest to newest.
    pub fn keys_in_order(&self) -> impl Iterator<Item = &K> {
        self.order[self.head..].iter().flatten()
    }

    /// Ledger length including tombstones.
    pub fn ledger_len(&self) -> usize {
        self.order.len()
    }

    fn compact(&mut self) {
        if self.head <= COMPACT_MIN_HEAD || self.head * 2 <= self.order.len() {
            return;
        }
        self.order.drain(..self.head);
        self.head = 0;
    }
}

/// Pattern cache owned by one thread.
#[derive(Debug)]
pub struct LocalPatternCache<V> {
    inner: FifoCache<PatternKey, V>,
    hits: usize,
    misses: usize,
}

impl<V: Clone> LocalPatternCache<V> {
    pub fn new(limit: CacheLimit) -> Self {
        Self {
            inner: FifoCache::new(limit),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a cached value, recording a hit or miss.
    pub fn lookup(&mut self, key: &PatternKey) -> Option<V> {
        if let Some(value) = self.inner.get(key) {
            self.hits += 1;
            return Some(value.clone());
        }
        self.misses += 1;
        None
    }

    /// Store a freshly compiled value. Returns whether it was cached.
    pub fn insert(&mut self, key: PatternKey, value: V) -> bool {
        self.inner.insert(key, value)
    }

    /// Return the cached value for `key`, compiling it on a miss.
    ///
    /// Errors from `compile` are returned unchanged and nothing is cached.
    pub fn get_or_compile<E>(
        &mut self,
        key: &PatternKey,
        compile: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if !self.inner.limit().allows_caching() {
            self.misses += 1;
            return compile();
        }
        if let Some(value) = self.lookup(key) {
            return Ok(value);
        }
        let value = compile()?;
        self.inner.insert(key.clone(), value.clone());
        Ok(value)
    }

    pub fn set_capacity(&mut self, limit: CacheLimit) {
        self.inner.set_limit(limit);
    }

    pub fn capacity(&self) -> CacheLimit {
        self.inner.limit()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn contains(&self, key: &PatternKey) -> bool {
        self.inner.contains(key)
    }

    pub fn keys(&self) -> Vec<PatternKey> {
        self.inner.keys_in_order().cloned().collect()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.inner.len(),
        }
    }
}

/// Pattern cache shared by all threads.
#[derive(Debug)]
pub struct SharedPatternCache<V> {
    inner: Mutex<FifoCache<PatternKey, V>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<V: Clone> SharedPatternCache<V> {
    pub fn new(limit: CacheLimit) -> Self {
        Self {
            inner: Mutex::new(FifoCache::new(limit)),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Look up a cached value under the lock, recording a hit or miss.
    pub fn lookup(&self, key: &PatternKey) -> Option<V> {
        let cached = self.inner.lock().get(key).cloned();
        match cached {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        cached
    }

    /// Store a freshly compiled value. Returns whether it was cached.
    pub fn insert(&self, key: PatternKey, value: V) -> bool {
        self.inner.lock().insert(key, value)
    }

    /// Return the cached value for `key`, compiling it on a miss.
    ///
    /// `compile` runs without holding the lock.
    pub fn get_or_compile<E>(
        &self,
        key: &PatternKey,
        compile: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if !self.capacity().allows_caching() {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return compile();
        }
        if let Some(value) = self.lookup(key) {
            return Ok(value);
        }
        let value = compile()?;
        self.insert(key.clone(), value.clone());
        Ok(value)
    }

    pub fn set_capacity(&self, limit: CacheLimit) {
        self.inner.lock().set_limit(limit);
    }

    pub fn capacity(&self) -> CacheLimit {
        self.inner.lock().limit()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn contains(&self, key: &PatternKey) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn keys(&self) -> Vec<PatternKey> {
        self.inner.lock().keys_in_order().cloned().collect()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

#[cfg(test)]
#[path = "pattern_cache_tests.rs"]
mod tests;
