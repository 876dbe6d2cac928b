//! Bounded URL-keyed cache backing scrape memoization.
//!
//! The same article URL commonly recurs across differently-filtered headline
//! queries within one session, so re-scraping it would both waste a network
//! round trip and risk a different answer. The cache is a plain map plus an
//! insertion-order queue: once capacity is reached the oldest entry is
//! evicted. Capacity is enforced unconditionally; the eviction order is
//! first-inserted-first-out.

use std::collections::{HashMap, VecDeque};

/// Default number of memoized scrape results retained per enricher.
pub const DEFAULT_CAPACITY: usize = 100;

/// An insertion-order-evicting map from URL to value.
#[derive(Debug)]
pub struct BoundedCache<V> {
    capacity: usize,
    map: HashMap<String, V>,
    order: VecDeque<String>,
}

impl<V> BoundedCache<V> {
    /// Create a cache holding at most `capacity` entries. A zero capacity is
    /// bumped to one so `insert` always retains the newest entry.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Look up a previously inserted value.
    pub fn get(&self, url: &str) -> Option<&V> {
        self.map.get(url)
    }

    /// Insert a value, evicting the oldest entry once over capacity.
    /// Re-inserting an existing key replaces the value without growing the
    /// cache or refreshing its eviction position.
    pub fn insert(&mut self, url: String, value: V) {
        if self.map.insert(url.clone(), value).is_some() {
            return;
        }
        self.order.push_back(url);
        while self.map.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
            }
        }
    }
}
