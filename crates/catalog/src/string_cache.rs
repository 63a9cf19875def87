//! Memoized filler strings
//!
//! Padded documents all carry the same large string. Building it once per
//! size and handing out shared `Arc<str>` instances keeps population from
//! re-allocating the filler for every document.

use dashmap::DashMap;
use std::sync::Arc;

/// Character every filler string is made of
pub const FILLER: char = 'x';

/// Lookup-or-build cache from length to filler string
///
/// No eviction: the catalog requests a handful of fixed sizes.
#[derive(Debug, Default)]
pub struct StringCache {
    cache: DashMap<usize, Arc<str>>,
}

impl StringCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// String of exactly `size` filler characters
    ///
    /// Repeated calls with the same size return the same stored instance.
    pub fn get(&self, size: usize) -> Arc<str> {
        if let Some(hit) = self.cache.get(&size) {
            return Arc::clone(hit.value());
        }
        let built: Arc<str> = Arc::from(FILLER.to_string().repeat(size));
        Arc::clone(self.cache.entry(size).or_insert(built).value())
    }

    /// Number of distinct sizes cached
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
