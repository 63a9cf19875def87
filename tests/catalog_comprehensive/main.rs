//! Catalog Comprehensive Test Suite
//!
//! End-to-end coverage of the aggregation catalog against the in-memory
//! reference store.
//!
//! ## Modules
//!
//! - `populate`: populators, count checks, index failures, concurrency
//! - `catalog`: the full registry, tags, settings files
//! - `output`: serialized case shape and placeholder substitution
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test catalog_comprehensive
//! cargo test --test catalog_comprehensive populate::
//! ```

use std::sync::Arc;

use pipebench::{
    aggregation_catalog, Collection, MemoryCollection, MemoryDatabase, Registry, Settings,
    StringCache,
};

pub mod catalog;
pub mod output;
pub mod populate;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Fresh database with one empty collection
pub fn fresh_collection(name: &str) -> (Arc<MemoryDatabase>, MemoryCollection) {
    let db = MemoryDatabase::new("bench");
    let coll = db.collection(name);
    (db, coll)
}

/// Settings that keep population cheap
pub fn small_settings(n_docs: usize) -> Settings {
    Settings {
        n_docs,
        padding_len: 64,
        ..Settings::default()
    }
}

/// Catalog built from `small_settings`
pub fn small_catalog(n_docs: usize) -> Registry {
    aggregation_catalog(&small_settings(n_docs)).expect("catalog should assemble")
}

/// Shared filler cache
pub fn strings() -> Arc<StringCache> {
    Arc::new(StringCache::new())
}

/// Document count of a collection
pub fn count(coll: &dyn Collection) -> u64 {
    coll.count().expect("count should succeed")
}
