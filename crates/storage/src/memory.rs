//! In-memory document store
//!
//! `MemoryDatabase` keeps one `CollectionState` per collection name in a
//! DashMap, so handles to different collections never contend. Each
//! `MemoryCollection` is a cheap handle (`Arc<MemoryDatabase>` + name) that
//! implements the [`Collection`] seam.
//!
//! # Semantics
//!
//! - Documents without `_id` get a generated 24-hex-digit id
//! - Duplicate `_id` values are per-document write errors (unordered bulk)
//! - Inserts violating an existing geo index are write errors
//! - Index builds validate the key pattern and every existing document
//! - `last_error` reports the outcome of the most recent write on that collection
//! - `indexes()` lists user-created indexes; the implicit `_id` index is omitted

use dashmap::DashMap;
use parking_lot::Mutex;
use pipebench_core::{
    BulkWriteResult, Collection, Document, IndexBuildResult, IndexSpec, Result, UnorderedBulkOp,
    Value, WriteError,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::index::{check_document, validate_spec};

/// Contents of one collection
#[derive(Debug, Default)]
struct CollectionState {
    /// Documents in insertion order
    documents: Vec<Document>,
    /// Canonical `_id` keys for duplicate detection
    ids: FxHashSet<String>,
    /// User-created indexes in creation order
    indexes: Vec<IndexSpec>,
}

/// In-memory database holding named collections
///
/// # Thread Safety
///
/// All operations are thread-safe:
/// - Different collections live in different DashMap entries
/// - Last errors are kept per collection name behind a `parking_lot::Mutex`
pub struct MemoryDatabase {
    name: String,
    collections: DashMap<String, CollectionState>,
    last_errors: Mutex<FxHashMap<String, String>>,
    next_id: AtomicU64,
}

impl MemoryDatabase {
    /// Create an empty database
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            collections: DashMap::new(),
            last_errors: Mutex::new(FxHashMap::default()),
            next_id: AtomicU64::new(1),
        })
    }

    /// Database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle to a collection (created lazily on first write)
    pub fn collection(self: &Arc<Self>, name: impl Into<String>) -> MemoryCollection {
        MemoryCollection {
            db: Arc::clone(self),
            name: name.into(),
        }
    }

    /// Check whether a collection exists
    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Names of existing collections, sorted
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    fn set_last_error(&self, collection: &str, error: Option<String>) {
        let mut slots = self.last_errors.lock();
        match error {
            Some(message) => {
                slots.insert(collection.to_string(), message);
            }
            None => {
                slots.remove(collection);
            }
        }
    }

    fn last_error(&self, collection: &str) -> Option<String> {
        self.last_errors.lock().get(collection).cloned()
    }

    fn generate_id(&self) -> Value {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        Value::String(format!("{:024x}", n))
    }
}

/// Canonical key for duplicate `_id` detection
///
/// Serialization is the identity for the value shapes ids take, and
/// distinguishes `1` from `"1"` and `1.0`.
fn id_key(id: &Value) -> String {
    let tag = id.type_name();
    match serde_json::to_string(id) {
        Ok(json) => format!("{}:{}", tag, json),
        Err(_) => format!("{}:{:?}", tag, id),
    }
}

/// `_id` as shown in duplicate key messages
fn id_display(id: Option<&Value>) -> String {
    match id {
        Some(id) => serde_json::to_string(id).unwrap_or_else(|_| format!("{:?}", id)),
        None => "null".to_string(),
    }
}

/// Handle to one collection of a [`MemoryDatabase`]
#[derive(Clone)]
pub struct MemoryCollection {
    db: Arc<MemoryDatabase>,
    name: String,
}

impl MemoryCollection {
    /// Database this collection belongs to
    pub fn database(&self) -> &Arc<MemoryDatabase> {
        &self.db
    }
}

impl std::fmt::Debug for MemoryCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MemoryCollection({}.{})", self.db.name, self.name)
    }
}

impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn drop_collection(&self) -> Result<bool> {
        let existed = self.db.collections.remove(&self.name).is_some();
        debug!(target: "pipebench::store", collection = %self.name, existed, "Dropped collection");
        self.db.set_last_error(&self.name, None);
        Ok(existed)
    }

    fn execute_bulk(&self, op: UnorderedBulkOp) -> Result<BulkWriteResult> {
        let staged = op.len();
        let mut state = self.db.collections.entry(self.name.clone()).or_default();
        let mut result = BulkWriteResult::default();

        for (index, mut doc) in op.into_documents().into_iter().enumerate() {
            if !doc.contains_key("_id") {
                doc.insert("_id", self.db.generate_id());
            }
            let key = doc.get("_id").map(id_key).unwrap_or_default();
            if state.ids.contains(&key) {
                result.write_errors.push(WriteError {
                    index,
                    message: format!(
                        "E11000 duplicate key error collection: {}.{} dup key: {{ _id: {} }}",
                        self.db.name,
                        self.name,
                        id_display(doc.get("_id"))
                    ),
                });
                continue;
            }
            if let Some(message) = state
                .indexes
                .iter()
                .find_map(|spec| check_document(spec, &doc).err())
            {
                result.write_errors.push(WriteError { index, message });
                continue;
            }
            state.ids.insert(key);
            state.documents.push(doc);
            result.n_inserted += 1;
        }
        drop(state);

        debug!(
            target: "pipebench::store",
            collection = %self.name,
            staged,
            inserted = result.n_inserted,
            errors = result.write_errors.len(),
            "Executed unordered bulk insert"
        );
        self.db.set_last_error(
            &self.name,
            result.write_errors.first().map(|e| e.message.clone()),
        );
        Ok(result)
    }

    fn ensure_index(&self, spec: &IndexSpec) -> Result<IndexBuildResult> {
        if let Err(reason) = validate_spec(spec) {
            self.db.set_last_error(&self.name, Some(reason.clone()));
            return Ok(IndexBuildResult::failed(reason));
        }

        let mut state = self.db.collections.entry(self.name.clone()).or_default();
        if state.indexes.contains(spec) {
            drop(state);
            self.db.set_last_error(&self.name, None);
            return Ok(IndexBuildResult::created(false));
        }
        if let Some(reason) = state
            .documents
            .iter()
            .find_map(|doc| check_document(spec, doc).err())
        {
            drop(state);
            self.db.set_last_error(&self.name, Some(reason.clone()));
            return Ok(IndexBuildResult::failed(reason));
        }
        state.indexes.push(spec.clone());
        drop(state);

        debug!(target: "pipebench::store", collection = %self.name, index = %spec, "Built index");
        self.db.set_last_error(&self.name, None);
        Ok(IndexBuildResult::created(true))
    }

    fn indexes(&self) -> Result<Vec<IndexSpec>> {
        Ok(self
            .db
            .collections
            .get(&self.name)
            .map(|state| state.indexes.clone())
            .unwrap_or_default())
    }

    fn count(&self) -> Result<u64> {
        Ok(self
            .db
            .collections
            .get(&self.name)
            .map(|state| state.documents.len() as u64)
            .unwrap_or(0))
    }

    fn find_all(&self) -> Result<Vec<Document>> {
        Ok(self
            .db
            .collections
            .get(&self.name)
            .map(|state| state.documents.clone())
            .unwrap_or_default())
    }

    fn sibling(&self, name: &str) -> Box<dyn Collection> {
        Box::new(self.db.collection(name))
    }

    fn last_error(&self) -> Result<Option<String>> {
        Ok(self.db.last_error(&self.name))
    }
}
