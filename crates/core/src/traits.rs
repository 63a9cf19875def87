//! Core traits for the collection seam
//!
//! This module defines the Collection and Populate traits. Populators only
//! talk to a store through [`Collection`], so the catalog can seed a real
//! database driver or the in-memory reference store without changes.

use crate::document::Document;
use crate::error::Result;
use crate::types::{IndexSpec, PopulateReport};

/// Handle to one collection of a document store
///
/// Mirrors the shell collection API the catalog needs: drop, unordered
/// bulk insert, index creation, and a last-error barrier.
///
/// The trait is object-safe; populators receive `&dyn Collection`.
pub trait Collection: Send + Sync {
    /// Collection name (without database prefix)
    fn name(&self) -> &str;

    /// Drop the collection and its indexes
    ///
    /// Returns whether the collection existed. Dropping a missing
    /// collection is not an error.
    fn drop_collection(&self) -> Result<bool>;

    /// Start an unordered bulk operation against this collection
    fn initialize_unordered_bulk_op(&self) -> UnorderedBulkOp {
        UnorderedBulkOp::new(self.name())
    }

    /// Apply a staged bulk operation
    ///
    /// Unordered: every insert is attempted, failures are collected into
    /// the result instead of stopping the batch.
    fn execute_bulk(&self, op: UnorderedBulkOp) -> Result<BulkWriteResult>;

    /// Create an index if it does not already exist
    ///
    /// Store-level rejections are reported in the returned
    /// [`IndexBuildResult`]; `Err` is reserved for infrastructure failures.
    fn ensure_index(&self, spec: &IndexSpec) -> Result<IndexBuildResult>;

    /// Index key patterns currently defined on the collection
    fn indexes(&self) -> Result<Vec<IndexSpec>>;

    /// Number of documents in the collection
    fn count(&self) -> Result<u64>;

    /// All documents, in insertion order
    fn find_all(&self) -> Result<Vec<Document>>;

    /// Handle to another collection in the same database
    fn sibling(&self, name: &str) -> Box<dyn Collection>;

    /// Wait for the last write to be acknowledged and report its error, if any
    fn last_error(&self) -> Result<Option<String>>;
}

/// Population procedure attached to a test case (`pre`)
pub trait Populate: Send + Sync {
    /// Reset and seed `collection` (and any collections derived from it)
    fn populate(&self, collection: &dyn Collection) -> Result<PopulateReport>;
}

/// Staged documents for one unordered bulk insert
#[derive(Debug, Clone, Default)]
pub struct UnorderedBulkOp {
    collection: String,
    documents: Vec<Document>,
}

impl UnorderedBulkOp {
    /// Create an empty bulk operation targeting `collection`
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            documents: Vec::new(),
        }
    }

    /// Stage one insert
    pub fn insert(&mut self, doc: Document) {
        self.documents.push(doc);
    }

    /// Number of staged inserts
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check whether nothing is staged
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Target collection name
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Consume the operation, yielding the staged documents in order
    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    /// Submit to `collection`
    pub fn execute(self, collection: &dyn Collection) -> Result<BulkWriteResult> {
        collection.execute_bulk(self)
    }
}

/// One failed insert inside a bulk operation
#[derive(Debug, Clone, PartialEq)]
pub struct WriteError {
    /// Position of the document in the staged batch
    pub index: usize,
    /// Store error message
    pub message: String,
}

/// Outcome of an unordered bulk write
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkWriteResult {
    /// Documents inserted
    pub n_inserted: u64,
    /// Inserts that failed
    pub write_errors: Vec<WriteError>,
}

impl BulkWriteResult {
    /// True when every staged insert succeeded
    pub fn is_ok(&self) -> bool {
        self.write_errors.is_empty()
    }
}

/// Outcome of an index build command
#[derive(Debug, Clone, PartialEq)]
pub struct IndexBuildResult {
    /// Whether a new index was created (false when it already existed)
    pub created: bool,
    /// Error message when the store rejected the build
    pub errmsg: Option<String>,
}

impl IndexBuildResult {
    /// Successful build
    pub fn created(created: bool) -> Self {
        Self {
            created,
            errmsg: None,
        }
    }

    /// Rejected build
    pub fn failed(errmsg: impl Into<String>) -> Self {
        Self {
            created: false,
            errmsg: Some(errmsg.into()),
        }
    }

    /// Equivalent of a command's `ok: 1`
    pub fn ok(&self) -> bool {
        self.errmsg.is_none()
    }
}
