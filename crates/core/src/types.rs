//! Catalog record types
//!
//! This module defines:
//! - IndexKind / IndexSpec: index declarations applied during population
//! - Operation: a measured command with placeholder namespace tokens
//! - TestCase: the record handed to a benchmark harness
//! - PopulateReport: what a populate run did

use crate::document::Document;
use crate::error::{Error, Result};
use crate::traits::{Collection, Populate};
use crate::value::Value;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Placeholder the harness replaces with the database name
pub const DB_PLACEHOLDER: &str = "#B_DB";

/// Placeholder the harness replaces with the collection name
pub const COLL_PLACEHOLDER: &str = "#B_COLL";

// ============================================================================
// Indexes
// ============================================================================

/// Index type token for one indexed field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// `1`
    Ascending,
    /// `-1`
    Descending,
    /// `"2d"` legacy coordinate pairs
    Geo2d,
    /// `"2dsphere"` GeoJSON / spherical coordinates
    Geo2dSphere,
    /// `"text"`
    Text,
    /// `"hashed"`
    Hashed,
}

impl IndexKind {
    /// Token as it appears in an index spec document
    pub fn to_value(self) -> Value {
        match self {
            IndexKind::Ascending => Value::Int(1),
            IndexKind::Descending => Value::Int(-1),
            IndexKind::Geo2d => Value::from("2d"),
            IndexKind::Geo2dSphere => Value::from("2dsphere"),
            IndexKind::Text => Value::from("text"),
            IndexKind::Hashed => Value::from("hashed"),
        }
    }

    /// Parse an index type token
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Int(1) => Ok(IndexKind::Ascending),
            Value::Int(-1) => Ok(IndexKind::Descending),
            Value::Float(f) if *f == 1.0 => Ok(IndexKind::Ascending),
            Value::Float(f) if *f == -1.0 => Ok(IndexKind::Descending),
            Value::String(s) => match s.as_str() {
                "2d" => Ok(IndexKind::Geo2d),
                "2dsphere" => Ok(IndexKind::Geo2dSphere),
                "text" => Ok(IndexKind::Text),
                "hashed" => Ok(IndexKind::Hashed),
                other => Err(Error::InvalidIndexSpec(format!(
                    "unknown index type '{}'",
                    other
                ))),
            },
            other => Err(Error::InvalidIndexSpec(format!(
                "unsupported index value of type {}",
                other.type_name()
            ))),
        }
    }

    /// Whether this kind orders keys (ascending / descending)
    pub fn is_ordered(self) -> bool {
        matches!(self, IndexKind::Ascending | IndexKind::Descending)
    }

    fn name_token(self) -> &'static str {
        match self {
            IndexKind::Ascending => "1",
            IndexKind::Descending => "-1",
            IndexKind::Geo2d => "2d",
            IndexKind::Geo2dSphere => "2dsphere",
            IndexKind::Text => "text",
            IndexKind::Hashed => "hashed",
        }
    }
}

/// Ordered mapping from field name to index type
///
/// Most specs in the catalog index a single field, so fields live inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct IndexSpec {
    fields: SmallVec<[(String, IndexKind); 2]>,
}

impl IndexSpec {
    /// Create an empty spec; add fields with [`IndexSpec::with`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the key pattern
    pub fn with(mut self, field: impl Into<String>, kind: IndexKind) -> Self {
        self.fields.push((field.into(), kind));
        self
    }

    /// Single-field ascending index (`{field: 1}`)
    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new().with(field, IndexKind::Ascending)
    }

    /// Single-field descending index (`{field: -1}`)
    pub fn descending(field: impl Into<String>) -> Self {
        Self::new().with(field, IndexKind::Descending)
    }

    /// Legacy planar geo index (`{field: "2d"}`)
    pub fn geo_2d(field: impl Into<String>) -> Self {
        Self::new().with(field, IndexKind::Geo2d)
    }

    /// Spherical geo index (`{field: "2dsphere"}`)
    pub fn geo_2dsphere(field: impl Into<String>) -> Self {
        Self::new().with(field, IndexKind::Geo2dSphere)
    }

    /// Parse a spec document such as `{a: 1, b: -1}`
    pub fn from_document(doc: &Document) -> Result<Self> {
        if doc.is_empty() {
            return Err(Error::InvalidIndexSpec("empty key pattern".to_string()));
        }
        let mut spec = Self::new();
        for (field, kind) in doc.iter() {
            spec = spec.with(field, IndexKind::from_value(kind)?);
        }
        Ok(spec)
    }

    /// Key pattern as a document
    pub fn to_document(&self) -> Document {
        self.fields
            .iter()
            .map(|(field, kind)| (field.clone(), kind.to_value()))
            .collect()
    }

    /// Indexed fields in key-pattern order
    pub fn fields(&self) -> impl Iterator<Item = (&str, IndexKind)> {
        self.fields.iter().map(|(f, k)| (f.as_str(), *k))
    }

    /// Number of fields in the key pattern
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the key pattern is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Conventional index name: `field_token` pairs joined by `_` (`a_1_b_-1`)
    pub fn name(&self) -> String {
        self.fields
            .iter()
            .map(|(field, kind)| format!("{}_{}", field, kind.name_token()))
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Serialize for IndexSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Kind of measured operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    /// A database command (`runCommand`)
    Command,
}

/// One measured operation of a test case
///
/// `ns` and the command body may contain [`DB_PLACEHOLDER`] and
/// [`COLL_PLACEHOLDER`]; a harness substitutes them before executing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    /// Operation kind
    pub op: OpKind,
    /// Target namespace (placeholder)
    pub ns: String,
    /// Command body
    pub command: Document,
}

impl Operation {
    /// Aggregate command over the placeholder collection with an unbounded cursor
    ///
    /// Produces `{aggregate: "#B_COLL", pipeline: [...], cursor: {}}` against `#B_DB`.
    pub fn aggregate(pipeline: Vec<Document>) -> Self {
        let mut command = Document::with_capacity(3);
        command.insert("aggregate", COLL_PLACEHOLDER);
        command.insert("pipeline", pipeline);
        command.insert("cursor", Document::new());
        Self {
            op: OpKind::Command,
            ns: DB_PLACEHOLDER.to_string(),
            command,
        }
    }

    /// Pipeline stages of an aggregate command
    pub fn pipeline(&self) -> Option<&[Value]> {
        self.command.get("pipeline").and_then(Value::as_array)
    }

    /// Copy of this operation with every placeholder token replaced
    ///
    /// Tokens are replaced wherever they occur inside string values, so a
    /// derived name such as `"#B_COLL_lookup"` resolves to `"<coll>_lookup"`.
    /// Field names are never rewritten.
    pub fn resolve(&self, db: &str, coll: &str) -> Operation {
        let mut command = self.command.clone();
        for (_, value) in command.iter_mut() {
            resolve_value(value, db, coll);
        }
        Operation {
            op: self.op,
            ns: resolve_str(&self.ns, db, coll),
            command,
        }
    }
}

/// Single left-to-right pass; substituted text is never rescanned.
fn resolve_str(s: &str, db: &str, coll: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('#') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix(DB_PLACEHOLDER) {
            out.push_str(db);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(COLL_PLACEHOLDER) {
            out.push_str(coll);
            rest = after;
        } else {
            out.push('#');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

fn resolve_value(value: &mut Value, db: &str, coll: &str) {
    match value {
        Value::String(s) if s.contains('#') => *s = resolve_str(s, db, coll),
        Value::Array(items) => items.iter_mut().for_each(|v| resolve_value(v, db, coll)),
        Value::Object(doc) => doc
            .iter_mut()
            .for_each(|(_, v)| resolve_value(v, db, coll)),
        _ => {}
    }
}

// ============================================================================
// Test cases
// ============================================================================

/// A named, tagged bundle of setup plus measured operations
///
/// Serializes as `{tags, name, ops}`; the `pre` procedure is not data.
#[derive(Clone, Serialize)]
pub struct TestCase {
    /// Category labels used by harnesses to select cases
    pub tags: Vec<String>,
    /// Unique name within a registry
    pub name: String,
    /// Population procedure run once per collection before measuring
    #[serde(skip)]
    pub pre: Arc<dyn Populate>,
    /// Measured operations, in order
    pub ops: Vec<Operation>,
}

impl TestCase {
    /// Check whether the case carries a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Run the `pre` procedure against a collection
    pub fn populate(&self, collection: &dyn Collection) -> Result<PopulateReport> {
        self.pre.populate(collection)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("tags", &self.tags)
            .field("name", &self.name)
            .field("ops", &self.ops)
            .finish_non_exhaustive()
    }
}

/// Result of populating one collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionReport {
    /// Collection name
    pub collection: String,
    /// Documents requested
    pub expected: u64,
    /// Documents present after the bulk write
    pub inserted: u64,
    /// Names of indexes built, in order
    pub indexes: Vec<String>,
}

/// Result of one populate run
#[derive(Debug, Clone, Serialize)]
pub struct PopulateReport {
    /// Per-collection results, primary collection first
    pub collections: Vec<CollectionReport>,
    /// Seed the run's random generator ended up using
    pub seed: u64,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

impl PopulateReport {
    /// Total documents inserted across all collections
    pub fn total_inserted(&self) -> u64 {
        self.collections.iter().map(|c| c.inserted).sum()
    }
}
