//! pipebench - Aggregation pipeline benchmark catalog
//!
//! A catalog of benchmark test cases for a document database's aggregation
//! pipeline. Each case pairs a population procedure (drop, bulk insert,
//! index) with one aggregate command written against the `#B_DB` /
//! `#B_COLL` placeholders; a harness substitutes real names, runs the
//! setup once per collection, then times the command.
//!
//! # Quick Start
//!
//! ```ignore
//! use pipebench::{aggregation_catalog, MemoryDatabase, Settings};
//!
//! let registry = aggregation_catalog(&Settings::default())?;
//! let case = registry.require("Aggregation.Sort")?;
//!
//! let db = MemoryDatabase::new("bench");
//! let report = case.populate(&db.collection("sort"))?;
//! let op = case.ops[0].resolve("bench", "sort");
//! ```
//!
//! # Crates
//!
//! - `pipebench-core`: values, documents, test case records, the collection contract
//! - `pipebench-storage`: in-memory reference store
//! - `pipebench-catalog`: generators, populators, builder, registry, settings

pub use pipebench_catalog::*;
pub use pipebench_core::{
    array, doc, BulkWriteResult, Collection, CollectionReport, Document, Error, IndexBuildResult,
    IndexKind, IndexSpec, OpKind, Operation, Populate, PopulateReport, Result, TestCase,
    UnorderedBulkOp, Value, WriteError, COLL_PLACEHOLDER, DB_PLACEHOLDER,
};
pub use pipebench_storage::{MemoryCollection, MemoryDatabase};
