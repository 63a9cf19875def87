//! Core types and traits for pipebench
//!
//! This crate defines the foundational types used throughout the workspace:
//! - Value / Document: schema-free structured data for documents and pipelines
//! - IndexSpec / IndexKind: index declarations
//! - Operation: measured command with `#B_DB` / `#B_COLL` placeholders
//! - TestCase / PopulateReport: catalog records and population results
//! - Collection / Populate: the seam between populators and a document store
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod traits;
pub mod types;
pub mod value;

pub use document::Document;
pub use error::{Error, Result};
pub use traits::{
    BulkWriteResult, Collection, IndexBuildResult, Populate, UnorderedBulkOp, WriteError,
};
pub use types::{
    CollectionReport, IndexKind, IndexSpec, OpKind, Operation, PopulateReport, TestCase,
    COLL_PLACEHOLDER, DB_PLACEHOLDER,
};
pub use value::Value;
