//! Storage layer for pipebench
//!
//! This crate implements an in-memory reference store behind the
//! [`pipebench_core::Collection`] seam:
//! - MemoryDatabase: named collections in a DashMap, last-error slot
//! - MemoryCollection: per-collection handle implementing `Collection`
//! - Index validation (key patterns, geo key extraction)
//!
//! It exists so populators can be exercised and verified without a running
//! database server. It does not execute aggregation pipelines.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod memory;

pub use memory::{MemoryCollection, MemoryDatabase};
