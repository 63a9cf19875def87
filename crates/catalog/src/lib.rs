//! Aggregation pipeline benchmark catalog
//!
//! This crate assembles the benchmark test cases:
//! - StringCache: shared filler strings for padded documents
//! - GenContext / generators: per-run random state and document shapes
//! - Populator / LookupPopulator: drop, fill and index collections
//! - TestCaseBuilder: name + pipeline + overrides into a `TestCase`
//! - Registry / aggregation_catalog: the full, name-unique case list
//! - Settings: `pipebench.toml` configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod catalog;
pub mod config;
pub mod context;
pub mod generators;
pub mod ids;
pub mod lookup;
pub mod populator;
pub mod registry;
pub mod string_cache;

pub use builder::TestCaseBuilder;
pub use catalog::{aggregation_catalog, builder_cases, default_catalog};
pub use config::{Settings, CONFIG_FILE_NAME, DEFAULT_NAME_PREFIX, DEFAULT_TAGS};
pub use context::{GenContext, SeedPolicy};
pub use generators::{default_doc_generator, generator, padded_doc_generator, DocGenerator};
pub use ids::{ObjectId, ObjectIdGenerator};
pub use lookup::{
    lookup_case, lookup_collection_name, lookup_orders_case, LookupPopulator, LOOKUP_ORDERS_SEED,
    LOOKUP_SUFFIX,
};
pub use populator::{CountCheck, Populator, DEFAULT_N_DOCS};
pub use registry::Registry;
pub use string_cache::StringCache;
