//! Collection populator
//!
//! A [`Populator`] resets one collection and fills it with generated
//! documents before a test case is measured:
//!
//! 1. drop the collection (absent is fine)
//! 2. seed the run's random generator
//! 3. generate `n_docs` documents in index order
//! 4. submit them as one unordered bulk write
//! 5. verify the document count ([`CountCheck`])
//! 6. build every index in order; a failed build aborts the setup
//! 7. consult the last-error barrier

use crate::context::{GenContext, SeedPolicy};
use crate::generators::{default_doc_generator, DocGenerator};
use crate::string_cache::StringCache;
use pipebench_core::{
    Collection, CollectionReport, Document, Error, IndexSpec, Populate, PopulateReport, Result,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Default number of documents per populated collection
pub const DEFAULT_N_DOCS: usize = 500;

/// What to do when a bulk write leaves fewer documents than requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountCheck {
    /// Fail the setup with [`Error::IncompleteBulkWrite`]
    #[default]
    Strict,
    /// Log a warning and carry on
    Lenient,
}

/// Population procedure for a single collection
#[derive(Clone)]
pub struct Populator {
    n_docs: usize,
    indices: Vec<IndexSpec>,
    generator: DocGenerator,
    seed: SeedPolicy,
    count_check: CountCheck,
    strings: Arc<StringCache>,
}

impl Populator {
    /// Create a populator with a fresh seed per run and strict count checking
    pub fn new(n_docs: usize, indices: Vec<IndexSpec>, generator: DocGenerator) -> Self {
        Self {
            n_docs,
            indices,
            generator,
            seed: SeedPolicy::Fresh,
            count_check: CountCheck::Strict,
            strings: Arc::new(StringCache::new()),
        }
    }

    /// Set the seed policy
    pub fn seed(mut self, seed: SeedPolicy) -> Self {
        self.seed = seed;
        self
    }

    /// Set the count check mode
    pub fn count_check(mut self, count_check: CountCheck) -> Self {
        self.count_check = count_check;
        self
    }

    /// Share a filler-string cache with other populators
    pub fn string_cache(mut self, strings: Arc<StringCache>) -> Self {
        self.strings = strings;
        self
    }

    /// Number of documents generated per run
    pub fn n_docs(&self) -> usize {
        self.n_docs
    }

    /// Indexes built after the bulk write, in order
    pub fn indices(&self) -> &[IndexSpec] {
        &self.indices
    }

    /// Seed policy of this populator
    pub fn seed_policy(&self) -> SeedPolicy {
        self.seed
    }
}

impl Default for Populator {
    fn default() -> Self {
        Self::new(DEFAULT_N_DOCS, Vec::new(), default_doc_generator())
    }
}

impl std::fmt::Debug for Populator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Populator")
            .field("n_docs", &self.n_docs)
            .field("indices", &self.indices)
            .field("seed", &self.seed)
            .field("count_check", &self.count_check)
            .finish_non_exhaustive()
    }
}

impl Populate for Populator {
    fn populate(&self, collection: &dyn Collection) -> Result<PopulateReport> {
        let started = Instant::now();
        let seed = self.seed.resolve();
        let mut ctx = GenContext::new(seed, Arc::clone(&self.strings));
        debug!(target: "pipebench::populate", collection = collection.name(), seed, "Seeded populate run");

        let report = fill(
            collection,
            &mut ctx,
            self.n_docs,
            |ctx, i| (self.generator)(ctx, i),
            &self.indices,
            self.count_check,
        )?;

        let elapsed = started.elapsed();
        info!(
            target: "pipebench::populate",
            collection = %report.collection,
            inserted = report.inserted,
            indexes = report.indexes.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Populated collection"
        );
        Ok(PopulateReport {
            collections: vec![report],
            seed,
            elapsed,
        })
    }
}

/// Drop, fill, index and check one collection
///
/// Shared by every populate procedure; `generate` is called with the run's
/// context for `i` in `0..n_docs`, in order.
pub(crate) fn fill<F>(
    collection: &dyn Collection,
    ctx: &mut GenContext,
    n_docs: usize,
    mut generate: F,
    indices: &[IndexSpec],
    count_check: CountCheck,
) -> Result<CollectionReport>
where
    F: FnMut(&mut GenContext, usize) -> Document,
{
    let name = collection.name().to_string();

    let existed = collection.drop_collection()?;
    debug!(target: "pipebench::populate", collection = %name, existed, "Dropped collection");

    let mut bulk = collection.initialize_unordered_bulk_op();
    for i in 0..n_docs {
        bulk.insert(generate(ctx, i));
    }
    let result = bulk.execute(collection)?;
    debug!(
        target: "pipebench::populate",
        collection = %name,
        n_inserted = result.n_inserted,
        write_errors = result.write_errors.len(),
        "Executed unordered bulk insert"
    );

    let expected = n_docs as u64;
    let inserted = collection.count()?;
    if inserted != expected {
        match count_check {
            CountCheck::Strict => {
                return Err(Error::IncompleteBulkWrite {
                    collection: name,
                    expected,
                    inserted,
                });
            }
            CountCheck::Lenient => warn!(
                target: "pipebench::populate",
                collection = %name,
                expected,
                inserted,
                "Bulk insert left fewer documents than requested"
            ),
        }
    }

    let mut built = Vec::with_capacity(indices.len());
    for spec in indices {
        let outcome = collection.ensure_index(spec)?;
        if let Some(reason) = outcome.errmsg {
            return Err(Error::IndexBuild {
                collection: name,
                index: spec.name(),
                reason,
            });
        }
        debug!(target: "pipebench::populate", collection = %name, index = %spec, created = outcome.created, "Built index");
        built.push(spec.name());
    }

    if let Some(reason) = collection.last_error()? {
        match count_check {
            CountCheck::Strict => {
                return Err(Error::WriteFailed {
                    collection: name,
                    reason,
                })
            }
            CountCheck::Lenient => warn!(
                target: "pipebench::populate",
                collection = %name,
                reason = %reason,
                "Last write reported an error"
            ),
        }
    }

    Ok(CollectionReport {
        collection: name,
        expected,
        inserted,
        indexes: built,
    })
}
