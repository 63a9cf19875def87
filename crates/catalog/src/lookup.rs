//! Two-collection lookup cases
//!
//! `$lookup` needs a foreign collection next to the measured one. These
//! cases do not go through [`TestCaseBuilder`](crate::builder::TestCaseBuilder):
//! their populator fills the primary collection and a sibling named
//! `<primary>_lookup` from one random stream.

use crate::config::Settings;
use crate::context::{GenContext, SeedPolicy};
use crate::generators::{generator, DocGenerator};
use crate::populator::{fill, CountCheck};
use crate::string_cache::StringCache;
use pipebench_core::{
    doc, Collection, Operation, Populate, PopulateReport, Result, TestCase, Value,
    COLL_PLACEHOLDER,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Suffix of the foreign collection's name
pub const LOOKUP_SUFFIX: &str = "_lookup";

/// Fixed seed of the orders case, so its product arrays repeat across runs
pub const LOOKUP_ORDERS_SEED: u64 = 258;

/// Most products a single order refers to
pub const MAX_PRODUCTS_PER_ORDER: u64 = 5;

/// Name of the foreign collection paired with `primary`
pub fn lookup_collection_name(primary: &str) -> String {
    format!("{}{}", primary, LOOKUP_SUFFIX)
}

/// Populator for a primary collection and its `_lookup` sibling
#[derive(Clone)]
pub struct LookupPopulator {
    n_docs: usize,
    primary: DocGenerator,
    foreign: DocGenerator,
    seed: SeedPolicy,
    count_check: CountCheck,
    strings: Arc<StringCache>,
}

impl LookupPopulator {
    /// Create a populator filling both collections with `n_docs` documents
    pub fn new(n_docs: usize, primary: DocGenerator, foreign: DocGenerator) -> Self {
        Self {
            n_docs,
            primary,
            foreign,
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

    /// Share a filler-string cache
    pub fn string_cache(mut self, strings: Arc<StringCache>) -> Self {
        self.strings = strings;
        self
    }
}

impl Populate for LookupPopulator {
    fn populate(&self, collection: &dyn Collection) -> Result<PopulateReport> {
        let started = Instant::now();
        let seed = self.seed.resolve();
        let mut ctx = GenContext::new(seed, Arc::clone(&self.strings));
        debug!(target: "pipebench::populate", collection = collection.name(), seed, "Seeded lookup populate run");

        let primary = fill(
            collection,
            &mut ctx,
            self.n_docs,
            |ctx, i| (self.primary)(ctx, i),
            &[],
            self.count_check,
        )?;

        let foreign_collection = collection.sibling(&lookup_collection_name(collection.name()));
        let foreign = fill(
            foreign_collection.as_ref(),
            &mut ctx,
            self.n_docs,
            |ctx, i| (self.foreign)(ctx, i),
            &[],
            self.count_check,
        )?;

        let elapsed = started.elapsed();
        info!(
            target: "pipebench::populate",
            collection = %primary.collection,
            foreign = %foreign.collection,
            inserted = primary.inserted + foreign.inserted,
            elapsed_ms = elapsed.as_millis() as u64,
            "Populated lookup collections"
        );
        Ok(PopulateReport {
            collections: vec![primary, foreign],
            seed,
            elapsed,
        })
    }
}

fn lookup_from() -> String {
    lookup_collection_name(COLL_PLACEHOLDER)
}

/// `Lookup`: each primary document joins one foreign document by key
///
/// Foreign documents have sequential `_id`s `0..n`; every primary document
/// carries `foreignKey = rand_int(n)`.
pub fn lookup_case(settings: &Settings, strings: &Arc<StringCache>) -> TestCase {
    let n_docs = settings.n_docs;
    let primary = generator(move |ctx, i| {
        doc! {
            "_id" => i,
            "foreignKey" => ctx.rand_int(n_docs as u64),
        }
    });
    let foreign = generator(|ctx, i| {
        doc! {
            "_id" => i,
            "payload" => ctx.rand_int(1000),
        }
    });
    let populator = LookupPopulator::new(n_docs, primary, foreign)
        .seed(settings.seed_policy(SeedPolicy::Fresh))
        .count_check(settings.count_check)
        .string_cache(Arc::clone(strings));

    let pipeline = vec![doc! {
        "$lookup" => doc! {
            "from" => lookup_from(),
            "localField" => "foreignKey",
            "foreignField" => "_id",
            "as" => "joined",
        }
    }];

    TestCase {
        tags: settings.default_tags.clone(),
        name: format!("{}Lookup", settings.name_prefix),
        pre: Arc::new(populator),
        ops: vec![Operation::aggregate(pipeline)],
    }
}

/// `LookupOrders`: orders referencing several products each
///
/// Always seeded with [`LOOKUP_ORDERS_SEED`]; every order carries a
/// `products` array of 1 to 5 product ids, identical on every run.
pub fn lookup_orders_case(settings: &Settings, strings: &Arc<StringCache>) -> TestCase {
    let n_docs = settings.n_docs;
    let orders = generator(move |ctx, i| {
        let len = 1 + ctx.rand_int(MAX_PRODUCTS_PER_ORDER);
        let products: Vec<Value> = (0..len)
            .map(|_| Value::Int(ctx.rand_int(n_docs as u64)))
            .collect();
        doc! {
            "_id" => i,
            "customer" => ctx.rand_int(100),
            "products" => products,
        }
    });
    let products = generator(|ctx, i| {
        doc! {
            "_id" => i,
            "name" => format!("product-{}", i),
            "price" => ctx.rand_int(10_000),
        }
    });
    let populator = LookupPopulator::new(n_docs, orders, products)
        .seed(SeedPolicy::Fixed(LOOKUP_ORDERS_SEED))
        .count_check(settings.count_check)
        .string_cache(Arc::clone(strings));

    let pipeline = vec![doc! {
        "$lookup" => doc! {
            "from" => lookup_from(),
            "localField" => "products",
            "foreignField" => "_id",
            "as" => "product_docs",
        }
    }];

    TestCase {
        tags: settings.default_tags.clone(),
        name: format!("{}LookupOrders", settings.name_prefix),
        pre: Arc::new(populator),
        ops: vec![Operation::aggregate(pipeline)],
    }
}
