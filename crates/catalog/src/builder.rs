//! Test case builder
//!
//! Assembles a [`TestCase`] from a short name, an aggregation pipeline and
//! optional overrides. Anything not overridden comes from [`Settings`].
//!
//! ```ignore
//! let case = TestCaseBuilder::new("MatchIndexed", vec![doc! { "$match" => doc! { "a" => 7 } }])
//!     .index(IndexSpec::ascending("a"))
//!     .doc_generator(flat_numeric_generator())
//!     .build();
//! assert_eq!(case.name, "Aggregation.MatchIndexed");
//! ```

use crate::config::Settings;
use crate::context::SeedPolicy;
use crate::generators::{padded_doc_generator, DocGenerator};
use crate::populator::Populator;
use crate::string_cache::StringCache;
use pipebench_core::{Document, IndexSpec, Operation, TestCase};
use std::sync::Arc;

/// Builder for one aggregation test case
#[derive(Clone)]
pub struct TestCaseBuilder {
    name: String,
    pipeline: Vec<Document>,
    tags: Option<Vec<String>>,
    indices: Vec<IndexSpec>,
    n_docs: Option<usize>,
    generator: Option<DocGenerator>,
    seed: SeedPolicy,
}

impl TestCaseBuilder {
    /// Start a case named `name` (unprefixed) running `pipeline`
    pub fn new(name: impl Into<String>, pipeline: Vec<Document>) -> Self {
        Self {
            name: name.into(),
            pipeline,
            tags: None,
            indices: Vec::new(),
            n_docs: None,
            generator: None,
            seed: SeedPolicy::Fresh,
        }
    }

    /// Replace the default tags
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the index list
    pub fn indices(mut self, indices: Vec<IndexSpec>) -> Self {
        self.indices = indices;
        self
    }

    /// Append one index
    pub fn index(mut self, spec: IndexSpec) -> Self {
        self.indices.push(spec);
        self
    }

    /// Number of documents to populate
    pub fn n_docs(mut self, n_docs: usize) -> Self {
        self.n_docs = Some(n_docs);
        self
    }

    /// Document generator for population
    pub fn doc_generator(mut self, generator: DocGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Seed policy for population
    pub fn seed(mut self, seed: SeedPolicy) -> Self {
        self.seed = seed;
        self
    }

    /// Build with default settings and a private string cache
    pub fn build(self) -> TestCase {
        self.build_with(&Settings::default(), &Arc::new(StringCache::new()))
    }

    /// Build, resolving unset options from `settings`
    pub fn build_with(self, settings: &Settings, strings: &Arc<StringCache>) -> TestCase {
        let generator = self
            .generator
            .unwrap_or_else(|| padded_doc_generator(settings.padding_len));
        let populator = Populator::new(
            self.n_docs.unwrap_or(settings.n_docs),
            self.indices,
            generator,
        )
        .seed(settings.seed_policy(self.seed))
        .count_check(settings.count_check)
        .string_cache(Arc::clone(strings));

        TestCase {
            tags: self.tags.unwrap_or_else(|| settings.default_tags.clone()),
            name: format!("{}{}", settings.name_prefix, self.name),
            pre: Arc::new(populator),
            ops: vec![Operation::aggregate(self.pipeline)],
        }
    }
}
