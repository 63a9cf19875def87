//! Generation context
//!
//! Every populate run owns one `GenContext`: a seeded random generator, the
//! shared filler-string cache and an id generator. Document generators draw
//! all randomness from it, so a run is reproducible from its seed and two
//! runs on different threads never share random state.

use crate::ids::ObjectIdGenerator;
use crate::string_cache::StringCache;
use chrono::{SecondsFormat, Utc};
use pipebench_core::Value;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How a populate run seeds its random generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SeedPolicy {
    /// Fresh entropy for every run
    #[default]
    Fresh,
    /// The same seed for every run
    Fixed(u64),
}

impl SeedPolicy {
    /// Seed for one run
    pub fn resolve(self) -> u64 {
        match self {
            SeedPolicy::Fresh => rand::random(),
            SeedPolicy::Fixed(seed) => seed,
        }
    }
}

/// Per-run state handed to document generators
pub struct GenContext {
    rng: StdRng,
    seed: u64,
    strings: Arc<StringCache>,
    ids: ObjectIdGenerator,
}

impl GenContext {
    /// Create a context seeded with `seed`
    pub fn new(seed: u64, strings: Arc<StringCache>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            strings,
            ids: ObjectIdGenerator::new(),
        }
    }

    /// Seed the random stream was last seeded with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the random stream from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = seed;
    }

    /// Uniform float in `[0, 1)`
    pub fn rand(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Uniform integer in `[0, n)`; `0` when `n == 0`
    pub fn rand_int(&mut self, n: u64) -> i64 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n) as i64
    }

    /// Uniform float in `[low, high)`
    pub fn rand_range(&mut self, low: f64, high: f64) -> f64 {
        low + self.rand() * (high - low)
    }

    /// Fresh object id as a value
    pub fn object_id(&mut self) -> Value {
        self.ids.next_id().into()
    }

    /// Current time as an RFC 3339 string value
    pub fn now(&self) -> Value {
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Owned filler string of `size` characters, built once per size
    pub fn padding(&self, size: usize) -> String {
        self.strings.get(size).to_string()
    }

    /// Shared string cache
    pub fn strings(&self) -> &Arc<StringCache> {
        &self.strings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(seed: u64) -> GenContext {
        GenContext::new(seed, Arc::new(StringCache::new()))
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = ctx(258);
        let mut b = ctx(258);
        let xs: Vec<i64> = (0..32).map(|_| a.rand_int(1000)).collect();
        let ys: Vec<i64> = (0..32).map(|_| b.rand_int(1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_reseed_restarts_stream() {
        let mut a = ctx(1);
        let first: Vec<i64> = (0..8).map(|_| a.rand_int(100)).collect();
        a.reseed(1);
        let again: Vec<i64> = (0..8).map(|_| a.rand_int(100)).collect();
        assert_eq!(first, again);
        assert_eq!(a.seed(), 1);
    }

    #[test]
    fn test_rand_bounds() {
        let mut c = ctx(7);
        for _ in 0..1000 {
            let f = c.rand();
            assert!((0.0..1.0).contains(&f));
            let i = c.rand_int(10);
            assert!((0..10).contains(&i));
            let r = c.rand_range(-180.0, 180.0);
            assert!((-180.0..180.0).contains(&r));
        }
        assert_eq!(c.rand_int(0), 0);
    }

    #[test]
    fn test_padding_uses_cache() {
        let c = ctx(0);
        assert_eq!(c.padding(10).len(), 10);
        c.padding(10);
        assert_eq!(c.strings().len(), 1);
    }

    #[test]
    fn test_seed_policy() {
        assert_eq!(SeedPolicy::Fixed(258).resolve(), 258);
        assert_eq!(SeedPolicy::default(), SeedPolicy::Fresh);
    }
}
