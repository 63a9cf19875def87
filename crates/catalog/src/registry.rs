//! Registry of test cases
//!
//! Keeps registration order and rejects duplicate names. Built once by
//! [`aggregation_catalog`](crate::catalog::aggregation_catalog) and handed
//! to the harness; read-only afterwards.

use pipebench_core::{Error, Result, TestCase};
use rustc_hash::FxHashMap;

/// Ordered, name-unique collection of test cases
#[derive(Debug, Default, Clone)]
pub struct Registry {
    cases: Vec<TestCase>,
    by_name: FxHashMap<String, usize>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a case
    ///
    /// # Errors
    ///
    /// `Error::DuplicateTestCase` if a case with the same name exists.
    pub fn register(&mut self, case: TestCase) -> Result<()> {
        if self.by_name.contains_key(&case.name) {
            return Err(Error::DuplicateTestCase(case.name));
        }
        self.by_name.insert(case.name.clone(), self.cases.len());
        self.cases.push(case);
        Ok(())
    }

    /// Case with exactly this name
    pub fn get(&self, name: &str) -> Option<&TestCase> {
        self.by_name.get(name).map(|&i| &self.cases[i])
    }

    /// Case with this name, or `Error::TestCaseNotFound`
    pub fn require(&self, name: &str) -> Result<&TestCase> {
        self.get(name)
            .ok_or_else(|| Error::TestCaseNotFound(name.to_string()))
    }

    /// Cases in registration order
    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    /// Number of cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Check whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Cases carrying `tag`, in registration order
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TestCase> + 'a {
        self.cases.iter().filter(move |c| c.has_tag(tag))
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.cases.iter().map(|c| c.name.as_str()).collect()
    }

    /// Consume the registry, yielding cases in registration order
    pub fn into_vec(self) -> Vec<TestCase> {
        self.cases
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

impl IntoIterator for Registry {
    type Item = TestCase;
    type IntoIter = std::vec::IntoIter<TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestCaseBuilder;

    fn case(name: &str) -> TestCase {
        TestCaseBuilder::new(name, vec![]).build()
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = Registry::new();
        registry.register(case("A")).unwrap();
        registry.register(case("B")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["Aggregation.A", "Aggregation.B"]);
        assert!(registry.get("Aggregation.B").is_some());
        assert!(registry.get("B").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = Registry::new();
        registry.register(case("A")).unwrap();
        let err = registry.register(case("A")).unwrap_err();
        assert!(matches!(err, Error::DuplicateTestCase(name) if name == "Aggregation.A"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_require_missing() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.require("Aggregation.Nope"),
            Err(Error::TestCaseNotFound(_))
        ));
    }

    #[test]
    fn test_with_tag_filters() {
        let mut registry = Registry::new();
        registry.register(case("Default")).unwrap();
        registry
            .register(TestCaseBuilder::new("Smoke", vec![]).tags(["smoke"]).build())
            .unwrap();

        let smoke: Vec<&str> = registry.with_tag("smoke").map(|c| c.name.as_str()).collect();
        assert_eq!(smoke, vec!["Aggregation.Smoke"]);
        assert_eq!(registry.with_tag("regression").count(), 1);
        assert_eq!(registry.with_tag("missing").count(), 0);
    }

    #[test]
    fn test_into_vec_keeps_order() {
        let mut registry = Registry::new();
        for name in ["C", "A", "B"] {
            registry.register(case(name)).unwrap();
        }
        let names: Vec<String> = registry.into_vec().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Aggregation.C", "Aggregation.A", "Aggregation.B"]);
    }
}
