//! Catalog Tests
//!
//! - registry contents, uniqueness and ordering
//! - every case populates cleanly under strict checks
//! - lookup cases fill both collections
//! - settings files drive the catalog

use super::*;
use pipebench::{
    default_catalog, lookup_collection_name, Error, TestCaseBuilder, Value, LOOKUP_ORDERS_SEED,
};
use std::collections::HashSet;
use tempfile::TempDir;

const EXPECTED_CASES: &[&str] = &[
    "CountsFullCollection",
    "CountsWithMatch",
    "GeoNear2d",
    "GeoNear2dSphere",
    "Group.SumAll",
    "Group.TenGroups",
    "Group.TenGroupsWithAvg",
    "Group.TenGroupsWithMinMax",
    "Group.TenGroupsWithPush",
    "Limit",
    "Skip",
    "Match",
    "MatchIndexed",
    "Project",
    "ProjectComputedField",
    "Redact",
    "Sample.SmallSample",
    "Sample.LargeSample",
    "Sort",
    "SortWithLimit",
    "SortByNestedField",
    "SortByComputedField",
    "SortIndexed",
    "Unwind",
    "UnwindThenGroup",
    "UnwindThenSort",
    "UnwindThenSkip",
    "Out",
    "Lookup",
    "LookupOrders",
];

// =============================================================================
// REGISTRY CONTENTS
// =============================================================================

#[test]
fn test_catalog_lists_every_case_in_order() {
    let registry = default_catalog().unwrap();
    let expected: Vec<String> = EXPECTED_CASES
        .iter()
        .map(|n| format!("Aggregation.{}", n))
        .collect();
    assert_eq!(registry.names(), expected);
}

#[test]
fn test_catalog_names_are_unique() {
    let registry = default_catalog().unwrap();
    let unique: HashSet<&str> = registry.names().into_iter().collect();
    assert_eq!(unique.len(), registry.len());
}

#[test]
fn test_registering_a_catalog_name_again_fails() {
    let mut registry = default_catalog().unwrap();
    let before = registry.len();
    let err = registry
        .register(TestCaseBuilder::new("Sort", vec![]).build())
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateTestCase(ref name) if name == "Aggregation.Sort"));
    assert_eq!(registry.len(), before);
}

#[test]
fn test_catalog_is_rebuilt_fresh_each_call() {
    let a = default_catalog().unwrap();
    let b = default_catalog().unwrap();
    assert_eq!(a.names(), b.names());
}

// =============================================================================
// POPULATION
// =============================================================================

#[test]
fn test_every_case_populates_small_collections() {
    let registry = small_catalog(25);
    let db = MemoryDatabase::new("bench");

    for case in &registry {
        let coll = db.collection(case.name.replace('.', "_"));
        let report = case
            .populate(&coll)
            .unwrap_or_else(|e| panic!("{}: {}", case.name, e));
        assert_eq!(report.collections[0].inserted, 25, "{}", case.name);
        assert_eq!(count(&coll), 25, "{}", case.name);
    }
}

#[test]
fn test_lookup_cases_fill_both_collections() {
    let registry = default_catalog().unwrap();
    for name in ["Aggregation.Lookup", "Aggregation.LookupOrders"] {
        let (db, coll) = fresh_collection("primary");
        registry.require(name).unwrap().populate(&coll).unwrap();
        assert_eq!(count(&coll), 500, "{}", name);
        let foreign = db.collection(lookup_collection_name("primary"));
        assert_eq!(count(&foreign), 500, "{}", name);
    }
}

#[test]
fn test_lookup_orders_repeat_across_separate_runs() {
    let products = |registry: &Registry| {
        let (_db, coll) = fresh_collection("orders");
        let report = registry
            .require("Aggregation.LookupOrders")
            .unwrap()
            .populate(&coll)
            .unwrap();
        assert_eq!(report.seed, LOOKUP_ORDERS_SEED);
        coll.find_all()
            .unwrap()
            .into_iter()
            .filter_map(|d| d.get("products").cloned())
            .collect::<Vec<Value>>()
    };
    let first = products(&default_catalog().unwrap());
    let second = products(&default_catalog().unwrap());
    assert_eq!(first.len(), 500);
    assert_eq!(first, second);
}

// =============================================================================
// SETTINGS
// =============================================================================

#[test]
fn test_settings_file_drives_catalog() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pipebench.toml");
    std::fs::write(
        &path,
        "n_docs = 8\npadding_len = 10\nname_prefix = \"Agg.\"\ndefault_tags = [\"nightly\"]\nseed = 3\n",
    )
    .unwrap();

    let settings = Settings::from_file(&path).unwrap();
    let registry = aggregation_catalog(&settings).unwrap();
    assert!(registry.iter().all(|c| c.name.starts_with("Agg.")));
    assert_eq!(registry.with_tag("nightly").count(), registry.len());

    let (_db, coll) = fresh_collection("limit");
    let report = registry.require("Agg.Limit").unwrap().populate(&coll).unwrap();
    assert_eq!(report.seed, 3);
    assert_eq!(count(&coll), 8);
    let padded = coll.find_all().unwrap();
    assert_eq!(
        padded[0].get("string").and_then(Value::as_str).map(str::len),
        Some(10)
    );
}

#[test]
fn test_default_settings_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pipebench.toml");
    Settings::write_default_if_missing(&path).unwrap();
    assert_eq!(Settings::from_file(&path).unwrap(), Settings::default());
}

#[test]
fn test_bad_settings_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pipebench.toml");
    std::fs::write(&path, "count_check = \"maybe\"\n").unwrap();
    assert!(matches!(Settings::from_file(&path), Err(Error::Config(_))));
}
