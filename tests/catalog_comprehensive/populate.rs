//! Population Tests
//!
//! - builder-made populators fill exactly `n_docs` documents and build indexes
//! - index build failures abort the setup
//! - strict and lenient count checks
//! - independent runs on separate threads

use super::*;
use pipebench::{
    doc, generator, CountCheck, Error, IndexSpec, Populate, Populator, SeedPolicy,
    TestCaseBuilder, Value,
};
use proptest::prelude::*;
use std::thread;

// =============================================================================
// BUILDER POPULATION
// =============================================================================

#[test]
fn test_builder_case_populates_generator_shape() {
    let case = TestCaseBuilder::new("Shaped", vec![])
        .indices(vec![IndexSpec::ascending("a")])
        .n_docs(10)
        .doc_generator(generator(|ctx, i| {
            doc! { "_id" => i, "a" => ctx.rand_int(50), "kind" => "shaped" }
        }))
        .build();

    let (_db, coll) = fresh_collection("shaped");
    let report = case.populate(&coll).expect("populate should succeed");

    assert_eq!(count(&coll), 10);
    assert_eq!(report.collections[0].indexes, vec!["a_1".to_string()]);
    let docs = coll.find_all().unwrap();
    assert!(docs
        .iter()
        .all(|d| d.get("kind") == Some(&Value::from("shaped")) && d.contains_key("a")));
    let index_names: Vec<String> = coll.indexes().unwrap().iter().map(|s| s.name()).collect();
    assert!(index_names.contains(&"a_1".to_string()));
}

#[test]
fn test_default_case_populates_padded_documents() {
    let case = TestCaseBuilder::new("Padded", vec![]).build();
    let (_db, coll) = fresh_collection("padded");
    case.populate(&coll).unwrap();

    let docs = coll.find_all().unwrap();
    assert_eq!(docs.len(), 500);
    for (i, d) in docs.iter().enumerate() {
        assert_eq!(d.get("string").and_then(Value::as_str).map(str::len), Some(12_000));
        assert_eq!(d.get_path("sub_docs.0.x"), Some(&Value::Int(i as i64)));
        assert_eq!(d.get_path("metadata.counter"), Some(&Value::Int(i as i64)));
    }
}

#[test]
fn test_repopulating_replaces_previous_data() {
    let case = TestCaseBuilder::new("Again", vec![]).n_docs(15).build();
    let (_db, coll) = fresh_collection("again");
    case.populate(&coll).unwrap();
    case.populate(&coll).unwrap();
    assert_eq!(count(&coll), 15);
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn test_2d_index_over_non_coordinates_aborts() {
    let case = TestCaseBuilder::new("BadGeo", vec![])
        .index(IndexSpec::geo_2d("geo"))
        .n_docs(5)
        .doc_generator(generator(|_, i| doc! { "_id" => i, "geo" => "somewhere" }))
        .build();

    let (_db, coll) = fresh_collection("bad_geo");
    let err = case.populate(&coll).unwrap_err();
    assert!(
        matches!(err, Error::IndexBuild { ref index, .. } if index == "geo_2d"),
        "unexpected error: {err}"
    );
    assert!(err.is_setup_failure());
}

#[test]
fn test_invalid_index_spec_aborts() {
    let populator = Populator::new(3, vec![IndexSpec::ascending("")], pipebench::default_doc_generator());
    let (_db, coll) = fresh_collection("bad_spec");
    assert!(populator.populate(&coll).is_err());
}

fn colliding_ids() -> pipebench::DocGenerator {
    generator(|_, i| doc! { "_id" => (i % 4) as i64 })
}

#[test]
fn test_strict_count_check_reports_shortfall() {
    let (_db, coll) = fresh_collection("dupes");
    let err = Populator::new(12, vec![], colliding_ids())
        .populate(&coll)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::IncompleteBulkWrite {
            expected: 12,
            inserted: 4,
            ..
        }
    ));
}

#[test]
fn test_lenient_count_check_from_settings() {
    let settings = Settings {
        count_check: CountCheck::Lenient,
        ..small_settings(12)
    };
    let case = TestCaseBuilder::new("Dupes", vec![])
        .doc_generator(colliding_ids())
        .build_with(&settings, &strings());

    let (_db, coll) = fresh_collection("dupes");
    let report = case.populate(&coll).expect("lenient populate should succeed");
    assert_eq!(report.collections[0].inserted, 4);
    assert_eq!(count(&coll), 4);
}

// =============================================================================
// SEEDING AND CONCURRENCY
// =============================================================================

#[test]
fn test_fixed_seed_reproduces_documents() {
    let populator = Populator::new(
        30,
        vec![],
        generator(|ctx, i| doc! { "_id" => i, "r" => ctx.rand_int(1_000_000) }),
    )
    .seed(SeedPolicy::Fixed(258));

    let (_db1, a) = fresh_collection("a");
    let (_db2, b) = fresh_collection("b");
    populator.populate(&a).unwrap();
    populator.populate(&b).unwrap();
    assert_eq!(a.find_all().unwrap(), b.find_all().unwrap());
}

#[test]
fn test_concurrent_populators_do_not_interfere() {
    let db = MemoryDatabase::new("bench");
    let cache = strings();
    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let db = Arc::clone(&db);
            let populator = Populator::new(
                50,
                vec![IndexSpec::ascending("r")],
                generator(|ctx, i| doc! { "_id" => i, "r" => ctx.rand_int(100), "pad" => ctx.padding(32) }),
            )
            .seed(SeedPolicy::Fixed(t))
            .string_cache(Arc::clone(&cache));
            thread::spawn(move || {
                let coll = db.collection(format!("t{}", t));
                populator.populate(&coll).map(|r| r.total_inserted())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 50);
    }
    assert_eq!(db.collection_names().len(), 4);
    assert_eq!(cache.len(), 1);

    // Same seed on a single thread gives the same documents
    let replay = Populator::new(
        50,
        vec![],
        generator(|ctx, i| doc! { "_id" => i, "r" => ctx.rand_int(100), "pad" => ctx.padding(32) }),
    )
    .seed(SeedPolicy::Fixed(2));
    let (_other, coll) = fresh_collection("replay");
    replay.populate(&coll).unwrap();
    assert_eq!(coll.find_all().unwrap(), db.collection("t2").find_all().unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_populator_inserts_exactly_n_docs(n in 0usize..200, seed in any::<u64>()) {
        let (_db, coll) = fresh_collection("prop");
        let report = Populator::new(n, vec![IndexSpec::ascending("b")], pipebench::generators::flat_numeric_generator())
            .seed(SeedPolicy::Fixed(seed))
            .populate(&coll)
            .unwrap();
        prop_assert_eq!(count(&coll), n as u64);
        prop_assert_eq!(report.seed, seed);
        prop_assert_eq!(report.total_inserted(), n as u64);
    }
}
