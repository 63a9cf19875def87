//! The aggregation benchmark catalog
//!
//! Every case measures a single aggregate command. Cases are registered in
//! a fixed order; names are unique.

use crate::builder::TestCaseBuilder;
use crate::config::Settings;
use crate::generators::{
    array_doc_generator, flat_numeric_generator, geojson_point_generator,
    legacy_point_generator, nested_doc_generator, redact_doc_generator,
};
use crate::lookup::{lookup_case, lookup_orders_case};
use crate::registry::Registry;
use crate::string_cache::StringCache;
use pipebench_core::{array, doc, Document, IndexSpec, Result, COLL_PLACEHOLDER};
use std::sync::Arc;
use tracing::info;

/// Length of the `array` field in unwind cases
pub const UNWIND_ARRAY_LEN: usize = 10;

/// `$sample` size well under 5% of the collection
pub const SMALL_SAMPLE_SIZE: i64 = 10;

/// `$sample` size above 5% of the collection
pub const LARGE_SAMPLE_SIZE: i64 = 200;

/// Build the full catalog
///
/// # Errors
///
/// `Error::DuplicateTestCase` if two cases end up with the same name.
pub fn aggregation_catalog(settings: &Settings) -> Result<Registry> {
    let strings = Arc::new(StringCache::new());
    let mut registry = Registry::new();

    for builder in builder_cases() {
        registry.register(builder.build_with(settings, &strings))?;
    }
    registry.register(lookup_case(settings, &strings))?;
    registry.register(lookup_orders_case(settings, &strings))?;

    info!(target: "pipebench::catalog", cases = registry.len(), "Assembled aggregation catalog");
    Ok(registry)
}

/// The catalog under default settings
pub fn default_catalog() -> Result<Registry> {
    aggregation_catalog(&Settings::default())
}

fn count_all() -> Document {
    doc! { "$group" => doc! { "_id" => (), "count" => doc! { "$sum" => 1 } } }
}

fn unwind_array() -> Document {
    doc! { "$unwind" => "$array" }
}

/// Builder-made cases in registration order
pub fn builder_cases() -> Vec<TestCaseBuilder> {
    vec![
        // Counting
        TestCaseBuilder::new("CountsFullCollection", vec![count_all()]),
        TestCaseBuilder::new(
            "CountsWithMatch",
            vec![doc! { "$match" => doc! { "b" => doc! { "$lt" => 5 } } }, count_all()],
        )
        .doc_generator(flat_numeric_generator()),
        // Geo
        TestCaseBuilder::new(
            "GeoNear2d",
            vec![doc! {
                "$geoNear" => doc! {
                    "near" => array![0.0, 0.0],
                    "distanceField" => "dist",
                    "spherical" => false,
                }
            }],
        )
        .index(IndexSpec::geo_2d("geo"))
        .doc_generator(legacy_point_generator()),
        TestCaseBuilder::new(
            "GeoNear2dSphere",
            vec![doc! {
                "$geoNear" => doc! {
                    "near" => doc! { "type" => "Point", "coordinates" => array![0.0, 0.0] },
                    "distanceField" => "dist",
                    "spherical" => true,
                }
            }],
        )
        .index(IndexSpec::geo_2dsphere("geo"))
        .doc_generator(geojson_point_generator()),
        // Grouping
        TestCaseBuilder::new(
            "Group.SumAll",
            vec![doc! { "$group" => doc! { "_id" => (), "total" => doc! { "$sum" => "$a" } } }],
        )
        .doc_generator(flat_numeric_generator()),
        TestCaseBuilder::new(
            "Group.TenGroups",
            vec![doc! { "$group" => doc! { "_id" => "$b", "count" => doc! { "$sum" => 1 } } }],
        )
        .doc_generator(flat_numeric_generator()),
        TestCaseBuilder::new(
            "Group.TenGroupsWithAvg",
            vec![doc! { "$group" => doc! { "_id" => "$b", "avg" => doc! { "$avg" => "$c" } } }],
        )
        .doc_generator(flat_numeric_generator()),
        TestCaseBuilder::new(
            "Group.TenGroupsWithMinMax",
            vec![doc! {
                "$group" => doc! {
                    "_id" => "$b",
                    "min" => doc! { "$min" => "$d" },
                    "max" => doc! { "$max" => "$d" },
                }
            }],
        )
        .doc_generator(flat_numeric_generator()),
        TestCaseBuilder::new(
            "Group.TenGroupsWithPush",
            vec![doc! { "$group" => doc! { "_id" => "$b", "all" => doc! { "$push" => "$a" } } }],
        )
        .doc_generator(flat_numeric_generator()),
        // Limit / skip
        TestCaseBuilder::new("Limit", vec![doc! { "$limit" => 250 }]),
        TestCaseBuilder::new("Skip", vec![doc! { "$skip" => 250 }]),
        // Match
        TestCaseBuilder::new(
            "Match",
            vec![doc! { "$match" => doc! { "d" => doc! { "$gte" => 50 } } }],
        )
        .doc_generator(flat_numeric_generator()),
        TestCaseBuilder::new(
            "MatchIndexed",
            vec![doc! { "$match" => doc! { "d" => doc! { "$gte" => 50 } } }],
        )
        .index(IndexSpec::ascending("d"))
        .doc_generator(flat_numeric_generator()),
        // Project
        TestCaseBuilder::new(
            "Project",
            vec![doc! { "$project" => doc! { "metadata" => 1, "sub_docs" => 1 } }],
        ),
        TestCaseBuilder::new(
            "ProjectComputedField",
            vec![doc! { "$project" => doc! { "sum" => doc! { "$add" => array!["$a", "$d"] } } }],
        )
        .doc_generator(flat_numeric_generator()),
        // Redact
        TestCaseBuilder::new(
            "Redact",
            vec![doc! {
                "$redact" => doc! {
                    "$cond" => doc! {
                        "if" => doc! { "$lte" => array!["$level", 1] },
                        "then" => "$$DESCEND",
                        "else" => "$$PRUNE",
                    }
                }
            }],
        )
        .doc_generator(redact_doc_generator()),
        // Sample
        TestCaseBuilder::new(
            "Sample.SmallSample",
            vec![doc! { "$sample" => doc! { "size" => SMALL_SAMPLE_SIZE } }],
        ),
        TestCaseBuilder::new(
            "Sample.LargeSample",
            vec![doc! { "$sample" => doc! { "size" => LARGE_SAMPLE_SIZE } }],
        ),
        // Sort
        TestCaseBuilder::new("Sort", vec![doc! { "$sort" => doc! { "c" => 1 } }])
            .doc_generator(flat_numeric_generator()),
        TestCaseBuilder::new(
            "SortWithLimit",
            vec![doc! { "$sort" => doc! { "c" => 1 } }, doc! { "$limit" => 10 }],
        )
        .doc_generator(flat_numeric_generator()),
        TestCaseBuilder::new(
            "SortByNestedField",
            vec![doc! { "$sort" => doc! { "outer.inner.value" => 1 } }],
        )
        .doc_generator(nested_doc_generator()),
        TestCaseBuilder::new(
            "SortByComputedField",
            vec![
                doc! { "$project" => doc! { "a" => 1, "neg" => doc! { "$subtract" => array![0, "$d"] } } },
                doc! { "$sort" => doc! { "neg" => 1 } },
            ],
        )
        .doc_generator(flat_numeric_generator()),
        TestCaseBuilder::new("SortIndexed", vec![doc! { "$sort" => doc! { "c" => 1 } }])
            .index(IndexSpec::ascending("c"))
            .doc_generator(flat_numeric_generator()),
        // Unwind
        TestCaseBuilder::new("Unwind", vec![unwind_array()])
            .doc_generator(array_doc_generator(UNWIND_ARRAY_LEN)),
        TestCaseBuilder::new(
            "UnwindThenGroup",
            vec![
                unwind_array(),
                doc! { "$group" => doc! { "_id" => "$array", "count" => doc! { "$sum" => 1 } } },
            ],
        )
        .doc_generator(array_doc_generator(UNWIND_ARRAY_LEN)),
        TestCaseBuilder::new(
            "UnwindThenSort",
            vec![unwind_array(), doc! { "$sort" => doc! { "array" => 1 } }],
        )
        .doc_generator(array_doc_generator(UNWIND_ARRAY_LEN)),
        TestCaseBuilder::new(
            "UnwindThenSkip",
            vec![unwind_array(), doc! { "$skip" => 1000 }],
        )
        .doc_generator(array_doc_generator(UNWIND_ARRAY_LEN)),
        // Out
        TestCaseBuilder::new(
            "Out",
            vec![doc! { "$out" => format!("{}_out", COLL_PLACEHOLDER) }],
        ),
    ]
}
