//! Document generators
//!
//! A generator is a function of the run's [`GenContext`] and the document's
//! index. Apart from the shared random stream, documents never depend on
//! each other.

use crate::context::GenContext;
use pipebench_core::{doc, Document, Value};
use std::sync::Arc;

/// Shared document generator
pub type DocGenerator = Arc<dyn Fn(&mut GenContext, usize) -> Document + Send + Sync>;

/// Length of the padding string in default documents (~12 KB documents)
pub const DEFAULT_PADDING_LEN: usize = 12_000;

/// Number of distinct values of the grouping key in flat records
pub const GROUP_COUNT: i64 = 10;

/// Wrap a closure as a [`DocGenerator`]
pub fn generator<F>(f: F) -> DocGenerator
where
    F: Fn(&mut GenContext, usize) -> Document + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Default padded document with a 12,000 character string
pub fn default_doc_generator() -> DocGenerator {
    padded_doc_generator(DEFAULT_PADDING_LEN)
}

/// Padded document: filler string, one sub-document, metadata block
///
/// ```text
/// { _id, string: "xxx…", sub_docs: [{ _id, x: i, y: i*i }],
///   metadata: { about, created, counter: i } }
/// ```
pub fn padded_doc_generator(padding_len: usize) -> DocGenerator {
    generator(move |ctx, i| {
        let i = i as i64;
        doc! {
            "_id" => ctx.object_id(),
            "string" => ctx.padding(padding_len),
            "sub_docs" => vec![doc! {
                "_id" => ctx.object_id(),
                "x" => i,
                "y" => i * i,
            }],
            "metadata" => doc! {
                "about" => "Used only for Aggregation benchmarks",
                "created" => ctx.now(),
                "counter" => i,
            },
        }
    })
}

/// Flat numeric record
///
/// `a` is the index, `b` a grouping key in `0..GROUP_COUNT`, `c` a random
/// float and `d` a random integer in `0..100`.
pub fn flat_numeric_generator() -> DocGenerator {
    generator(|ctx, i| {
        let i = i as i64;
        doc! {
            "_id" => i,
            "a" => i,
            "b" => i % GROUP_COUNT,
            "c" => ctx.rand(),
            "d" => ctx.rand_int(100),
        }
    })
}

/// Legacy coordinate pair in `geo`, valid for a `2d` index
pub fn legacy_point_generator() -> DocGenerator {
    generator(|ctx, i| {
        doc! {
            "_id" => i,
            "geo" => vec![
                Value::Float(ctx.rand_range(-180.0, 180.0)),
                Value::Float(ctx.rand_range(-90.0, 90.0)),
            ],
        }
    })
}

/// GeoJSON point in `geo`, valid for a `2dsphere` index
pub fn geojson_point_generator() -> DocGenerator {
    generator(|ctx, i| {
        doc! {
            "_id" => i,
            "geo" => doc! {
                "type" => "Point",
                "coordinates" => vec![
                    Value::Float(ctx.rand_range(-180.0, 180.0)),
                    Value::Float(ctx.rand_range(-90.0, 90.0)),
                ],
            },
        }
    })
}

/// Document with an `array` of `len` random integers in `0..1000`
pub fn array_doc_generator(len: usize) -> DocGenerator {
    generator(move |ctx, i| {
        let array: Vec<Value> = (0..len).map(|_| Value::Int(ctx.rand_int(1000))).collect();
        doc! {
            "_id" => i,
            "array" => array,
        }
    })
}

/// Document with a value two sub-documents deep (`outer.inner.value`)
pub fn nested_doc_generator() -> DocGenerator {
    generator(|ctx, i| {
        doc! {
            "_id" => i,
            "outer" => doc! {
                "inner" => doc! {
                    "value" => ctx.rand_int(1000),
                    "label" => format!("item-{}", i),
                },
                "depth" => 1,
            },
        }
    })
}

/// Document with access `level` markers at every depth, for `$redact`
///
/// The top level alternates between levels 0..3; nested sections carry
/// random levels so redaction prunes at different depths.
pub fn redact_doc_generator() -> DocGenerator {
    generator(|ctx, i| {
        let sections: Vec<Value> = (0..4)
            .map(|s| {
                Value::from(doc! {
                    "level" => ctx.rand_int(3),
                    "section" => s,
                    "detail" => doc! { "level" => ctx.rand_int(3), "body" => "classified" },
                })
            })
            .collect();
        doc! {
            "_id" => i,
            "level" => (i % 3) as i64,
            "sections" => sections,
        }
    })
}
