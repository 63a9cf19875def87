//! Output Contract Tests
//!
//! - serialized cases are `{tags, name, ops}` with no setup procedure
//! - every op targets `#B_DB` / `#B_COLL`
//! - `Operation::resolve` substitutes tokens in string values only

use super::*;
use pipebench::{
    default_catalog, doc, Operation, TestCaseBuilder, Value, COLL_PLACEHOLDER, DB_PLACEHOLDER,
};

#[test]
fn test_case_serializes_without_setup() {
    let case = TestCaseBuilder::new("Limit", vec![doc! { "$limit" => 5 }]).build();
    let json = serde_json::to_value(&case).unwrap();

    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 3);
    for key in ["tags", "name", "ops"] {
        assert!(keys.contains(&key), "missing {}", key);
    }
    assert_eq!(json["ops"][0]["op"], "command");
    assert_eq!(json["ops"][0]["ns"], DB_PLACEHOLDER);
    assert_eq!(json["ops"][0]["command"]["aggregate"], COLL_PLACEHOLDER);
    assert_eq!(json["ops"][0]["command"]["pipeline"][0]["$limit"], 5);
    assert!(json["ops"][0]["command"]["cursor"].as_object().unwrap().is_empty());
}

#[test]
fn test_command_fields_keep_their_order() {
    let case = TestCaseBuilder::new("Ordered", vec![]).build();
    let text = serde_json::to_string(&case.ops[0].command).unwrap();
    let aggregate = text.find("\"aggregate\"").unwrap();
    let pipeline = text.find("\"pipeline\"").unwrap();
    let cursor = text.find("\"cursor\"").unwrap();
    assert!(aggregate < pipeline && pipeline < cursor);
}

#[test]
fn test_whole_catalog_targets_placeholders() {
    let registry = default_catalog().unwrap();
    let json = serde_json::to_value(registry.iter().collect::<Vec<_>>()).unwrap();
    let cases = json.as_array().unwrap();
    assert_eq!(cases.len(), registry.len());
    for case in cases {
        assert_eq!(case["ops"][0]["ns"], DB_PLACEHOLDER);
        assert_eq!(case["ops"][0]["command"]["aggregate"], COLL_PLACEHOLDER);
    }
}

#[test]
fn test_resolve_substitutes_names() {
    let op = Operation::aggregate(vec![
        doc! { "$match" => doc! { "source" => "#B_DB.#B_COLL" } },
        doc! { "$lookup" => doc! { "from" => "#B_COLL_lookup", "localField" => "k", "foreignField" => "_id", "as" => "j" } },
        doc! { "$out" => "#B_COLL_out" },
    ]);
    let resolved = op.resolve("perf", "orders");

    assert_eq!(resolved.ns, "perf");
    assert_eq!(resolved.command.get("aggregate"), Some(&Value::from("orders")));
    let stages = resolved.pipeline().unwrap();
    assert_eq!(
        stages[0].as_document().unwrap().get_path("$match.source"),
        Some(&Value::from("perf.orders"))
    );
    assert_eq!(
        stages[1].as_document().unwrap().get_path("$lookup.from"),
        Some(&Value::from("orders_lookup"))
    );
    assert_eq!(
        stages[2].as_document().unwrap().get("$out"),
        Some(&Value::from("orders_out"))
    );
    // The template is left untouched
    assert_eq!(op.ns, DB_PLACEHOLDER);
}

#[test]
fn test_resolve_leaves_field_names_alone() {
    let op = Operation::aggregate(vec![doc! { "$project" => doc! { "#B_COLL" => 1 } }]);
    let resolved = op.resolve("db", "c");
    let project = resolved.pipeline().unwrap()[0]
        .as_document()
        .unwrap()
        .get("$project")
        .and_then(Value::as_document)
        .unwrap();
    assert!(project.contains_key("#B_COLL"));
    assert!(!project.contains_key("c"));
}

#[test]
fn test_lookup_case_resolves_against_real_collections() {
    let registry = default_catalog().unwrap();
    let case = registry.require("Aggregation.Lookup").unwrap();
    let (db, coll) = fresh_collection("people");
    case.populate(&coll).unwrap();

    let resolved = case.ops[0].resolve(db.name(), coll.name());
    let from = resolved.pipeline().unwrap()[0]
        .as_document()
        .and_then(|d| d.get_path("$lookup.from"))
        .and_then(Value::as_str)
        .unwrap()
        .to_string();
    assert!(db.has_collection(&from));
}
