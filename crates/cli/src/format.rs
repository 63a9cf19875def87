//! Catalog output → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): one line per item, pipelines as compact JSON
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use pipebench_core::{PopulateReport, TestCase};
use serde::Serialize;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Pretty JSON for anything serializable.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

/// Case names, one per line (or a JSON array).
pub fn format_names<'a>(names: impl Iterator<Item = &'a str>, mode: OutputMode) -> String {
    let names: Vec<&str> = names.collect();
    match mode {
        OutputMode::Json => to_json(&names),
        OutputMode::Human => names.join("\n"),
    }
}

/// One test case.
pub fn format_case(case: &TestCase, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => to_json(case),
        OutputMode::Human => {
            let mut lines = vec![
                format!("name: {}", case.name),
                format!("tags: {}", case.tags.join(", ")),
            ];
            for op in &case.ops {
                let command = serde_json::to_string(&op.command)
                    .unwrap_or_else(|e| format!("<unserializable: {}>", e));
                lines.push(format!("{:?} on {}: {}", op.op, op.ns, command));
            }
            lines.join("\n")
        }
    }
}

/// Result of a populate run.
pub fn format_report(case: &str, report: &PopulateReport, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => to_json(report),
        OutputMode::Human => {
            let mut lines = vec![format!(
                "{} (seed {}, {:.1?})",
                case, report.seed, report.elapsed
            )];
            for c in &report.collections {
                let indexes = if c.indexes.is_empty() {
                    "(none)".to_string()
                } else {
                    c.indexes.join(", ")
                };
                lines.push(format!(
                    "  {}: {}/{} documents, indexes: {}",
                    c.collection, c.inserted, c.expected, indexes
                ));
            }
            lines.join("\n")
        }
    }
}
