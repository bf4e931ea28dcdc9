//! Shared fixture helpers for the integration tests.

use serde_json::json;

/// Wrap a table (rows of JSON cell values) in the callback-style response
/// the gviz endpoint actually returns. `null` cells stay bare nulls, the way
/// the endpoint emits missing cells.
#[allow(dead_code)]
pub fn gviz_body(rows: &[Vec<serde_json::Value>]) -> String {
    let rows: Vec<_> = rows
        .iter()
        .map(|cells| {
            let c: Vec<_> = cells
                .iter()
                .map(|v| {
                    if v.is_null() {
                        json!(null)
                    } else {
                        json!({ "v": v })
                    }
                })
                .collect();
            json!({ "c": c })
        })
        .collect();
    format!(
        "google.visualization.Query.setResponse({});",
        json!({ "table": { "rows": rows } })
    )
}
