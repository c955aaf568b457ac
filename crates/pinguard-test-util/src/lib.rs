//! Shared test utilities for the pinguard workspace.

use serde_json::Value;

const TIMESTAMP_KEYS: &[&str] = &["started_at", "finished_at"];

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// `tool.version` becomes `"__VERSION__"`, but only on the root object and only
/// when it looks like a report envelope (`schema`, `tool`, `verdict`, `findings`).
/// Finding `data` payloads can carry their own `version` keys and are left alone.
///
/// Timestamps are replaced with `"__TIMESTAMP__"` at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "verdict", "findings"]
            .iter()
            .all(|key| obj.contains_key(*key));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
            && tool.contains_key("version")
        {
            tool.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if let Some(slot) = map.get_mut(*key) {
                    *slot = Value::String("__TIMESTAMP__".to_string());
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_envelope_version_and_timestamps() {
        let input = json!({
            "schema": "pinguard.report.v1",
            "tool": { "name": "pinguard", "version": "0.1.0" },
            "started_at": "2026-01-01T00:00:00Z",
            "finished_at": "2026-01-01T00:00:01Z",
            "verdict": "pass",
            "findings": []
        });

        let result = normalize_nondeterministic(input);
        assert_eq!(result["tool"]["version"], "__VERSION__");
        assert_eq!(result["tool"]["name"], "pinguard");
        assert_eq!(result["started_at"], "__TIMESTAMP__");
        assert_eq!(result["finished_at"], "__TIMESTAMP__");
    }

    #[test]
    fn finding_data_versions_are_untouched() {
        let input = json!({
            "schema": "pinguard.report.v1",
            "tool": { "name": "pinguard", "version": "0.1.0" },
            "verdict": "fail",
            "findings": [
                { "data": { "tool": { "name": "maven", "version": "3.9.6" }, "version": "LATEST" } }
            ]
        });

        let result = normalize_nondeterministic(input);
        assert_eq!(result["findings"][0]["data"]["tool"]["version"], "3.9.6");
        assert_eq!(result["findings"][0]["data"]["version"], "LATEST");
    }

    #[test]
    fn non_envelope_root_keeps_tool_version() {
        let input = json!({
            "tool": { "name": "pinguard", "version": "0.1.0" },
            "nested": { "started_at": "2026-01-01T00:00:00Z" }
        });

        let result = normalize_nondeterministic(input);
        assert_eq!(result["tool"]["version"], "0.1.0");
        assert_eq!(result["nested"]["started_at"], "__TIMESTAMP__");
    }
}
