//! JSON schema generation for structured model output.
//!
//! Schemas are derived from the Rust output types with `schemars`, then cut
//! down to the subset that Gemini, OpenAI and Ollama all accept.

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde_json::{json, Map, Value};

/// Keys that at least one provider rejects inside a response schema.
const UNSUPPORTED_KEYS: &[&str] = &[
    "$schema",
    "$id",
    "title",
    "definitions",
    "$defs",
    "format",
    "additionalProperties",
    "default",
    "examples",
];

/// Build the provider-neutral response schema for `T`.
pub fn response_schema<T: JsonSchema>() -> Value {
    let generator = SchemaSettings::draft07()
        .with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .into_generator();
    let root = generator.into_root_schema_for::<T>();

    let mut value = serde_json::to_value(root).unwrap_or_else(|_| json!({ "type": "object" }));
    strip_unsupported(&mut value);
    value
}

/// Recursively remove keys that providers do not understand.
pub fn strip_unsupported(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in UNSUPPORTED_KEYS {
                map.remove(*key);
            }
            // `properties` holds user field names, which must survive even if
            // one is called "title" or "format".
            if let Some(Value::Object(props)) = map.get_mut("properties") {
                for prop in props.values_mut() {
                    strip_unsupported(prop);
                }
            }
            for (key, child) in map.iter_mut() {
                if key != "properties" {
                    strip_unsupported(child);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_unsupported(item);
            }
        }
        _ => {}
    }
}

/// Re-add `additionalProperties: false` to every object, as OpenAI's strict
/// structured output mode requires.
pub fn close_objects(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len() + 1);
            for (key, child) in map {
                if key == "properties" {
                    if let Value::Object(props) = child {
                        let closed: Map<String, Value> = props
                            .iter()
                            .map(|(name, prop)| (name.clone(), close_objects(prop)))
                            .collect();
                        out.insert(key.clone(), Value::Object(closed));
                        continue;
                    }
                }
                out.insert(key.clone(), close_objects(child));
            }
            if map.get("type").and_then(Value::as_str) == Some("object") {
                out.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(close_objects).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    /// Doc comment on the type.
    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    #[allow(dead_code)]
    struct Sample {
        /// Whether it worked.
        did_work: bool,
        /// Free text.
        title: String,
    }

    #[test]
    fn test_response_schema_shape() {
        let schema = response_schema::<Sample>();
        assert_eq!(schema["type"], "object");
        assert!(schema.get("$schema").is_none());
        assert!(schema.get("title").is_none());
        assert_eq!(schema["properties"]["didWork"]["type"], "boolean");
        assert_eq!(schema["properties"]["title"]["type"], "string");
        assert_eq!(schema["properties"]["didWork"]["description"], "Whether it worked.");

        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"didWork"));
        assert!(required.contains(&"title"));
    }

    #[test]
    fn test_strip_keeps_property_names() {
        let mut value = json!({
            "title": "Sample",
            "type": "object",
            "properties": {
                "format": { "type": "string", "format": "date" }
            }
        });
        strip_unsupported(&mut value);
        assert!(value.get("title").is_none());
        assert_eq!(value["properties"]["format"], json!({ "type": "string" }));
    }

    #[test]
    fn test_close_objects() {
        let schema = json!({
            "type": "object",
            "properties": { "inner": { "type": "object", "properties": {} } }
        });
        let closed = close_objects(&schema);
        assert_eq!(closed["additionalProperties"], false);
        assert_eq!(closed["properties"]["inner"]["additionalProperties"], false);
        assert!(closed["properties"].get("additionalProperties").is_none());
    }
}
