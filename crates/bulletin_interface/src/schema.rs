//! Response schemas for structured oracle output.

use schemars::JsonSchema;
use schemars::r#gen::SchemaSettings;
use serde_json::Value;

// Keywords the provider's OpenAPI subset rejects.
const UNSUPPORTED_KEYWORDS: [&str; 5] = [
    "$schema",
    "definitions",
    "title",
    "additionalProperties",
    "default",
];

/// Derives an inlined OpenAPI 3 schema for `T`.
///
/// # Examples
///
/// ```
/// use bulletin_core::ExtractedRecord;
/// use bulletin_interface::response_schema;
///
/// let schema = response_schema::<ExtractedRecord>().unwrap();
/// assert_eq!(schema["type"], "object");
/// assert!(schema.get("$schema").is_none());
/// assert_eq!(schema["properties"]["link"]["nullable"], true);
/// ```
pub fn response_schema<T: JsonSchema>() -> Result<Value, serde_json::Error> {
    let settings = SchemaSettings::openapi3().with(|s| {
        s.inline_subschemas = true;
    });
    let root = settings.into_generator().into_root_schema_for::<T>();
    let mut value = serde_json::to_value(root)?;
    strip_unsupported(&mut value);
    Ok(value)
}

fn strip_unsupported(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for keyword in UNSUPPORTED_KEYWORDS {
                map.remove(keyword);
            }
            for (key, child) in map.iter_mut() {
                // Property names are field names, not keywords.
                if key == "properties" {
                    if let Value::Object(properties) = child {
                        properties.values_mut().for_each(strip_unsupported);
                    }
                } else {
                    strip_unsupported(child);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(strip_unsupported),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulletin_core::{EventsResult, Script};

    #[test]
    fn test_nested_records_are_inlined() {
        let schema = response_schema::<EventsResult>().unwrap();
        let items = &schema["properties"]["events"]["items"];
        assert_eq!(items["type"], "object");
        assert!(items.get("$ref").is_none());
    }

    #[test]
    fn test_title_property_survives() {
        let schema = response_schema::<EventsResult>().unwrap();
        let record = &schema["properties"]["events"]["items"]["properties"];
        assert!(record.get("title").is_some());
        assert!(record["title"].get("title").is_none());
    }

    #[test]
    fn test_where_field_keeps_wire_name() {
        let schema = response_schema::<Script>().unwrap();
        let story = &schema["properties"]["stories"]["items"]["properties"];
        assert!(story.get("where").is_some());
    }
}
