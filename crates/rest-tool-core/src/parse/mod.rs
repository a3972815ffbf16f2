pub mod document;
pub mod format;
pub mod loader;
pub mod openapi;
pub mod ref_resolve;
pub mod swagger;

use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};
use serde_yaml_ng::Value as YamlValue;

use crate::error::LoadError;

/// Parse a YAML document into a JSON value tree.
///
/// Mapping keys that YAML reads as scalars other than strings (such as the
/// unquoted `200:` of a response map) are turned into their string form.
pub fn from_yaml(input: &str) -> Result<Value, LoadError> {
    let yaml: YamlValue = serde_yaml_ng::from_str(input)?;
    yaml_to_json(yaml)
}

/// Parse a JSON document.
pub fn from_json(input: &str) -> Result<Value, LoadError> {
    Ok(serde_json::from_str(input)?)
}

/// Parse `content` as JSON when `path` has a `.json` extension, as YAML otherwise.
pub fn from_file_content(path: &Path, content: &str) -> Result<Value, LoadError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
    match ext {
        "json" => from_json(content),
        _ => from_yaml(content),
    }
}

fn yaml_to_json(value: YamlValue) -> Result<Value, LoadError> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| LoadError::UnsupportedYaml(format!("number {n}")))?
            }
        }
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(map)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_key(key: YamlValue) -> Result<String, LoadError> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        other => Err(LoadError::UnsupportedYaml(format!(
            "non-scalar mapping key {other:?}"
        ))),
    }
}

/// Keep an explicit `null` as `Some(Value::Null)`: for extension fields the
/// presence of the key is what counts, not its value.
pub(crate) fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_keys_become_strings() {
        let value = from_yaml("responses:\n  200:\n    description: OK\n  404:\n    description: Missing\n").unwrap();
        let responses = value["responses"].as_object().unwrap();
        let keys: Vec<&str> = responses.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["200", "404"]);
    }

    #[test]
    fn test_yaml_preserves_key_order() {
        let value = from_yaml("paths:\n  /z: {}\n  /a: {}\n  /m: {}\n").unwrap();
        let keys: Vec<&str> = value["paths"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["/z", "/a", "/m"]);
    }

    #[test]
    fn test_yaml_scalars() {
        let value = from_yaml("a: 1\nb: 1.5\nc: true\nd: ~\ne: text\nf: [1, two]\n").unwrap();
        assert_eq!(
            value,
            json!({"a": 1, "b": 1.5, "c": true, "d": null, "e": "text", "f": [1, "two"]})
        );
    }

    #[test]
    fn test_from_file_content_by_extension() {
        let json = from_file_content(Path::new("api.json"), r#"{"swagger": "2.0"}"#).unwrap();
        assert_eq!(json["swagger"], "2.0");
        let yaml = from_file_content(Path::new("api.yml"), "swagger: '2.0'\n").unwrap();
        assert_eq!(yaml["swagger"], "2.0");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(from_json("{"), Err(LoadError::Json(_))));
    }
}
