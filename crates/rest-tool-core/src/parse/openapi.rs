use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::{Info, PathItem};

/// Top-level OpenAPI 3.0 document, reduced to the fields the normalizer reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiSpec {
    pub openapi: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem<Operation>>,
}

/// A server variable for URL templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerVariable {
    pub default: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
}

/// A server URL definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,
}

/// An OpenAPI 3.0 operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(
        rename = "x-static",
        default,
        deserialize_with = "super::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub x_static: Option<Value>,
}

/// A request body; only its media-type keys matter here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, Value>,
}

/// A reference or inline request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBodyOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    RequestBody(RequestBody),
}

/// A response definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

/// A reference, an inline response, or a vendor extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
    Other(Value),
}

/// A media type object: a singular `example` or a map of named `examples`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(
        default,
        deserialize_with = "super::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub example: Option<Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Example>,
}

/// A named example.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Example {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(rename = "externalValue", skip_serializing_if = "Option::is_none")]
    pub external_value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_media_type_examples() {
        let mt: MediaType = serde_json::from_value(json!({
            "schema": {"type": "object"},
            "examples": {
                "foo": {"value": {"versions": []}},
                "bar": {"externalValue": "http://example.org/bar.json"},
                "baz": {"summary": "nothing"}
            }
        }))
        .unwrap();
        assert!(mt.example.is_none());
        assert_eq!(mt.examples.len(), 3);
        assert_eq!(mt.examples["foo"].value, Some(json!({"versions": []})));
        assert_eq!(
            mt.examples["bar"].external_value.as_deref(),
            Some("http://example.org/bar.json")
        );
        assert!(mt.examples["baz"].value.is_none());
    }

    #[test]
    fn test_parse_server_variables() {
        let server: Server = serde_json::from_value(json!({
            "url": "{scheme}://api.example.com/{basePath}",
            "variables": {
                "scheme": {"default": "https", "enum": ["http", "https"]},
                "basePath": {"default": "v2"}
            }
        }))
        .unwrap();
        assert_eq!(server.variables.len(), 2);
        assert_eq!(server.variables["scheme"].enum_values, vec!["http", "https"]);
    }

    #[test]
    fn test_request_body_content_keys() {
        let op: Operation = serde_json::from_value(json!({
            "requestBody": {"content": {"application/json": {}, "application/xml": {}}}
        }))
        .unwrap();
        match op.request_body {
            Some(RequestBodyOrRef::RequestBody(body)) => {
                let keys: Vec<&String> = body.content.keys().collect();
                assert_eq!(keys, vec!["application/json", "application/xml"]);
            }
            other => panic!("expected inline request body, got {other:?}"),
        }
    }
}
