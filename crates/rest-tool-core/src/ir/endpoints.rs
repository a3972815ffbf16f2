use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    /// Every recognized method, in the order endpoints are enumerated.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One endpoint of an API, independent of the specification format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EndpointDescriptor {
    /// A route serving static content, declared with `x-static`.
    Static(StaticEndpoint),
    /// A regular REST operation.
    Operation(OperationEndpoint),
}

impl EndpointDescriptor {
    pub fn uri(&self) -> &str {
        match self {
            EndpointDescriptor::Static(s) => &s.uri,
            EndpointDescriptor::Operation(op) => &op.uri,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, EndpointDescriptor::Static(_))
    }

    pub fn as_operation(&self) -> Option<&OperationEndpoint> {
        match self {
            EndpointDescriptor::Operation(op) => Some(op),
            EndpointDescriptor::Static(_) => None,
        }
    }

    pub fn as_static(&self) -> Option<&StaticEndpoint> {
        match self {
            EndpointDescriptor::Static(s) => Some(s),
            EndpointDescriptor::Operation(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticEndpoint {
    pub uri: String,

    /// The `x-static` payload, carried verbatim.
    #[serde(rename = "static")]
    pub content: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationEndpoint {
    /// Path template with `{param}` placeholders.
    pub uri: String,
    /// Path template with `:param` placeholders.
    pub jsf_uri: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    /// Keyed by status code (`"200"`, `"default"`, ...).
    pub responses: IndexMap<String, ResponseDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseDescriptor {
    #[serde(default)]
    pub headers: IndexMap<String, Value>,

    /// Present only when examples were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<IndexMap<String, ExampleDescriptor>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleDescriptor {
    pub mime_type: String,
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_order_and_names() {
        let names: Vec<&str> = HttpMethod::ALL.iter().map(HttpMethod::as_str).collect();
        assert_eq!(
            names,
            vec!["get", "put", "post", "delete", "options", "head", "patch"]
        );
        assert_eq!(HttpMethod::Delete.to_string(), "delete");
    }

    #[test]
    fn test_static_wire_shape() {
        let endpoint = EndpointDescriptor::Static(StaticEndpoint {
            uri: "/assets".to_string(),
            content: json!({"dir": "./public"}),
        });
        assert_eq!(
            serde_json::to_value(&endpoint).unwrap(),
            json!({"uri": "/assets", "static": {"dir": "./public"}})
        );
    }

    #[test]
    fn test_operation_wire_shape_keeps_null_operation_id() {
        let endpoint = EndpointDescriptor::Operation(OperationEndpoint {
            uri: "/pets/{id}".to_string(),
            jsf_uri: "/pets/:id".to_string(),
            method: HttpMethod::Get,
            operation_id: None,
            consumes: vec![],
            produces: vec![],
            responses: IndexMap::from([("200".to_string(), ResponseDescriptor::default())]),
        });
        assert_eq!(
            serde_json::to_value(&endpoint).unwrap(),
            json!({
                "uri": "/pets/{id}",
                "jsfUri": "/pets/:id",
                "method": "get",
                "operationId": null,
                "consumes": [],
                "produces": [],
                "responses": {"200": {"headers": {}}}
            })
        );
    }

    #[test]
    fn test_deserialize_picks_variant() {
        let s: EndpointDescriptor =
            serde_json::from_value(json!({"uri": "/assets", "static": null})).unwrap();
        assert!(s.is_static());
        assert_eq!(s.uri(), "/assets");

        let op: EndpointDescriptor = serde_json::from_value(json!({
            "uri": "/pets",
            "jsfUri": "/pets",
            "method": "post",
            "operationId": "addPet",
            "consumes": ["application/json"],
            "produces": [],
            "responses": {}
        }))
        .unwrap();
        assert_eq!(op.as_operation().unwrap().method, HttpMethod::Post);
        assert!(op.as_static().is_none());
    }
}
