use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ServiceError;

/// How a service exposes its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceStyle {
    #[default]
    Operation,
    Resource,
    Collection,
}

/// A mock service, loaded from one `service.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub uri_template: String,

    /// Alias of `uri_template`.
    pub url_pattern: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub style: ServiceStyle,

    /// Keyed by upper-case method name.
    pub methods: IndexMap<String, MethodDescriptor>,

    /// Method names, in declaration order.
    #[serde(default)]
    pub method_list: Vec<String>,

    #[serde(default)]
    pub restapi_root: PathBuf,

    /// Directory of the descriptor, relative to `restapi_root`.
    #[serde(default)]
    pub content_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Name of the handler implementing the method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub request: RequestDescriptor,

    pub responses: Vec<ServiceResponse>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Vec<Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: Vec<Header>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub cookies: Vec<Value>,

    /// File name of the mock body, relative to the service directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub name: String,
    pub status_code: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: Vec<Header>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub cookies: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub field: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub request: TestMessage,

    pub response: TestMessage,
}

/// The request sent or the response expected by a test case. Fields other
/// than headers and cookies are kept as written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TestMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: Vec<Header>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub cookies: Vec<Value>,

    #[serde(flatten)]
    pub rest: IndexMap<String, Value>,
}

impl ServiceDescriptor {
    /// Look up a method by name, ignoring case.
    pub fn method(&self, name: &str) -> Result<&MethodDescriptor, ServiceError> {
        self.methods
            .get(&name.to_uppercase())
            .ok_or_else(|| ServiceError::UnknownMethod {
                service: self.uri_template.clone(),
                method: name.to_uppercase(),
            })
    }

    /// Name of the handler implementing `method`, if the descriptor names one.
    pub fn implementation(&self, method: &str) -> Result<Option<&str>, ServiceError> {
        Ok(self.method(method)?.implementation.as_deref())
    }

    /// Request headers of `method` as `(field, content)` pairs.
    pub fn request_headers(&self, method: &str) -> Result<Vec<(String, String)>, ServiceError> {
        Ok(header_pairs(&self.method(method)?.request.headers))
    }

    /// Headers of the response named `response_name`, or `None` when `method`
    /// has no such response.
    pub fn response_headers(
        &self,
        method: &str,
        response_name: &str,
    ) -> Result<Option<Vec<(String, String)>>, ServiceError> {
        Ok(self
            .method(method)?
            .response(response_name)
            .map(|response| header_pairs(&response.headers)))
    }
}

impl MethodDescriptor {
    pub fn response(&self, name: &str) -> Option<&ServiceResponse> {
        self.responses.iter().find(|response| response.name == name)
    }
}

/// Content of the last header named `field`, compared case-insensitively.
pub fn header_value<'a>(headers: &'a [Header], field: &str) -> Option<&'a str> {
    headers
        .iter()
        .rev()
        .find(|header| header.field.eq_ignore_ascii_case(field))
        .map(|header| header.content.as_str())
}

fn header_pairs(headers: &[Header]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|header| (header.field.clone(), header.content.clone()))
        .collect()
}

/// Like `#[serde(default)]`, but also for an explicit `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor() -> ServiceDescriptor {
        serde_json::from_value(json!({
            "name": "Customer",
            "uriTemplate": "/customers/{id}",
            "urlPattern": "/customers/{id}",
            "style": null,
            "methods": {
                "GET": {
                    "implementation": "api.getCustomer",
                    "request": {
                        "headers": [
                            {"field": "Accept", "content": "application/json"},
                            {"field": "Accept-Encoding", "content": "gzip, deflate"}
                        ]
                    },
                    "responses": [
                        {
                            "name": "OK",
                            "statusCode": 200,
                            "headers": [{"field": "Content-Type", "content": "application/json"}]
                        },
                        {"name": "NotFound", "statusCode": 404, "cookies": null}
                    ],
                    "testCases": null
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let service = descriptor();
        assert_eq!(service.style, ServiceStyle::Operation);
        let get = &service.methods["GET"];
        assert!(get.test_cases.is_empty());
        assert!(get.request.parameters.is_empty());
        assert!(get.request.cookies.is_empty());
        assert!(get.responses[1].headers.is_empty());
        assert!(get.responses[1].cookies.is_empty());
    }

    #[test]
    fn test_method_lookup_ignores_case() {
        let service = descriptor();
        assert_eq!(service.implementation("get").unwrap(), Some("api.getCustomer"));
        let err = service.implementation("delete").unwrap_err();
        assert!(matches!(err, ServiceError::UnknownMethod { method, .. } if method == "DELETE"));
    }

    #[test]
    fn test_headers() {
        let service = descriptor();
        assert_eq!(
            service.request_headers("GET").unwrap(),
            vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Accept-Encoding".to_string(), "gzip, deflate".to_string()),
            ]
        );
        assert_eq!(
            service.response_headers("GET", "OK").unwrap(),
            Some(vec![(
                "Content-Type".to_string(),
                "application/json".to_string()
            )])
        );
        assert_eq!(service.response_headers("GET", "NotFound").unwrap(), Some(vec![]));
        assert_eq!(service.response_headers("GET", "Gone").unwrap(), None);
    }

    #[test]
    fn test_header_value_is_case_insensitive() {
        let headers = vec![
            Header {
                field: "content-type".to_string(),
                content: "text/plain".to_string(),
            },
            Header {
                field: "Content-Type".to_string(),
                content: "text/html".to_string(),
            },
        ];
        assert_eq!(header_value(&headers, "CONTENT-TYPE"), Some("text/html"));
        assert_eq!(header_value(&headers, "Accept"), None);
    }

    #[test]
    fn test_test_message_keeps_other_fields() {
        let message: TestMessage =
            serde_json::from_value(json!({"statusCode": 200, "cookies": null})).unwrap();
        assert!(message.cookies.is_empty());
        assert_eq!(message.rest["statusCode"], json!(200));
    }
}
