use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use super::model::{ServiceDescriptor, header_value};
use crate::error::ServiceError;

/// Content type assumed when a mock body has no `Content-Type` header.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Response looked up when no response name is given.
pub const DEFAULT_RESPONSE_NAME: &str = "OK";

const TEXT_CONTENT_TYPES: [&str; 3] = ["text/plain", "text/html", "text/xml"];

/// Content of a mock request or response body file.
#[derive(Debug, Clone, PartialEq)]
pub enum MockBody {
    /// No mock body is declared.
    Empty,
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl ServiceDescriptor {
    /// The mock request body of `method`.
    pub fn mock_request_body(&self, method: &str) -> Result<MockBody, ServiceError> {
        let request = &self.method(method)?.request;
        match &request.mock_body {
            Some(file) => self.read_mock_body(file, header_value(&request.headers, "Content-Type")),
            None => Ok(MockBody::Empty),
        }
    }

    /// The mock body of the response named `response_name` (`OK` when `None`).
    pub fn mock_response_body(
        &self,
        method: &str,
        response_name: Option<&str>,
    ) -> Result<MockBody, ServiceError> {
        let name = response_name.unwrap_or(DEFAULT_RESPONSE_NAME);
        let response = self.method(method)?.response(name);
        match response.and_then(|r| r.mock_body.as_ref().map(|file| (r, file))) {
            Some((response, file)) => {
                self.read_mock_body(file, header_value(&response.headers, "Content-Type"))
            }
            None => Ok(MockBody::Empty),
        }
    }

    /// Where a mock body file named in this descriptor is stored.
    pub fn mock_body_path(&self, file: &str) -> PathBuf {
        self.restapi_root.join(&self.content_path).join(file)
    }

    fn read_mock_body(
        &self,
        file: &str,
        content_type: Option<&str>,
    ) -> Result<MockBody, ServiceError> {
        let path = self.mock_body_path(file);
        let content_type = essence(content_type.unwrap_or(DEFAULT_CONTENT_TYPE));
        debug!("reading {content_type} mock body {}", path.display());

        if content_type == "application/json" {
            let text = read_text(&path)?;
            serde_json::from_str(&text)
                .map(MockBody::Json)
                .map_err(|source| ServiceError::MockBody { path, source })
        } else if TEXT_CONTENT_TYPES.contains(&content_type.as_str()) {
            read_text(&path).map(MockBody::Text)
        } else {
            fs::read(&path)
                .map(MockBody::Bytes)
                .map_err(|source| ServiceError::Io { path, source })
        }
    }
}

/// The media type without parameters, lower-cased (`Text/HTML; charset=utf-8` is `text/html`).
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn read_text(path: &Path) -> Result<String, ServiceError> {
    fs::read_to_string(path).map_err(|source| ServiceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service(root: &Path) -> ServiceDescriptor {
        let mut service: ServiceDescriptor = serde_json::from_value(json!({
            "name": "Monitoring",
            "uriTemplate": "/monitoring/isAlive",
            "urlPattern": "/monitoring/isAlive",
            "methods": {
                "PUT": {
                    "request": {"mockBody": "request.json"},
                    "responses": [{"name": "OK", "statusCode": 200}]
                },
                "GET": {
                    "responses": [
                        {
                            "name": "OK",
                            "statusCode": 200,
                            "headers": [{"field": "content-type", "content": "text/plain; charset=utf-8"}],
                            "mockBody": "alive.txt"
                        },
                        {
                            "name": "Logo",
                            "statusCode": 200,
                            "headers": [{"field": "Content-Type", "content": "image/png"}],
                            "mockBody": "logo.png"
                        },
                        {"name": "Broken", "statusCode": 500, "mockBody": "broken.json"},
                        {"name": "Silent", "statusCode": 204}
                    ]
                }
            }
        }))
        .unwrap();
        service.restapi_root = root.to_path_buf();
        service.content_path = PathBuf::from("services/monitoring/isAlive");
        service
    }

    fn write(root: &Path, file: &str, content: &[u8]) {
        let dir = root.join("services/monitoring/isAlive");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_json_request_body_by_default() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "request.json", br#"{"id": 1, "tags": ["picky"]}"#);
        let body = service(root.path()).mock_request_body("put").unwrap();
        assert_eq!(body, MockBody::Json(json!({"id": 1, "tags": ["picky"]})));
    }

    #[test]
    fn test_text_and_bytes_response_bodies() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "alive.txt", b"The service is alive\n");
        write(root.path(), "logo.png", &[0x89, 0x50, 0x4e, 0x47]);
        let service = service(root.path());

        assert_eq!(
            service.mock_response_body("GET", None).unwrap(),
            MockBody::Text("The service is alive\n".to_string())
        );
        assert_eq!(
            service.mock_response_body("GET", Some("Logo")).unwrap(),
            MockBody::Bytes(vec![0x89, 0x50, 0x4e, 0x47])
        );
    }

    #[test]
    fn test_no_mock_body() {
        let root = tempfile::tempdir().unwrap();
        let service = service(root.path());
        assert_eq!(service.mock_request_body("GET").unwrap(), MockBody::Empty);
        assert_eq!(
            service.mock_response_body("GET", Some("Silent")).unwrap(),
            MockBody::Empty
        );
        assert_eq!(
            service.mock_response_body("GET", Some("Unknown")).unwrap(),
            MockBody::Empty
        );
    }

    #[test]
    fn test_mock_body_errors() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "broken.json", b"{not json");
        let service = service(root.path());

        let err = service.mock_response_body("GET", Some("Broken")).unwrap_err();
        assert!(matches!(err, ServiceError::MockBody { .. }));

        let err = service.mock_request_body("PUT").unwrap_err();
        assert!(matches!(err, ServiceError::Io { .. }));
    }

    #[test]
    fn test_essence() {
        assert_eq!(essence("Text/HTML; charset=utf-8"), "text/html");
        assert_eq!(essence("application/json"), "application/json");
    }
}
