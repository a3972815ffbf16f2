use serde_json::Value;

/// The specification format a document declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Swagger2,
    OpenApi3,
    Unknown,
}

impl SpecFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecFormat::Swagger2 => "Swagger 2.0",
            SpecFormat::OpenApi3 => "OpenAPI 3.0",
            SpecFormat::Unknown => "unknown",
        }
    }
}

/// True iff the document's `swagger` field is a string starting with `2.0`.
pub fn is_swagger_format(doc: &Value) -> bool {
    declares(doc, "swagger", "2.0")
}

/// True iff the document's `openapi` field is a string starting with `3.0`.
pub fn is_openapi_format(doc: &Value) -> bool {
    declares(doc, "openapi", "3.0")
}

pub fn detect(doc: &Value) -> SpecFormat {
    if is_swagger_format(doc) {
        SpecFormat::Swagger2
    } else if is_openapi_format(doc) {
        SpecFormat::OpenApi3
    } else {
        SpecFormat::Unknown
    }
}

fn declares(doc: &Value, field: &str, prefix: &str) -> bool {
    doc.get(field)
        .and_then(Value::as_str)
        .is_some_and(|version| version.starts_with(prefix))
}
