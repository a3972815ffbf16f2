use serde_json::Value;

use super::responses::ResponseExtractor;
use super::uri::to_colon_style;
use crate::config::EndpointOptions;
use crate::ir::{EndpointDescriptor, HttpMethod, OperationEndpoint, StaticEndpoint};
use crate::parse::openapi::{self, RequestBodyOrRef};
use crate::parse::swagger::{self, SwaggerSpec};

/// What the endpoint builder needs to read from an operation of either format.
pub trait RawOperation {
    fn operation_id(&self) -> Option<&str>;

    /// Request media types declared by the operation itself.
    fn consumes(&self) -> Option<Vec<String>>;

    /// Response media types declared by the operation itself.
    fn produces(&self) -> Option<&[String]>;

    /// The `x-static` payload, when the operation carries one (even `null`).
    fn static_payload(&self) -> Option<&Value>;
}

impl RawOperation for swagger::Operation {
    fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    fn consumes(&self) -> Option<Vec<String>> {
        self.consumes.clone()
    }

    fn produces(&self) -> Option<&[String]> {
        self.produces.as_deref()
    }

    fn static_payload(&self) -> Option<&Value> {
        self.x_static.as_ref()
    }
}

impl RawOperation for openapi::Operation {
    fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// The media types of an inline `requestBody`.
    fn consumes(&self) -> Option<Vec<String>> {
        match self.request_body.as_ref()? {
            RequestBodyOrRef::RequestBody(body) => Some(body.content.keys().cloned().collect()),
            RequestBodyOrRef::Ref { .. } => None,
        }
    }

    fn produces(&self) -> Option<&[String]> {
        None
    }

    fn static_payload(&self) -> Option<&Value> {
        self.x_static.as_ref()
    }
}

/// Document-level `consumes`/`produces`, used when an operation declares none.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentDefaults {
    pub consumes: Option<Vec<String>>,
    pub produces: Option<Vec<String>>,
}

impl ContentDefaults {
    pub fn from_swagger(spec: &SwaggerSpec) -> Self {
        Self {
            consumes: spec.consumes.clone(),
            produces: spec.produces.clone(),
        }
    }
}

pub fn build_static_endpoint(uri: &str, payload: &Value) -> EndpointDescriptor {
    EndpointDescriptor::Static(StaticEndpoint {
        uri: uri.to_string(),
        content: payload.clone(),
    })
}

/// Build the descriptor of one method of a path.
///
/// `consumes` is taken from the operation, else the document, never merged.
/// `produces` starts from the operation's (else the document's) list and is
/// extended with every media type the responses declare.
pub fn build_operation_endpoint<E>(
    extractor: &E,
    uri: &str,
    method: HttpMethod,
    operation: &E::Operation,
    defaults: &ContentDefaults,
    options: &EndpointOptions,
) -> EndpointDescriptor
where
    E: ResponseExtractor,
    E::Operation: RawOperation,
{
    let extracted = extractor.extract(operation, options);

    let consumes = operation
        .consumes()
        .or_else(|| defaults.consumes.clone())
        .unwrap_or_default();

    let mut produces = operation
        .produces()
        .map(<[String]>::to_vec)
        .or_else(|| defaults.produces.clone())
        .unwrap_or_default();
    for media_type in extracted.media_types {
        if !produces.contains(&media_type) {
            produces.push(media_type);
        }
    }

    EndpointDescriptor::Operation(OperationEndpoint {
        uri: uri.to_string(),
        jsf_uri: to_colon_style(uri),
        method,
        operation_id: operation.operation_id().map(str::to_string),
        consumes,
        produces,
        responses: extracted.responses,
    })
}

/// Static when the operation carries `x-static`, a regular operation otherwise.
pub fn build_endpoint<E>(
    extractor: &E,
    uri: &str,
    method: HttpMethod,
    operation: &E::Operation,
    defaults: &ContentDefaults,
    options: &EndpointOptions,
) -> EndpointDescriptor
where
    E: ResponseExtractor,
    E::Operation: RawOperation,
{
    match operation.static_payload() {
        Some(payload) => build_static_endpoint(uri, payload),
        None => build_operation_endpoint(extractor, uri, method, operation, defaults, options),
    }
}
