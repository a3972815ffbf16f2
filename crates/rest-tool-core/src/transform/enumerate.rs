use indexmap::IndexMap;
use log::debug;

use super::endpoint::{ContentDefaults, RawOperation, build_endpoint, build_static_endpoint};
use super::responses::{OpenApiExtractor, ResponseExtractor, SwaggerExtractor};
use crate::config::EndpointOptions;
use crate::ir::{EndpointDescriptor, HttpMethod};
use crate::parse::document::{ParsedDocument, PathItem};

/// Endpoints split by whether they serve static content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EndpointPartition {
    pub static_endpoints: Vec<EndpointDescriptor>,
    pub non_static_endpoints: Vec<EndpointDescriptor>,
}

/// Every endpoint of `document`: paths in declaration order, and within a
/// path the methods in [`HttpMethod::ALL`] order.
pub fn enumerate_endpoints(
    document: &ParsedDocument,
    options: &EndpointOptions,
) -> Vec<EndpointDescriptor> {
    match document {
        ParsedDocument::Swagger(spec) => collect(
            &SwaggerExtractor,
            &spec.paths,
            &ContentDefaults::from_swagger(spec),
            options,
        ),
        ParsedDocument::OpenApi(spec) => collect(
            &OpenApiExtractor,
            &spec.paths,
            &ContentDefaults::default(),
            options,
        ),
        ParsedDocument::Unrecognized => Vec::new(),
    }
}

fn collect<E>(
    extractor: &E,
    paths: &IndexMap<String, PathItem<E::Operation>>,
    defaults: &ContentDefaults,
    options: &EndpointOptions,
) -> Vec<EndpointDescriptor>
where
    E: ResponseExtractor,
    E::Operation: RawOperation,
{
    let mut endpoints = Vec::new();
    for (uri, item) in paths {
        if let Some(payload) = &item.x_static {
            debug!("path {uri} is static");
            endpoints.push(build_static_endpoint(uri, payload));
            continue;
        }
        for method in HttpMethod::ALL {
            if let Some(operation) = item.operation(method) {
                endpoints.push(build_endpoint(
                    extractor, uri, method, operation, defaults, options,
                ));
            }
        }
    }
    endpoints
}

/// Split `endpoints` into static and non-static ones, keeping their order.
pub fn partition_by_staticness(endpoints: Vec<EndpointDescriptor>) -> EndpointPartition {
    let (static_endpoints, non_static_endpoints) =
        endpoints.into_iter().partition(EndpointDescriptor::is_static);
    EndpointPartition {
        static_endpoints,
        non_static_endpoints,
    }
}
