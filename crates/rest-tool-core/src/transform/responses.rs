use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::config::EndpointOptions;
use crate::ir::{ExampleDescriptor, ResponseDescriptor};
use crate::parse::{openapi, swagger};

/// Name given to examples that carry none of their own.
const SYNTHETIC_EXAMPLE_NAME: &str = "noname";

/// Responses of one operation, keyed by status, plus every media type the
/// responses declare content for.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedResponses {
    pub responses: IndexMap<String, ResponseDescriptor>,
    /// Deduplicated, in first-seen order. Always empty for Swagger 2.0.
    pub media_types: Vec<String>,
}

/// Turns the raw `responses` of an operation into [`ResponseDescriptor`]s.
pub trait ResponseExtractor {
    type Operation;

    fn extract(&self, operation: &Self::Operation, options: &EndpointOptions)
    -> ExtractedResponses;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SwaggerExtractor;

#[derive(Debug, Default, Clone, Copy)]
pub struct OpenApiExtractor;

impl ResponseExtractor for SwaggerExtractor {
    type Operation = swagger::Operation;

    fn extract(
        &self,
        operation: &swagger::Operation,
        options: &EndpointOptions,
    ) -> ExtractedResponses {
        let mut extracted = ExtractedResponses::default();
        for (status, response) in &operation.responses {
            let descriptor = match response {
                _ if status.starts_with("x-") => {
                    debug!("skipping response extension {status}");
                    continue;
                }
                swagger::ResponseOrRef::Response(response) => {
                    let mut names = SyntheticNames::default();
                    let examples = response
                        .examples
                        .iter()
                        .map(|(mime_type, value)| {
                            (names.next_name(), example(mime_type, value.clone()))
                        })
                        .collect();
                    ResponseDescriptor {
                        headers: response.headers.clone(),
                        examples: Some(examples),
                    }
                }
                other => unresolved(status, swagger_ref_path(other)),
            };
            extracted
                .responses
                .insert(status.clone(), finish(descriptor, options));
        }
        extracted
    }
}

impl ResponseExtractor for OpenApiExtractor {
    type Operation = openapi::Operation;

    fn extract(
        &self,
        operation: &openapi::Operation,
        options: &EndpointOptions,
    ) -> ExtractedResponses {
        let mut extracted = ExtractedResponses::default();
        for (status, response) in &operation.responses {
            let descriptor = match response {
                _ if status.starts_with("x-") => {
                    debug!("skipping response extension {status}");
                    continue;
                }
                openapi::ResponseOrRef::Response(response) => {
                    for media_type in response.content.keys() {
                        if !extracted.media_types.contains(media_type) {
                            extracted.media_types.push(media_type.clone());
                        }
                    }
                    ResponseDescriptor {
                        headers: response.headers.clone(),
                        examples: Some(openapi_examples(&response.content)),
                    }
                }
                openapi::ResponseOrRef::Ref { ref_path } => unresolved(status, Some(ref_path)),
                openapi::ResponseOrRef::Other(_) => unresolved(status, None),
            };
            extracted
                .responses
                .insert(status.clone(), finish(descriptor, options));
        }
        extracted
    }
}

/// Examples of every media type of an OpenAPI response. A singular `example`
/// gets a synthetic name; named `examples` keep theirs and take
/// `externalValue` over `value`.
fn openapi_examples(
    content: &IndexMap<String, openapi::MediaType>,
) -> IndexMap<String, ExampleDescriptor> {
    let mut names = SyntheticNames::default();
    let mut examples = IndexMap::new();
    for (mime_type, media) in content {
        if let Some(value) = &media.example {
            examples.insert(names.next_name(), example(mime_type, value.clone()));
        } else {
            for (name, named) in &media.examples {
                let value = match (&named.external_value, &named.value) {
                    (Some(external), _) => Value::String(external.clone()),
                    (None, Some(value)) => value.clone(),
                    (None, None) => Value::Null,
                };
                examples.insert(name.clone(), example(mime_type, value));
            }
        }
    }
    examples
}

fn example(mime_type: &str, value: Value) -> ExampleDescriptor {
    ExampleDescriptor {
        mime_type: mime_type.to_string(),
        value,
    }
}

fn swagger_ref_path(response: &swagger::ResponseOrRef) -> Option<&String> {
    match response {
        swagger::ResponseOrRef::Ref { ref_path } => Some(ref_path),
        _ => None,
    }
}

fn unresolved(status: &str, ref_path: Option<&String>) -> ResponseDescriptor {
    match ref_path {
        Some(path) => debug!("response {status} is an unresolved reference to {path}"),
        None => debug!("response {status} is not a response object"),
    }
    ResponseDescriptor::default()
}

fn finish(mut descriptor: ResponseDescriptor, options: &EndpointOptions) -> ResponseDescriptor {
    if !options.include_examples {
        descriptor.examples = None;
    } else if descriptor.examples.is_none() {
        descriptor.examples = Some(IndexMap::new());
    }
    descriptor
}

/// `noname`, `noname-2`, `noname-3`, ...
#[derive(Debug, Default)]
struct SyntheticNames {
    issued: usize,
}

impl SyntheticNames {
    fn next_name(&mut self) -> String {
        self.issued += 1;
        match self.issued {
            1 => SYNTHETIC_EXAMPLE_NAME.to_string(),
            n => format!("{SYNTHETIC_EXAMPLE_NAME}-{n}"),
        }
    }
}
