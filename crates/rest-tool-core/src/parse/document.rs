use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::format::{SpecFormat, detect};
use super::openapi::OpenApiSpec;
use super::swagger::SwaggerSpec;
use crate::error::LoadError;
use crate::ir::HttpMethod;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A path item, holding the operations of one URI template keyed by HTTP method.
///
/// A path item carrying `x-static` describes a static route as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathItem<Op> {
    #[serde(
        rename = "x-static",
        default,
        deserialize_with = "super::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub x_static: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Op>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Op>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Op>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Op>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Op>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Op>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Op>,
}

impl<Op> PathItem<Op> {
    pub fn operation(&self, method: HttpMethod) -> Option<&Op> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
        }
    }
}

/// A loaded document, classified by format and parsed into the matching model.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedDocument {
    Swagger(SwaggerSpec),
    OpenApi(OpenApiSpec),
    Unrecognized,
}

impl ParsedDocument {
    /// Classify `doc` and parse it. A document of neither format is not an
    /// error; it becomes [`ParsedDocument::Unrecognized`].
    pub fn parse(doc: &Value) -> Result<Self, LoadError> {
        let format = detect(doc);
        match format {
            SpecFormat::Swagger2 => serde_json::from_value(without_path_extensions(doc))
                .map(ParsedDocument::Swagger)
                .map_err(|source| LoadError::Model {
                    format: format.as_str(),
                    source,
                }),
            SpecFormat::OpenApi3 => serde_json::from_value(without_path_extensions(doc))
                .map(ParsedDocument::OpenApi)
                .map_err(|source| LoadError::Model {
                    format: format.as_str(),
                    source,
                }),
            SpecFormat::Unknown => {
                warn!("document is neither Swagger 2.0 nor OpenAPI 3.0, it has no endpoints");
                Ok(ParsedDocument::Unrecognized)
            }
        }
    }

    pub fn format(&self) -> SpecFormat {
        match self {
            ParsedDocument::Swagger(_) => SpecFormat::Swagger2,
            ParsedDocument::OpenApi(_) => SpecFormat::OpenApi3,
            ParsedDocument::Unrecognized => SpecFormat::Unknown,
        }
    }

    pub fn info(&self) -> Option<&Info> {
        match self {
            ParsedDocument::Swagger(spec) => spec.info.as_ref(),
            ParsedDocument::OpenApi(spec) => spec.info.as_ref(),
            ParsedDocument::Unrecognized => None,
        }
    }
}

/// Copy of `doc` without the `x-` keys directly under `paths`, which are
/// vendor extensions rather than path items.
fn without_path_extensions(doc: &Value) -> Value {
    let mut doc = doc.clone();
    if let Some(paths) = doc.get_mut("paths").and_then(Value::as_object_mut) {
        paths.retain(|key, _| {
            let keep = !key.starts_with("x-");
            if !keep {
                debug!("skipping path-level extension {key}");
            }
            keep
        });
    }
    doc
}
