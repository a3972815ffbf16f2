use std::path::PathBuf;

use thiserror::Error;

use crate::schema::ValidationError;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty document: {0}")]
    EmptyDocument(String),

    #[error("document root is not a mapping")]
    NotAMapping,

    #[error("unsupported YAML value: {0}")]
    UnsupportedYaml(String),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("malformed {format} document: {source}")]
    Model {
        format: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unresolved reference: {0}")]
    UnresolvedRef(String),

    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),

    #[error("failed to load referenced file {path}: {reason}")]
    ExternalFile { path: PathBuf, reason: String },
}

/// Raised when a loaded document lacks a field the accessor dereferences.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("services root does not exist: {0}")]
    MissingRoot(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse service descriptor {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("invalid service descriptor {path}: {}", describe(.errors))]
    Invalid {
        path: PathBuf,
        errors: Vec<ValidationError>,
    },

    #[error("no service registered for {0}")]
    UnknownService(String),

    #[error("service {service} has no {method} method")]
    UnknownMethod { service: String, method: String },

    #[error("failed to parse JSON mock body {path}: {source}")]
    MockBody {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.desc.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
