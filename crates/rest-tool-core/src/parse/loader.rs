use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde_json::{Map, Value};

use super::ref_resolve::RefResolver;
use crate::config::LoaderOptions;
use crate::error::LoadError;

/// Where a specification comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecSource {
    /// The root file of a (possibly multi-file) specification.
    File(PathBuf),
    /// An already parsed document.
    Document(Value),
}

impl From<PathBuf> for SpecSource {
    fn from(path: PathBuf) -> Self {
        SpecSource::File(path)
    }
}

impl From<&Path> for SpecSource {
    fn from(path: &Path) -> Self {
        SpecSource::File(path.to_path_buf())
    }
}

impl From<Value> for SpecSource {
    fn from(document: Value) -> Self {
        SpecSource::Document(document)
    }
}

/// Turns a [`SpecSource`] into a parsed, dereferenced document tree.
pub trait SpecLoader {
    fn load(&self, source: SpecSource, options: &LoaderOptions) -> Result<Value, LoadError>;
}

/// Reads YAML or JSON files from disk and dereferences local and file `$ref`s.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentLoader;

impl SpecLoader for DocumentLoader {
    fn load(&self, source: SpecSource, options: &LoaderOptions) -> Result<Value, LoadError> {
        let (document, origin) = match source {
            SpecSource::File(path) => (read_document(&path, options)?, Some(path)),
            SpecSource::Document(document) => (document, None),
        };
        if !document.is_object() {
            return Err(LoadError::NotAMapping);
        }

        let mut resolver = RefResolver::new(options.resolve.file);
        let resolved = resolver.resolve_document(&document, origin.as_deref())?;
        if let Some(path) = &origin {
            info!("loaded specification {}", path.display());
        }
        Ok(resolved)
    }
}

fn read_document(path: &Path, options: &LoaderOptions) -> Result<Value, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let document = if is_blank(&content) {
        Value::Null
    } else {
        super::from_file_content(path, &content)?
    };

    if document.is_null() {
        if !options.parse.yaml.allow_empty {
            return Err(LoadError::EmptyDocument(path.display().to_string()));
        }
        return Ok(Value::Object(Map::new()));
    }
    Ok(document)
}

/// Nothing but whitespace, comments and document markers.
fn is_blank(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}
