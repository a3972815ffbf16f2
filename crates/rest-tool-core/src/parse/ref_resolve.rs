use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Value};

use crate::error::ResolveError;

/// Replaces every `$ref` node of a document with the value it points to.
///
/// Handles local references (`#/definitions/Pet`) and references into other
/// files relative to the referring one (`pet.yaml#/Pet`). A reference met
/// again while its own target is being resolved stays a `$ref` node.
pub struct RefResolver {
    resolve_files: bool,
    files: HashMap<PathBuf, Value>,
    stack: Vec<String>,
}

impl RefResolver {
    /// With `resolve_files` off, references into other files are left in place.
    pub fn new(resolve_files: bool) -> Self {
        Self {
            resolve_files,
            files: HashMap::new(),
            stack: Vec::new(),
        }
    }

    /// Dereference `doc`. `origin` is the file the document was read from, if
    /// any; relative file references are looked up next to it.
    pub fn resolve_document(
        &mut self,
        doc: &Value,
        origin: Option<&Path>,
    ) -> Result<Value, ResolveError> {
        self.resolve_node(doc, doc, origin)
    }

    /// Copy every file `doc` references, directly or through other files,
    /// under its `definitions` and point the references there. Local
    /// references are kept, so recursive definitions survive.
    pub fn bundle_files(&mut self, doc: &Value, origin: &Path) -> Result<Value, ResolveError> {
        let base = origin.parent().unwrap_or_else(|| Path::new("."));
        let mut bundled = IndexMap::new();
        let mut root = self.rebase(doc, origin, base, None, &mut bundled)?;
        if bundled.is_empty() {
            return Ok(root);
        }

        let Value::Object(map) = &mut root else {
            return Ok(root);
        };
        let definitions = map
            .entry("definitions")
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(definitions) = definitions else {
            return Err(ResolveError::UnresolvedRef(format!(
                "{}: definitions is not a mapping",
                origin.display()
            )));
        };
        definitions.extend(bundled);
        Ok(root)
    }

    fn resolve_node(
        &mut self,
        node: &Value,
        root: &Value,
        origin: Option<&Path>,
    ) -> Result<Value, ResolveError> {
        match node {
            Value::Object(map) => {
                if let Some(reference) = map.get("$ref") {
                    let Value::String(reference) = reference else {
                        return Err(ResolveError::InvalidRefFormat(reference.to_string()));
                    };
                    return self.follow(reference, root, origin);
                }
                let mut resolved = Map::with_capacity(map.len());
                for (key, value) in map {
                    resolved.insert(key.clone(), self.resolve_node(value, root, origin)?);
                }
                Ok(Value::Object(resolved))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_node(item, root, origin))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    fn follow(
        &mut self,
        reference: &str,
        root: &Value,
        origin: Option<&Path>,
    ) -> Result<Value, ResolveError> {
        let (file_part, fragment) = reference.split_once('#').unwrap_or((reference, ""));
        if !fragment.is_empty() && !fragment.starts_with('/') {
            return Err(ResolveError::InvalidRefFormat(reference.to_string()));
        }

        if file_part.is_empty() {
            let location = origin.map(|p| p.display().to_string()).unwrap_or_default();
            let target = root
                .pointer(fragment)
                .ok_or_else(|| ResolveError::RefTargetNotFound(reference.to_string()))?
                .clone();
            return self.descend(reference, format!("{location}#{fragment}"), |resolver| {
                resolver.resolve_node(&target, root, origin)
            });
        }

        if !self.resolve_files {
            debug!("leaving file reference {reference} unresolved");
            return Ok(untouched(reference));
        }
        if file_part.contains("://") {
            return Err(ResolveError::UnresolvedRef(reference.to_string()));
        }

        let base = origin.and_then(Path::parent).unwrap_or_else(|| Path::new("."));
        let path = base.join(file_part);
        let file_root = self.load_file(&path)?;
        let target = file_root
            .pointer(fragment)
            .ok_or_else(|| ResolveError::RefTargetNotFound(reference.to_string()))?
            .clone();
        self.descend(reference, format!("{}#{fragment}", path.display()), |resolver| {
            resolver.resolve_node(&target, &file_root, Some(&path))
        })
    }

    fn rebase(
        &mut self,
        node: &Value,
        file: &Path,
        base: &Path,
        prefix: Option<&str>,
        bundled: &mut IndexMap<String, Value>,
    ) -> Result<Value, ResolveError> {
        match node {
            Value::Object(map) => {
                let mut rebased = Map::with_capacity(map.len());
                for (key, value) in map {
                    let value = if key == "$ref" {
                        let Value::String(reference) = value else {
                            return Err(ResolveError::InvalidRefFormat(value.to_string()));
                        };
                        Value::String(self.rebase_ref(reference, file, base, prefix, bundled)?)
                    } else {
                        self.rebase(value, file, base, prefix, bundled)?
                    };
                    rebased.insert(key.clone(), value);
                }
                Ok(Value::Object(rebased))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.rebase(item, file, base, prefix, bundled))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    fn rebase_ref(
        &mut self,
        reference: &str,
        file: &Path,
        base: &Path,
        prefix: Option<&str>,
        bundled: &mut IndexMap<String, Value>,
    ) -> Result<String, ResolveError> {
        let (file_part, fragment) = reference.split_once('#').unwrap_or((reference, ""));
        if file_part.contains("://") || (file_part.is_empty() && prefix.is_none()) {
            return Ok(reference.to_string());
        }
        if !fragment.is_empty() && !fragment.starts_with('/') {
            return Err(ResolveError::InvalidRefFormat(reference.to_string()));
        }
        if file_part.is_empty() {
            return Ok(format!("#{}{fragment}", prefix.unwrap_or_default()));
        }

        let path = file.parent().unwrap_or(base).join(file_part);
        let name = path
            .strip_prefix(base)
            .unwrap_or(&path)
            .to_string_lossy()
            .into_owned();
        let pointer = format!("/definitions/{}", name.replace('~', "~0").replace('/', "~1"));
        if !bundled.contains_key(&name) {
            // Placeholder first: files referencing each other are bundled once.
            bundled.insert(name.clone(), Value::Null);
            let content = self.load_file(&path)?;
            let rebased = self.rebase(&content, &path, base, Some(&pointer), bundled)?;
            bundled.insert(name, rebased);
        }
        Ok(format!("#{pointer}{fragment}"))
    }

    fn descend<F>(
        &mut self,
        reference: &str,
        key: String,
        resolve: F,
    ) -> Result<Value, ResolveError>
    where
        F: FnOnce(&mut Self) -> Result<Value, ResolveError>,
    {
        if self.stack.contains(&key) {
            debug!("circular reference {key}, keeping {reference} in place");
            return Ok(untouched(reference));
        }
        self.stack.push(key);
        let resolved = resolve(self);
        self.stack.pop();
        resolved
    }

    fn load_file(&mut self, path: &Path) -> Result<Value, ResolveError> {
        if let Some(cached) = self.files.get(path) {
            return Ok(cached.clone());
        }
        debug!("loading referenced file {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| ResolveError::ExternalFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let value =
            super::from_file_content(path, &content).map_err(|e| ResolveError::ExternalFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        self.files.insert(path.to_path_buf(), value.clone());
        Ok(value)
    }
}

fn untouched(reference: &str) -> Value {
    let mut node = Map::new();
    node.insert("$ref".to_string(), Value::String(reference.to_string()));
    Value::Object(node)
}
