//! JSON Schema validation of YAML or JSON data.
//!
//! Schemas live in files next to each other; a schema may reference its
//! siblings with `$ref: other.yml#/...`. Referenced siblings are copied into
//! the schema's `definitions` before it is compiled; local `#/...` references
//! are resolved by the validator itself.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::parse::from_file_content;
use crate::parse::ref_resolve::RefResolver;

/// Reported when the schema file cannot be found or read.
pub const MISSING_SCHEMA: &str = "No schema provided for validation.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationErrorKind {
    /// The schema file does not exist or cannot be read.
    MissingSchema,
    /// The schema could not be parsed, dereferenced or compiled.
    InvalidSchema,
    /// The content does not conform to the schema.
    Violation,
}

/// One problem found while validating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub desc: String,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, desc: impl Into<String>) -> Self {
        Self {
            kind,
            desc: desc.into(),
        }
    }
}

/// Validate `content` with the schema `schema_file_name` found in
/// `schema_base_path`. Only the last path segment of the file name is used.
///
/// Returns every error found; an empty list means `content` is valid.
pub fn validate(
    content: &Value,
    schema_base_path: &Path,
    schema_file_name: &str,
) -> Vec<ValidationError> {
    let file_name = Path::new(schema_file_name)
        .file_name()
        .unwrap_or_else(|| OsStr::new(schema_file_name));
    let path = schema_base_path.join(file_name);

    let Ok(text) = fs::read_to_string(&path) else {
        debug!("schema {} not found", path.display());
        return vec![ValidationError::new(
            ValidationErrorKind::MissingSchema,
            MISSING_SCHEMA,
        )];
    };

    let schema = match from_file_content(&path, &text) {
        Ok(schema) => schema,
        Err(err) => {
            return vec![ValidationError::new(
                ValidationErrorKind::InvalidSchema,
                format!("{}: {err}", path.display()),
            )];
        }
    };

    match RefResolver::new(true).bundle_files(&schema, &path) {
        Ok(schema) => validate_with(content, &schema),
        Err(err) => vec![ValidationError::new(
            ValidationErrorKind::InvalidSchema,
            format!("{}: {err}", path.display()),
        )],
    }
}

/// Validate `content` with an in-memory schema.
pub fn validate_with(content: &Value, schema: &Value) -> Vec<ValidationError> {
    let validator = match jsonschema::validator_for(schema) {
        Ok(validator) => validator,
        Err(err) => {
            return vec![ValidationError::new(
                ValidationErrorKind::InvalidSchema,
                err.to_string(),
            )];
        }
    };
    validator
        .iter_errors(content)
        .map(|err| ValidationError::new(ValidationErrorKind::Violation, err.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_schema() -> Value {
        json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer", "minimum": 0}
            }
        })
    }

    #[test]
    fn test_valid_content() {
        assert!(validate_with(&json!({"name": "Ann", "age": 3}), &person_schema()).is_empty());
    }

    #[test]
    fn test_every_violation_is_reported() {
        let errors = validate_with(&json!({"age": -1}), &person_schema());
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::Violation));
    }

    #[test]
    fn test_invalid_schema() {
        let errors = validate_with(&json!({}), &json!({"type": 12}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidSchema);
    }

    #[test]
    fn test_missing_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let errors = validate(&json!({}), dir.path(), "nothing.yml");
        assert_eq!(
            errors,
            vec![ValidationError::new(
                ValidationErrorKind::MissingSchema,
                MISSING_SCHEMA
            )]
        );
    }

    #[test]
    fn test_schema_file_with_sibling_reference() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("order.yml"),
            "type: object\nrequired: [customer]\nproperties:\n  customer:\n    $ref: customer.yml\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("customer.yml"),
            "type: object\nrequired: [id]\nproperties:\n  id:\n    type: integer\n",
        )
        .unwrap();

        assert!(validate(&json!({"customer": {"id": 1}}), dir.path(), "schemas/order.yml").is_empty());

        let errors = validate(&json!({"customer": {}}), dir.path(), "order.yml");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::Violation);
    }

    #[test]
    fn test_recursive_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("tree.yml"),
            "$ref: node.yml\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("node.yml"),
            "type: object\nrequired: [id]\nproperties:\n  id:\n    type: string\n  children:\n    type: array\n    items:\n      $ref: '#/definitions/node'\ndefinitions:\n  node:\n    $ref: '#'\n",
        )
        .unwrap();

        let tree = json!({"id": "root", "children": [{"id": "leaf", "children": []}]});
        assert!(validate(&tree, dir.path(), "node.yml").is_empty());
        assert!(validate(&tree, dir.path(), "tree.yml").is_empty());

        let broken = json!({"id": "root", "children": [{"children": []}]});
        let errors = validate(&broken, dir.path(), "node.yml");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::Violation);
        assert_eq!(validate(&broken, dir.path(), "tree.yml"), errors);
    }
}
