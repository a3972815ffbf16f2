use serde_json::Value;

use crate::config::{EndpointOptions, LoaderOptions};
use crate::error::{LoadError, ShapeError};
use crate::ir::{EndpointDescriptor, ServerDescriptor};
use crate::parse::document::{Info, ParsedDocument};
use crate::parse::format::SpecFormat;
use crate::parse::loader::{DocumentLoader, SpecLoader, SpecSource};
use crate::transform::{enumerate_endpoints, partition_by_staticness, resolve_servers};

/// Read-only view over one loaded API description.
///
/// Every accessor computes its result from the loaded document, so calling
/// one twice yields equal values.
#[derive(Debug, Clone, PartialEq)]
pub struct OasApi {
    model: Value,
    document: ParsedDocument,
}

impl OasApi {
    /// Load a specification with the default [`DocumentLoader`].
    pub fn load(
        source: impl Into<SpecSource>,
        options: &LoaderOptions,
    ) -> Result<Self, LoadError> {
        Self::load_with(&DocumentLoader, source, options)
    }

    pub fn load_with(
        loader: &impl SpecLoader,
        source: impl Into<SpecSource>,
        options: &LoaderOptions,
    ) -> Result<Self, LoadError> {
        let model = loader.load(source.into(), options)?;
        Self::from_document(model)
    }

    /// Wrap a document that is already loaded and dereferenced.
    pub fn from_document(model: Value) -> Result<Self, LoadError> {
        let document = ParsedDocument::parse(&model)?;
        Ok(Self { model, document })
    }

    /// The loaded document, unmodified.
    pub fn oas_model(&self) -> &Value {
        &self.model
    }

    pub fn format(&self) -> SpecFormat {
        self.document.format()
    }

    pub fn title(&self) -> Result<&str, ShapeError> {
        self.info()?
            .title
            .as_deref()
            .ok_or(ShapeError::MissingField("info.title"))
    }

    pub fn version(&self) -> Result<&str, ShapeError> {
        self.info()?
            .version
            .as_deref()
            .ok_or(ShapeError::MissingField("info.version"))
    }

    fn info(&self) -> Result<&Info, ShapeError> {
        self.document.info().ok_or(ShapeError::MissingField("info"))
    }

    pub fn servers(&self) -> Vec<ServerDescriptor> {
        resolve_servers(&self.document)
    }

    pub fn endpoints(&self, options: &EndpointOptions) -> Vec<EndpointDescriptor> {
        enumerate_endpoints(&self.document, options)
    }

    pub fn static_endpoints(&self, options: &EndpointOptions) -> Vec<EndpointDescriptor> {
        partition_by_staticness(self.endpoints(options)).static_endpoints
    }

    pub fn non_static_endpoints(&self, options: &EndpointOptions) -> Vec<EndpointDescriptor> {
        partition_by_staticness(self.endpoints(options)).non_static_endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api(value: Value) -> OasApi {
        OasApi::from_document(value).unwrap()
    }

    #[test]
    fn test_title_and_version() {
        let api = api(json!({
            "swagger": "2.0",
            "info": {"title": "Petstore", "version": "1.0.0"}
        }));
        assert_eq!(api.title().unwrap(), "Petstore");
        assert_eq!(api.version().unwrap(), "1.0.0");
        assert_eq!(api.format(), SpecFormat::Swagger2);
    }

    #[test]
    fn test_missing_info() {
        let api = api(json!({"openapi": "3.0.1"}));
        assert!(matches!(api.title(), Err(ShapeError::MissingField("info"))));
        assert!(matches!(api.version(), Err(ShapeError::MissingField("info"))));

        let api = api_with_info(json!({"title": "t"}));
        assert!(matches!(
            api.version(),
            Err(ShapeError::MissingField("info.version"))
        ));
    }

    fn api_with_info(info: Value) -> OasApi {
        api(json!({"openapi": "3.0.0", "info": info}))
    }

    #[test]
    fn test_model_is_unmodified() {
        let doc = json!({
            "swagger": "2.0",
            "paths": {"x-generated": true, "/pets": {"get": {}}}
        });
        assert_eq!(api(doc.clone()).oas_model(), &doc);
    }

    #[test]
    fn test_unrecognized_document() {
        let api = api(json!({"info": {"title": "t", "version": "1"}}));
        assert_eq!(api.format(), SpecFormat::Unknown);
        assert!(api.endpoints(&EndpointOptions::default()).is_empty());
        assert_eq!(api.servers(), vec![ServerDescriptor::default()]);
        assert!(api.title().is_err());
    }

    #[test]
    fn test_accessors_are_idempotent() {
        let api = api(json!({
            "openapi": "3.0.0",
            "paths": {"/pets": {"get": {"responses": {"200": {"content": {"application/json": {"example": []}}}}}}}
        }));
        let options = EndpointOptions::with_examples();
        assert_eq!(api.endpoints(&options), api.endpoints(&options));
        assert_eq!(api.servers(), api.servers());
    }

    #[test]
    fn test_load_propagates_loader_errors() {
        let err = OasApi::load(json!("swagger: 2.0"), &LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::NotAMapping));
    }

    #[test]
    fn test_load_with_custom_loader() {
        struct Fixed;

        impl SpecLoader for Fixed {
            fn load(&self, _: SpecSource, _: &LoaderOptions) -> Result<Value, LoadError> {
                Ok(json!({"swagger": "2.0", "info": {"title": "fixed", "version": "0"}}))
            }
        }

        let api = OasApi::load_with(
            &Fixed,
            SpecSource::File("ignored.yaml".into()),
            &LoaderOptions::default(),
        )
        .unwrap();
        assert_eq!(api.title().unwrap(), "fixed");
    }
}
