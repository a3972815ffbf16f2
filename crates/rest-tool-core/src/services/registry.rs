use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};
use serde_json::Value;
use walkdir::WalkDir;

use super::model::ServiceDescriptor;
use crate::error::ServiceError;
use crate::parse::from_yaml;
use crate::schema::validate_with;

/// File name of a service descriptor.
pub const SERVICE_FILE_NAME: &str = "service.yml";

/// Services root used when none is configured, relative to the REST API root.
pub const DEFAULT_SERVICES_ROOT: &str = "services";

const SERVICE_SCHEMA: &str = include_str!("../../schemas/serviceSchema.yml");

/// Every service of a REST API, keyed by URI template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceRegistry {
    services: IndexMap<String, ServiceDescriptor>,
}

impl ServiceRegistry {
    /// Load every `service.yml` found below `restapi_root/services_root`.
    ///
    /// Fails on the first descriptor that cannot be read or does not conform
    /// to the service schema.
    pub fn load(restapi_root: &Path, services_root: &Path) -> Result<Self, ServiceError> {
        let base = restapi_root.join(services_root);
        if !base.is_dir() {
            return Err(ServiceError::MissingRoot(base));
        }
        let schema = from_yaml(SERVICE_SCHEMA).map_err(|e| ServiceError::Parse {
            path: PathBuf::from(SERVICE_FILE_NAME),
            reason: format!("embedded service schema: {e}"),
        })?;

        let mut services = IndexMap::new();
        for service_path in discover(&base)? {
            let service = load_service(restapi_root, services_root, &base, &service_path, &schema)?;
            debug!("registered service {}", service.uri_template);
            services.insert(service.uri_template.clone(), service);
        }
        info!("loaded {} services from {}", services.len(), base.display());
        Ok(Self { services })
    }

    pub fn services(&self) -> &IndexMap<String, ServiceDescriptor> {
        &self.services
    }

    pub fn service(&self, uri_template: &str) -> Option<&ServiceDescriptor> {
        self.services.get(uri_template)
    }

    /// Like [`ServiceRegistry::service`], failing when no service has `uri_template`.
    pub fn require(&self, uri_template: &str) -> Result<&ServiceDescriptor, ServiceError> {
        self.service(uri_template)
            .ok_or_else(|| ServiceError::UnknownService(uri_template.to_string()))
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// Directories below `base` holding a service descriptor, relative to `base`,
/// sorted by path.
fn discover(base: &Path) -> Result<Vec<PathBuf>, ServiceError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(base).sort_by_file_name() {
        let entry = entry.map_err(|e| ServiceError::Io {
            path: e.path().unwrap_or(base).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() || entry.file_name() != SERVICE_FILE_NAME {
            continue;
        }
        let dir = entry.path().parent().unwrap_or(base);
        found.push(dir.strip_prefix(base).unwrap_or(dir).to_path_buf());
    }
    found.sort();
    Ok(found)
}

fn load_service(
    restapi_root: &Path,
    services_root: &Path,
    base: &Path,
    service_path: &Path,
    schema: &Value,
) -> Result<ServiceDescriptor, ServiceError> {
    let path = base.join(service_path).join(SERVICE_FILE_NAME);
    let text = fs::read_to_string(&path).map_err(|source| ServiceError::Io {
        path: path.clone(),
        source,
    })?;
    let mut raw = from_yaml(&text).map_err(|e| ServiceError::Parse {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    alias(&mut raw, "urlPattern", "uriTemplate");

    let errors = validate_with(&raw, schema);
    if !errors.is_empty() {
        return Err(ServiceError::Invalid { path, errors });
    }

    let mut service: ServiceDescriptor =
        serde_json::from_value(raw).map_err(|e| ServiceError::Parse {
            path: path.clone(),
            reason: e.to_string(),
        })?;
    service.methods = service
        .methods
        .into_iter()
        .map(|(name, method)| (name.to_uppercase(), method))
        .collect();
    service.method_list = service.methods.keys().cloned().collect();
    service.restapi_root = restapi_root.to_path_buf();
    service.content_path = services_root.join(service_path);
    Ok(service)
}

/// Make `a` and `b` both present when either one is.
fn alias(raw: &mut Value, a: &str, b: &str) {
    let Some(object) = raw.as_object_mut() else {
        return;
    };
    match (object.get(a).cloned(), object.get(b).cloned()) {
        (Some(value), None) => {
            object.insert(b.to_string(), value);
        }
        (None, Some(value)) => {
            object.insert(a.to_string(), value);
        }
        _ => {}
    }
}
