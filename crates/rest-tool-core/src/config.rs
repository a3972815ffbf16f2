use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Options applied when building endpoint descriptors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointOptions {
    /// Keep the `examples` of every response descriptor. Off by default.
    #[serde(alias = "includeExamples")]
    pub include_examples: bool,
}

/// A partial [`EndpointOptions`], as supplied by a caller that only sets some fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct EndpointOverrides {
    #[serde(default, alias = "includeExamples")]
    pub include_examples: Option<bool>,
}

impl EndpointOptions {
    /// Apply `overrides` on top of `self`; unset fields keep their current value.
    pub fn merge(self, overrides: EndpointOverrides) -> Self {
        Self {
            include_examples: overrides.include_examples.unwrap_or(self.include_examples),
        }
    }

    pub fn with_examples() -> Self {
        Self {
            include_examples: true,
        }
    }
}

impl From<EndpointOverrides> for EndpointOptions {
    fn from(overrides: EndpointOverrides) -> Self {
        EndpointOptions::default().merge(overrides)
    }
}

/// Options handed to the spec loader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    pub parse: ParseOptions,
    pub resolve: ResolveOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub yaml: YamlOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct YamlOptions {
    /// Accept an empty file as an empty document.
    #[serde(alias = "allowEmpty")]
    pub allow_empty: bool,
}

impl Default for YamlOptions {
    fn default() -> Self {
        Self { allow_empty: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Follow `$ref`s into other local files.
    pub file: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { file: true }
    }
}

/// Top-level project configuration loaded from `.rest-tool.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RestToolConfig {
    pub input: String,
    pub loader: LoaderOptions,
    pub endpoints: EndpointOptions,
    pub services: ServicesConfig,
}

impl Default for RestToolConfig {
    fn default() -> Self {
        Self {
            input: "api.yml".to_string(),
            loader: LoaderOptions::default(),
            endpoints: EndpointOptions::default(),
            services: ServicesConfig::default(),
        }
    }
}

/// Where the mock service descriptors live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub restapi_root: String,
    pub services_root: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            restapi_root: ".".to_string(),
            services_root: "services".to_string(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".rest-tool.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<RestToolConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: RestToolConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# rest-tool configuration
input: api.yml

loader:
  parse:
    yaml:
      allow_empty: false  # reject empty spec files
  resolve:
    file: true            # follow $refs into other local files

endpoints:
  include_examples: false  # keep response examples in endpoint descriptors

services:
  restapi_root: .
  services_root: services
"#
}
