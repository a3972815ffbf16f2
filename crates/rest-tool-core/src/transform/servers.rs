use indexmap::IndexMap;
use log::warn;
use url::Url;

use crate::ir::ServerDescriptor;
use crate::parse::document::ParsedDocument;
use crate::parse::openapi::{OpenApiSpec, Server, ServerVariable};
use crate::parse::swagger::SwaggerSpec;

/// Base that relative OpenAPI server URLs are resolved against.
const DEFAULT_BASE_URL: &str = "http://localhost/";

/// Server descriptors of any document; an unrecognized one gets the default server.
pub fn resolve_servers(document: &ParsedDocument) -> Vec<ServerDescriptor> {
    match document {
        ParsedDocument::Swagger(spec) => resolve_swagger_servers(spec),
        ParsedDocument::OpenApi(spec) => resolve_openapi_servers(spec),
        ParsedDocument::Unrecognized => vec![ServerDescriptor::default()],
    }
}

/// One descriptor per declared scheme, all sharing `host` and `basePath`.
pub fn resolve_swagger_servers(spec: &SwaggerSpec) -> Vec<ServerDescriptor> {
    let (host_name, port) =
        parse_swagger_host(spec.host.as_deref().unwrap_or(ServerDescriptor::DEFAULT_HOST));
    let base_path = spec
        .base_path
        .clone()
        .unwrap_or_else(|| ServerDescriptor::DEFAULT_BASE_PATH.to_string());
    let default_schemes = [ServerDescriptor::DEFAULT_PROTOCOL.to_string()];
    let schemes = spec.schemes.as_deref().unwrap_or(&default_schemes);

    schemes
        .iter()
        .map(|protocol| ServerDescriptor {
            protocol: protocol.clone(),
            host_name: host_name.clone(),
            port,
            base_path: base_path.clone(),
        })
        .collect()
}

/// Split a Swagger `host` (`name[:port]`) into its name and port.
pub fn parse_swagger_host(host: &str) -> (String, u16) {
    let mut parts = host.split(':');
    let name = parts.next().unwrap_or_default().to_string();
    let port = match parts.next() {
        None | Some("") => ServerDescriptor::DEFAULT_PORT,
        Some(port) => port.parse().unwrap_or_else(|_| {
            warn!("invalid port in host {host:?}, using {}", ServerDescriptor::DEFAULT_PORT);
            ServerDescriptor::DEFAULT_PORT
        }),
    };
    (name, port)
}

/// One descriptor per entry of `servers`, or the default server when the
/// document declares none.
pub fn resolve_openapi_servers(spec: &OpenApiSpec) -> Vec<ServerDescriptor> {
    match &spec.servers {
        Some(servers) => servers.iter().map(server_details).collect(),
        None => vec![ServerDescriptor::default()],
    }
}

pub fn server_details(server: &Server) -> ServerDescriptor {
    parse_server_url(&expand_variables(&server.url, &server.variables))
}

/// Substitute each `{name}` of a server URL template with the variable's default.
pub fn expand_variables(url: &str, variables: &IndexMap<String, ServerVariable>) -> String {
    variables
        .iter()
        .fold(url.to_string(), |url, (name, variable)| {
            url.replace(&format!("{{{name}}}"), &variable.default)
        })
}

/// Parse an absolute or relative server URL. Relative URLs are resolved
/// against `http://localhost/`; an unparsable URL yields the default server.
pub fn parse_server_url(raw: &str) -> ServerDescriptor {
    let parsed = Url::parse(raw).or_else(|err| match err {
        url::ParseError::RelativeUrlWithoutBase => {
            Url::parse(DEFAULT_BASE_URL).and_then(|base| base.join(raw))
        }
        other => Err(other),
    });

    match parsed {
        Ok(url) => ServerDescriptor {
            protocol: url.scheme().to_string(),
            host_name: url
                .host_str()
                .unwrap_or(ServerDescriptor::DEFAULT_HOST)
                .to_string(),
            port: port_of(&url, raw),
            base_path: url.path().to_string(),
        },
        Err(err) => {
            warn!("cannot parse server url {raw:?} ({err}), using the default server");
            ServerDescriptor::default()
        }
    }
}

fn port_of(url: &Url, raw: &str) -> u16 {
    if let Some(port) = url.port() {
        return port;
    }
    // The url crate drops a port equal to the scheme's default, keep it when written out.
    match url.port_or_known_default() {
        Some(default) if authority(raw).is_some_and(|a| a.ends_with(&format!(":{default}"))) => {
            default
        }
        _ => ServerDescriptor::DEFAULT_PORT,
    }
}

fn authority(raw: &str) -> Option<&str> {
    let (_, rest) = raw.split_once("://")?;
    rest.split(['/', '?', '#']).next()
}
