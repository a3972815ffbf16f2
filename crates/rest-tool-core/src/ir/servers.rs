use serde::{Deserialize, Serialize};

/// Canonical connection info of one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDescriptor {
    pub protocol: String,
    pub host_name: String,
    pub port: u16,
    pub base_path: String,
}

impl ServerDescriptor {
    pub const DEFAULT_PROTOCOL: &'static str = "http";
    pub const DEFAULT_HOST: &'static str = "localhost";
    pub const DEFAULT_PORT: u16 = 80;
    pub const DEFAULT_BASE_PATH: &'static str = "/";
}

impl Default for ServerDescriptor {
    fn default() -> Self {
        Self {
            protocol: Self::DEFAULT_PROTOCOL.to_string(),
            host_name: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            base_path: Self::DEFAULT_BASE_PATH.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let server = ServerDescriptor::default();
        assert_eq!(
            serde_json::to_value(&server).unwrap(),
            json!({"protocol": "http", "hostName": "localhost", "port": 80, "basePath": "/"})
        );
    }
}
