//! Configuration types for the Typesense provider.

use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::errors::SearchIndexError;

/// Default admin API key for local development.
pub const DEFAULT_API_KEY: &str = "xyz";

/// Default Typesense host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default Typesense port.
pub const DEFAULT_PORT: &str = "8108";

/// Default Typesense protocol.
pub const DEFAULT_PROTOCOL: &str = "http";

/// Default connection establishment timeout.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(2);

/// A single Typesense node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub host: String,
    pub port: String,
    pub protocol: String,
}

impl Node {
    pub fn new(host: impl Into<String>, port: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            protocol: protocol.into(),
        }
    }

    /// Base URL of the node, e.g. `http://localhost:8108/`.
    pub fn base_url(&self) -> Result<Url, SearchIndexError> {
        let raw = format!("{}://{}:{}/", self.protocol, self.host, self.port);
        Url::parse(&raw)
            .map_err(|e| SearchIndexError::validation(format!("Invalid node URL '{}': {}", raw, e)))
    }
}

/// Connection settings for the Typesense provider.
///
/// Built once at startup and handed to the provider; nothing downstream reads
/// the process environment. The `Debug` output only shows the redacted API key.
#[derive(Clone)]
pub struct TypesenseConfig {
    /// Admin API key sent with every request.
    pub api_key: String,
    /// Nodes in the order they are tried.
    pub nodes: Vec<Node>,
    /// Timeout for establishing a connection to a node.
    pub connection_timeout: Duration,
}

impl TypesenseConfig {
    /// Build the configuration from process environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TYPESENSE_ADMIN_API_KEY`: Admin API key (default: xyz)
    /// - `TYPESENSE_HOST_NEAREST`: Nearest-node host (optional)
    /// - `TYPESENSE_HOST`: Host used when no nearest host is set (default: localhost)
    /// - `TYPESENSE_HOST_2`, `TYPESENSE_HOST_3`: Extra hosts, used with a nearest host
    /// - `TYPESENSE_PORT`: Port (default: 8108)
    /// - `TYPESENSE_PROTOCOL`: Protocol (default: http)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Values are trimmed; a value that is empty after trimming counts as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("TYPESENSE_ADMIN_API_KEY").unwrap_or_else(|| DEFAULT_API_KEY.to_string());
        let nearest = get("TYPESENSE_HOST_NEAREST");
        let host = nearest
            .clone()
            .or_else(|| get("TYPESENSE_HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = get("TYPESENSE_PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());
        let protocol = get("TYPESENSE_PROTOCOL").unwrap_or_else(|| DEFAULT_PROTOCOL.to_string());

        let mut nodes = vec![Node::new(&host, &port, &protocol)];
        if nearest.is_some() {
            // The nearest endpoint is listed twice: once as primary, once ahead of the extras.
            nodes.push(Node::new(&host, &port, &protocol));
            for extra in ["TYPESENSE_HOST_2", "TYPESENSE_HOST_3"] {
                if let Some(extra_host) = get(extra) {
                    nodes.push(Node::new(extra_host, &port, &protocol));
                }
            }
        } else {
            nodes.push(Node::new(DEFAULT_HOST, DEFAULT_PORT, DEFAULT_PROTOCOL));
        }

        Self {
            api_key,
            nodes,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }

    /// API key reduced to a short prefix, safe to print in diagnostics.
    pub fn redacted_api_key(&self) -> String {
        let prefix: String = self.api_key.chars().take(8).collect();
        format!("{}... (length: {})", prefix, self.api_key.chars().count())
    }
}

impl fmt::Debug for TypesenseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypesenseConfig")
            .field("api_key", &self.redacted_api_key())
            .field("nodes", &self.nodes)
            .field("connection_timeout", &self.connection_timeout)
            .finish()
    }
}
