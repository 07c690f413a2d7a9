/*!
 * jmxlink - connection establishment for remote JMX management servers
 *
 * Opens sessions to MBean servers exposed over RMI, with:
 * - Service URL validation before any network I/O
 * - A direct connect path for plain registries
 * - A TLS registry path that resolves the server stub itself and caches it
 *   across reconnect attempts
 * - Serde-friendly configuration and structured logging
 *
 * The wire protocol lives behind `jmxlink_interface::RemoteTransport`.
 */

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{ConnectorConfig, LogLevel, LoggingConfig};
pub use error::{ErrorCategory, JmxLinkError, Result};
pub use jmxlink_connect::{CachePolicy, ConnectRoute, Connector, Session, StubCache};
pub use jmxlink_interface::{ConnectionOptions, RegistryEndpoint, RemoteTransport, ServiceUrl};

use serde::Serialize;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validate `config` and open one session with `connector`
///
/// Performs a single attempt; retry scheduling is up to the caller.
pub async fn connect(config: &ConnectorConfig, connector: &Connector) -> Result<Session> {
    config.validate()?;
    let session = connector
        .connect(
            &config.service_url,
            config.connection_options(),
            config.registry_ssl,
        )
        .await?;
    Ok(session)
}

/// Parsed view of a service URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointReport {
    pub service_url: String,
    pub protocol: String,
    pub host: String,
    pub port: Option<u16>,
    pub url_path: String,
    /// Registry named by a `/jndi/` URL path, if any
    pub registry: Option<RegistryReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryReport {
    pub host: String,
    pub port: u16,
}

/// Parse `service_url` and describe it without connecting
pub fn inspect(service_url: &str) -> Result<EndpointReport> {
    let url = ServiceUrl::parse(service_url).map_err(jmxlink_connect::ConnectError::from)?;

    let registry = if url.is_registry_path() {
        let endpoint = url
            .registry_endpoint()
            .map_err(jmxlink_connect::ConnectError::from)?;
        Some(RegistryReport {
            host: endpoint.host,
            port: endpoint.port,
        })
    } else {
        None
    };

    Ok(EndpointReport {
        service_url: url.as_str().to_string(),
        protocol: url.protocol().to_string(),
        host: url.host().to_string(),
        port: url.port(),
        url_path: url.url_path().to_string(),
        registry,
    })
}
