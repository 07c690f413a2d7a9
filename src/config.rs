/*!
 * Configuration types for jmxlink
 */

use crate::error::{JmxLinkError, Result};
use jmxlink_connect::{CachePolicy, Connector, StubCache, DEFAULT_LOOKUP_NAME};
use jmxlink_interface::{ConnectionOptions, RemoteTransport};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Connection settings for one remote management server
///
/// Loading this from a file is left to the embedding application; the struct
/// derives serde so it can sit inside any configuration format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Service URL, e.g. `service:jmx:rmi:///jndi/rmi://myhost:9999/jmxrmi`
    pub service_url: String,

    /// The naming registry itself requires TLS
    #[serde(default)]
    pub registry_ssl: bool,

    /// Username presented during the handshake
    #[serde(default)]
    pub username: Option<String>,

    /// Password presented during the handshake (never serialized)
    #[serde(default, skip_serializing)]
    pub password: Option<SecretString>,

    /// SASL realm
    #[serde(default)]
    pub realm: Option<String>,

    /// Security profiles to negotiate, e.g. `SASL/PLAIN`
    #[serde(default)]
    pub remote_profile: Option<String>,

    /// Name looked up in a TLS-protected registry
    #[serde(default = "default_lookup_name")]
    pub lookup_name: String,

    /// How registry-resolved stubs are reused
    #[serde(default)]
    pub cache_policy: CachePolicy,

    /// Diagnostic output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConnectorConfig {
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            registry_ssl: false,
            username: None,
            password: None,
            realm: None,
            remote_profile: None,
            lookup_name: default_lookup_name(),
            cache_policy: CachePolicy::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Check the settings without touching the network
    pub fn validate(&self) -> Result<()> {
        jmxlink_connect::validate(&self.service_url, self.registry_ssl)?;

        if self.password.is_some() && self.username.is_none() {
            return Err(JmxLinkError::Config(
                "password is set but username is not".to_string(),
            ));
        }

        if self.lookup_name.trim().is_empty() {
            return Err(JmxLinkError::Config("lookup_name is empty".to_string()));
        }

        Ok(())
    }

    /// Options handed to the connector for this server
    pub fn connection_options(&self) -> ConnectionOptions {
        let mut options = ConnectionOptions::new();

        if let Some(ref username) = self.username {
            let password = self
                .password
                .clone()
                .unwrap_or_else(|| SecretString::from(String::new()));
            options = options.with_credentials(username.clone(), password);
        }

        if let Some(ref realm) = self.realm {
            options = options.with_realm(realm.clone());
        }

        if let Some(ref profile) = self.remote_profile {
            options = options.with_remote_profile(profile.clone());
        }

        options
    }

    /// Build a connector over `transport` with this configuration's cache policy
    /// and lookup name
    pub fn build_connector(&self, transport: Arc<dyn RemoteTransport>) -> Connector {
        Connector::new(transport)
            .with_stub_cache(Arc::new(StubCache::new(self.cache_policy)))
            .with_lookup_name(self.lookup_name.clone())
    }
}

/// Logging settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn default_lookup_name() -> String {
    DEFAULT_LOOKUP_NAME.to_string()
}
