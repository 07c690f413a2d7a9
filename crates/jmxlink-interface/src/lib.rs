//! jmxlink Interface: the transport seam between connection logic and the wire
//!
//! This crate defines the types that the connector hands to, and receives from,
//! a remote-object transport: parsed service URLs, registry endpoints,
//! connection options, resolved stubs and live sessions.
//!
//! # Architecture
//!
//! The `RemoteTransport` trait groups the three outbound operations a
//! connector needs:
//!
//! 1. **Direct connect**: open a session from a service URL and options
//! 2. **Registry location**: reach a naming registry at host/port through a
//!    chosen socket factory and get a `Registry` handle for lookups
//! 3. **Stub connect**: open a session around a stub that was resolved earlier
//!
//! # Example
//!
//! ```rust,no_run
//! use jmxlink_interface::{ConnectionOptions, RemoteTransport, ServiceUrl};
//!
//! async fn open<T: RemoteTransport>(transport: &T) -> anyhow::Result<()> {
//!     let url = ServiceUrl::parse("service:jmx:rmi:///jndi/rmi://localhost:9999/jmxrmi")?;
//!     let session = transport.connect(&url, &ConnectionOptions::new()).await?;
//!     println!("connected: {}", session.connection_id());
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

pub mod address;
pub mod options;

pub use address::{AddressError, RegistryEndpoint, ServiceUrl};
pub use options::{ConnectionOptions, OptionValue};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("name not bound in registry: {0}")]
    NotBound(String),

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("security error: {0}")]
    Security(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Socket factory used to reach a naming registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SocketFactory {
    /// TLS client sockets
    Tls,
}

impl fmt::Display for SocketFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketFactory::Tls => write!(f, "tls"),
        }
    }
}

/// A resolved reference to a remote server entry point
///
/// The reference bytes are opaque to the connector; only the transport that
/// produced them knows how to use them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStub {
    /// Name the stub was bound under
    pub bound_name: String,

    /// Registry the stub was obtained from
    pub registry: RegistryEndpoint,

    /// Transport-specific encoded reference
    pub reference: Vec<u8>,
}

impl RemoteStub {
    pub fn new(
        bound_name: impl Into<String>,
        registry: RegistryEndpoint,
        reference: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            bound_name: bound_name.into(),
            registry,
            reference: reference.into(),
        }
    }
}

/// A live connection to a remote management server
///
/// Owned by the caller once returned; the connector keeps no reference to it.
#[async_trait]
pub trait ManagementSession: Send + Sync + 'static {
    /// Identifier assigned by the server during the handshake
    fn connection_id(&self) -> &str;

    /// Close the session and release its transport resources
    async fn close(&self) -> Result<()>;
}

/// A naming registry reached at a specific endpoint
#[async_trait]
pub trait Registry: Send + Sync {
    /// Look up a bound name
    ///
    /// # Errors
    ///
    /// Returns `TransportError::NotBound` if nothing is bound under `name`.
    async fn lookup(&self, name: &str) -> Result<RemoteStub>;
}

/// Outbound operations the connector relies on
///
/// Implementations must be `Send + Sync + 'static` so one transport can be
/// shared by every connection attempt in the process.
#[async_trait]
pub trait RemoteTransport: Send + Sync + 'static {
    /// Open a session directly from a service URL
    async fn connect(
        &self,
        url: &ServiceUrl,
        options: &ConnectionOptions,
    ) -> Result<Box<dyn ManagementSession>>;

    /// Reach the naming registry at `endpoint` through `sockets`
    async fn locate_registry(
        &self,
        endpoint: &RegistryEndpoint,
        sockets: SocketFactory,
    ) -> Result<Box<dyn Registry>>;

    /// Open a session around a previously resolved stub
    async fn connect_with_stub(
        &self,
        stub: Arc<RemoteStub>,
        options: &ConnectionOptions,
    ) -> Result<Box<dyn ManagementSession>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_stub_constructor() {
        let stub = RemoteStub::new("jmxrmi", RegistryEndpoint::new("myhost", 9999), vec![1, 2]);
        assert_eq!(stub.bound_name, "jmxrmi");
        assert_eq!(stub.registry.to_string(), "myhost:9999");
        assert_eq!(stub.reference, vec![1, 2]);
    }

    #[test]
    fn test_not_bound_display() {
        let err = TransportError::NotBound("jmxrmi".to_string());
        assert_eq!(err.to_string(), "name not bound in registry: jmxrmi");
    }

    struct SingleEntry(RemoteStub);

    #[async_trait]
    impl Registry for SingleEntry {
        async fn lookup(&self, name: &str) -> Result<RemoteStub> {
            if name == self.0.bound_name {
                Ok(self.0.clone())
            } else {
                Err(TransportError::NotBound(name.to_string()))
            }
        }
    }

    #[test]
    fn test_registry_trait_object_lookup() {
        let stub = RemoteStub::new("jmxrmi", RegistryEndpoint::new("localhost", 1099), vec![]);
        let registry: Box<dyn Registry> = Box::new(SingleEntry(stub.clone()));

        let found = tokio_test::block_on(registry.lookup("jmxrmi")).unwrap();
        assert_eq!(found, stub);

        let missing = tokio_test::block_on(registry.lookup("other"));
        assert!(matches!(missing, Err(TransportError::NotBound(name)) if name == "other"));
    }

    #[test]
    fn test_socket_factory_display() {
        assert_eq!(SocketFactory::Tls.to_string(), "tls");
    }
}
