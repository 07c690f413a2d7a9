//! Connector: establishes management sessions over the direct or registry path

use crate::error::ConnectError;
use crate::session::{ConnectRoute, Session};
use crate::stub_cache::StubCache;
use crate::validator;
use jmxlink_interface::options::CHECK_STUB;
use jmxlink_interface::{
    ConnectionOptions, RegistryEndpoint, RemoteStub, RemoteTransport, ServiceUrl, SocketFactory,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name the remote connector server is bound under in its registry
pub const DEFAULT_LOOKUP_NAME: &str = "jmxrmi";

/// Opens sessions to remote management servers
///
/// Two paths exist:
/// - **Direct**: the service URL is handed to the transport as-is, together
///   with the caller's options.
/// - **Secure registry**: when the naming registry itself is TLS-protected the
///   transport cannot resolve the URL in one call. The connector reaches the
///   registry through a TLS socket factory, looks up the server stub, and
///   opens the session around it. Resolved stubs are kept in a [`StubCache`]
///   so reconnect attempts skip the lookup.
///
/// Every call makes exactly one attempt; retries belong to the caller.
///
/// # Example
///
/// ```rust,no_run
/// use jmxlink_connect::Connector;
/// use jmxlink_interface::{ConnectionOptions, RemoteTransport};
/// use std::sync::Arc;
///
/// # async fn example(transport: Arc<dyn RemoteTransport>) -> Result<(), Box<dyn std::error::Error>> {
/// let connector = Connector::new(transport);
/// let session = connector
///     .connect(
///         "service:jmx:rmi:///jndi/rmi://myhost:9999/jmxrmi",
///         ConnectionOptions::new(),
///         true,
///     )
///     .await?;
/// println!("connected: {}", session.connection_id());
/// # Ok(())
/// # }
/// ```
pub struct Connector {
    transport: Arc<dyn RemoteTransport>,
    stubs: Arc<StubCache>,
    lookup_name: String,
}

impl Connector {
    /// Create a connector with its own process-policy stub cache
    pub fn new(transport: Arc<dyn RemoteTransport>) -> Self {
        Self {
            transport,
            stubs: Arc::new(StubCache::default()),
            lookup_name: DEFAULT_LOOKUP_NAME.to_string(),
        }
    }

    /// Use `stubs` instead of a private cache, e.g. to share it between connectors
    pub fn with_stub_cache(mut self, stubs: Arc<StubCache>) -> Self {
        self.stubs = stubs;
        self
    }

    /// Look up `name` instead of [`DEFAULT_LOOKUP_NAME`] on the registry path
    pub fn with_lookup_name(mut self, name: impl Into<String>) -> Self {
        self.lookup_name = name.into();
        self
    }

    pub fn stub_cache(&self) -> &Arc<StubCache> {
        &self.stubs
    }

    pub fn lookup_name(&self) -> &str {
        &self.lookup_name
    }

    /// Check `descriptor` without connecting; see [`validator::validate`]
    pub fn validate(&self, descriptor: &str, registry_secure: bool) -> Result<(), ConnectError> {
        validator::validate(descriptor, registry_secure)
    }

    /// Open a session to the server named by `descriptor`
    ///
    /// # Errors
    ///
    /// Returns `ConnectError::MalformedEndpoint` if the descriptor cannot be
    /// parsed (no network I/O happens in that case), and
    /// `ConnectError::Connection` for any failure while contacting the
    /// registry, looking up the stub, or completing the handshake.
    pub async fn connect(
        &self,
        descriptor: &str,
        options: ConnectionOptions,
        registry_secure: bool,
    ) -> Result<Session, ConnectError> {
        if registry_secure {
            self.connect_via_secure_registry(descriptor, options).await
        } else {
            self.connect_direct(descriptor, options).await
        }
    }

    async fn connect_direct(
        &self,
        descriptor: &str,
        options: ConnectionOptions,
    ) -> Result<Session, ConnectError> {
        let url = ServiceUrl::parse(descriptor)?;

        debug!("Connecting directly to {}", url);

        let inner = self
            .transport
            .connect(&url, &options)
            .await
            .map_err(|e| ConnectError::connection(url.as_str(), e))?;

        info!("Connected to {} (connection {})", url, inner.connection_id());

        Ok(Session::new(inner, url.as_str(), ConnectRoute::Direct))
    }

    async fn connect_via_secure_registry(
        &self,
        descriptor: &str,
        mut options: ConnectionOptions,
    ) -> Result<Session, ConnectError> {
        info!("Attempting to connect to a TLS-protected RMI registry");

        options.insert(CHECK_STUB, true);

        let url = ServiceUrl::parse(descriptor)?;
        let endpoint = url.registry_endpoint()?;

        debug!("Registry for {} is {}", url, endpoint);

        let stub = self
            .stubs
            .get_or_resolve(&endpoint, || self.resolve_stub(&endpoint))
            .await?;

        let resolved = stub.registry.clone();
        let inner = self
            .transport
            .connect_with_stub(stub, &options)
            .await
            .map_err(|e| ConnectError::connection(url.as_str(), e))?;

        info!(
            "Connected to {} through registry {} (connection {})",
            url,
            resolved,
            inner.connection_id()
        );

        Ok(Session::new(
            inner,
            url.as_str(),
            ConnectRoute::SecureRegistry {
                requested: endpoint,
                resolved,
            },
        ))
    }

    async fn resolve_stub(&self, endpoint: &RegistryEndpoint) -> Result<RemoteStub, ConnectError> {
        debug!(
            "Looking up {:?} in registry {} over {}",
            self.lookup_name,
            endpoint,
            SocketFactory::Tls
        );

        let registry = self
            .transport
            .locate_registry(endpoint, SocketFactory::Tls)
            .await
            .map_err(|e| ConnectError::connection(endpoint.to_string(), e))?;

        registry.lookup(&self.lookup_name).await.map_err(|e| {
            warn!(
                "Lookup of {:?} in registry {} failed: {}",
                self.lookup_name, endpoint, e
            );
            ConnectError::connection(endpoint.to_string(), e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use jmxlink_interface::{ManagementSession, Registry, TransportError};

    /// Transport that fails the test if the network is touched
    struct Unreachable;

    #[async_trait]
    impl RemoteTransport for Unreachable {
        async fn connect(
            &self,
            _url: &ServiceUrl,
            _options: &ConnectionOptions,
        ) -> jmxlink_interface::Result<Box<dyn ManagementSession>> {
            panic!("direct connect must not be reached")
        }

        async fn locate_registry(
            &self,
            _endpoint: &RegistryEndpoint,
            _sockets: SocketFactory,
        ) -> jmxlink_interface::Result<Box<dyn Registry>> {
            Err(TransportError::Protocol("unreachable".to_string()))
        }

        async fn connect_with_stub(
            &self,
            _stub: Arc<RemoteStub>,
            _options: &ConnectionOptions,
        ) -> jmxlink_interface::Result<Box<dyn ManagementSession>> {
            panic!("stub connect must not be reached")
        }
    }

    #[tokio::test]
    async fn test_malformed_direct_url_fails_before_io() {
        let connector = Connector::new(Arc::new(Unreachable));
        let err = connector
            .connect("localhost:9999", ConnectionOptions::new(), false)
            .await
            .unwrap_err();
        assert!(err.is_malformed_endpoint());
    }

    #[tokio::test]
    async fn test_non_jndi_url_is_malformed_on_registry_path() {
        let connector = Connector::new(Arc::new(Unreachable));
        let err = connector
            .connect("service:jmx:rmi://host:1234/stub/AAAA", ConnectionOptions::new(), true)
            .await
            .unwrap_err();
        assert!(err.is_malformed_endpoint());
    }

    #[tokio::test]
    async fn test_registry_failure_is_connection_error() {
        let connector = Connector::new(Arc::new(Unreachable));
        let err = connector
            .connect(
                "service:jmx:rmi:///jndi/rmi://myhost:9999/jmxrmi",
                ConnectionOptions::new(),
                true,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            ConnectError::Connection { target, .. } if target == "myhost:9999"
        ));
        assert!(connector.stub_cache().is_empty().await);
    }

    #[test]
    fn test_builder_overrides() {
        let shared = Arc::new(StubCache::default());
        let connector = Connector::new(Arc::new(Unreachable))
            .with_stub_cache(shared.clone())
            .with_lookup_name("custom");
        assert_eq!(connector.lookup_name(), "custom");
        assert!(Arc::ptr_eq(connector.stub_cache(), &shared));
    }
}
