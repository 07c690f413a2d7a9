//! Session: caller-owned handle to an established management connection

use jmxlink_interface::{ManagementSession, RegistryEndpoint, TransportError};
use std::fmt;
use tracing::debug;

/// Which connection path produced a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectRoute {
    /// Opened straight from the service URL
    Direct,

    /// Opened around a stub resolved from a TLS-protected registry
    SecureRegistry {
        /// Registry the service URL pointed at for this attempt
        requested: RegistryEndpoint,
        /// Registry the stub actually came from (differs when a cached stub
        /// from an earlier attempt was reused)
        resolved: RegistryEndpoint,
    },
}

/// A live management session returned by [`Connector::connect`](crate::Connector::connect)
///
/// The connector keeps no reference to it; closing and dropping are up to the caller.
pub struct Session {
    inner: Box<dyn ManagementSession>,
    service_url: String,
    route: ConnectRoute,
}

impl Session {
    pub(crate) fn new(
        inner: Box<dyn ManagementSession>,
        service_url: impl Into<String>,
        route: ConnectRoute,
    ) -> Self {
        Self {
            inner,
            service_url: service_url.into(),
            route,
        }
    }

    pub fn connection_id(&self) -> &str {
        self.inner.connection_id()
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub fn route(&self) -> &ConnectRoute {
        &self.route
    }

    /// The transport-level session, for issuing management operations
    pub fn transport_session(&self) -> &dyn ManagementSession {
        self.inner.as_ref()
    }

    pub async fn close(self) -> Result<(), TransportError> {
        debug!("Closing session {} to {}", self.connection_id(), self.service_url);
        self.inner.close().await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("connection_id", &self.connection_id())
            .field("service_url", &self.service_url)
            .field("route", &self.route)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_is_send_sync() {
        // Compile-time check that Session satisfies trait bounds
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Session>();
    }
}
