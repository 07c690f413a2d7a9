//! Error types for the jmxlink-connect crate

use jmxlink_interface::{AddressError, TransportError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("Malformed service URL: {0}")]
    MalformedEndpoint(#[from] AddressError),

    #[error("Connection to {target} failed: {source}")]
    Connection {
        target: String,
        #[source]
        source: TransportError,
    },
}

impl ConnectError {
    pub(crate) fn connection(target: impl Into<String>, source: TransportError) -> Self {
        ConnectError::Connection {
            target: target.into(),
            source,
        }
    }

    pub fn is_malformed_endpoint(&self) -> bool {
        matches!(self, ConnectError::MalformedEndpoint(_))
    }

    /// True when the registry answered but had nothing bound under the lookup name
    pub fn is_unbound_entry(&self) -> bool {
        matches!(
            self,
            ConnectError::Connection {
                source: TransportError::NotBound(_),
                ..
            }
        )
    }

    /// Underlying transport failure, if any
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            ConnectError::Connection { source, .. } => Some(source),
            ConnectError::MalformedEndpoint(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unbound_entry_is_connection_error() {
        let err = ConnectError::connection(
            "myhost:9999",
            TransportError::NotBound("jmxrmi".to_string()),
        );
        assert!(err.is_unbound_entry());
        assert!(!err.is_malformed_endpoint());
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Connection to myhost:9999 failed: name not bound in registry: jmxrmi"
        );
    }

    #[test]
    fn test_malformed_endpoint_from_address_error() {
        let err: ConnectError = AddressError::MissingPrefix("nope".to_string()).into();
        assert!(err.is_malformed_endpoint());
        assert!(err.transport_error().is_none());
    }
}
