//! Up-front service URL validation

use crate::error::ConnectError;
use jmxlink_interface::ServiceUrl;
use tracing::debug;

/// Check that `descriptor` is a well-formed service URL before connecting
///
/// When the registry is TLS-protected the URL is not parsed here: the
/// connector decomposes it on its registry path instead, and the raw text
/// may take a different form in that deployment.
///
/// Performs no network I/O.
pub fn validate(descriptor: &str, registry_secure: bool) -> Result<(), ConnectError> {
    if registry_secure {
        debug!("Skipping service URL validation for TLS-protected registry");
        return Ok(());
    }

    ServiceUrl::parse(descriptor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_direct_url() {
        assert!(validate("service:jmx:rmi:///jndi/rmi://myhost:9999/jmxrmi", false).is_ok());
        assert!(validate("service:jmx:jmxmp://myhost:5555", false).is_ok());
    }

    #[test]
    fn test_malformed_direct_url() {
        let err = validate("myhost:9999", false).unwrap_err();
        assert!(err.is_malformed_endpoint());
    }

    #[test]
    fn test_secure_registry_skips_parsing() {
        assert!(validate("not a service url", true).is_ok());
    }
}
