//! Service URL and registry endpoint parsing
//!
//! A management service URL has the shape
//! `service:jmx:<protocol>://[host[:port]][url-path]`. When the remote server
//! is reached through a naming registry, the URL path carries the registry
//! location in JNDI form, e.g. `/jndi/rmi://myhost:9999/jmxrmi`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Scheme prefix shared by every management service URL
pub const SERVICE_URL_PREFIX: &str = "service:jmx:";

/// URL path prefix that introduces a registry lookup
pub const JNDI_PATH_PREFIX: &str = "/jndi/";

/// Port used by RMI registries when the lookup URL names none
pub const DEFAULT_REGISTRY_PORT: u16 = 1099;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("service URL must start with \"service:jmx:\": {0}")]
    MissingPrefix(String),

    #[error("service URL contains a character outside printable ASCII at index {index}: {url:?}")]
    InvalidCharacter { url: String, index: usize },

    #[error("invalid protocol in service URL: {0:?}")]
    InvalidProtocol(String),

    #[error("invalid host in service URL: {0:?}")]
    InvalidHost(String),

    #[error("invalid port in service URL: {0:?}")]
    InvalidPort(String),

    #[error("URL path must begin with '/' or ';': {0:?}")]
    InvalidUrlPath(String),

    #[error("service URL does not name a registry lookup path (expected \"/jndi/...\"): {0}")]
    NotRegistryPath(String),

    #[error("invalid registry URL {url:?}: {reason}")]
    InvalidRegistryUrl { url: String, reason: String },

    #[error("unsupported registry scheme {0:?} (only \"rmi\" is supported)")]
    UnsupportedRegistryScheme(String),

    #[error("registry URL has no host: {0}")]
    MissingRegistryHost(String),
}

/// A parsed management service URL
///
/// Immutable once constructed. The original text is kept so that it can be
/// handed to the transport untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceUrl {
    raw: String,
    protocol: String,
    host: String,
    port: Option<u16>,
    url_path: String,
}

impl ServiceUrl {
    /// Parse a service URL
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let raw = input;
        if let Some(index) = raw.bytes().position(|b| !(0x20..=0x7e).contains(&b)) {
            return Err(AddressError::InvalidCharacter {
                url: raw.to_string(),
                index,
            });
        }
        let prefix_ok = raw
            .get(..SERVICE_URL_PREFIX.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(SERVICE_URL_PREFIX));
        if !prefix_ok {
            return Err(AddressError::MissingPrefix(raw.to_string()));
        }
        let rest = &raw[SERVICE_URL_PREFIX.len()..];

        let (protocol, rest) = rest
            .split_once("://")
            .ok_or_else(|| AddressError::InvalidProtocol(rest.to_string()))?;
        if !is_valid_protocol(protocol) {
            return Err(AddressError::InvalidProtocol(protocol.to_string()));
        }

        let (host, rest) = split_host(rest)?;

        let (port, url_path) = match rest.strip_prefix(':') {
            Some(after) => {
                let end = after.find(['/', ';']).unwrap_or(after.len());
                let digits = &after[..end];
                let port = digits
                    .parse::<u16>()
                    .ok()
                    .filter(|_| digits.bytes().all(|b| b.is_ascii_digit()))
                    .ok_or_else(|| AddressError::InvalidPort(digits.to_string()))?;
                (Some(port), &after[end..])
            }
            None => (None, rest),
        };

        if !url_path.is_empty() && !url_path.starts_with(['/', ';']) {
            return Err(AddressError::InvalidUrlPath(url_path.to_string()));
        }
        if url_path.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AddressError::InvalidUrlPath(url_path.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            protocol: protocol.to_ascii_lowercase(),
            host: host.to_string(),
            port,
            url_path: url_path.to_string(),
        })
    }

    /// The URL exactly as it was supplied
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Transport protocol, lowercased (e.g. `rmi`)
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Host part; empty when the URL leaves the host to the registry path
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn url_path(&self) -> &str {
        &self.url_path
    }

    /// Whether the URL path names a registry lookup
    pub fn is_registry_path(&self) -> bool {
        self.url_path.starts_with(JNDI_PATH_PREFIX)
    }

    /// Derive the registry host and port from the JNDI lookup path
    ///
    /// Fails when the URL path is not of the `/jndi/rmi://host[:port]/name`
    /// form rather than guessing.
    pub fn registry_endpoint(&self) -> Result<RegistryEndpoint, AddressError> {
        let lookup = self
            .url_path
            .strip_prefix(JNDI_PATH_PREFIX)
            .ok_or_else(|| AddressError::NotRegistryPath(self.raw.clone()))?;

        let url = url::Url::parse(lookup).map_err(|e| AddressError::InvalidRegistryUrl {
            url: lookup.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "rmi" {
            return Err(AddressError::UnsupportedRegistryScheme(
                url.scheme().to_string(),
            ));
        }

        let host = match url.host() {
            Some(url::Host::Domain(d)) if !d.is_empty() => d.to_string(),
            Some(url::Host::Ipv4(addr)) => addr.to_string(),
            Some(url::Host::Ipv6(addr)) => addr.to_string(),
            _ => return Err(AddressError::MissingRegistryHost(lookup.to_string())),
        };

        let port = match url.port() {
            Some(0) => return Err(AddressError::InvalidPort("0".to_string())),
            Some(port) => port,
            None => DEFAULT_REGISTRY_PORT,
        };

        Ok(RegistryEndpoint { host, port })
    }
}

impl FromStr for ServiceUrl {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ServiceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn is_valid_protocol(protocol: &str) -> bool {
    let mut chars = protocol.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Split `[host][rest]`, accepting bracketed IPv6 literals
fn split_host(input: &str) -> Result<(&str, &str), AddressError> {
    if let Some(after) = input.strip_prefix('[') {
        let close = after
            .find(']')
            .ok_or_else(|| AddressError::InvalidHost(input.to_string()))?;
        let literal = &after[..close];
        if literal.parse::<std::net::Ipv6Addr>().is_err() {
            return Err(AddressError::InvalidHost(literal.to_string()));
        }
        // Keep the brackets so the host round-trips into a URL
        return Ok((&input[..close + 2], &after[close + 1..]));
    }

    let end = input.find([':', '/', ';']).unwrap_or(input.len());
    let host = &input[..end];
    let valid = host.is_empty()
        || (host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
            && !host.starts_with(['-', '.'])
            && !host.ends_with('-'));
    if !valid {
        return Err(AddressError::InvalidHost(host.to_string()));
    }
    Ok((host, &input[end..]))
}

/// Host and port of a naming registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistryEndpoint {
    pub host: String,
    pub port: u16,
}

impl RegistryEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for RegistryEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registry_url() {
        let url = ServiceUrl::parse("service:jmx:rmi:///jndi/rmi://myhost:9999/jmxrmi").unwrap();
        assert_eq!(url.protocol(), "rmi");
        assert_eq!(url.host(), "");
        assert_eq!(url.port(), None);
        assert_eq!(url.url_path(), "/jndi/rmi://myhost:9999/jmxrmi");
        assert!(url.is_registry_path());
    }

    #[test]
    fn test_registry_endpoint_from_jndi_path() {
        let url = ServiceUrl::parse("service:jmx:rmi:///jndi/rmi://myhost:9999/jmxrmi").unwrap();
        let endpoint = url.registry_endpoint().unwrap();
        assert_eq!(endpoint.host, "myhost");
        assert_eq!(endpoint.port, 9999);
        assert_eq!(endpoint.to_string(), "myhost:9999");
    }

    #[test]
    fn test_registry_endpoint_default_port() {
        let url = ServiceUrl::parse("service:jmx:rmi:///jndi/rmi://myhost/jmxrmi").unwrap();
        assert_eq!(url.registry_endpoint().unwrap().port, DEFAULT_REGISTRY_PORT);
    }

    #[test]
    fn test_registry_endpoint_ipv6() {
        let url = ServiceUrl::parse("service:jmx:rmi:///jndi/rmi://[::1]:9999/jmxrmi").unwrap();
        let endpoint = url.registry_endpoint().unwrap();
        assert_eq!(endpoint.host, "::1");
        assert_eq!(endpoint.to_string(), "[::1]:9999");
    }

    #[test]
    fn test_parse_host_and_port() {
        let url = ServiceUrl::parse("service:jmx:jmxmp://example.com:5555").unwrap();
        assert_eq!(url.protocol(), "jmxmp");
        assert_eq!(url.host(), "example.com");
        assert_eq!(url.port(), Some(5555));
        assert_eq!(url.url_path(), "");
        assert!(!url.is_registry_path());
    }

    #[test]
    fn test_prefix_is_case_insensitive() {
        let url = ServiceUrl::parse("SERVICE:JMX:RMI:///jndi/rmi://h:1/jmxrmi").unwrap();
        assert_eq!(url.protocol(), "rmi");
    }

    #[test]
    fn test_malformed_urls() {
        assert!(matches!(
            ServiceUrl::parse("rmi://myhost:9999/jmxrmi"),
            Err(AddressError::MissingPrefix(_))
        ));
        assert!(matches!(
            ServiceUrl::parse("service:jmx:rmi"),
            Err(AddressError::InvalidProtocol(_))
        ));
        assert!(matches!(
            ServiceUrl::parse("service:jmx:rmi://host:notaport/x"),
            Err(AddressError::InvalidPort(_))
        ));
        assert!(matches!(
            ServiceUrl::parse("service:jmx:rmi://host:99999"),
            Err(AddressError::InvalidPort(_))
        ));
        assert!(matches!(
            ServiceUrl::parse("service:jmx:rmi://bad host/x"),
            Err(AddressError::InvalidHost(_))
        ));
        assert!(matches!(
            ServiceUrl::parse("service:jmx:rmi://[nothex]:1/x"),
            Err(AddressError::InvalidHost(_))
        ));
        assert!(matches!(
            ServiceUrl::parse("service:jmx:rmi:///jndi/rmi://h:1/jmxrm\u{e9}"),
            Err(AddressError::InvalidCharacter { index: 39, .. })
        ));
        assert!(matches!(
            ServiceUrl::parse("service:jmx:rmi:///jndi/rmi://h:1/jmx\trmi"),
            Err(AddressError::InvalidCharacter { .. })
        ));
        assert!(matches!(
            ServiceUrl::parse("  service:jmx:rmi:///jndi/rmi://h:1/jmxrmi"),
            Err(AddressError::MissingPrefix(_))
        ));
        assert!(matches!(
            ServiceUrl::parse("service:jmx:rmi:///jndi/rmi://h:1/jmxrmi\n"),
            Err(AddressError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn test_registry_endpoint_rejects_unexpected_forms() {
        let url = ServiceUrl::parse("service:jmx:rmi://host:1234/stub/rO0ABXNy").unwrap();
        assert!(matches!(
            url.registry_endpoint(),
            Err(AddressError::NotRegistryPath(_))
        ));

        let url = ServiceUrl::parse("service:jmx:iiop:///jndi/iiop://host:1234/jmxrmi").unwrap();
        assert!(matches!(
            url.registry_endpoint(),
            Err(AddressError::UnsupportedRegistryScheme(_))
        ));

        let url = ServiceUrl::parse("service:jmx:rmi:///jndi/rmi://host:0/jmxrmi").unwrap();
        assert!(matches!(
            url.registry_endpoint(),
            Err(AddressError::InvalidPort(_))
        ));
    }

    #[test]
    fn test_display_preserves_input() {
        let raw = "service:jmx:rmi:///jndi/rmi://myhost:9999/jmxrmi";
        let url: ServiceUrl = raw.parse().unwrap();
        assert_eq!(url.to_string(), raw);
    }
}
