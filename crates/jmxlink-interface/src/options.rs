//! Connection options passed through to protocol negotiation

use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::fmt;

/// Ask the protocol layer to verify the remote stub before opening a session
pub const CHECK_STUB: &str = "jmx.remote.x.check.stub";

/// Username/password pair presented during the handshake
pub const CREDENTIALS: &str = "jmx.remote.credentials";

/// SASL realm used by profile-based authentication
pub const SASL_REALM: &str = "jmx.remote.sasl.realm";

/// Space-separated list of security profiles to negotiate
pub const PROFILES: &str = "jmx.remote.profiles";

/// A single option value
#[derive(Clone)]
pub enum OptionValue {
    Text(String),
    Flag(bool),
    Credentials {
        username: String,
        password: SecretString,
    },
}

impl OptionValue {
    /// Interpret the value as a boolean switch
    ///
    /// Text values are accepted when they spell `true`/`false`, matching the
    /// string-typed switches most protocol implementations read.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            OptionValue::Flag(b) => Some(*b),
            OptionValue::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            OptionValue::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            OptionValue::Flag(b) => f.debug_tuple("Flag").field(b).finish(),
            OptionValue::Credentials { username, .. } => f
                .debug_struct("Credentials")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OptionValue::Text(a), OptionValue::Text(b)) => a == b,
            (OptionValue::Flag(a), OptionValue::Flag(b)) => a == b,
            (
                OptionValue::Credentials {
                    username: ua,
                    password: pa,
                },
                OptionValue::Credentials {
                    username: ub,
                    password: pb,
                },
            ) => ua == ub && pa.expose_secret() == pb.expose_secret(),
            _ => false,
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Flag(value)
    }
}

/// Name/value map handed to the transport on connect
///
/// Ordered so that logs and test assertions are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionOptions {
    entries: BTreeMap<String, OptionValue>,
}

impl ConnectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an option, returning the previous value
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        self.entries.insert(name.into(), value.into())
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.entries.insert(
            CREDENTIALS.to_string(),
            OptionValue::Credentials {
                username: username.into(),
                password,
            },
        );
        self
    }

    pub fn with_realm(self, realm: impl Into<String>) -> Self {
        self.with(SASL_REALM, realm.into())
    }

    pub fn with_remote_profile(self, profile: impl Into<String>) -> Self {
        self.with(PROFILES, profile.into())
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// True when the option is present and reads as an enabled switch
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).and_then(OptionValue::as_flag).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites() {
        let mut options = ConnectionOptions::new();
        assert!(options.insert(CHECK_STUB, "false").is_none());
        let previous = options.insert(CHECK_STUB, true);
        assert_eq!(previous, Some(OptionValue::Text("false".to_string())));
        assert!(options.is_enabled(CHECK_STUB));
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_text_flags() {
        let options = ConnectionOptions::new()
            .with("a", "TRUE")
            .with("b", "no")
            .with("c", false);
        assert!(options.is_enabled("a"));
        assert!(!options.is_enabled("b"));
        assert!(!options.is_enabled("c"));
        assert!(!options.is_enabled("missing"));
    }

    #[test]
    fn test_credentials_are_redacted() {
        let options = ConnectionOptions::new()
            .with_credentials("monitor", SecretString::from("s3cret".to_string()));
        let rendered = format!("{:?}", options);
        assert!(rendered.contains("monitor"));
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn test_sasl_options() {
        let options = ConnectionOptions::new()
            .with_realm("corp")
            .with_remote_profile("SASL/PLAIN");
        assert_eq!(options.get(SASL_REALM).and_then(OptionValue::as_text), Some("corp"));
        assert_eq!(
            options.get(PROFILES).and_then(OptionValue::as_text),
            Some("SASL/PLAIN")
        );
    }
}
