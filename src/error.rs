/*!
 * Error types for jmxlink
 */

use jmxlink_connect::ConnectError;
use jmxlink_interface::TransportError;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, JmxLinkError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_CONNECT: i32 = 1;
pub const EXIT_FATAL: i32 = 2;

#[derive(Debug)]
pub enum JmxLinkError {
    /// Configuration error
    Config(String),

    /// Service URL validation or connection failure
    Connect(ConnectError),

    /// I/O error
    Io(io::Error),

    /// Generic error with message
    Other(String),
}

impl JmxLinkError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_fatal() {
            EXIT_FATAL
        } else {
            EXIT_CONNECT
        }
    }

    /// Check if this error is fatal (retrying the same input cannot help)
    pub fn is_fatal(&self) -> bool {
        match self {
            JmxLinkError::Config(_) => true,
            JmxLinkError::Connect(e) => e.is_malformed_endpoint(),
            JmxLinkError::Io(_) => false,
            JmxLinkError::Other(_) => false,
        }
    }

    /// Check if this error is transient (temporary, worth retrying)
    pub fn is_transient(&self) -> bool {
        match self {
            JmxLinkError::Connect(e) => match e.transport_error() {
                Some(TransportError::Io(io_err)) => Self::is_io_transient(io_err),
                // The agent may not have bound its server yet
                Some(TransportError::NotBound(_)) => true,
                _ => false,
            },
            JmxLinkError::Io(io_err) => Self::is_io_transient(io_err),
            _ => false,
        }
    }

    fn is_io_transient(io_err: &io::Error) -> bool {
        use io::ErrorKind::*;
        matches!(
            io_err.kind(),
            ConnectionRefused
                | ConnectionReset
                | ConnectionAborted
                | NotConnected
                | BrokenPipe
                | TimedOut
                | Interrupted
                | WouldBlock
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            JmxLinkError::Config(_) => ErrorCategory::Configuration,
            JmxLinkError::Connect(e) => match e.transport_error() {
                None => ErrorCategory::Validation,
                Some(TransportError::Io(_)) => ErrorCategory::IoError,
                Some(TransportError::Security(_)) | Some(TransportError::Handshake(_)) => {
                    ErrorCategory::Security
                }
                Some(TransportError::NotBound(_)) | Some(TransportError::Protocol(_)) => {
                    ErrorCategory::Network
                }
            },
            JmxLinkError::Io(_) => ErrorCategory::IoError,
            JmxLinkError::Other(_) => ErrorCategory::Unknown,
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Service URL validation errors
    Validation,
    /// Configuration errors
    Configuration,
    /// I/O operation errors
    IoError,
    /// Registry and protocol errors
    Network,
    /// Authentication and stub verification errors
    Security,
    /// Uncategorized errors
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::IoError => write!(f, "io"),
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Security => write!(f, "security"),
            ErrorCategory::Unknown => write!(f, "unknown"),
        }
    }
}

impl fmt::Display for JmxLinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JmxLinkError::Config(msg) => write!(f, "Configuration error: {}", msg),
            JmxLinkError::Connect(err) => write!(f, "{}", err),
            JmxLinkError::Io(err) => write!(f, "I/O error: {}", err),
            JmxLinkError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for JmxLinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JmxLinkError::Connect(err) => Some(err),
            JmxLinkError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConnectError> for JmxLinkError {
    fn from(err: ConnectError) -> Self {
        JmxLinkError::Connect(err)
    }
}

impl From<io::Error> for JmxLinkError {
    fn from(err: io::Error) -> Self {
        JmxLinkError::Io(err)
    }
}

impl From<serde_json::Error> for JmxLinkError {
    fn from(err: serde_json::Error) -> Self {
        JmxLinkError::Other(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jmxlink_interface::AddressError;

    fn connection_error(source: TransportError) -> JmxLinkError {
        JmxLinkError::Connect(ConnectError::Connection {
            target: "myhost:9999".to_string(),
            source,
        })
    }

    #[test]
    fn test_fatal_errors() {
        assert!(JmxLinkError::Config("test".to_string()).is_fatal());
        let malformed: JmxLinkError =
            ConnectError::from(AddressError::MissingPrefix("x".to_string())).into();
        assert!(malformed.is_fatal());
        assert_eq!(malformed.exit_code(), EXIT_FATAL);
        assert_eq!(malformed.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_connection_errors_are_not_fatal() {
        let err = connection_error(TransportError::NotBound("jmxrmi".to_string()));
        assert!(!err.is_fatal());
        assert!(err.is_transient());
        assert_eq!(err.exit_code(), EXIT_CONNECT);
        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[test]
    fn test_transient_io() {
        let refused = connection_error(TransportError::Io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "refused",
        )));
        assert!(refused.is_transient());
        assert_eq!(refused.category(), ErrorCategory::IoError);

        let denied = connection_error(TransportError::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "denied",
        )));
        assert!(!denied.is_transient());
    }

    #[test]
    fn test_security_category() {
        let err = connection_error(TransportError::Handshake("bad credentials".to_string()));
        assert_eq!(err.category(), ErrorCategory::Security);
        assert!(!err.is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = JmxLinkError::Config("password without username".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: password without username"
        );
        assert_eq!(ErrorCategory::Security.to_string(), "security");
    }
}
