//! jmxlink Connect: client-side session establishment for remote JMX servers
//!
//! This crate turns a service URL, a set of connection options and a
//! "registry is TLS-protected" flag into a live management session.
//!
//! # Architecture
//!
//! - **validator**: up-front service URL checks with no network I/O
//! - **Connector**: picks the direct or secure-registry path and runs one attempt
//! - **StubCache**: keeps registry-resolved stubs so reconnects skip the lookup
//! - **Session**: the caller-owned handle returned on success
//!
//! The wire itself is behind [`jmxlink_interface::RemoteTransport`].
//!
//! # Example
//!
//! ```rust,no_run
//! use jmxlink_connect::{CachePolicy, Connector, StubCache};
//! use jmxlink_interface::{ConnectionOptions, RemoteTransport};
//! use std::sync::Arc;
//!
//! async fn example(transport: Arc<dyn RemoteTransport>) -> Result<(), Box<dyn std::error::Error>> {
//!     let url = "service:jmx:rmi:///jndi/rmi://10.0.0.5:9999/jmxrmi";
//!     jmxlink_connect::validate(url, false)?;
//!
//!     let connector = Connector::new(transport)
//!         .with_stub_cache(Arc::new(StubCache::new(CachePolicy::Keyed)));
//!     let session = connector.connect(url, ConnectionOptions::new(), false).await?;
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

pub mod connector;
pub mod error;
pub mod session;
pub mod stub_cache;
pub mod validator;

pub use connector::{Connector, DEFAULT_LOOKUP_NAME};
pub use error::ConnectError;
pub use session::{ConnectRoute, Session};
pub use stub_cache::{CachePolicy, StubCache};
pub use validator::validate;
