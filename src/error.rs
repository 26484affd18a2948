//! DNS resolution error types

use std::io;

/// Errors surfaced by address selection and interception.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("invalid hostname: {0}")]
    InvalidHostname(String),
    #[error("no addresses found for {0}")]
    NoAddresses(String),
    #[error("DNS lookup failed for {host}")]
    Lookup {
        host: String,
        #[source]
        source: io::Error,
    },
}

impl ResolverError {
    /// Create a new `InvalidHostname` error
    pub fn invalid_hostname(msg: impl Into<String>) -> Self {
        Self::InvalidHostname(msg.into())
    }

    /// Create a new `Lookup` error
    pub fn lookup(host: impl Into<String>, source: io::Error) -> Self {
        Self::Lookup {
            host: host.into(),
            source,
        }
    }
}
