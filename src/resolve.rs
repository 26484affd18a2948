//! Hostname resolution trait and the system resolver
//!
//! [`Resolve`] is the single seam to the outside world: hostname in,
//! address list out. The cache and refresher layer on top of it, and tests
//! substitute scripted implementations through the same trait.

use std::future::Future;
use std::net::IpAddr;
use std::pin::Pin;

use tokio::net::lookup_host;
use tracing::debug;

use crate::error::ResolverError;

/// Future type returned by [`Resolve::resolve`].
pub type Resolving = Pin<Box<dyn Future<Output = Result<Vec<IpAddr>, ResolverError>> + Send>>;

/// Hostname → address-list lookup.
///
/// Implementations are stateless; callers own retry and caching policy.
pub trait Resolve: Send + Sync + 'static {
    fn resolve(&self, host: &str) -> Resolving;
}

/// System resolver backed by `tokio::net::lookup_host` (getaddrinfo).
#[derive(Debug, Default, Clone, Copy)]
pub struct GaiResolver;

impl GaiResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, host: &str) -> Resolving {
        let host = host.to_string();
        Box::pin(async move {
            let addrs = lookup_host((host.as_str(), 0u16))
                .await
                .map_err(|source| ResolverError::lookup(&host, source))?;

            // getaddrinfo repeats addresses across socket types; keep the
            // first occurrence of each, in resolver order.
            let mut ips: Vec<IpAddr> = Vec::new();
            for addr in addrs {
                let ip = addr.ip();
                if !ips.contains(&ip) {
                    ips.push(ip);
                }
            }
            if ips.is_empty() {
                return Err(ResolverError::NoAddresses(host));
            }
            debug!(host = %host, count = ips.len(), "resolved");
            Ok(ips)
        })
    }
}
