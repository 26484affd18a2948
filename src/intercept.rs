//! Request interception
//!
//! The consumer side of address selection: rewrite an outbound request's
//! target to a cached address while the destination still sees the
//! intended virtual host. Built on explicit value semantics: the original
//! request is consumed and a new one returned, never mutated in place
//! behind the caller's back.

use std::net::IpAddr;

use http::header::HOST;
use http::uri::{Authority, PathAndQuery, Uri};
use http::{HeaderValue, Request};
use tracing::debug;
use url::{Host, Url};

use crate::core::CachedResolver;
use crate::error::ResolverError;
use crate::validation::validate_hostname;

impl CachedResolver {
    /// Pre-process an outbound request: substitute the target host with a
    /// selected address and preserve the original hostname as the `Host`
    /// header.
    ///
    /// Passes the request through untouched when the resolver is disabled,
    /// when there is no host to rewrite, or when the host is an IP literal
    /// or malformed (nothing to resolve, not an error). A failed lookup
    /// for a resolvable host propagates.
    pub async fn intercept<B>(&self, req: Request<B>) -> Result<Request<B>, ResolverError> {
        if self.config().disabled {
            return Ok(req);
        }
        let Some(host) = req.uri().host().map(str::to_owned) else {
            return Ok(req);
        };
        let bare = host.trim_start_matches('[').trim_end_matches(']');
        if bare.parse::<IpAddr>().is_ok() || validate_hostname(&host).is_err() {
            return Ok(req);
        }

        let ip = self.get_address(&host).await?;

        let mut uri_parts = req.uri().clone().into_parts();
        let authority = match (ip, req.uri().port_u16()) {
            (IpAddr::V6(v6), Some(port)) => format!("[{v6}]:{port}"),
            (IpAddr::V6(v6), None) => format!("[{v6}]"),
            (ip, Some(port)) => format!("{ip}:{port}"),
            (ip, None) => ip.to_string(),
        };
        let Ok(authority) = authority.parse::<Authority>() else {
            return Ok(req);
        };
        uri_parts.authority = Some(authority);
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        let Ok(uri) = Uri::from_parts(uri_parts) else {
            return Ok(req);
        };
        let Ok(host_header) = HeaderValue::from_str(&host) else {
            return Ok(req);
        };

        let (mut parts, body) = req.into_parts();
        parts.uri = uri;
        parts.headers.insert(HOST, host_header);
        debug!(host = %host, ip = %ip, "request target rewritten to cached address");
        Ok(Request::from_parts(parts, body))
    }

    /// URL-flavored variant of [`CachedResolver::intercept`] for callers
    /// that carry targets as [`Url`]s and manage headers themselves: the
    /// returned URL has its hostname replaced by a selected address.
    pub async fn resolve_url(&self, url: Url) -> Result<Url, ResolverError> {
        if self.config().disabled {
            return Ok(url);
        }
        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_owned(),
            // IP literal or no host at all: nothing to resolve
            _ => return Ok(url),
        };
        if validate_hostname(&host).is_err() {
            return Ok(url);
        }

        let ip = self.get_address(&host).await?;
        let mut resolved = url.clone();
        if resolved.set_ip_host(ip).is_err() {
            return Ok(url);
        }
        Ok(resolved)
    }
}
