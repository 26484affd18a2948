//! # revolv
//!
//! Caching DNS resolver with round-robin address rotation for HTTP
//! clients.
//!
//! Resolves a hostname once, then hands out the returned addresses in
//! rotating order across repeated lookups. A background refresher keeps
//! actively used entries fresh and deletes entries that have gone idle; a
//! periodic pruner sweeps anything past the hard age bound. The point is
//! to avoid a DNS round-trip on every outbound request and to spread load
//! across every backend address a hostname resolves to.
//!
//! ## Features
//!
//! - **Round-robin selection** across all addresses returned for a host
//! - **Bounded cache** with write-recency eviction and a hard age ceiling
//! - **Background refresh** of stale entries still in active use
//! - **Idle eviction** of entries nobody asks for anymore
//! - **Request interception** that rewrites targets to cached addresses
//!   while preserving the virtual host
//! - **Pluggable resolution** through the [`Resolve`] trait
//!
//! ## Usage
//!
//! ```no_run
//! use revolv::{CachedResolver, ResolverConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), revolv::ResolverError> {
//!     let resolver = CachedResolver::new(ResolverConfig::from_env());
//!     resolver.start_background_refresh();
//!     resolver.start_periodic_cache_prune();
//!
//!     let ip = resolver.get_address("example.com").await?;
//!     println!("next backend: {ip}");
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]

pub mod cache;
pub mod config;
pub mod core;
pub mod error;
mod intercept;
mod refresh;
pub mod resolve;
pub mod stats;
pub mod validation;

pub use crate::cache::{DnsCache, DnsEntry};
pub use crate::config::ResolverConfig;
pub use crate::core::CachedResolver;
pub use crate::error::ResolverError;
pub use crate::resolve::{GaiResolver, Resolve, Resolving};
pub use crate::stats::{LastError, ResolverStats, StatsSnapshot};
pub use crate::validation::validate_hostname;
