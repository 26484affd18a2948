//! The cached resolver context
//!
//! [`CachedResolver`] owns the cache, the resolver seam, the statistics,
//! and both maintenance task handles. It is constructed once and passed by
//! reference wherever address selection is needed; dropping it stops the
//! maintenance loops.

use std::net::IpAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::{DnsCache, DnsEntry};
use crate::config::ResolverConfig;
use crate::error::ResolverError;
use crate::refresh::{spawn_pruner, spawn_refresher};
use crate::resolve::{GaiResolver, Resolve};
use crate::stats::{ResolverStats, StatsSnapshot};
use crate::validation::validate_hostname;

/// Caching, round-robin address selector for outbound requests.
pub struct CachedResolver {
    config: ResolverConfig,
    cache: Arc<DnsCache>,
    resolver: Arc<dyn Resolve>,
    stats: Arc<ResolverStats>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
    prune_task: Mutex<Option<JoinHandle<()>>>,
}

impl CachedResolver {
    /// Create a resolver over the system resolver (getaddrinfo).
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_resolver(config, GaiResolver::new())
    }

    /// Create a resolver over a custom [`Resolve`] implementation.
    pub fn with_resolver(config: ResolverConfig, resolver: impl Resolve) -> Self {
        let cache = Arc::new(DnsCache::new(config.cache_size, config.max_age()));
        Self {
            config,
            cache,
            resolver: Arc::new(resolver),
            stats: Arc::new(ResolverStats::default()),
            refresh_task: Mutex::new(None),
            prune_task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Select an address for `host`, round-robin across its resolved set.
    ///
    /// IP literals come back as-is without touching the cache. A cache hit
    /// rotates to the next address; a miss resolves, caches, and returns
    /// the first address. A miss-path resolution failure propagates and
    /// caches nothing.
    pub async fn get_address(&self, host: &str) -> Result<IpAddr, ResolverError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(ip); // nothing to resolve
        }
        validate_hostname(host)?;

        if let Some(ip) = self.cache.rotate(host) {
            self.stats.record_hit();
            return Ok(ip);
        }
        self.stats.record_miss();

        let ips = match self.resolver.resolve(host).await {
            Ok(ips) if ips.is_empty() => {
                let err = ResolverError::NoAddresses(host.to_string());
                self.stats.record_error(err.to_string());
                return Err(err);
            }
            Ok(ips) => ips,
            Err(err) => {
                self.stats.record_error(err.to_string());
                return Err(err);
            }
        };

        let mut entry = DnsEntry::new(ips);
        let ip = entry.ips[0];
        entry.next_idx = 1;
        self.cache.insert(host, entry);
        debug!(host = %host, ip = %ip, "cached fresh resolution");
        Ok(ip)
    }

    /// (Re)start the background refresh loop, canceling a previous one.
    ///
    /// Must be called within a tokio runtime.
    pub fn start_background_refresh(&self) {
        let mut slot = lock(&self.refresh_task);
        if let Some(old) = slot.take() {
            old.abort();
        }
        *slot = Some(spawn_refresher(
            self.config.clone(),
            Arc::clone(&self.cache),
            Arc::clone(&self.resolver),
            Arc::clone(&self.stats),
        ));
    }

    /// (Re)start the periodic prune loop, canceling a previous one.
    ///
    /// Must be called within a tokio runtime.
    pub fn start_periodic_cache_prune(&self) {
        let mut slot = lock(&self.prune_task);
        if let Some(old) = slot.take() {
            old.abort();
        }
        *slot = Some(spawn_pruner(self.config.idle_ttl, Arc::clone(&self.cache)));
    }

    /// Stop both maintenance loops. Resolutions already in flight complete
    /// and still write back their results.
    pub fn shutdown(&self) {
        if let Some(task) = lock(&self.refresh_task).take() {
            task.abort();
        }
        if let Some(task) = lock(&self.prune_task).take() {
            task.abort();
        }
    }

    /// Drop every cached entry and zero the statistics. The maintenance
    /// loops, if running, keep running.
    pub fn reset(&self) {
        self.cache.clear();
        self.stats.reset();
    }

    /// Current counters plus cache entry count.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.cache.len())
    }
}

impl Drop for CachedResolver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for CachedResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedResolver")
            .field("config", &self.config)
            .field("entries", &self.cache.len())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
