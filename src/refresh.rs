//! Background maintenance loops
//!
//! Two independent periodic tasks run against the shared cache: the
//! refresher re-resolves stale entries that are still in use and deletes
//! ones idle past their window; the pruner sweeps entries past the hard
//! age bound. Neither talks to the selection path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error};

use crate::cache::DnsCache;
use crate::config::ResolverConfig;
use crate::resolve::Resolve;
use crate::stats::ResolverStats;

/// Spawn the refresh loop on its `background_scan` interval.
///
/// `scan_active` enforces one pass at a time across the whole scan: a tick
/// arriving while a pass still runs is dropped, not queued. The flag is
/// released only once every per-entry refresh of the pass has finished, so
/// refreshes for one host can never overlap across scans. The flag lives
/// with the loop, so a restarted refresher always begins unblocked.
pub(crate) fn spawn_refresher(
    config: ResolverConfig,
    cache: Arc<DnsCache>,
    resolver: Arc<dyn Resolve>,
    stats: Arc<ResolverStats>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        // interval panics on a zero period
        let period = config.background_scan.max(Duration::from_millis(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let scan_active = AtomicBool::new(false);
        loop {
            ticker.tick().await;
            if scan_active.swap(true, Ordering::AcqRel) {
                debug!("refresh pass still running, dropping tick");
                continue;
            }
            refresh_pass(&config, &cache, &resolver, &stats).await;
            scan_active.store(false, Ordering::Release);
        }
    })
}

/// One pass over the cache: skip fresh entries, delete idle ones, and
/// re-resolve the stale-but-active rest concurrently.
async fn refresh_pass(
    config: &ResolverConfig,
    cache: &Arc<DnsCache>,
    resolver: &Arc<dyn Resolve>,
    stats: &Arc<ResolverStats>,
) {
    let now = Instant::now();
    let mut refreshes = Vec::new();

    for (host, updated_at, last_used_at) in cache.scan() {
        if updated_at + config.dns_ttl > now {
            continue; // still fresh
        }
        if last_used_at + config.idle_ttl <= now {
            cache.remove(&host);
            stats.record_idle_eviction();
            debug!(host = %host, "idle entry deleted");
            continue;
        }

        let cache = Arc::clone(cache);
        let resolver = Arc::clone(resolver);
        let stats = Arc::clone(stats);
        // Detached so an aborted scan never cancels an in-flight
        // resolution; the write-back still lands.
        refreshes.push(tokio::spawn(async move {
            match resolver.resolve(&host).await {
                Ok(ips) if ips.is_empty() => {
                    stats.record_error(format!("empty resolution for {host}"));
                    error!(host = %host, "background refresh returned no addresses");
                }
                Ok(ips) => {
                    if cache.refresh(&host, ips) {
                        stats.record_refresh();
                        debug!(host = %host, "entry refreshed");
                    }
                }
                Err(err) => {
                    // Best effort: the entry keeps its last-known-good
                    // addresses.
                    stats.record_error(err.to_string());
                    error!(host = %host, error = %err, "background refresh failed");
                }
            }
        }));
    }

    for refresh in refreshes {
        if refresh.await.is_err() {
            debug!("refresh task aborted or panicked");
        }
    }
}

/// Spawn the prune loop: every `idle_ttl`, sweep entries past the hard age
/// bound. A backstop independent of the refresher.
pub(crate) fn spawn_pruner(period: Duration, cache: Arc<DnsCache>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = period.max(Duration::from_millis(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let removed = cache.sweep_expired();
            if removed > 0 {
                debug!(removed, "pruned hard-expired entries");
            }
        }
    })
}
