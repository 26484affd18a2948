//! Resolver statistics and telemetry
//!
//! Atomic counters updated as a side effect of selection and maintenance,
//! exposed as a queryable snapshot.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use serde::Serialize;

/// Counters for cache and refresh activity.
#[derive(Debug, Default)]
pub struct ResolverStats {
    hits: AtomicU64,
    misses: AtomicU64,
    refreshes: AtomicU64,
    idle_evictions: AtomicU64,
    errors: AtomicU64,
    last_error: Mutex<Option<LastError>>,
}

/// The most recent resolution failure, with its wall-clock timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct LastError {
    pub message: String,
    pub at: SystemTime,
}

/// Point-in-time view of [`ResolverStats`].
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    /// Entries currently cached.
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub refreshes: u64,
    pub idle_evictions: u64,
    pub errors: u64,
    pub last_error: Option<LastError>,
}

impl ResolverStats {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_idle_eviction(&self) {
        self.idle_evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self, message: impl Into<String>) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        let mut last = self
            .last_error
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *last = Some(LastError {
            message: message.into(),
            at: SystemTime::now(),
        });
    }

    /// Get hit rate as percentage
    pub fn hit_rate(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        #[allow(clippy::cast_precision_loss)]
        let total = hits + self.misses.load(Ordering::Relaxed) as f64;

        if total > 0.0 { (hits / total) * 100.0 } else { 0.0 }
    }

    /// Get statistics snapshot
    pub fn snapshot(&self, entries: usize) -> StatsSnapshot {
        StatsSnapshot {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            idle_evictions: self.idle_evictions.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            last_error: self
                .last_error
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone(),
        }
    }

    /// Zero every counter and forget the last error.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.refreshes.store(0, Ordering::Relaxed);
        self.idle_evictions.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
        *self
            .last_error
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    }
}
