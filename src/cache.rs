//! Bounded DNS cache with hard expiry and write-recency eviction
//!
//! Stores one [`DnsEntry`] per hostname. Two independent rules bound the
//! store: a capacity limit that evicts the least-recently-written entry on
//! overflow, and a hard maximum age since last write, checked on every read
//! and enforced in bulk by [`DnsCache::sweep_expired`]. The refresh/idle
//! policy lives in the background refresher, not here.

use std::net::IpAddr;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

/// One cached resolution for a hostname.
///
/// `next_idx` increases monotonically and is taken modulo `ips.len()` at
/// selection time; it is never reset while the entry lives, so a
/// single-address list keeps counting too.
#[derive(Debug, Clone)]
pub struct DnsEntry {
    /// Resolved addresses, in resolver order. Non-empty once created.
    pub ips: Vec<IpAddr>,
    /// Round-robin cursor.
    pub next_idx: u64,
    /// Most recent address selection.
    pub last_used_at: Instant,
    /// Most recent successful resolution.
    pub updated_at: Instant,
}

impl DnsEntry {
    /// Build a freshly resolved entry with the rotation cursor at zero.
    pub fn new(ips: Vec<IpAddr>) -> Self {
        let now = Instant::now();
        Self {
            ips,
            next_idx: 0,
            last_used_at: now,
            updated_at: now,
        }
    }
}

/// Entry plus the cache-maintained write timestamp backing both the
/// hard-age rule and write-recency eviction.
#[derive(Debug)]
struct Slot {
    entry: DnsEntry,
    written_at: Instant,
}

/// Host → entry store enforcing the capacity and hard-age bounds.
#[derive(Debug)]
pub struct DnsCache {
    slots: DashMap<String, Slot>,
    capacity: usize,
    max_age: Duration,
}

impl DnsCache {
    pub fn new(capacity: usize, max_age: Duration) -> Self {
        Self {
            slots: DashMap::new(),
            capacity,
            max_age,
        }
    }

    /// Get a copy of the entry if present and not past the hard age bound.
    /// A hard-expired entry is removed as a side effect of the read.
    pub fn get(&self, host: &str) -> Option<DnsEntry> {
        match self.slots.get(host) {
            Some(slot) if slot.written_at.elapsed() > self.max_age => {}
            Some(slot) => return Some(slot.entry.clone()),
            None => return None,
        }
        self.slots.remove(host);
        debug!(host, "hard-expired entry dropped on read");
        None
    }

    /// Insert or replace an entry, refreshing its write timestamp. When a
    /// new key pushes the cache past capacity, the least-recently-written
    /// entry is evicted first.
    pub fn insert(&self, host: &str, entry: DnsEntry) {
        if !self.slots.contains_key(host) && self.slots.len() >= self.capacity {
            self.evict_oldest();
        }
        self.slots.insert(
            host.to_string(),
            Slot {
                entry,
                written_at: Instant::now(),
            },
        );
    }

    pub fn remove(&self, host: &str) {
        self.slots.remove(host);
    }

    /// Atomic hit path: under the entry's lock, touch `last_used_at`, pick
    /// `ips[next_idx % len]`, advance the cursor, and refresh the hard-age
    /// clock. Returns `None` if the host is absent or hard-expired.
    pub fn rotate(&self, host: &str) -> Option<IpAddr> {
        {
            let mut slot = self.slots.get_mut(host)?;
            if slot.written_at.elapsed() <= self.max_age {
                let now = Instant::now();
                let entry = &mut slot.entry;
                if entry.ips.is_empty() {
                    return None;
                }
                let ip = entry.ips[(entry.next_idx % entry.ips.len() as u64) as usize];
                entry.next_idx += 1;
                entry.last_used_at = now;
                slot.written_at = now;
                return Some(ip);
            }
        }
        self.slots.remove(host);
        debug!(host, "hard-expired entry dropped on read");
        None
    }

    /// Write back refreshed addresses, preserving the rotation cursor and
    /// usage timestamp. Returns `false` if the entry vanished in the
    /// meantime.
    pub fn refresh(&self, host: &str, ips: Vec<IpAddr>) -> bool {
        match self.slots.get_mut(host) {
            Some(mut slot) => {
                let now = Instant::now();
                slot.entry.ips = ips;
                slot.entry.updated_at = now;
                slot.written_at = now;
                true
            }
            None => false,
        }
    }

    /// Remove every entry past the hard age bound. Returns the number
    /// removed.
    pub fn sweep_expired(&self) -> usize {
        let mut removed = 0;
        self.slots.retain(|_, slot| {
            let keep = slot.written_at.elapsed() <= self.max_age;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Refresh-scan view: `(host, updated_at, last_used_at)` per entry,
    /// collected without holding any lock across the caller's awaits.
    pub fn scan(&self) -> Vec<(String, Instant, Instant)> {
        self.slots
            .iter()
            .map(|slot| {
                (
                    slot.key().clone(),
                    slot.value().entry.updated_at,
                    slot.value().entry.last_used_at,
                )
            })
            .collect()
    }

    pub fn clear(&self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn evict_oldest(&self) {
        let oldest = self
            .slots
            .iter()
            .min_by_key(|slot| slot.value().written_at)
            .map(|slot| slot.key().clone());
        if let Some(host) = oldest {
            self.slots.remove(&host);
            debug!(host = %host, "cache at capacity, dropped least-recently-written entry");
        }
    }
}
