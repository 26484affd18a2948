//! Resolver configuration
//!
//! Tunables for the cache entry lifecycle: refresh TTL, hard-expiry grace,
//! idle eviction, scan cadence, and capacity. All durations come in
//! milliseconds on the environment surface.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable disabling interception entirely.
pub const ENV_DISABLE: &str = "REVOLV_DNS_DISABLE";
/// Environment variable for [`ResolverConfig::dns_ttl`] in milliseconds.
pub const ENV_TTL_MS: &str = "REVOLV_DNS_TTL_MS";
/// Environment variable for [`ResolverConfig::grace_expire_multiplier`].
pub const ENV_EXPIRE_MULTIPLIER: &str = "REVOLV_DNS_EXPIRE_MULTIPLIER";
/// Environment variable for [`ResolverConfig::idle_ttl`] in milliseconds.
pub const ENV_IDLE_TTL_MS: &str = "REVOLV_DNS_IDLE_TTL_MS";
/// Environment variable for [`ResolverConfig::background_scan`] in milliseconds.
pub const ENV_BACKGROUND_SCAN_MS: &str = "REVOLV_DNS_BACKGROUND_SCAN_MS";
/// Environment variable for [`ResolverConfig::cache_size`].
pub const ENV_CACHE_SIZE: &str = "REVOLV_DNS_CACHE_SIZE";

/// DNS cache and refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Bypass request interception entirely.
    pub disabled: bool,
    /// How long an actively used entry stays fresh before the background
    /// refresher re-resolves it.
    pub dns_ttl: Duration,
    /// Multiplier over `dns_ttl` giving the hard maximum age an entry may
    /// be served beyond its last write.
    pub grace_expire_multiplier: u32,
    /// How long an entry may go unused before it is deleted instead of
    /// refreshed. Also the prune-sweep interval.
    pub idle_ttl: Duration,
    /// How frequently the background refresher scans the cache.
    pub background_scan: Duration,
    /// Maximum number of cached entries.
    pub cache_size: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            dns_ttl: Duration::from_secs(5),
            grace_expire_multiplier: 2,
            idle_ttl: Duration::from_secs(600),
            background_scan: Duration::from_millis(2400),
            cache_size: 100,
        }
    }
}

impl ResolverConfig {
    /// Build a configuration from `REVOLV_DNS_*` environment variables,
    /// falling back to defaults for absent or malformed values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            disabled: flag(env::var(ENV_DISABLE).ok()),
            dns_ttl: millis(env::var(ENV_TTL_MS).ok()).unwrap_or(defaults.dns_ttl),
            grace_expire_multiplier: number(env::var(ENV_EXPIRE_MULTIPLIER).ok())
                .unwrap_or(defaults.grace_expire_multiplier),
            idle_ttl: millis(env::var(ENV_IDLE_TTL_MS).ok()).unwrap_or(defaults.idle_ttl),
            background_scan: millis(env::var(ENV_BACKGROUND_SCAN_MS).ok())
                .unwrap_or(defaults.background_scan),
            cache_size: number(env::var(ENV_CACHE_SIZE).ok()).unwrap_or(defaults.cache_size),
        }
    }

    /// Hard maximum age an entry may be served since its last write.
    pub fn max_age(&self) -> Duration {
        self.dns_ttl * self.grace_expire_multiplier
    }
}

fn flag(raw: Option<String>) -> bool {
    matches!(raw.as_deref(), Some("true") | Some("1"))
}

fn millis(raw: Option<String>) -> Option<Duration> {
    raw?.trim().parse().ok().map(Duration::from_millis)
}

fn number<T: std::str::FromStr>(raw: Option<String>) -> Option<T> {
    raw?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ResolverConfig::default();
        assert!(!config.disabled);
        assert_eq!(config.dns_ttl, Duration::from_secs(5));
        assert_eq!(config.grace_expire_multiplier, 2);
        assert_eq!(config.idle_ttl, Duration::from_secs(600));
        assert_eq!(config.background_scan, Duration::from_millis(2400));
        assert_eq!(config.cache_size, 100);
    }

    #[test]
    fn max_age_is_ttl_times_multiplier() {
        let config = ResolverConfig {
            dns_ttl: Duration::from_millis(1000),
            grace_expire_multiplier: 2,
            ..ResolverConfig::default()
        };
        assert_eq!(config.max_age(), Duration::from_millis(2000));
    }

    #[test]
    fn flag_parsing() {
        assert!(flag(Some("true".into())));
        assert!(flag(Some("1".into())));
        assert!(!flag(Some("false".into())));
        assert!(!flag(Some("yes".into())));
        assert!(!flag(None));
    }

    #[test]
    fn millis_parsing() {
        assert_eq!(millis(Some("2500".into())), Some(Duration::from_millis(2500)));
        assert_eq!(millis(Some(" 10 ".into())), Some(Duration::from_millis(10)));
        assert_eq!(millis(Some("nope".into())), None);
        assert_eq!(millis(None), None);
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = ResolverConfig::default();
        let json = serde_json::to_string(&config).expect("serialize");
        let back: ResolverConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.cache_size, config.cache_size);
        assert_eq!(back.dns_ttl, config.dns_ttl);
    }
}
