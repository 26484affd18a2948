//! Shared test support: a scripted resolver standing in for real DNS.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use revolv::{Resolve, ResolverError, Resolving};

/// Serves canned address lists and counts lookups. Hosts without an
/// answer fail the way a real lookup would.
#[derive(Clone, Default)]
pub struct ScriptedResolver {
    answers: Arc<Mutex<HashMap<String, Vec<IpAddr>>>>,
    lookups: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the address list returned for `host`.
    pub fn answer(&self, host: &str, ips: &[&str]) {
        let parsed = ips.iter().map(|ip| ip.parse().expect("test ip")).collect();
        self.answers
            .lock()
            .expect("answers lock")
            .insert(host.to_string(), parsed);
    }

    /// Make subsequent lookups for `host` fail.
    pub fn forget(&self, host: &str) {
        self.answers.lock().expect("answers lock").remove(host);
    }

    /// Total lookups served, successes and failures alike.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Resolve for ScriptedResolver {
    fn resolve(&self, host: &str) -> Resolving {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let answer = self.answers.lock().expect("answers lock").get(host).cloned();
        let host = host.to_string();
        Box::pin(async move {
            match answer {
                Some(ips) => Ok(ips),
                None => Err(ResolverError::lookup(
                    host,
                    io::Error::new(io::ErrorKind::NotFound, "no scripted answer"),
                )),
            }
        })
    }
}
