// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Per-peer ingress rate limit: a remote source IP may send again only after
/// `interval` has passed since its last accepted request. Transport policy,
/// not core policy — the Gossiper never sees a rejected request.
pub struct RateLimiter {
    interval: Duration,
    last_accept: Mutex<HashMap<IpAddr, Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accept: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` and records `now` as the last accept time if `source`
    /// may proceed; returns `false` without mutating state otherwise.
    pub fn check_and_record(&self, source: IpAddr, now: Instant) -> bool {
        let mut table = self.last_accept.lock().unwrap();
        match table.get(&source) {
            Some(last) if now.duration_since(*last) < self.interval => false,
            _ => {
                table.insert(source, now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_from_a_source_is_always_accepted() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        let ip: IpAddr = "127.0.0.1".parse().unwrap();
        assert!(limiter.check_and_record(ip, Instant::now()));
    }

    #[test]
    fn repeat_request_within_interval_is_rejected() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        let ip: IpAddr = "127.0.0.1".parse().unwrap();
        let t0 = Instant::now();
        assert!(limiter.check_and_record(ip, t0));
        assert!(!limiter.check_and_record(ip, t0 + Duration::from_millis(10)));
    }

    #[test]
    fn request_after_interval_elapses_is_accepted() {
        let limiter = RateLimiter::new(Duration::from_millis(10));
        let ip: IpAddr = "127.0.0.1".parse().unwrap();
        let t0 = Instant::now();
        assert!(limiter.check_and_record(ip, t0));
        assert!(limiter.check_and_record(ip, t0 + Duration::from_millis(20)));
    }

    #[test]
    fn distinct_sources_are_independent() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        let b: IpAddr = "10.0.0.2".parse().unwrap();
        let t0 = Instant::now();
        assert!(limiter.check_and_record(a, t0));
        assert!(limiter.check_and_record(b, t0));
    }
}
