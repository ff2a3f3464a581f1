//! Fixed-window per-client request limiting.
//!
//! One counter per client id, reset in place whenever its window lapses.
//! Entries are never removed, so the map grows with the number of distinct
//! clients seen over the process lifetime.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use dashmap::DashMap;

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window counter map. The dashmap shard lock covers each
/// read-modify-write, so concurrent requests for one client never lose an
/// increment.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    hits: Arc<DashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            hits: Arc::new(DashMap::new()),
        }
    }

    /// Admit or reject a request from `client`. A rejected request still
    /// counts toward the current window.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    /// `check` with an explicit clock, so window expiry is testable.
    pub fn check_at(&self, client: &str, now: Instant) -> bool {
        let mut entry = self
            .hits
            .entry(client.to_string())
            .or_insert_with(|| Window {
                started: now,
                count: 0,
            });
        if now.saturating_duration_since(entry.started) > self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count += 1;
        entry.count <= self.limit
    }
}

/// Client identity for limiting: first `x-forwarded-for` hop, else the peer
/// address, else a shared fallback bucket.
pub fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(ip) = value.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return ip.to_string();
                }
            }
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "anon".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn admits_up_to_the_limit() {
        let limiter = RateLimiter::new(60, Duration::from_secs(60));
        let now = Instant::now();
        for i in 0..60 {
            assert!(limiter.check_at("1.2.3.4", now), "request {} rejected", i + 1);
        }
        assert!(!limiter.check_at("1.2.3.4", now), "request 61 admitted");
    }

    #[test]
    fn rejection_persists_within_the_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("c", now));
        assert!(limiter.check_at("c", now));
        assert!(!limiter.check_at("c", now));
        assert!(!limiter.check_at("c", now + Duration::from_secs(30)));
    }

    #[test]
    fn window_lapse_readmits() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();
        for _ in 0..3 {
            limiter.check_at("c", now);
        }
        assert!(!limiter.check_at("c", now));
        assert!(limiter.check_at("c", now + Duration::from_secs(61)));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        // Expiry requires strictly more than one window to have elapsed.
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("c", now));
        assert!(!limiter.check_at("c", now + Duration::from_secs(60)));
    }

    #[test]
    fn clients_are_limited_independently() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("a", now));
        assert!(!limiter.check_at("a", now));
        assert!(limiter.check_at("b", now));
    }

    #[test]
    fn client_id_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 5.6.7.8"),
        );
        let peer = "9.9.9.9:1234".parse().ok();
        assert_eq!(client_id(&headers, peer), "1.2.3.4");
    }

    #[test]
    fn client_id_falls_back_to_peer_address() {
        let headers = HeaderMap::new();
        let peer = "9.9.9.9:1234".parse().ok();
        assert_eq!(client_id(&headers, peer), "9.9.9.9");
    }

    #[test]
    fn client_id_falls_back_to_anon() {
        let headers = HeaderMap::new();
        assert_eq!(client_id(&headers, None), "anon");
    }
}
