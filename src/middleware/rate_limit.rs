use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::error::ApiError;

/// Fixed-window request budget per caller IP. One instance guards the general
/// /api surface, a second tighter one guards login and register. The limiter
/// runs ahead of validation and auth, so an over-budget caller gets the same
/// 429 no matter what the payload looks like.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<String, Window>>,
    checks: Arc<AtomicU64>,
    limit: u32,
    period: Duration,
}

struct Window {
    started: Instant,
    count: u32,
}

/// Every this many checks, expired windows are dropped from the map.
const SWEEP_EVERY: u64 = 1024;

impl RateLimiter {
    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    pub fn new(limit: u32, period: Duration) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            checks: Arc::new(AtomicU64::new(0)),
            limit,
            period,
        }
    }

    /// Count one request for the key. Err carries the seconds left in the
    /// current window, used for the Retry-After hint.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        let now = Instant::now();
        // Without the sweep the map would grow with every distinct caller IP
        // ever seen; expired windows carry no state a fresh entry would not.
        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            let period = self.period;
            self.windows
                .retain(|_, w| now.duration_since(w.started) < period);
        }
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.period {
            entry.started = now;
            entry.count = 0;
        }
        entry.count += 1;
        if entry.count > self.limit {
            let elapsed = now.duration_since(entry.started);
            let remaining = self.period.saturating_sub(elapsed);
            Err(remaining.as_secs().max(1))
        } else {
            Ok(())
        }
    }
}

fn client_ip(req: &Request<Body>) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&req);
    match limiter.check(&ip) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => ApiError::RateLimited { retry_after }.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_enforced_per_key() {
        let limiter = RateLimiter::per_minute(2);
        assert!(limiter.check("1.2.3.4").is_ok());
        assert!(limiter.check("1.2.3.4").is_ok());
        assert!(limiter.check("1.2.3.4").is_err());
        // Other callers have their own window.
        assert!(limiter.check("5.6.7.8").is_ok());
    }

    #[test]
    fn window_resets_after_period() {
        let limiter = RateLimiter::new(1, Duration::from_millis(10));
        assert!(limiter.check("k").is_ok());
        assert!(limiter.check("k").is_err());
        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.check("k").is_ok());
    }

    #[test]
    fn expired_windows_are_evicted() {
        let limiter = RateLimiter::new(5, Duration::from_millis(5));
        for i in 0..1_000u32 {
            let _ = limiter.check(&format!("10.0.{}.{}", i / 256, i % 256));
        }
        assert_eq!(limiter.windows.len(), 1_000);

        std::thread::sleep(Duration::from_millis(10));
        // Enough fresh checks to cross the next sweep threshold.
        for i in 0..30u32 {
            let _ = limiter.check(&format!("fresh-{i}"));
        }
        assert!(
            limiter.windows.len() <= 30,
            "stale windows survived: {}",
            limiter.windows.len()
        );
    }

    #[test]
    fn retry_hint_is_at_least_one_second() {
        let limiter = RateLimiter::per_minute(1);
        limiter.check("k").unwrap();
        let retry = limiter.check("k").unwrap_err();
        assert!((1..=60).contains(&retry));
    }
}
