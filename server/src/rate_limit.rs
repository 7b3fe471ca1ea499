use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;

/// Fixed-point scale for token counts, matching bog-core's rate limiter:
/// tokens are stored as `u64` scaled by 1000 so fractional refill amounts
/// (calls_per_second < 1, or sub-second elapsed time) don't round to zero.
const SCALE: f64 = 1000.0;

struct Bucket {
    tokens: AtomicU64,
    last_refill: parking_lot::Mutex<Instant>,
}

impl Bucket {
    fn new(capacity: u64) -> Self {
        Self {
            tokens: AtomicU64::new(capacity * SCALE as u64),
            last_refill: parking_lot::Mutex::new(Instant::now()),
        }
    }

    fn refill(&self, calls_per_second: u64) {
        let mut last_refill = self.last_refill.lock();
        let elapsed = last_refill.elapsed();
        if elapsed < Duration::from_millis(10) {
            return;
        }
        let capacity = calls_per_second * SCALE as u64;
        let replenished = (elapsed.as_secs_f64() * calls_per_second as f64 * SCALE) as u64;
        if replenished > 0 {
            self.tokens
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |tokens| {
                    Some(tokens.saturating_add(replenished).min(capacity))
                })
                .ok();
            *last_refill = Instant::now();
        }
    }

    fn allow(&self, calls_per_second: u64) -> bool {
        self.refill(calls_per_second);
        self.tokens
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |tokens| {
                if tokens >= SCALE as u64 {
                    Some(tokens - SCALE as u64)
                } else {
                    None
                }
            })
            .is_ok()
    }
}

/// Per-IP token bucket rate limiter, adapted from the bog-core risk module's
/// process-global limiter: one bucket per remote address instead of one for
/// the whole process. `allow_load_test` mirrors the spec's documented load
/// testing bypass via a designated header.
#[derive(Clone)]
pub struct RateLimitLayer {
    buckets: Arc<DashMap<IpAddr, Arc<Bucket>>>,
    calls_per_second: u64,
    allow_load_test: bool,
}

const LOAD_TEST_HEADER: &str = "x-dlob-load-test";

impl RateLimitLayer {
    pub fn new(calls_per_second: u64, allow_load_test: bool) -> Self {
        Self {
            buckets: Arc::new(DashMap::new()),
            calls_per_second: calls_per_second.max(1),
            allow_load_test,
        }
    }

    fn allow(&self, ip: IpAddr) -> bool {
        let bucket = self
            .buckets
            .entry(ip)
            .or_insert_with(|| Arc::new(Bucket::new(self.calls_per_second)))
            .clone();
        bucket.allow(self.calls_per_second)
    }

    fn is_load_test(&self, headers: &HeaderMap) -> bool {
        self.allow_load_test && headers.contains_key(LOAD_TEST_HEADER)
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<RateLimitLayer>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    if limiter.is_load_test(request.headers()) || limiter.allow(addr.ip()) {
        next.run(request).await
    } else {
        (StatusCode::TOO_MANY_REQUESTS, "Too many requests").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_exhausts_then_refills() {
        let bucket = Bucket::new(1);
        assert!(bucket.allow(1));
        assert!(!bucket.allow(1));
        std::thread::sleep(Duration::from_millis(1100));
        assert!(bucket.allow(1));
    }

    #[test]
    fn separate_ips_get_separate_buckets() {
        let limiter = RateLimitLayer::new(1, false);
        let a: IpAddr = "127.0.0.1".parse().unwrap();
        let b: IpAddr = "127.0.0.2".parse().unwrap();
        assert!(limiter.allow(a));
        assert!(!limiter.allow(a));
        assert!(limiter.allow(b));
    }

    #[test]
    fn load_test_header_bypasses_limit() {
        let limiter = RateLimitLayer::new(1, true);
        let mut headers = HeaderMap::new();
        headers.insert(LOAD_TEST_HEADER, "1".parse().unwrap());
        assert!(limiter.is_load_test(&headers));
    }
}
