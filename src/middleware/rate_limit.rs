use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tracing::{debug, warn};

use crate::api::dtos::ErrorResponse;

/// Expired windows are dropped once every this many checks.
const SWEEP_EVERY: u64 = 1024;

#[derive(Clone)]
pub struct RateLimit {
    store: Arc<DashMap<String, RateLimitData>>,
    checks: Arc<AtomicU64>,
    max_requests: u32,
    window_seconds: i64,
}

#[derive(Debug, Clone)]
struct RateLimitData {
    count: u32,
    window_start: DateTime<Utc>,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            checks: Arc::new(AtomicU64::new(0)),
            max_requests,
            window_seconds,
        }
    }

    /// Counts one request from `key` and reports whether it is within the limit.
    pub fn check(&self, key: &str, now: DateTime<Utc>) -> bool {
        if (self.checks.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_EVERY == 0 {
            self.sweep(now);
        }

        let mut entry = self
            .store
            .entry(key.to_string())
            .or_insert_with(|| RateLimitData {
                count: 0,
                window_start: now,
            });
        let data = entry.value_mut();

        if now.signed_duration_since(data.window_start) >= Duration::seconds(self.window_seconds) {
            data.count = 0;
            data.window_start = now;
        }

        data.count += 1;
        data.count <= self.max_requests
    }

    /// Drops clients whose window has ended. Must not run while an entry
    /// guard is held.
    fn sweep(&self, now: DateTime<Utc>) {
        let window = Duration::seconds(self.window_seconds);
        let before = self.store.len();
        self.store.retain(|_, data| now.signed_duration_since(data.window_start) < window);
        let evicted = before.saturating_sub(self.store.len());
        debug!(evicted, "Swept rate limit windows");
    }
}

/// IP-based rate limiting middleware for the `/v1` routes.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(rate_limit): State<RateLimit>,
    req: Request,
    next: Next,
) -> Response {
    let ip = addr.ip().to_string();

    if !rate_limit.check(&ip, Utc::now()) {
        warn!(ip = %ip, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse {
                error: "Rate limit exceeded".to_string(),
                kind: "rate_limited".to_string(),
            }),
        )
            .into_response();
    }

    next.run(req).await
}
