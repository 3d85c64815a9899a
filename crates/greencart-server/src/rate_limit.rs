//! Fixed-window rate limiting per client IP

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::ApiError, AppState};

/// Buckets are pruned once the table grows past this size
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

pub struct RateLimiter {
    name: &'static str,
    max: u32,
    window: Duration,
    message: String,
    buckets: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(name: &'static str, max: u32, window: Duration, message: impl Into<String>) -> Self {
        Self {
            name,
            max,
            window,
            message: message.into(),
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Limiter for all `/api` routes
    pub fn api(max: u32, window: Duration) -> Self {
        Self::new(
            "api",
            max,
            window,
            "Too many requests, please try again later",
        )
    }

    /// Stricter limiter for login and registration
    pub fn auth(max: u32, window: Duration) -> Self {
        Self::new(
            "auth",
            max,
            window,
            format!(
                "Too many authentication attempts, please try again after {}",
                describe_window(window)
            ),
        )
    }

    pub fn check(&self, key: &str) -> Decision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Decision {
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);

        if buckets.len() > PRUNE_THRESHOLD {
            let window = self.window;
            buckets.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = buckets.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.max {
            let elapsed = now.duration_since(entry.started);
            return Decision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        entry.count += 1;
        Decision::Allowed {
            remaining: self.max - entry.count,
        }
    }
}

fn describe_window(window: Duration) -> String {
    let secs = window.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        let minutes = secs / 60;
        format!("{minutes} minute{}", if minutes == 1 { "" } else { "s" })
    } else {
        format!("{secs} seconds")
    }
}

/// Client address: first `X-Forwarded-For` hop, then `X-Real-IP`,
/// then the socket peer when known
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn request_ip(request: &Request) -> String {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    client_ip(request.headers(), peer)
}

async fn enforce(limiter: &RateLimiter, request: Request, next: Next) -> Response {
    let ip = request_ip(&request);

    match limiter.check(&ip) {
        Decision::Allowed { .. } => next.run(request).await,
        Decision::Limited { retry_after } => {
            tracing::warn!(
                target: "greencart::security",
                limiter = limiter.name,
                ip = %ip,
                path = %request.uri().path(),
                "Rate limit exceeded"
            );

            let mut response = ApiError::new(
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMIT_EXCEEDED",
                limiter.message.clone(),
            )
            .into_response();

            let secs = retry_after.as_secs().max(1);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
    }
}

pub async fn limit_api(State(state): State<AppState>, request: Request, next: Next) -> Response {
    enforce(&state.api_limiter, request, next).await
}

pub async fn limit_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    enforce(&state.auth_limiter, request, next).await
}
