// src/api/rate_limit.rs - Fixed-window rate limiting per client

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::types::ErrorResponse;

/// Stale windows are pruned once the table grows past this.
const PRUNE_THRESHOLD: usize = 1024;

struct Window {
    started: Instant,
    count: u32,
}

/// Allows `max` requests per client per `window`.
#[derive(Clone)]
pub struct RateLimiter {
    max: u32,
    window: Duration,
    message: &'static str,
    clients: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration, message: &'static str) -> Self {
        Self {
            max,
            window,
            message,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Limiter for every `/api/` route.
    pub fn api(max: u32, window: Duration) -> Self {
        Self::new(
            max,
            window,
            "Çok fazla istek gönderdiniz. Lütfen daha sonra tekrar deneyin.",
        )
    }

    /// Tighter limiter for chat messages.
    pub fn chat(max: u32, window: Duration) -> Self {
        Self::new(max, window, "Çok hızlı mesaj gönderiyorsunuz. Lütfen bekleyin.")
    }

    /// Count a request from `client`. Returns false once over the limit.
    pub fn try_acquire(&self, client: &str) -> bool {
        self.try_acquire_at(client, Instant::now())
    }

    fn try_acquire_at(&self, client: &str, now: Instant) -> bool {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);

        if clients.len() > PRUNE_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = clients.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count += 1;
        entry.count <= self.max
    }
}

/// Client key: the `X-Forwarded-For` entry appended by the one trusted
/// proxy (the last one), else the peer address. Earlier entries are
/// client-supplied and ignored.
fn client_key(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.rsplit(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".into())
}

/// Axum middleware that enforces the limiter passed as state.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(&req);
    if limiter.try_acquire(&client) {
        next.run(req).await
    } else {
        tracing::debug!(client = %client, "Rate limit exceeded");
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse {
                error: limiter.message.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_max() {
        let rl = RateLimiter::chat(3, Duration::from_secs(60));
        let now = Instant::now();
        assert!(rl.try_acquire_at("a", now));
        assert!(rl.try_acquire_at("a", now));
        assert!(rl.try_acquire_at("a", now));
        assert!(!rl.try_acquire_at("a", now));
    }

    #[test]
    fn test_clients_are_independent() {
        let rl = RateLimiter::chat(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(rl.try_acquire_at("a", now));
        assert!(!rl.try_acquire_at("a", now));
        assert!(rl.try_acquire_at("b", now));
    }

    #[test]
    fn test_window_resets() {
        let rl = RateLimiter::api(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(rl.try_acquire_at("a", now));
        assert!(!rl.try_acquire_at("a", now + Duration::from_secs(30)));
        assert!(rl.try_acquire_at("a", now + Duration::from_secs(61)));
    }

    #[test]
    fn test_client_key_uses_proxy_appended_entry() {
        let req = Request::builder()
            .header("x-forwarded-for", "6.6.6.6, 203.0.113.7")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(client_key(&req), "203.0.113.7");
    }

    #[test]
    fn test_client_key_single_forwarded_entry() {
        let req = Request::builder()
            .header("x-forwarded-for", " 203.0.113.7 ")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(client_key(&req), "203.0.113.7");
    }

    #[test]
    fn test_client_key_falls_back_to_peer() {
        let mut req = Request::builder().body(axum::body::Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([198, 51, 100, 4], 5000))));
        assert_eq!(client_key(&req), "198.51.100.4");
    }

    #[test]
    fn test_client_key_without_info() {
        let req = Request::builder().body(axum::body::Body::empty()).unwrap();
        assert_eq!(client_key(&req), "unknown");
    }
}
