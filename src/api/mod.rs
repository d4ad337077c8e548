// src/api/mod.rs - HTTP and WebSocket transport

pub mod handlers;
pub mod rate_limit;
pub mod socket;
pub mod types;
pub mod validation;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::core::ConversationOrchestrator;
use crate::infra::config::ServerConfig;
use rate_limit::{rate_limit_middleware, RateLimiter};
use validation::MessageValidator;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<ConversationOrchestrator>,
    pub validator: Arc<MessageValidator>,
}

impl ApiState {
    pub fn new(orchestrator: Arc<ConversationOrchestrator>, config: &ServerConfig) -> Self {
        Self {
            orchestrator,
            validator: Arc::new(MessageValidator::new(config.max_message_chars)),
        }
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match origin.parse::<HeaderValue>() {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            tracing::warn!("Invalid CORS origin '{}', cross-origin requests disabled", origin);
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState, config: &ServerConfig) -> Router {
    let limits = &config.rate_limit;
    let api_limiter = RateLimiter::api(
        limits.api_max_requests,
        Duration::from_secs(limits.api_window_secs),
    );
    let chat_limiter = RateLimiter::chat(
        limits.chat_max_requests,
        Duration::from_secs(limits.chat_window_secs),
    );

    Router::new()
        .route(
            "/api/chat",
            post(handlers::chat).layer(middleware::from_fn_with_state(
                chat_limiter,
                rate_limit_middleware,
            )),
        )
        .route("/api/health", get(handlers::health))
        .route("/api/ws", get(socket::upgrade))
        .layer(middleware::from_fn_with_state(
            api_limiter,
            rate_limit_middleware,
        ))
        .layer(cors_layer(&config.cors_origin))
        .with_state(state)
}

/// Serve the API until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: ApiState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let router = build_router(state, config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("API server listening on http://{addr}");
    tracing::info!("Allowed origin: {}", config.cors_origin);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;
    Ok(())
}
