use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use time::OffsetDateTime;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{rate_limit, RateLimiter};
use crate::state::AppState;
use crate::{auth, chat, history, notifications, predict, weather};

const ENDPOINTS: &[&str] = &[
    "GET /health",
    "POST /api/register",
    "POST /api/login",
    "POST /api/logout",
    "GET /api/weather",
    "POST /api/predict",
    "POST /api/chat",
    "GET /api/notifications",
    "GET /api/profile",
    "GET /api/yield-history",
    "GET /api/weather-history",
    "GET /api/my-predictions",
    "GET /api/chat-history",
];

pub fn build_app(state: AppState) -> Router {
    let api_limiter = RateLimiter::per_minute(state.config.rate_limit.per_minute);
    let auth_limiter = RateLimiter::per_minute(state.config.rate_limit.auth_per_minute);

    // Login and register carry a second, tighter budget on top of the general
    // /api one.
    let credential_routes = auth::public_routes().layer(axum::middleware::from_fn_with_state(
        auth_limiter,
        rate_limit,
    ));

    let api = Router::new()
        .merge(credential_routes)
        .merge(auth::session_routes())
        .merge(weather::router())
        .merge(predict::router())
        .merge(chat::router())
        .merge(notifications::router())
        .merge(history::router())
        .layer(axum::middleware::from_fn_with_state(api_limiter, rate_limit));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    uptime: u64,
}

/// Process liveness plus store reachability: the process answers even when the
/// store is down, but reports itself degraded.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_up = state.stores.health.ping().await.is_ok();
    Json(HealthResponse {
        status: if database_up { "ok" } else { "degraded" },
        database: if database_up { "up" } else { "down" },
        timestamp: OffsetDateTime::now_utc(),
        uptime: state.uptime_secs(),
    })
}

#[derive(Debug, Serialize)]
struct NotFoundBody {
    success: bool,
    error: &'static str,
    endpoints: &'static [&'static str],
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            success: false,
            error: "Unknown route",
            endpoints: ENDPOINTS,
        }),
    )
}
