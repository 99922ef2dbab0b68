use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::state::AppState;
use crate::ws::handler as ws_handler;
use crate::{capsules, clock, polls, quotes, traditions, wishes};

/// GET / — Service banner with the endpoint map.
async fn service_banner() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "online",
        "service": "Wishwall API",
        "endpoints": ["/time", "/wishes", "/wish", "/ws", "/poll", "/quotes", "/traditions", "/capsule"],
    }))
}

/// Basic health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Build the full axum Router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Rate limiting on the submission endpoints, keyed by peer IP.
    // Uses PeerIpKeyExtractor which reads from ConnectInfo<SocketAddr>.
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(30)
            .finish()
            .expect("Failed to build governor config"),
    );
    let governor_limiter = governor_config.limiter().clone();

    // Background task to shed stale rate limiter state
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            governor_limiter.retain_recent();
        }
    });

    let submission_routes = Router::new()
        .route("/wish", post(wishes::routes::create_wish))
        .route("/poll/vote", post(polls::routes::vote))
        .route("/quotes", post(quotes::routes::create_quote))
        .route("/capsule", post(capsules::routes::seal_capsule))
        .layer(GovernorLayer {
            config: governor_config,
        });

    // Note: /capsule/stats must resolve ahead of /capsule/{id}; axum
    // prefers the static segment, so both can be registered here.
    let read_routes = Router::new()
        .route("/", get(service_banner))
        .route("/time", get(clock::get_time))
        .route("/wishes", get(wishes::routes::recent_wishes))
        .route("/poll", get(polls::routes::get_poll))
        .route("/quotes", get(quotes::routes::list_quotes))
        .route("/traditions", get(traditions::routes::list_traditions))
        .route("/capsule/stats", get(capsules::routes::capsule_stats))
        .route("/capsule/{id}", get(capsules::routes::get_capsule));

    // Push endpoint (no handshake payload)
    let ws_routes = Router::new().route("/ws", get(ws_handler::ws_upgrade));

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(submission_routes)
        .merge(read_routes)
        .merge(ws_routes)
        .merge(health)
        .layer(cors_layer(&state.cors_origins))
        .with_state(state)
}

/// CORS layer from the configured origin list; "*" allows any origin.
fn cors_layer(origins: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    if origins.trim() == "*" {
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}
