//! REST endpoints for wish submission and recent-wish retrieval.
//!
//! The submission handler is the integration point tying validation,
//! the rolling store, and the WebSocket fan-out together.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::state::AppState;
use crate::wishes::sanitize::{normalize_display, normalize_text};
use crate::wishes::store::Wish;
use crate::ws::broadcast;

#[derive(Debug, Deserialize)]
pub struct CreateWishRequest {
    pub author: Option<String>,
    pub message: String,
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// POST /wish — Validate, store, and broadcast a new wish.
pub async fn create_wish(
    State(state): State<AppState>,
    Json(body): Json<CreateWishRequest>,
) -> Result<(StatusCode, Json<Wish>), (StatusCode, String)> {
    // Length check runs on the raw message, before normalization
    if body.message.chars().count() > state.max_message_chars {
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("Message exceeds {} characters", state.max_message_chars),
        ));
    }

    let message = normalize_text(&body.message);
    if message.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Message must not be empty".to_string()));
    }

    let wish = Wish {
        author: normalize_display(body.author.as_deref().unwrap_or(""), "Anonymous"),
        message,
        region: normalize_display(body.region.as_deref().unwrap_or(""), "Unknown"),
        submitted_at: Utc::now(),
    };

    let wish = state.wishes.insert(wish).map_err(|e| {
        tracing::error!("Wish insert failed: {}", e);
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Wish store unavailable".to_string(),
        )
    })?;

    // Fan out to every live push connection. Delivery failures are absorbed
    // inside broadcast and never reach the submitter.
    broadcast::broadcast_wish(&state.connections, &wish);

    Ok((StatusCode::CREATED, Json(wish)))
}

/// GET /wishes?limit=N — Most recent wishes, newest first.
pub async fn recent_wishes(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<Wish>>, (StatusCode, String)> {
    let limit = query.limit.unwrap_or(state.max_wishes).min(state.max_wishes);

    let wishes = state.wishes.recent(limit).map_err(|e| {
        tracing::error!("Wish query failed: {}", e);
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Wish store unavailable".to_string(),
        )
    })?;

    Ok(Json(wishes))
}
