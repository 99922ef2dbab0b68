//! REST endpoints for time capsules: seal now, open at the unlock date.
//!
//! The capsule id doubles as the recovery key; a locked capsule's message
//! is never returned.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capsules::MAX_CAPSULE_CHARS;
use crate::state::AppState;
use crate::wishes::sanitize::normalize_text;

fn default_is_public() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct SealCapsuleRequest {
    pub message: String,
    pub unlock_date: DateTime<Utc>,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

#[derive(Debug, Serialize)]
pub struct SealCapsuleResponse {
    pub id: String,
    pub unlock_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CapsuleView {
    pub id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub unlock_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CapsuleStats {
    pub total_sealed: i64,
}

/// Whole days until `unlock`, rounded up; zero once the date has passed.
fn days_until(now: DateTime<Utc>, unlock: DateTime<Utc>) -> i64 {
    let secs = (unlock - now).num_seconds();
    if secs <= 0 {
        0
    } else {
        (secs + 86_399) / 86_400
    }
}

/// POST /capsule — Seal a message until its unlock date.
pub async fn seal_capsule(
    State(state): State<AppState>,
    Json(body): Json<SealCapsuleRequest>,
) -> Result<(StatusCode, Json<SealCapsuleResponse>), (StatusCode, String)> {
    if body.message.chars().count() > MAX_CAPSULE_CHARS {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Message exceeds {} characters", MAX_CAPSULE_CHARS),
        ));
    }
    let message = normalize_text(&body.message);
    if message.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Message must not be empty".to_string(),
        ));
    }

    let created_at = Utc::now();
    if body.unlock_date <= created_at {
        return Err((
            StatusCode::BAD_REQUEST,
            "Unlock date must be in the future".to_string(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    let db = state.db.clone();
    let record_id = id.clone();
    let unlock_date = body.unlock_date;
    let is_public = body.is_public;

    tokio::task::spawn_blocking(move || {
        let conn = db.lock().map_err(|_| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Capsule vault unavailable".to_string(),
            )
        })?;

        conn.execute(
            "INSERT INTO capsules (id, message, unlock_date, is_public, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                record_id,
                message,
                unlock_date.to_rfc3339(),
                is_public,
                created_at.to_rfc3339()
            ],
        )
        .map_err(|e| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Seal capsule: {}", e),
            )
        })?;

        Ok::<_, (StatusCode, String)>(())
    })
    .await
    .map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Capsule task failed".to_string(),
        )
    })??;

    Ok((
        StatusCode::CREATED,
        Json(SealCapsuleResponse {
            id,
            unlock_date: body.unlock_date,
            created_at,
        }),
    ))
}

/// GET /capsule/{id} — Look up a capsule by its recovery key.
pub async fn get_capsule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CapsuleView>, (StatusCode, String)> {
    let db = state.db.clone();
    let key = id.clone();

    let row = tokio::task::spawn_blocking(move || {
        let conn = db.lock().map_err(|_| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Capsule vault unavailable".to_string(),
            )
        })?;

        let result = conn
            .query_row(
                "SELECT message, unlock_date, created_at FROM capsules WHERE id = ?1",
                rusqlite::params![key],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err((
                    StatusCode::SERVICE_UNAVAILABLE,
                    format!("Read capsule: {}", other),
                )),
            })?;

        Ok::<_, (StatusCode, String)>(result)
    })
    .await
    .map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Capsule task failed".to_string(),
        )
    })??;

    let (message, unlock_raw, created_raw) = row.ok_or((
        StatusCode::NOT_FOUND,
        "Capsule not found".to_string(),
    ))?;

    let unlock_date = parse_stored_date(&unlock_raw)?;
    let created_at = parse_stored_date(&created_raw)?;

    let now = Utc::now();
    let view = if unlock_date > now {
        CapsuleView {
            id,
            status: "locked".to_string(),
            message: None,
            unlock_date,
            days_remaining: Some(days_until(now, unlock_date)),
            created_at,
        }
    } else {
        CapsuleView {
            id,
            status: "unlocked".to_string(),
            message: Some(message),
            unlock_date,
            days_remaining: None,
            created_at,
        }
    };

    Ok(Json(view))
}

/// GET /capsule/stats — How many capsules are in the vault.
/// Degrades to zero rather than failing: this is a derived stat.
pub async fn capsule_stats(State(state): State<AppState>) -> Json<CapsuleStats> {
    let db = state.db.clone();

    let total_sealed = tokio::task::spawn_blocking(move || {
        let conn = db.lock().ok()?;
        conn.query_row("SELECT COUNT(*) FROM capsules", [], |row| row.get::<_, i64>(0))
            .ok()
    })
    .await
    .ok()
    .flatten()
    .unwrap_or_else(|| {
        tracing::warn!("Capsule stats unavailable, reporting zero");
        0
    });

    Json(CapsuleStats { total_sealed })
}

fn parse_stored_date(raw: &str) -> Result<DateTime<Utc>, (StatusCode, String)> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Corrupt capsule timestamp: {}", e),
            )
        })
}
