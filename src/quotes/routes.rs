//! REST endpoints for quote sampling and submission.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quotes::{MAX_QUOTE_CHARS, THEMES};
use crate::state::AppState;
use crate::wishes::sanitize::{normalize_display, normalize_text};

/// Default sample size for quote retrieval.
const DEFAULT_LIMIT: u32 = 3;
/// Maximum sample size for quote retrieval.
const MAX_LIMIT: u32 = 20;

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub id: String,
    pub text: String,
    pub author: String,
    pub theme: String,
}

#[derive(Debug, Deserialize)]
pub struct QuotesQuery {
    pub theme: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuoteRequest {
    pub text: String,
    pub author: Option<String>,
    pub theme: String,
}

/// GET /quotes?theme=&limit= — Uniform random sample, optionally by theme.
pub async fn list_quotes(
    State(state): State<AppState>,
    Query(query): Query<QuotesQuery>,
) -> Result<Json<Vec<QuoteResponse>>, (StatusCode, String)> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

    // "all" (and absence) means no theme filter
    let theme = match query.theme.as_deref() {
        None | Some("all") => None,
        Some(theme) if THEMES.contains(&theme) => Some(theme.to_string()),
        Some(theme) => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Unknown theme '{}'", theme),
            ));
        }
    };

    let db = state.db.clone();

    let quotes = tokio::task::spawn_blocking(move || {
        let conn = db.lock().map_err(|_| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Quote store unavailable".to_string(),
            )
        })?;

        let map_row = |row: &rusqlite::Row<'_>| {
            Ok(QuoteResponse {
                id: row.get(0)?,
                text: row.get(1)?,
                author: row.get(2)?,
                theme: row.get(3)?,
            })
        };

        let result: Result<Vec<QuoteResponse>, rusqlite::Error> = match &theme {
            Some(theme) => {
                let mut stmt = conn.prepare(
                    "SELECT id, text, author, theme FROM quotes WHERE theme = ?1 ORDER BY RANDOM() LIMIT ?2",
                ).map_err(db_err)?;
                let rows = stmt
                    .query_map(rusqlite::params![theme, limit], map_row)
                    .map_err(db_err)?;
                rows.collect()
            }
            None => {
                let mut stmt = conn
                    .prepare("SELECT id, text, author, theme FROM quotes ORDER BY RANDOM() LIMIT ?1")
                    .map_err(db_err)?;
                let rows = stmt
                    .query_map(rusqlite::params![limit], map_row)
                    .map_err(db_err)?;
                rows.collect()
            }
        };

        result.map_err(db_err)
    })
    .await
    .map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Quote query task failed".to_string(),
        )
    })??;

    Ok(Json(quotes))
}

/// POST /quotes — Submit a quote for the generator.
pub async fn create_quote(
    State(state): State<AppState>,
    Json(body): Json<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<QuoteResponse>), (StatusCode, String)> {
    if !THEMES.contains(&body.theme.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Unknown theme '{}'", body.theme),
        ));
    }
    if body.text.chars().count() > MAX_QUOTE_CHARS {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Quote exceeds {} characters", MAX_QUOTE_CHARS),
        ));
    }
    let text = normalize_text(&body.text);
    if text.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Quote must not be empty".to_string()));
    }

    let quote = QuoteResponse {
        id: Uuid::new_v4().to_string(),
        text,
        author: normalize_display(body.author.as_deref().unwrap_or(""), "Anonymous"),
        theme: body.theme,
    };

    let db = state.db.clone();
    let (id, text, author, theme) = (
        quote.id.clone(),
        quote.text.clone(),
        quote.author.clone(),
        quote.theme.clone(),
    );

    tokio::task::spawn_blocking(move || {
        let conn = db.lock().map_err(|_| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Quote store unavailable".to_string(),
            )
        })?;

        conn.execute(
            "INSERT INTO quotes (id, text, author, theme, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![id, text, author, theme, Utc::now().to_rfc3339()],
        )
        .map_err(db_err)?;

        Ok::<_, (StatusCode, String)>(())
    })
    .await
    .map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Quote insert task failed".to_string(),
        )
    })??;

    Ok((StatusCode::CREATED, Json(quote)))
}

fn db_err(e: rusqlite::Error) -> (StatusCode, String) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        format!("Quote store error: {}", e),
    )
}
