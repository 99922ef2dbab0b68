//! REST endpoints for the community poll.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::polls::{POLL_OPTIONS, POLL_QUESTION};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PollResponse {
    pub question: String,
    pub options: Vec<String>,
    pub votes: Vec<i64>,
    pub total_votes: i64,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub option_index: usize,
}

fn read_poll(conn: &rusqlite::Connection) -> Result<PollResponse, rusqlite::Error> {
    let mut votes = vec![0i64; POLL_OPTIONS.len()];

    let mut stmt = conn.prepare("SELECT option_index, votes FROM poll_votes")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
    })?;
    for row in rows {
        let (index, count) = row?;
        if let Some(slot) = votes.get_mut(index as usize) {
            *slot = count;
        }
    }

    let total_votes = votes.iter().sum();
    Ok(PollResponse {
        question: POLL_QUESTION.to_string(),
        options: POLL_OPTIONS.iter().map(|o| o.to_string()).collect(),
        votes,
        total_votes,
    })
}

/// GET /poll — Current question, options, and tallies.
pub async fn get_poll(
    State(state): State<AppState>,
) -> Result<Json<PollResponse>, StatusCode> {
    let db = state.db.clone();

    let poll = tokio::task::spawn_blocking(move || {
        let conn = db.lock().map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;
        read_poll(&conn).map_err(|_| StatusCode::SERVICE_UNAVAILABLE)
    })
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)??;

    Ok(Json(poll))
}

/// POST /poll/vote — Record one vote and return the updated tallies.
pub async fn vote(
    State(state): State<AppState>,
    Json(body): Json<VoteRequest>,
) -> Result<Json<PollResponse>, (StatusCode, String)> {
    if body.option_index >= POLL_OPTIONS.len() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "Option index must be below {}",
                POLL_OPTIONS.len()
            ),
        ));
    }

    let db = state.db.clone();

    let poll = tokio::task::spawn_blocking(move || {
        let conn = db.lock().map_err(|_| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Poll store unavailable".to_string(),
            )
        })?;

        conn.execute(
            "UPDATE poll_votes SET votes = votes + 1 WHERE option_index = ?1",
            rusqlite::params![body.option_index],
        )
        .map_err(|e| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Record vote: {}", e),
            )
        })?;

        read_poll(&conn).map_err(|e| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Read poll: {}", e),
            )
        })
    })
    .await
    .map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Vote task failed".to_string(),
        )
    })??;

    Ok(Json(poll))
}
