pub mod routes;

use crate::db::DbPool;

/// The community poll: one fixed question, per-option counters in SQLite.
pub const POLL_QUESTION: &str = "What's your biggest focus for the new year?";

pub const POLL_OPTIONS: [&str; 4] = [
    "Health & fitness",
    "Career & learning",
    "Travel & adventure",
    "Family & friends",
];

/// Ensure one counter row exists per option. Idempotent, run at startup.
pub fn seed_poll_counters(db: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = db.lock().map_err(|_| "poisoned DB lock")?;
    for index in 0..POLL_OPTIONS.len() {
        conn.execute(
            "INSERT OR IGNORE INTO poll_votes (option_index, votes) VALUES (?1, 0)",
            rusqlite::params![index],
        )?;
    }
    Ok(())
}
