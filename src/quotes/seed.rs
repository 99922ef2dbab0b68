use chrono::Utc;
use uuid::Uuid;

use crate::db::DbPool;

const DEFAULT_QUOTES: [(&str, &str, &str); 8] = [
    (
        "Tomorrow is the first blank page of a 365-page book. Write a good one.",
        "Brad Paisley",
        "motivation",
    ),
    (
        "The best way to predict the future is to create it.",
        "Peter Drucker",
        "motivation",
    ),
    (
        "Year's end is neither an end nor a beginning but a going on.",
        "Hal Borland",
        "reflection",
    ),
    (
        "We will open the book. Its pages are blank. We are going to put words on them ourselves.",
        "Melody Beattie",
        "reflection",
    ),
    (
        "Cheers to a new year and another chance for us to get it right.",
        "Oprah Winfrey",
        "celebration",
    ),
    (
        "The more you praise and celebrate your life, the more there is in life to celebrate.",
        "Oprah Winfrey",
        "celebration",
    ),
    (
        "My New Year's resolution? To stop procrastinating. Starting tomorrow.",
        "Anonymous",
        "humor",
    ),
    (
        "A New Year's resolution is something that goes in one year and out the other.",
        "Anonymous",
        "humor",
    ),
];

/// Seed the quote table with a starter set on first boot.
/// Skipped entirely once any quote exists.
pub fn seed_default_quotes(db: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = db.lock().map_err(|_| "poisoned DB lock")?;

    let count: i64 = conn.query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }

    let now = Utc::now().to_rfc3339();
    for (text, author, theme) in DEFAULT_QUOTES {
        conn.execute(
            "INSERT INTO quotes (id, text, author, theme, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![Uuid::new_v4().to_string(), text, author, theme, now],
        )?;
    }

    tracing::info!("Seeded {} starter quotes", DEFAULT_QUOTES.len());
    Ok(())
}
