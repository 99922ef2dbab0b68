pub mod routes;
pub mod seed;

/// Accepted quote themes.
pub const THEMES: [&str; 4] = ["motivation", "reflection", "celebration", "humor"];

/// Maximum quote text length in characters.
pub const MAX_QUOTE_CHARS: usize = 300;
