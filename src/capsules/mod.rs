pub mod routes;

/// Maximum capsule message length in characters.
pub const MAX_CAPSULE_CHARS: usize = 500;
