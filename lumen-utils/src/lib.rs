/// Environment variable readers shared by the binary and config loaders.
pub mod env;
/// Shared formatting helpers (html escaping, xp labels).
pub mod formatting;
/// Shared time helpers.
pub mod time;
