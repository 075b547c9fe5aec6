//! Caching layer for raw session responses.

pub mod sqlite;

pub use sqlite::{CacheStats, SqliteCache};
