//! Cache manager for session responses.
//!
//! Opens the SQLite response cache at a platform-specific default location.

use podium_data::{DataError, SqliteCache};
use std::path::PathBuf;

/// Get the default cache directory path.
///
/// Uses platform-specific cache directories:
/// - Linux: `~/.cache/podium/`
/// - macOS: `~/Library/Caches/podium/`
/// - Windows: `%LOCALAPPDATA%\podium\`
pub(crate) fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("podium")
}

/// Get the cache database path.
pub(crate) fn get_cache_path() -> PathBuf {
    default_cache_dir().join("podium.db")
}

/// Open the cache, creating the directory if needed.
pub(crate) fn open_cache() -> Result<SqliteCache, DataError> {
    let cache_path = get_cache_path();

    if let Some(parent) = cache_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    SqliteCache::new(&cache_path)
}
