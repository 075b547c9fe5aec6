//! SQLite caching layer for raw API responses.
//!
//! Responses are stored verbatim, keyed by the request they answered
//! (endpoint plus sorted query string), so a session fetched once can be
//! replayed offline on later runs.

use crate::error::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// SQLite cache for raw session responses.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Create a new SQLite cache.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS responses (
                key TEXT PRIMARY KEY,
                endpoint TEXT NOT NULL,
                body TEXT NOT NULL,
                cached_at TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_responses_endpoint ON responses(endpoint)",
            [],
        )?;

        Ok(())
    }

    /// Check if a response is cached for a key.
    pub fn has_response(&self, key: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM responses WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Get a cached response body.
    pub fn get_response(&self, key: &str) -> Result<Option<String>> {
        let body = self
            .conn
            .query_row(
                "SELECT body FROM responses WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }

    /// When a response was stored, if it is cached.
    pub fn cached_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let stamp: Option<String> = self
            .conn
            .query_row(
                "SELECT cached_at FROM responses WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(stamp
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    /// Store a response body, replacing any previous entry for the key.
    pub fn put_response(&self, key: &str, endpoint: &str, body: &str) -> Result<()> {
        let cached_at = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO responses (key, endpoint, body, cached_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![key, endpoint, body, cached_at],
        )?;
        Ok(())
    }

    /// Remove a single cached response.
    pub fn remove_response(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM responses WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Clear all cached data.
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM responses", [])?;
        Ok(())
    }

    /// Get cache statistics.
    pub fn get_stats(&self) -> Result<CacheStats> {
        let (entries, total_bytes): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(LENGTH(body)), 0) FROM responses",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let endpoints: i64 =
            self.conn
                .query_row("SELECT COUNT(DISTINCT endpoint) FROM responses", [], |row| {
                    row.get(0)
                })?;

        Ok(CacheStats {
            entries: entries as usize,
            endpoints: endpoints as usize,
            total_bytes: total_bytes as usize,
        })
    }
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached responses
    pub entries: usize,
    /// Number of distinct endpoints with cached responses
    pub endpoints: usize,
    /// Total size of cached bodies in bytes
    pub total_bytes: usize,
}
