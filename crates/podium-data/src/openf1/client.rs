//! OpenF1 API client with rate limiting and response caching.

use super::laps::{RawDriver, RawLap, to_lap_records};
use super::results::{RawResult, to_qualifying_attempts};
use super::{LapRecord, QualifyingAttempts, SessionInfo, SessionKey, SessionKind};
use crate::cache::SqliteCache;
use crate::error::{DataError, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

/// OpenF1 API base URL
const OPENF1_BASE_URL: &str = "https://api.openf1.org/v1";

/// User agent sent with every request
const USER_AGENT: &str = "Podium-RacePredictor/0.1";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenF1Config {
    /// API base URL (without trailing slash)
    pub base_url: String,
    /// Minimum delay between two network requests
    pub rate_limit_delay: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for OpenF1Config {
    fn default() -> Self {
        Self {
            base_url: OPENF1_BASE_URL.to_string(),
            rate_limit_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Rate limiter spacing out network requests.
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            last_request: now.checked_sub(min_interval).unwrap_or(now),
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// OpenF1 API client.
///
/// Requests are spaced by the configured rate limit. When a cache is
/// attached, non-empty responses are stored and replayed on later calls
/// unless `force_refresh` is set.
pub struct OpenF1Client {
    client: reqwest::Client,
    config: OpenF1Config,
    rate_limiter: Arc<AsyncMutex<RateLimiter>>,
    cache: Option<Mutex<SqliteCache>>,
    force_refresh: bool,
}

impl OpenF1Client {
    /// Create a client with default settings and no cache.
    pub fn new() -> Result<Self> {
        Self::with_config(OpenF1Config::default())
    }

    /// Create a client with custom settings.
    pub fn with_config(config: OpenF1Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(AsyncMutex::new(RateLimiter::new(config.rate_limit_delay))),
            config,
            cache: None,
            force_refresh: false,
        })
    }

    /// Attach a response cache.
    pub fn with_cache(mut self, cache: SqliteCache) -> Self {
        self.cache = Some(Mutex::new(cache));
        self
    }

    /// Ignore cached responses and overwrite them with fresh ones.
    pub const fn force_refresh(mut self, force: bool) -> Self {
        self.force_refresh = force;
        self
    }

    /// Client configuration.
    pub const fn config(&self) -> &OpenF1Config {
        &self.config
    }

    /// Look up a session by season, hosting country and session kind.
    ///
    /// # Errors
    /// Returns `DataError::MissingData` if the provider has no such session.
    pub async fn find_session(
        &self,
        year: i32,
        country: &str,
        kind: SessionKind,
    ) -> Result<SessionInfo> {
        let query = [
            ("year", year.to_string()),
            ("country_name", country.to_string()),
            ("session_name", kind.name().to_string()),
        ];
        let sessions: Vec<SessionInfo> = self.get_json("sessions", &query).await?;

        sessions
            .into_iter()
            .find(|s| s.session_name == kind.name())
            .ok_or_else(|| DataError::MissingData {
                query: format!("{year} {country} {kind}"),
                reason: "no matching session".to_string(),
            })
    }

    /// Fetch every lap of a session with driver codes resolved.
    ///
    /// # Errors
    /// Returns `DataError::MissingData` if the session has no laps yet.
    pub async fn fetch_laps(&self, session_key: SessionKey) -> Result<Vec<LapRecord>> {
        let query = [("session_key", session_key.to_string())];
        let (laps, drivers) = futures::try_join!(
            self.get_json::<RawLap>("laps", &query),
            self.get_json::<RawDriver>("drivers", &query),
        )?;

        if laps.is_empty() {
            return Err(DataError::MissingData {
                query: format!("laps for session {session_key}"),
                reason: "no laps recorded".to_string(),
            });
        }

        let records = to_lap_records(laps, &drivers);
        info!(session_key, laps = records.len(), "fetched laps");
        Ok(records)
    }

    /// Fetch per-round qualifying results of a session.
    ///
    /// # Errors
    /// Returns `DataError::MissingData` if the session has no results yet.
    pub async fn fetch_qualifying(
        &self,
        session_key: SessionKey,
    ) -> Result<Vec<QualifyingAttempts>> {
        let query = [("session_key", session_key.to_string())];
        let (results, drivers) = futures::try_join!(
            self.get_json::<RawResult>("session_result", &query),
            self.get_json::<RawDriver>("drivers", &query),
        )?;

        if results.is_empty() {
            return Err(DataError::MissingData {
                query: format!("results for session {session_key}"),
                reason: "no results published".to_string(),
            });
        }

        let attempts = to_qualifying_attempts(results, &drivers);
        info!(session_key, drivers = attempts.len(), "fetched qualifying");
        Ok(attempts)
    }

    /// Fetch an endpoint and decode it as a JSON array.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let body = self.get_body(endpoint, query).await?;
        serde_json::from_str(&body).map_err(|e| {
            DataError::Parse(format!("Failed to parse {endpoint} response: {e}"))
        })
    }

    /// Fetch an endpoint body, going through the cache when attached.
    async fn get_body(&self, endpoint: &str, query: &[(&str, String)]) -> Result<String> {
        let key = request_key(endpoint, query);

        if !self.force_refresh {
            match self.cached(&key) {
                Ok(Some(body)) => {
                    debug!(%key, "cache hit");
                    return Ok(body);
                }
                Ok(None) => {}
                Err(e) => warn!(%key, error = %e, "cache read failed"),
            }
        }

        self.rate_limiter.lock().await.wait().await;

        let url = format!("{}/{}", self.config.base_url, endpoint);
        debug!(%url, ?query, "requesting");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(DataError::Network)?;

        // The provider answers 404 when a filter matches nothing.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok("[]".to_string());
        }
        if !response.status().is_success() {
            return Err(DataError::Api(format!(
                "Failed to fetch {}: HTTP {}",
                key,
                response.status()
            )));
        }

        let body = response.text().await.map_err(DataError::Network)?;

        if !is_empty_array(&body) {
            if let Err(e) = self.store(&key, endpoint, &body) {
                warn!(%key, error = %e, "cache write failed");
            }
        }

        Ok(body)
    }

    fn cached(&self, key: &str) -> Result<Option<String>> {
        match &self.cache {
            Some(cache) => cache
                .lock()
                .map_err(|_| DataError::CacheLock)?
                .get_response(key),
            None => Ok(None),
        }
    }

    fn store(&self, key: &str, endpoint: &str, body: &str) -> Result<()> {
        match &self.cache {
            Some(cache) => cache
                .lock()
                .map_err(|_| DataError::CacheLock)?
                .put_response(key, endpoint, body),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for OpenF1Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenF1Client")
            .field("base_url", &self.config.base_url)
            .field("cached", &self.cache.is_some())
            .field("force_refresh", &self.force_refresh)
            .finish_non_exhaustive()
    }
}

/// Cache key for a request: endpoint plus the query sorted by parameter name.
pub fn request_key(endpoint: &str, query: &[(&str, String)]) -> String {
    let mut params: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    params.sort();
    format!("{endpoint}?{}", params.join("&"))
}

fn is_empty_array(body: &str) -> bool {
    let trimmed = body.trim();
    trimmed.is_empty() || trimmed == "[]"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_key_is_order_independent() {
        let a = request_key(
            "sessions",
            &[("year", "2024".to_string()), ("country_name", "China".to_string())],
        );
        let b = request_key(
            "sessions",
            &[("country_name", "China".to_string()), ("year", "2024".to_string())],
        );
        assert_eq!(a, b);
        assert_eq!(a, "sessions?country_name=China&year=2024");
    }

    #[test]
    fn test_empty_array_detection() {
        assert!(is_empty_array("[]"));
        assert!(is_empty_array("  [] \n"));
        assert!(is_empty_array(""));
        assert!(!is_empty_array("[{}]"));
    }

    #[test]
    fn test_default_config() {
        let config = OpenF1Config::default();
        assert_eq!(config.base_url, OPENF1_BASE_URL);
        assert_eq!(config.rate_limit_delay, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_cached_laps_are_served_offline() {
        let cache = SqliteCache::in_memory().unwrap();
        let query = [("session_key", "7".to_string())];
        cache
            .put_response(
                &request_key("laps", &query),
                "laps",
                r#"[{"driver_number": 44, "lap_duration": 95.0,
                    "duration_sector_1": 30.0, "duration_sector_2": 35.0,
                    "duration_sector_3": 30.0}]"#,
            )
            .unwrap();
        cache
            .put_response(
                &request_key("drivers", &query),
                "drivers",
                r#"[{"driver_number": 44, "name_acronym": "HAM"}]"#,
            )
            .unwrap();

        // Unroutable base URL: any network access would fail the test.
        let config = OpenF1Config {
            base_url: "http://127.0.0.1:9".to_string(),
            rate_limit_delay: Duration::ZERO,
            timeout: Duration::from_millis(200),
        };
        let client = OpenF1Client::with_config(config).unwrap().with_cache(cache);

        let laps = client.fetch_laps(7).await.unwrap();
        assert_eq!(laps.len(), 1);
        assert_eq!(laps[0].driver, "HAM");
        assert!(laps[0].is_complete());
    }
}
