//! Integration tests replaying a cached session without network access

use podium_data::openf1::request_key;
use podium_data::{
    OpenF1Client, OpenF1Config, QualifyingEntry, SessionKind, SqliteCache, read_qualifying_csv,
    write_qualifying_csv,
};
use std::time::Duration;

const SESSIONS: &str = r#"[{
    "session_key": 9999, "meeting_key": 1250, "session_name": "Qualifying",
    "session_type": "Qualifying", "country_name": "Japan",
    "circuit_short_name": "Suzuka", "year": 2025
}]"#;

const RESULTS: &str = r#"[
    {"position": 1, "driver_number": 1, "duration": [88.9, 88.4, 86.983]},
    {"position": 2, "driver_number": 4, "duration": [88.7, 88.2, 86.995]},
    {"position": 16, "driver_number": 87, "duration": [89.8, null, null]}
]"#;

const DRIVERS: &str = r#"[
    {"driver_number": 1, "name_acronym": "VER"},
    {"driver_number": 4, "name_acronym": "NOR"},
    {"driver_number": 87, "name_acronym": "BEA"}
]"#;

fn seed_cache(cache: &SqliteCache) {
    let session_query = [
        ("year", "2025".to_string()),
        ("country_name", "Japan".to_string()),
        ("session_name", "Qualifying".to_string()),
    ];
    let key_query = [("session_key", "9999".to_string())];

    cache
        .put_response(&request_key("sessions", &session_query), "sessions", SESSIONS)
        .unwrap();
    cache
        .put_response(
            &request_key("session_result", &key_query),
            "session_result",
            RESULTS,
        )
        .unwrap();
    cache
        .put_response(&request_key("drivers", &key_query), "drivers", DRIVERS)
        .unwrap();
}

fn offline_config() -> OpenF1Config {
    OpenF1Config {
        base_url: "http://127.0.0.1:9".to_string(),
        rate_limit_delay: Duration::ZERO,
        timeout: Duration::from_millis(200),
    }
}

#[tokio::test]
async fn test_qualifying_snapshot_from_persistent_cache() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("podium.db");

    // Seed through one connection, replay through another.
    seed_cache(&SqliteCache::new(&db).unwrap());
    let cache = SqliteCache::new(&db).unwrap();
    assert_eq!(cache.get_stats().unwrap().entries, 3);

    let client = OpenF1Client::with_config(offline_config())
        .unwrap()
        .with_cache(cache);

    let session = client
        .find_session(2025, "Japan", SessionKind::Qualifying)
        .await
        .unwrap();
    assert_eq!(session.session_key, 9999);

    let attempts = client.fetch_qualifying(session.session_key).await.unwrap();
    let entries: Vec<QualifyingEntry> = attempts.iter().map(QualifyingEntry::from).collect();

    assert_eq!(entries[0].driver_code, "VER");
    assert_eq!(entries[0].qualifying_time, Some(86.983));
    assert_eq!(entries[2].driver_code, "BEA");
    assert_eq!(entries[2].qualifying_time, Some(89.8));

    let csv_path = dir.path().join("qualifying_japan_2025.csv");
    write_qualifying_csv(&csv_path, &entries).unwrap();
    assert_eq!(read_qualifying_csv(&csv_path).unwrap(), entries);
}

#[tokio::test]
async fn test_refresh_bypasses_cache() {
    let cache = SqliteCache::in_memory().unwrap();
    seed_cache(&cache);

    let client = OpenF1Client::with_config(offline_config())
        .unwrap()
        .with_cache(cache)
        .force_refresh(true);

    // With the cache bypassed the unroutable host is contacted and fails.
    let result = client
        .find_session(2025, "Japan", SessionKind::Qualifying)
        .await;
    assert!(result.is_err());
}
