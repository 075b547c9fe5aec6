//! Lap records and driver identities.

use super::seconds_to_duration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// One timed lap of one driver.
///
/// Any time may be absent (in- and out-laps, red flags, telemetry gaps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapRecord {
    /// Provider driver code (three-letter abbreviation)
    pub driver: String,
    /// Full lap time
    pub lap_time: Option<Duration>,
    /// Sector 1 time
    pub sector1: Option<Duration>,
    /// Sector 2 time
    pub sector2: Option<Duration>,
    /// Sector 3 time
    pub sector3: Option<Duration>,
}

impl LapRecord {
    /// Whether the lap carries a lap time and all three sector times.
    pub const fn is_complete(&self) -> bool {
        self.lap_time.is_some()
            && self.sector1.is_some()
            && self.sector2.is_some()
            && self.sector3.is_some()
    }
}

/// Lap row from the `laps` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawLap {
    pub(crate) driver_number: u32,
    #[serde(default)]
    pub(crate) lap_duration: Option<f64>,
    #[serde(default)]
    pub(crate) duration_sector_1: Option<f64>,
    #[serde(default)]
    pub(crate) duration_sector_2: Option<f64>,
    #[serde(default)]
    pub(crate) duration_sector_3: Option<f64>,
}

/// Driver row from the `drivers` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawDriver {
    pub(crate) driver_number: u32,
    #[serde(default)]
    pub(crate) name_acronym: Option<String>,
}

/// Map driver numbers to their three-letter codes.
pub(crate) fn driver_codes(drivers: &[RawDriver]) -> HashMap<u32, String> {
    drivers
        .iter()
        .filter_map(|d| {
            d.name_acronym
                .as_ref()
                .filter(|code| !code.is_empty())
                .map(|code| (d.driver_number, code.clone()))
        })
        .collect()
}

/// Resolve a driver number, falling back to the number itself.
pub(crate) fn code_for(codes: &HashMap<u32, String>, number: u32) -> String {
    codes
        .get(&number)
        .cloned()
        .unwrap_or_else(|| number.to_string())
}

/// Convert raw laps into lap records, keeping provider order.
pub(crate) fn to_lap_records(laps: Vec<RawLap>, drivers: &[RawDriver]) -> Vec<LapRecord> {
    let codes = driver_codes(drivers);
    laps.into_iter()
        .map(|lap| LapRecord {
            driver: code_for(&codes, lap.driver_number),
            lap_time: seconds_to_duration(lap.lap_duration),
            sector1: seconds_to_duration(lap.duration_sector_1),
            sector2: seconds_to_duration(lap.duration_sector_2),
            sector3: seconds_to_duration(lap.duration_sector_3),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAPS: &str = r#"[
        {"driver_number": 1, "lap_number": 1, "lap_duration": null,
         "duration_sector_1": null, "duration_sector_2": 26.1, "duration_sector_3": 28.4,
         "is_pit_out_lap": false, "session_key": 9673},
        {"driver_number": 1, "lap_number": 2, "lap_duration": 98.5,
         "duration_sector_1": 25.0, "duration_sector_2": 40.5, "duration_sector_3": 33.0,
         "is_pit_out_lap": false, "session_key": 9673},
        {"driver_number": 99, "lap_number": 2, "lap_duration": 99.0,
         "duration_sector_1": 25.5, "duration_sector_2": 40.5, "duration_sector_3": 33.0}
    ]"#;

    const DRIVERS: &str = r#"[
        {"driver_number": 1, "name_acronym": "VER", "full_name": "Max VERSTAPPEN"},
        {"driver_number": 4, "name_acronym": "NOR", "full_name": "Lando NORRIS"}
    ]"#;

    #[test]
    fn test_lap_decoding() {
        let laps: Vec<RawLap> = serde_json::from_str(LAPS).unwrap();
        let drivers: Vec<RawDriver> = serde_json::from_str(DRIVERS).unwrap();
        let records = to_lap_records(laps, &drivers);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].driver, "VER");
        assert!(!records[0].is_complete());
        assert_eq!(records[0].sector2, Some(Duration::from_secs_f64(26.1)));

        assert!(records[1].is_complete());
        assert_eq!(records[1].lap_time, Some(Duration::from_secs_f64(98.5)));
    }

    #[test]
    fn test_unknown_driver_number_falls_back() {
        let laps: Vec<RawLap> = serde_json::from_str(LAPS).unwrap();
        let drivers: Vec<RawDriver> = serde_json::from_str(DRIVERS).unwrap();
        let records = to_lap_records(laps, &drivers);
        assert_eq!(records[2].driver, "99");
    }
}
