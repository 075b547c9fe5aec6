//! Session results with per-round qualifying times.

use super::laps::{RawDriver, code_for, driver_codes};
use super::seconds_to_duration;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw qualifying outcome for one driver.
///
/// Each round time is absent when the driver did not set a time in that
/// round (eliminated earlier, deleted lap, did not start).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifyingAttempts {
    /// Provider driver code
    pub driver_code: String,
    /// Official classified position
    pub position: Option<u32>,
    /// Best Q1 time
    pub q1: Option<Duration>,
    /// Best Q2 time
    pub q2: Option<Duration>,
    /// Best Q3 time
    pub q3: Option<Duration>,
}

impl QualifyingAttempts {
    /// Latest round with a time: Q3, then Q2, then Q1.
    pub fn best_time(&self) -> Option<Duration> {
        self.q3.or(self.q2).or(self.q1)
    }
}

/// Result `duration` field: one value per qualifying round, or a single
/// race duration.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawDuration {
    Rounds(Vec<Option<f64>>),
    Single(f64),
}

/// Row from the `session_result` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawResult {
    pub(crate) driver_number: u32,
    #[serde(default)]
    pub(crate) position: Option<u32>,
    #[serde(default)]
    pub(crate) duration: Option<RawDuration>,
}

impl RawResult {
    fn round(&self, index: usize) -> Option<Duration> {
        match &self.duration {
            Some(RawDuration::Rounds(rounds)) => {
                seconds_to_duration(rounds.get(index).copied().flatten())
            }
            // A scalar duration on a qualifying result is the single round the
            // driver took part in.
            Some(RawDuration::Single(secs)) if index == 0 => seconds_to_duration(Some(*secs)),
            _ => None,
        }
    }
}

/// Convert raw session results into qualifying attempts, keeping provider order.
pub(crate) fn to_qualifying_attempts(
    results: Vec<RawResult>,
    drivers: &[RawDriver],
) -> Vec<QualifyingAttempts> {
    let codes = driver_codes(drivers);
    results
        .into_iter()
        .map(|r| QualifyingAttempts {
            driver_code: code_for(&codes, r.driver_number),
            position: r.position,
            q1: r.round(0),
            q2: r.round(1),
            q3: r.round(2),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = r#"[
        {"position": 1, "driver_number": 4, "number_of_laps": 21,
         "duration": [90.1, 89.9, 89.5], "gap_to_leader": [0, 0, 0],
         "dnf": false, "dns": false, "dsq": false, "session_key": 9999},
        {"position": 11, "driver_number": 1, "number_of_laps": 14,
         "duration": [90.1, 90.4, null], "dnf": false, "dns": false, "dsq": false},
        {"position": 20, "driver_number": 23, "number_of_laps": 6,
         "duration": [91.0, null, null]},
        {"position": null, "driver_number": 31, "duration": null, "dns": true}
    ]"#;

    const DRIVERS: &str = r#"[
        {"driver_number": 4, "name_acronym": "NOR"},
        {"driver_number": 1, "name_acronym": "VER"},
        {"driver_number": 23, "name_acronym": "ALB"}
    ]"#;

    fn decode() -> Vec<QualifyingAttempts> {
        let results: Vec<RawResult> = serde_json::from_str(RESULTS).unwrap();
        let drivers: Vec<RawDriver> = serde_json::from_str(DRIVERS).unwrap();
        to_qualifying_attempts(results, &drivers)
    }

    #[test]
    fn test_round_times() {
        let attempts = decode();
        assert_eq!(attempts.len(), 4);

        assert_eq!(attempts[0].driver_code, "NOR");
        assert_eq!(attempts[0].position, Some(1));
        assert_eq!(attempts[0].q3, Some(Duration::from_secs_f64(89.5)));

        assert_eq!(attempts[2].q1, Some(Duration::from_secs_f64(91.0)));
        assert_eq!(attempts[2].q2, None);
        assert_eq!(attempts[2].q3, None);
    }

    #[test]
    fn test_best_time_precedence() {
        let attempts = decode();
        assert_eq!(attempts[0].best_time(), Some(Duration::from_secs_f64(89.5)));
        assert_eq!(attempts[1].best_time(), Some(Duration::from_secs_f64(90.4)));
        assert_eq!(attempts[2].best_time(), Some(Duration::from_secs_f64(91.0)));
    }

    #[test]
    fn test_driver_without_time_is_kept() {
        let attempts = decode();
        let sar = &attempts[3];
        assert_eq!(sar.driver_code, "31");
        assert_eq!(sar.position, None);
        assert_eq!(sar.best_time(), None);
    }

    #[test]
    fn test_scalar_duration() {
        let json = r#"[{"position": 3, "driver_number": 16, "duration": 5432.1}]"#;
        let results: Vec<RawResult> = serde_json::from_str(json).unwrap();
        let attempts = to_qualifying_attempts(results, &[]);
        assert_eq!(attempts[0].q1, Some(Duration::from_secs_f64(5432.1)));
        assert_eq!(attempts[0].q2, None);
    }
}
