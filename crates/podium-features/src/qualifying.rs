//! Qualifying extraction.
//!
//! One record per driver who took part in qualifying. The qualifying time is
//! the latest round with a value (Q3, else Q2, else Q1); a driver with no
//! timed round keeps a row with no time.

use podium_data::{DriverMapping, QualifyingAttempts, QualifyingEntry};
use serde::{Deserialize, Serialize};

/// Target-event qualifying row with canonical driver name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifyingRecord {
    /// Provider driver code
    pub driver_code: String,
    /// Canonical driver name (the code itself when unmapped)
    pub driver: String,
    /// Official qualifying position
    pub position: Option<u32>,
    /// Best qualifying time in seconds
    pub qualifying_time: Option<f64>,
}

/// Select each driver's best qualifying time and resolve names.
pub fn extract_qualifying(
    attempts: &[QualifyingAttempts],
    mapping: &DriverMapping,
) -> Vec<QualifyingRecord> {
    attempts
        .iter()
        .map(|a| QualifyingRecord {
            driver_code: a.driver_code.clone(),
            driver: mapping.resolve(&a.driver_code),
            position: a.position,
            qualifying_time: a.best_time().map(|d| d.as_secs_f64()),
        })
        .collect()
}

/// Build records from a persisted qualifying snapshot.
pub fn records_from_entries(
    entries: &[QualifyingEntry],
    mapping: &DriverMapping,
) -> Vec<QualifyingRecord> {
    entries
        .iter()
        .map(|e| QualifyingRecord {
            driver_code: e.driver_code.clone(),
            driver: mapping.resolve(&e.driver_code),
            position: e.position,
            qualifying_time: e.qualifying_time,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::time::Duration;

    fn attempts(code: &str, q: [Option<f64>; 3]) -> QualifyingAttempts {
        let d = |v: Option<f64>| v.map(Duration::from_secs_f64);
        QualifyingAttempts {
            driver_code: code.to_string(),
            position: Some(1),
            q1: d(q[0]),
            q2: d(q[1]),
            q3: d(q[2]),
        }
    }

    #[rstest]
    #[case([Some(90.1), Some(89.5), None], Some(89.5))]
    #[case([Some(90.1), None, None], Some(90.1))]
    #[case([Some(90.1), Some(89.5), Some(89.2)], Some(89.2))]
    #[case([None, None, None], None)]
    fn test_latest_round_precedence(#[case] q: [Option<f64>; 3], #[case] expected: Option<f64>) {
        let records = extract_qualifying(&[attempts("VER", q)], &DriverMapping::default_grid());
        assert_eq!(records.len(), 1);
        match (records[0].qualifying_time, expected) {
            (Some(actual), Some(expected)) => assert_relative_eq!(actual, expected, epsilon = 1e-9),
            (actual, expected) => assert_eq!(actual, expected),
        }
    }

    #[test]
    fn test_unmapped_code_passes_through() {
        let records = extract_qualifying(
            &[
                attempts("NOR", [Some(88.0), None, None]),
                attempts("NEW", [Some(89.0), None, None]),
            ],
            &DriverMapping::default_grid(),
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].driver, "Lando Norris");
        assert_eq!(records[1].driver, "NEW");
        assert_eq!(records[1].driver_code, "NEW");
    }

    #[test]
    fn test_records_from_entries() {
        let entries = vec![QualifyingEntry {
            driver_code: "PIA".to_string(),
            position: Some(2),
            qualifying_time: Some(75.18),
        }];
        let records = records_from_entries(&entries, &DriverMapping::default_grid());
        assert_eq!(records[0].driver, "Oscar Piastri");
        assert_eq!(records[0].position, Some(2));
        assert_eq!(records[0].qualifying_time, Some(75.18));
    }
}
