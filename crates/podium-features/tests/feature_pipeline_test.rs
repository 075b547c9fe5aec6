//! Integration tests from raw laps and qualifying attempts to a training set

use approx::assert_relative_eq;
use podium_data::{DriverMapping, LapRecord, QualifyingAttempts};
use podium_features::{SectorAggregator, extract_qualifying, merge_features};
use rstest::rstest;
use std::collections::HashSet;
use std::time::Duration;

fn secs(v: f64) -> Option<Duration> {
    Some(Duration::from_secs_f64(v))
}

fn lap(driver: &str, lap_time: f64, s1: f64, s2: f64, s3: f64) -> LapRecord {
    LapRecord {
        driver: driver.to_string(),
        lap_time: secs(lap_time),
        sector1: secs(s1),
        sector2: secs(s2),
        sector3: secs(s3),
    }
}

/// A small race: three drivers with a mix of complete and incomplete laps.
fn race_laps(stride: usize) -> Vec<LapRecord> {
    let mut laps = Vec::new();
    for i in 0..12 {
        let f = i as f64 * 0.1;
        laps.push(lap("VER", 95.0 + f, 30.0 + f, 34.0, 31.0));
        laps.push(lap("NOR", 95.5 + f, 30.5, 34.0 + f, 31.0));
        let mut ham = lap("HAM", 96.0, 31.0, 34.0, 31.0 + f);
        if i % stride == 0 {
            ham.sector2 = None;
        }
        laps.push(ham);
    }
    // Never completes a lap
    laps.push(LapRecord {
        driver: "STR".to_string(),
        lap_time: None,
        sector1: secs(31.0),
        sector2: secs(34.0),
        sector3: None,
    });
    laps
}

fn attempts(code: &str, position: u32, q: [Option<f64>; 3]) -> QualifyingAttempts {
    QualifyingAttempts {
        driver_code: code.to_string(),
        position: Some(position),
        q1: q[0].and_then(secs),
        q2: q[1].and_then(secs),
        q3: q[2].and_then(secs),
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
fn test_profiles_cover_only_drivers_with_complete_laps(#[case] stride: usize) {
    let laps = race_laps(stride);
    let profiles = SectorAggregator::new().aggregate(&laps).unwrap();

    let complete: HashSet<&str> = laps
        .iter()
        .filter(|l| l.is_complete())
        .map(|l| l.driver.as_str())
        .collect();
    for p in &profiles.sectors {
        assert!(complete.contains(p.driver.as_str()));
    }
    assert!(profiles.sectors.iter().all(|p| p.driver != "STR"));

    // Mean equality against a direct computation
    for p in &profiles.laps {
        let times: Vec<f64> = laps
            .iter()
            .filter(|l| l.is_complete() && l.driver == p.driver)
            .filter_map(|l| l.lap_time.map(|d| d.as_secs_f64()))
            .collect();
        let mean = times.iter().sum::<f64>() / times.len() as f64;
        assert_relative_eq!(p.lap_time, mean, epsilon = 1e-9);
    }
}

#[test]
fn test_training_set_is_strict() {
    let mapping = DriverMapping::default_grid();
    let profiles = SectorAggregator::new().aggregate(&race_laps(3)).unwrap();
    let qualifying = extract_qualifying(
        &[
            attempts("VER", 1, [Some(90.1), Some(89.6), Some(89.2)]),
            attempts("NOR", 2, [Some(90.0), Some(89.5), None]),
            attempts("STR", 3, [Some(91.0), None, None]),
            attempts("HAM", 4, [None, None, None]),
            attempts("BOR", 5, [Some(91.5), None, None]),
        ],
        &mapping,
    );

    let table = merge_features(&qualifying, &profiles, &mapping);
    assert_eq!(table.len(), 5);

    let training = table.training_set().unwrap();
    assert_eq!(training.row_indices, vec![0, 1]);
    assert_eq!(training.features.nrows(), training.labels.len());
    assert!(training.features.iter().all(|v| v.is_finite()));
    assert!(training.labels.iter().all(|v| v.is_finite()));

    for (&idx, label) in training.row_indices.iter().zip(training.labels.iter()) {
        assert!(table.rows()[idx].is_trainable());
        assert_eq!(table.rows()[idx].label, Some(*label));
    }

    // Full matrix keeps every row for prediction
    assert_eq!(table.feature_matrix().unwrap().nrows(), 5);
}
