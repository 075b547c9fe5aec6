//! Feature Merging
//!
//! Joins target-event qualifying rows with reference-event profiles on the
//! canonical driver name. The join is anchored on qualifying drivers: every
//! qualifying row survives, with missing sector fields when the driver has no
//! historical profile. Historical codes are canonicalized through the same
//! [`DriverMapping`] as qualifying codes so both sides share a key.

use crate::columns::{FEATURE_COUNT, FeatureColumn};
use crate::error::Result;
use crate::qualifying::QualifyingRecord;
use crate::sectors::SessionProfiles;
use ndarray::{Array1, Array2};
use podium_data::DriverMapping;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One driver's merged features, label and prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Canonical driver name
    pub driver: String,
    /// Provider driver code at the target event
    pub driver_code: String,
    /// Official qualifying position
    pub position: Option<u32>,
    /// Best qualifying time (s)
    pub qualifying_time: Option<f64>,
    /// Reference-event mean sector 1 time (s)
    pub sector1: Option<f64>,
    /// Reference-event mean sector 2 time (s)
    pub sector2: Option<f64>,
    /// Reference-event mean sector 3 time (s)
    pub sector3: Option<f64>,
    /// Reference-event mean lap time (s), the training label
    pub label: Option<f64>,
    /// Model output (s), filled after prediction
    pub predicted_race_time: Option<f64>,
}

impl FeatureRow {
    /// Feature values in matrix column order.
    pub const fn features(&self) -> [Option<f64>; FEATURE_COUNT] {
        [
            self.qualifying_time,
            self.sector1,
            self.sector2,
            self.sector3,
        ]
    }

    /// Value of a single feature column.
    pub const fn feature(&self, column: FeatureColumn) -> Option<f64> {
        self.features()[column.index()]
    }

    /// Whether every feature is present.
    pub fn is_complete(&self) -> bool {
        self.features().iter().all(Option::is_some)
    }

    /// Whether the row may be used for training: complete features and a label.
    pub fn is_trainable(&self) -> bool {
        self.is_complete() && self.label.is_some()
    }

    /// Feature values with absent entries replaced by zero.
    pub fn zero_filled(&self) -> [f64; FEATURE_COUNT] {
        self.features().map(|v| v.unwrap_or(0.0))
    }
}

/// Training data aligned by row.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    /// Feature matrix (rows × 4)
    pub features: Array2<f64>,
    /// Label vector
    pub labels: Array1<f64>,
    /// Index of each training row in the source table
    pub row_indices: Vec<usize>,
}

impl TrainingSet {
    /// Number of training rows.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no training rows.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Merged rows for one event, in qualifying order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    /// Create a table from rows.
    pub const fn new(rows: Vec<FeatureRow>) -> Self {
        Self { rows }
    }

    /// Rows in qualifying order.
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Consume the table, returning its rows.
    pub fn into_rows(self) -> Vec<FeatureRow> {
        self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows eligible for training, as an aligned `(X, y)` pair.
    ///
    /// Rows with any missing feature or label are dropped; the result never
    /// contains a missing value.
    pub fn training_set(&self) -> Result<TrainingSet> {
        let mut flat = Vec::new();
        let mut labels = Vec::new();
        let mut row_indices = Vec::new();

        for (i, row) in self.rows.iter().enumerate() {
            let Some(label) = row.label.filter(|_| row.is_complete()) else {
                continue;
            };
            flat.extend(row.zero_filled());
            labels.push(label);
            row_indices.push(i);
        }

        debug!(
            rows = self.rows.len(),
            trainable = labels.len(),
            "built training set"
        );

        Ok(TrainingSet {
            features: Array2::from_shape_vec((labels.len(), FEATURE_COUNT), flat)?,
            labels: Array1::from(labels),
            row_indices,
        })
    }

    /// Feature matrix over all rows, missing features filled with zero.
    pub fn feature_matrix(&self) -> Result<Array2<f64>> {
        let flat: Vec<f64> = self.rows.iter().flat_map(FeatureRow::zero_filled).collect();
        Ok(Array2::from_shape_vec((self.rows.len(), FEATURE_COUNT), flat)?)
    }

    /// Attach predictions, one per row in table order.
    pub fn set_predictions(&mut self, predictions: &[f64]) {
        for (row, &p) in self.rows.iter_mut().zip(predictions) {
            row.predicted_race_time = Some(p);
        }
    }
}

/// Left-join qualifying rows with reference-event profiles.
pub fn merge_features(
    qualifying: &[QualifyingRecord],
    profiles: &SessionProfiles,
    mapping: &DriverMapping,
) -> FeatureTable {
    let mut sectors: HashMap<String, [f64; 3]> = HashMap::new();
    for p in &profiles.sectors {
        sectors
            .entry(mapping.resolve(&p.driver))
            .or_insert([p.sector1, p.sector2, p.sector3]);
    }

    let mut laps: HashMap<String, f64> = HashMap::new();
    for p in &profiles.laps {
        laps.entry(mapping.resolve(&p.driver)).or_insert(p.lap_time);
    }

    let rows = qualifying
        .iter()
        .map(|q| {
            let sector = sectors.get(&q.driver);
            FeatureRow {
                driver: q.driver.clone(),
                driver_code: q.driver_code.clone(),
                position: q.position,
                qualifying_time: q.qualifying_time,
                sector1: sector.map(|s| s[0]),
                sector2: sector.map(|s| s[1]),
                sector3: sector.map(|s| s[2]),
                label: laps.get(&q.driver).copied(),
                predicted_race_time: None,
            }
        })
        .collect();

    FeatureTable::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sectors::{DriverLapProfile, DriverSectorProfile};

    fn quali(code: &str, driver: &str, time: Option<f64>) -> QualifyingRecord {
        QualifyingRecord {
            driver_code: code.to_string(),
            driver: driver.to_string(),
            position: None,
            qualifying_time: time,
        }
    }

    fn profiles(entries: &[(&str, [f64; 3], Option<f64>)]) -> SessionProfiles {
        let mut p = SessionProfiles::default();
        for (driver, s, lap) in entries {
            p.sectors.push(DriverSectorProfile {
                driver: driver.to_string(),
                sector1: s[0],
                sector2: s[1],
                sector3: s[2],
            });
            if let Some(lap_time) = lap {
                p.laps.push(DriverLapProfile {
                    driver: driver.to_string(),
                    lap_time: *lap_time,
                });
            }
        }
        p
    }

    fn mapping() -> DriverMapping {
        let mut m = DriverMapping::new();
        m.insert("VER", "Max Verstappen");
        m.insert("NOR", "Lando Norris");
        m
    }

    #[test]
    fn test_left_join_on_canonical_name() {
        let table = merge_features(
            &[
                quali("VER", "Max Verstappen", Some(88.0)),
                quali("ROO", "ROO", Some(89.0)),
            ],
            &profiles(&[("VER", [20.0, 21.0, 22.0], Some(65.0))]),
            &mapping(),
        );

        assert_eq!(table.len(), 2);
        let ver = &table.rows()[0];
        assert_eq!(ver.sector2, Some(21.0));
        assert_eq!(ver.label, Some(65.0));
        assert!(ver.is_trainable());

        let rookie = &table.rows()[1];
        assert_eq!(rookie.sector1, None);
        assert_eq!(rookie.label, None);
        assert!(!rookie.is_complete());
    }

    #[test]
    fn test_training_set_excludes_missing_values() {
        let table = merge_features(
            &[
                quali("VER", "Max Verstappen", Some(88.0)),
                quali("NOR", "Lando Norris", None),
                quali("ROO", "ROO", Some(89.0)),
                quali("XXX", "XXX", Some(90.0)),
            ],
            &profiles(&[
                ("VER", [20.0, 21.0, 22.0], Some(65.0)),
                ("NOR", [19.0, 20.0, 21.0], Some(63.0)),
                // Sector profile but no lap label
                ("XXX", [22.0, 23.0, 24.0], None),
            ]),
            &mapping(),
        );

        let training = table.training_set().unwrap();
        assert_eq!(training.len(), 1);
        assert_eq!(training.row_indices, vec![0]);
        assert_eq!(training.features.dim(), (1, FEATURE_COUNT));
        assert!(training.features.iter().all(|v| v.is_finite()));
        assert_eq!(training.labels[0], 65.0);
    }

    #[test]
    fn test_feature_matrix_zero_fills() {
        let table = merge_features(
            &[
                quali("VER", "Max Verstappen", Some(88.0)),
                quali("ROO", "ROO", None),
            ],
            &profiles(&[("VER", [20.0, 21.0, 22.0], Some(65.0))]),
            &mapping(),
        );

        let x = table.feature_matrix().unwrap();
        assert_eq!(x.dim(), (2, 4));
        assert_eq!(x.row(0).to_vec(), vec![88.0, 20.0, 21.0, 22.0]);
        assert_eq!(x.row(1).to_vec(), vec![0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_duplicate_historical_name_keeps_first() {
        let mut m = mapping();
        m.insert("VE2", "Max Verstappen");
        let table = merge_features(
            &[quali("VER", "Max Verstappen", Some(88.0))],
            &profiles(&[
                ("VER", [20.0, 21.0, 22.0], Some(65.0)),
                ("VE2", [30.0, 31.0, 32.0], Some(95.0)),
            ]),
            &m,
        );
        assert_eq!(table.rows()[0].sector1, Some(20.0));
        assert_eq!(table.rows()[0].label, Some(65.0));
    }

    #[test]
    fn test_set_predictions() {
        let mut table = merge_features(
            &[quali("VER", "Max Verstappen", Some(88.0))],
            &SessionProfiles::default(),
            &mapping(),
        );
        table.set_predictions(&[64.5]);
        assert_eq!(table.rows()[0].predicted_race_time, Some(64.5));
        assert_eq!(
            table.rows()[0].feature(FeatureColumn::QualifyingTime),
            Some(88.0)
        );
    }
}
