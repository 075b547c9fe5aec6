//! Qualifying snapshot CSV artifact.
//!
//! Columns: `DriverCode, Position, QualifyingTime (s)`. Position may be
//! written as a float (`1.0`) by other tools and is read either way.

use crate::error::{DataError, Result};
use crate::openf1::QualifyingAttempts;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Column holding the provider driver code.
pub const DRIVER_CODE_COLUMN: &str = "DriverCode";

/// One row of the qualifying snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifyingEntry {
    /// Provider driver code
    #[serde(rename = "DriverCode")]
    pub driver_code: String,
    /// Official qualifying position
    #[serde(rename = "Position", default, deserialize_with = "lenient_position")]
    pub position: Option<u32>,
    /// Best qualifying time in seconds
    #[serde(rename = "QualifyingTime (s)", default)]
    pub qualifying_time: Option<f64>,
}

impl From<&QualifyingAttempts> for QualifyingEntry {
    fn from(attempts: &QualifyingAttempts) -> Self {
        Self {
            driver_code: attempts.driver_code.clone(),
            position: attempts.position,
            qualifying_time: attempts.best_time().map(|d| d.as_secs_f64()),
        }
    }
}

fn lenient_position<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|p| p.is_finite() && *p >= 0.0)
        .map(|p| p.round() as u32))
}

/// Read a qualifying snapshot from a file.
///
/// # Errors
/// Returns `DataError::MissingColumn` if the `DriverCode` header is absent.
pub fn read_qualifying_csv<P: AsRef<Path>>(path: P) -> Result<Vec<QualifyingEntry>> {
    let path = path.as_ref();
    let file = fs::File::open(path)?;
    read_qualifying(file, &path.display().to_string())
}

/// Read a qualifying snapshot from any reader.
pub fn read_qualifying<R: io::Read>(reader: R, artifact: &str) -> Result<Vec<QualifyingEntry>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?;
    if !headers.iter().any(|h| h == DRIVER_CODE_COLUMN) {
        return Err(DataError::MissingColumn {
            column: DRIVER_CODE_COLUMN.to_string(),
            artifact: artifact.to_string(),
        });
    }

    rdr.deserialize()
        .collect::<std::result::Result<Vec<QualifyingEntry>, _>>()
        .map_err(DataError::from)
}

/// Write a qualifying snapshot, replacing the file atomically.
pub fn write_qualifying_csv<P: AsRef<Path>>(path: P, entries: &[QualifyingEntry]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("csv.tmp");
    {
        let mut wtr = csv::Writer::from_path(&tmp)?;
        for entry in entries {
            wtr.serialize(entry)?;
        }
        wtr.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_read_float_positions_and_missing_times() {
        let csv = "DriverCode,Position,QualifyingTime (s)\n\
                   NOR,1.0,75.096\n\
                   PIA,2.0,75.18\n\
                   SAR,,\n";
        let entries = read_qualifying(csv.as_bytes(), "test").unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].driver_code, "NOR");
        assert_eq!(entries[0].position, Some(1));
        assert_eq!(entries[1].qualifying_time, Some(75.18));
        assert_eq!(entries[2].position, None);
        assert_eq!(entries[2].qualifying_time, None);
    }

    #[test]
    fn test_missing_driver_code_column() {
        let csv = "Driver,Position,QualifyingTime (s)\nNOR,1,75.0\n";
        let err = read_qualifying(csv.as_bytes(), "quali.csv").unwrap_err();
        match err {
            DataError::MissingColumn { column, artifact } => {
                assert_eq!(column, "DriverCode");
                assert_eq!(artifact, "quali.csv");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_entry_from_attempts_uses_latest_round() {
        let attempts = QualifyingAttempts {
            driver_code: "VER".to_string(),
            position: Some(3),
            q1: Some(Duration::from_secs_f64(90.1)),
            q2: Some(Duration::from_secs_f64(89.5)),
            q3: None,
        };
        let entry = QualifyingEntry::from(&attempts);
        assert_eq!(entry.position, Some(3));
        assert_eq!(entry.qualifying_time, Some(89.5));
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("qualifying_test_2025.csv");
        let entries = vec![
            QualifyingEntry {
                driver_code: "LEC".to_string(),
                position: Some(1),
                qualifying_time: Some(88.25),
            },
            QualifyingEntry {
                driver_code: "ZHO".to_string(),
                position: None,
                qualifying_time: None,
            },
        ];

        write_qualifying_csv(&path, &entries).unwrap();
        assert!(!path.with_extension("csv.tmp").exists());

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("DriverCode,Position,QualifyingTime (s)"));

        let read = read_qualifying_csv(&path).unwrap();
        assert_eq!(read, entries);
    }
}
