//! Readers for persisted prediction artifacts.
//!
//! A missing artifact means the pipeline has not run for the event yet and
//! reads as `None`, not as an error.

use crate::export::ExportError;
use crate::report::PredictionRow;
use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::Path;

/// Columns the predictions CSV must carry.
const REQUIRED_COLUMNS: [&str; 2] = ["Driver", "PredictedRaceTime (s)"];

fn open_optional(path: &Path) -> Result<Option<File>, ExportError> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read the predictions CSV, in file order.
///
/// # Errors
/// Returns `ExportError::InvalidFormat` if a required column is absent.
pub fn read_predictions<P: AsRef<Path>>(path: P) -> Result<Option<Vec<PredictionRow>>, ExportError> {
    let path = path.as_ref();
    let Some(file) = open_optional(path)? else {
        return Ok(None);
    };
    parse_predictions(file, path).map(Some)
}

fn parse_predictions<R: io::Read>(reader: R, path: &Path) -> Result<Vec<PredictionRow>, ExportError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ExportError::InvalidFormat(format!(
                "{} is missing column '{column}'",
                path.display()
            )));
        }
    }

    Ok(rdr.deserialize().collect::<Result<Vec<PredictionRow>, _>>()?)
}

/// Read the MAE text artifact.
///
/// # Errors
/// Returns `ExportError::InvalidFormat` if the file does not hold a number.
pub fn read_mae<P: AsRef<Path>>(path: P) -> Result<Option<f64>, ExportError> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    text.trim().parse::<f64>().map(Some).map_err(|e| {
        ExportError::InvalidFormat(format!("{}: {e}", path.display()))
    })
}
