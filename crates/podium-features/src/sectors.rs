//! Sector and Lap Aggregation
//!
//! Reduces the laps of one historical race to per-driver mean sector times
//! and mean lap time. Only complete laps (lap time and all three sectors
//! present) are used; nothing is imputed.

use crate::columns::FeatureColumn;
use crate::error::{FeatureError, Result};
use podium_data::LapRecord;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DRIVER: &str = "driver";
const LAP_TIME: &str = "lap_time";

/// Mean sector times (seconds) of one driver at one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSectorProfile {
    /// Provider driver code
    pub driver: String,
    /// Mean sector 1 time
    pub sector1: f64,
    /// Mean sector 2 time
    pub sector2: f64,
    /// Mean sector 3 time
    pub sector3: f64,
}

/// Mean lap time (seconds) of one driver at one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverLapProfile {
    /// Provider driver code
    pub driver: String,
    /// Mean lap time
    pub lap_time: f64,
}

/// Aggregated profiles of one session, in first-appearance driver order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionProfiles {
    /// Sector profiles
    pub sectors: Vec<DriverSectorProfile>,
    /// Lap profiles
    pub laps: Vec<DriverLapProfile>,
}

impl SessionProfiles {
    /// Number of drivers with at least one complete lap.
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    /// Whether no driver completed a lap.
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

/// Aggregates lap records into per-driver profiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectorAggregator;

impl SectorAggregator {
    /// Create an aggregator.
    pub const fn new() -> Self {
        Self
    }

    /// Aggregate lap records of one event.
    pub fn aggregate(&self, laps: &[LapRecord]) -> Result<SessionProfiles> {
        if laps.is_empty() {
            return Ok(SessionProfiles::default());
        }

        let means = self.compute_means(laps_frame(laps)?.lazy()).collect()?;
        let profiles = profiles_from_frame(&means)?;

        debug!(
            laps = laps.len(),
            drivers = profiles.len(),
            "aggregated sector times"
        );
        Ok(profiles)
    }

    /// Drop incomplete laps and average the rest per driver.
    pub fn compute_means(&self, data: LazyFrame) -> LazyFrame {
        let [_, s1, s2, s3] = FeatureColumn::all().map(|c| c.frame_name());

        data.filter(
            col(LAP_TIME)
                .is_not_null()
                .and(col(s1).is_not_null())
                .and(col(s2).is_not_null())
                .and(col(s3).is_not_null()),
        )
        .group_by_stable([col(DRIVER)])
        .agg([
            col(s1).mean(),
            col(s2).mean(),
            col(s3).mean(),
            col(LAP_TIME).mean(),
        ])
    }
}

/// Build a frame of lap times in seconds, nulls where absent.
fn laps_frame(laps: &[LapRecord]) -> Result<DataFrame> {
    let secs = |d: Option<std::time::Duration>| d.map(|d| d.as_secs_f64());

    let drivers: Vec<&str> = laps.iter().map(|l| l.driver.as_str()).collect();
    let lap_times: Vec<Option<f64>> = laps.iter().map(|l| secs(l.lap_time)).collect();
    let sector1: Vec<Option<f64>> = laps.iter().map(|l| secs(l.sector1)).collect();
    let sector2: Vec<Option<f64>> = laps.iter().map(|l| secs(l.sector2)).collect();
    let sector3: Vec<Option<f64>> = laps.iter().map(|l| secs(l.sector3)).collect();

    let df = DataFrame::new(vec![
        Series::new(DRIVER.into(), drivers).into(),
        Series::new(LAP_TIME.into(), lap_times).into(),
        Series::new(FeatureColumn::Sector1.frame_name().into(), sector1).into(),
        Series::new(FeatureColumn::Sector2.frame_name().into(), sector2).into(),
        Series::new(FeatureColumn::Sector3.frame_name().into(), sector3).into(),
    ])?;
    Ok(df)
}

fn profiles_from_frame(df: &DataFrame) -> Result<SessionProfiles> {
    let drivers = df.column(DRIVER)?.str()?;
    let lap_times = df.column(LAP_TIME)?.f64()?;
    let s1 = df.column(FeatureColumn::Sector1.frame_name())?.f64()?;
    let s2 = df.column(FeatureColumn::Sector2.frame_name())?.f64()?;
    let s3 = df.column(FeatureColumn::Sector3.frame_name())?.f64()?;

    let missing = |column: &str, row: usize| FeatureError::MissingValue {
        column: column.to_string(),
        row,
    };

    let mut profiles = SessionProfiles::default();
    for i in 0..df.height() {
        let driver = drivers.get(i).ok_or_else(|| missing(DRIVER, i))?.to_string();
        let lap_time = lap_times.get(i).ok_or_else(|| missing(LAP_TIME, i))?;

        profiles.sectors.push(DriverSectorProfile {
            driver: driver.clone(),
            sector1: s1.get(i).ok_or_else(|| missing("sector1", i))?,
            sector2: s2.get(i).ok_or_else(|| missing("sector2", i))?,
            sector3: s3.get(i).ok_or_else(|| missing("sector3", i))?,
        });
        profiles.laps.push(DriverLapProfile { driver, lap_time });
    }

    Ok(profiles)
}
