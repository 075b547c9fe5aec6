//! Model feature columns.
//!
//! The regression input is always these four columns, in this order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of model features.
pub const FEATURE_COUNT: usize = 4;

/// One input column of the race-time model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureColumn {
    /// Best qualifying time at the target event
    QualifyingTime,
    /// Mean sector 1 time at the reference event
    Sector1,
    /// Mean sector 2 time at the reference event
    Sector2,
    /// Mean sector 3 time at the reference event
    Sector3,
}

impl FeatureColumn {
    /// Returns all feature columns in matrix order.
    pub const fn all() -> [Self; FEATURE_COUNT] {
        [Self::QualifyingTime, Self::Sector1, Self::Sector2, Self::Sector3]
    }

    /// Column index in the feature matrix.
    pub const fn index(&self) -> usize {
        match self {
            Self::QualifyingTime => 0,
            Self::Sector1 => 1,
            Self::Sector2 => 2,
            Self::Sector3 => 3,
        }
    }

    /// Header used in persisted artifacts.
    pub const fn artifact_name(&self) -> &'static str {
        match self {
            Self::QualifyingTime => "QualifyingTime (s)",
            Self::Sector1 => "Sector1Time (s)",
            Self::Sector2 => "Sector2Time (s)",
            Self::Sector3 => "Sector3Time (s)",
        }
    }

    /// Column name inside aggregation frames.
    pub const fn frame_name(&self) -> &'static str {
        match self {
            Self::QualifyingTime => "qualifying_time",
            Self::Sector1 => "sector1",
            Self::Sector2 => "sector2",
            Self::Sector3 => "sector3",
        }
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.artifact_name())
    }
}
