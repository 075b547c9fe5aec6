//! Session identification.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provider-assigned numeric session identifier.
pub type SessionKey = u32;

/// Kind of session within a race weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    /// First free practice
    Practice1,
    /// Second free practice
    Practice2,
    /// Third free practice
    Practice3,
    /// Sprint qualifying (shootout)
    SprintQualifying,
    /// Sprint race
    Sprint,
    /// Grand Prix qualifying
    Qualifying,
    /// Grand Prix race
    Race,
}

impl SessionKind {
    /// Returns all session kinds in weekend order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Practice1,
            Self::Practice2,
            Self::Practice3,
            Self::SprintQualifying,
            Self::Sprint,
            Self::Qualifying,
            Self::Race,
        ]
    }

    /// Returns the short session code ("R", "Q", "FP1", ...).
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Practice1 => "FP1",
            Self::Practice2 => "FP2",
            Self::Practice3 => "FP3",
            Self::SprintQualifying => "SQ",
            Self::Sprint => "S",
            Self::Qualifying => "Q",
            Self::Race => "R",
        }
    }

    /// Returns the session name as the provider spells it.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Practice1 => "Practice 1",
            Self::Practice2 => "Practice 2",
            Self::Practice3 => "Practice 3",
            Self::SprintQualifying => "Sprint Qualifying",
            Self::Sprint => "Sprint",
            Self::Qualifying => "Qualifying",
            Self::Race => "Race",
        }
    }

    /// Parse a session kind from its short code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "FP1" => Some(Self::Practice1),
            "FP2" => Some(Self::Practice2),
            "FP3" => Some(Self::Practice3),
            "SQ" => Some(Self::SprintQualifying),
            "S" => Some(Self::Sprint),
            "Q" => Some(Self::Qualifying),
            "R" => Some(Self::Race),
            _ => None,
        }
    }

    /// Whether results carry per-round (Q1/Q2/Q3) times.
    pub const fn is_qualifying(&self) -> bool {
        matches!(self, Self::Qualifying | Self::SprintQualifying)
    }
}

impl FromStr for SessionKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s).ok_or_else(|| DataError::InvalidSessionCode(s.to_string()))
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Session metadata as returned by the `sessions` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session identifier used by the other endpoints
    pub session_key: SessionKey,
    /// Meeting (race weekend) identifier
    pub meeting_key: u32,
    /// Session name, e.g. "Race"
    pub session_name: String,
    /// Hosting country
    pub country_name: String,
    /// Circuit short name
    #[serde(default)]
    pub circuit_short_name: Option<String>,
    /// Season year
    pub year: i32,
    /// Scheduled start (ISO 8601)
    #[serde(default)]
    pub date_start: Option<String>,
}
