//! OpenF1 session data.
//!
//! Wraps the public OpenF1 HTTP API (<https://openf1.org>):
//! - Session lookup by season, country and session type
//! - Lap records with sector splits for a race
//! - Qualifying results with per-round times
//!
//! # Example
//!
//! ```no_run
//! use podium_data::openf1::{OpenF1Client, SessionKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenF1Client::new()?;
//!     let session = client.find_session(2024, "China", SessionKind::Race).await?;
//!     let laps = client.fetch_laps(session.session_key).await?;
//!     println!("Fetched {} laps", laps.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod laps;
pub mod results;
pub mod session;

pub use client::{OpenF1Client, OpenF1Config, request_key};
pub use laps::LapRecord;
pub use results::QualifyingAttempts;
pub use session::{SessionInfo, SessionKey, SessionKind};

use std::time::Duration;

/// Convert a provider seconds value into a duration.
///
/// Negative, infinite and NaN values are treated as absent.
pub(crate) fn seconds_to_duration(secs: Option<f64>) -> Option<Duration> {
    secs.and_then(|s| Duration::try_from_secs_f64(s).ok())
}
