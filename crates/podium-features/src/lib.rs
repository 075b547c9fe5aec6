#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/podium/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod columns;
pub mod error;
pub mod merge;
pub mod qualifying;
pub mod sectors;

pub use columns::FeatureColumn;
pub use error::{FeatureError, Result};
pub use merge::{FeatureRow, FeatureTable, TrainingSet, merge_features};
pub use qualifying::{QualifyingRecord, extract_qualifying, records_from_entries};
pub use sectors::{DriverLapProfile, DriverSectorProfile, SectorAggregator, SessionProfiles};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
