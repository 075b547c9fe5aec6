#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/podium/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod drivers;
pub mod error;
pub mod openf1;
pub mod qualifying;

pub use cache::{CacheStats, SqliteCache};
pub use drivers::DriverMapping;
pub use error::{DataError, Result};
pub use openf1::{
    LapRecord, OpenF1Client, OpenF1Config, QualifyingAttempts, SessionInfo, SessionKey,
    SessionKind,
};
pub use qualifying::{QualifyingEntry, read_qualifying, read_qualifying_csv, write_qualifying_csv};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
