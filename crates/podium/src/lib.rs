#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/podium/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod calendar;
pub mod pipeline;
pub mod source;

// Re-export main types from sub-crates
pub use podium_data as data;
pub use podium_features as features;
pub use podium_model as model;
pub use podium_output as output;

pub use calendar::{ArtifactLayout, GrandPrix};
pub use pipeline::{PipelineError, PipelineRun, PredictionPipeline, Result};
pub use source::{QualifyingSnapshot, fetch_reference_laps, snapshot_qualifying};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
