#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/podium/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod artifacts;
pub mod dashboard;
pub mod export;
pub mod report;

pub use artifacts::{read_mae, read_predictions};
pub use dashboard::{Dashboard, RankDelta, average_ranks, no_predictions_message};
pub use export::{ExportError, ExportFormat, Exporter, ResultWriter, format_mae};
pub use report::{PredictionReport, PredictionReportBuilder, PredictionRow, ReportError};

