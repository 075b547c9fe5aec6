//! Glue between the command line and the pipeline crates.
//!
//! Cache location, client construction, session fetching with progress
//! reporting and driver mapping resolution.

pub(crate) mod cache_manager;
pub(crate) mod data_pipeline;
