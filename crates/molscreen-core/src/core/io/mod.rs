//! Provides input/output for the formats the workflows read and write.
//!
//! Molecules come in as line-oriented notation lists and leave as V2000 SD files.
//! Descriptor tables and predictions are CSV; scaler and model artifacts are TOML.

pub mod artifacts;
pub mod notation;
pub mod sdf;
pub mod tables;
