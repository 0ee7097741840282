//! # Engine Module
//!
//! The layer between the stateless [`core`](crate::core) building blocks and the
//! batch-level [`workflows`](crate::workflows).
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated run settings built through builder types
//! - **Error Handling** ([`error`]) - Fatal [`error::EngineError`] and per-molecule [`error::MoleculeError`]
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Outcomes** ([`outcome`]) - Per-entity processed/skipped results
//! - **Tasks** ([`tasks`]) - Conformer search for one molecule and consensus scoring for one row

pub mod config;
pub mod error;
pub mod outcome;
pub mod progress;
pub mod tasks;
