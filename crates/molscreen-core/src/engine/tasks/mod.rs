//! Per-entity units of work.
//!
//! Each task handles exactly one molecule or descriptor row and knows nothing about
//! batching, ordering or parallelism; the workflows drive them over whole inputs.

pub mod consensus;
pub mod conformer_search;
