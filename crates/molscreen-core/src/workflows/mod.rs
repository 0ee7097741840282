//! # Workflows Module
//!
//! Top-level entry points of molscreen. Each workflow drives one engine task over a whole
//! batch, reports progress, and returns a report in input order.
//!
//! ## Architecture
//!
//! - **Conformer Workflow** ([`conformers`]) - Notation list in, lowest-energy conformer per
//!   molecule out. Failing molecules are skipped, never fatal.
//! - **Classification Workflow** ([`classify`]) - Descriptor table in, consensus label per
//!   entity out. Bad rows are excluded; a mis-assembled ensemble is fatal.
//!
//! With the `parallel` feature both workflows process entities on the rayon thread pool.

pub mod classify;
pub mod conformers;
