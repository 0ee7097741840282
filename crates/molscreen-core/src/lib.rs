//! # molscreen Core Library
//!
//! Small-molecule screening: 3D conformer generation from SMILES and consensus activity
//! classification from molecular descriptors.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `Conformer`), the
//!   SMILES parser, the force field and minimizer, the embedder, ensemble artifacts and
//!   file formats.
//!
//! - **[`engine`]: The Logic Core.** Validated configuration, error types, progress
//!   reporting and the per-entity tasks (conformer search for one molecule, consensus
//!   scoring for one row).
//!
//! - **[`workflows`]: The Public API.** Batch entry points that drive the engine tasks over
//!   whole inputs, in order, optionally in parallel.

pub mod core;
pub mod engine;
pub mod workflows;
