//! # Core Module
//!
//! The stateless building blocks of molscreen: data models, parsers, numerical kernels
//! and file formats. Nothing here knows about batches, progress or configuration.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Elements, atoms, bonds, molecule graphs and conformers
//! - **Line Notation** ([`notation`]) - SMILES parsing and explicit-hydrogen expansion
//! - **Energy Calculations** ([`forcefield`]) - Parameter sets, energies, minimization and optimization methods
//! - **Coordinate Generation** ([`embedding`]) - Seeded 3D embedding of molecule graphs
//! - **Consensus Classification** ([`ensemble`]) - Descriptor tables, artifacts, model slots and voting
//! - **File I/O** ([`io`]) - Notation lists, SD files, CSV tables and TOML artifacts

pub mod embedding;
pub mod ensemble;
pub mod forcefield;
pub mod io;
pub mod models;
pub mod notation;
