//! # Force Field Module
//!
//! Molecular mechanics for small organic molecules: energy evaluation, local geometry
//! minimization and the optimization methods the conformer workflow chains together.
//!
//! ## Overview
//!
//! The built-in force field is a compact valence model:
//!
//! - **Bond stretching** as a harmonic term around a rest length derived from atomic radii
//!   and bond order
//! - **Angle bending** as a harmonic term around a hybridization-based rest angle
//! - **Van der Waals interactions** using a Lennard-Jones 12-6 potential
//! - **Electrostatic interactions** with Coulomb's law on formal charges
//!
//! Non-bonded terms exclude 1-2 and 1-3 pairs and scale 1-4 pairs.
//!
//! ## Key Components
//!
//! - [`params`] - Named parameter sets (`typed`, `universal`, or loaded from TOML)
//! - [`energy`] - [`energy::ForceField`], the per-molecule term list with analytic gradients
//! - [`minimize`] - Conjugate-gradient minimizer with an optional deadline
//! - [`method`] - The [`method::OptimizationMethod`] trait and the primary/fallback chain
//! - [`term`] - Energy breakdown by term type
//!
//! ## Usage
//!
//! ```ignore
//! use molscreen::core::forcefield::method::{ForcefieldMethod, OptimizationMethod};
//! use molscreen::core::forcefield::minimize::Minimizer;
//! use molscreen::core::forcefield::params::ForcefieldParams;
//!
//! let method = ForcefieldMethod::new(ForcefieldParams::typed(), Minimizer::default());
//! let outcome = method.optimize(&molecule, &mut positions, None);
//! ```

pub mod energy;
pub mod method;
pub mod minimize;
pub mod params;
pub(crate) mod potentials;
pub mod term;
