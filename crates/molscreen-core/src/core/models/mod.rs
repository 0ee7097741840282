//! # Core Models Module
//!
//! Data structures describing small molecules as connectivity graphs and their 3D
//! conformers.
//!
//! ## Key Components
//!
//! - [`element`] - Element table with covalent radii and universal van der Waals data
//! - [`atom`] - Graph atoms with charge, aromaticity, and hydrogen bookkeeping
//! - [`topology`] - Bonds and bond orders
//! - [`molecule`] - The connectivity graph itself
//! - [`conformer`] - Optimized geometries tagged with the energy that selected them
//!
//! ```ignore
//! use molscreen::core::models::{atom::Atom, element::Element, molecule::Molecule};
//! use molscreen::core::models::topology::BondOrder;
//!
//! let mut mol = Molecule::new();
//! let c = mol.add_atom(Atom::new(Element::C));
//! let o = mol.add_atom(Atom::new(Element::O));
//! mol.add_bond(c, o, BondOrder::Single)?;
//! ```

pub mod atom;
pub mod conformer;
pub mod element;
pub mod molecule;
pub mod topology;
