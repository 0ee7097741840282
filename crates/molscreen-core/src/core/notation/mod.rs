//! Linear molecular notations.
//!
//! [`smiles`] turns a SMILES string into a [`Molecule`](crate::core::models::molecule::Molecule)
//! with implicit hydrogen counts, and [`hydrogens`] makes those hydrogens explicit so the
//! graph can be embedded in 3D.

pub mod hydrogens;
pub mod smiles;
