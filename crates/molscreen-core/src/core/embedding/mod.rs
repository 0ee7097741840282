//! # Embedding Module
//!
//! Generation of initial 3D coordinates for a hydrogen-expanded molecule graph.
//!
//! An [`Embedder`] turns connectivity into one candidate geometry per call, drawing all of
//! its randomness from the caller's RNG. [`embed_conformers`] seeds that RNG once per
//! molecule, so the same molecule, count and seed always produce the same candidates.

pub mod placement;

use crate::core::models::conformer::Geometry;
use crate::core::models::molecule::Molecule;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedError {
    #[error("Cannot embed a molecule with no atoms")]
    EmptyMolecule,
    #[error("Atoms {i} and {j} overlap in the generated geometry")]
    Overlap { i: usize, j: usize },
}

/// Produces initial coordinates for a molecule.
pub trait Embedder: Send + Sync {
    fn embed(&self, molecule: &Molecule, rng: &mut StdRng) -> Result<Geometry, EmbedError>;
}

/// A successfully embedded candidate together with its position in the requested batch.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedCandidate {
    pub index: usize,
    pub positions: Geometry,
}

/// Embeds `count` candidates with an RNG seeded from `seed`.
///
/// Each candidate gets up to `max_attempts` tries. Candidates that never embed are dropped,
/// so the result may be shorter than `count`; surviving candidates keep their batch index.
#[instrument(level = "debug", skip_all, fields(atoms = molecule.atom_count(), count, seed))]
pub fn embed_conformers(
    embedder: &dyn Embedder,
    molecule: &Molecule,
    count: usize,
    seed: u64,
    max_attempts: usize,
) -> Result<Vec<EmbeddedCandidate>, EmbedError> {
    if molecule.is_empty() {
        return Err(EmbedError::EmptyMolecule);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut candidates = Vec::with_capacity(count);
    for index in 0..count {
        let mut last_error = None;
        for _ in 0..max_attempts.max(1) {
            match embedder.embed(molecule, &mut rng) {
                Ok(positions) => {
                    candidates.push(EmbeddedCandidate { index, positions });
                    last_error = None;
                    break;
                }
                Err(e) => last_error = Some(e),
            }
        }
        if let Some(e) = last_error {
            debug!(candidate = index, error = %e, "Dropping candidate that failed to embed");
        }
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use nalgebra::Point3;
    use rand::Rng;

    struct Flaky;

    impl Embedder for Flaky {
        fn embed(&self, molecule: &Molecule, rng: &mut StdRng) -> Result<Geometry, EmbedError> {
            let x: f64 = rng.r#gen();
            if x < 0.5 {
                Err(EmbedError::Overlap { i: 0, j: 0 })
            } else {
                Ok(vec![Point3::new(x, 0.0, 0.0); molecule.atom_count()])
            }
        }
    }

    struct Never;

    impl Embedder for Never {
        fn embed(&self, _molecule: &Molecule, _rng: &mut StdRng) -> Result<Geometry, EmbedError> {
            Err(EmbedError::Overlap { i: 0, j: 1 })
        }
    }

    fn carbon() -> Molecule {
        let mut molecule = Molecule::new();
        molecule.add_atom(Atom::new(Element::C));
        molecule
    }

    #[test]
    fn same_seed_gives_identical_candidates() {
        let molecule = carbon();
        let a = embed_conformers(&Flaky, &molecule, 6, 42, 10).unwrap();
        let b = embed_conformers(&Flaky, &molecule, 6, 42, 10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn failed_candidates_are_dropped() {
        let molecule = carbon();
        let candidates = embed_conformers(&Never, &molecule, 3, 1, 2).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn empty_molecule_is_rejected() {
        let result = embed_conformers(&Flaky, &Molecule::new(), 3, 1, 2);
        assert_eq!(result, Err(EmbedError::EmptyMolecule));
    }
}
