use super::{EmbedError, Embedder};
use crate::core::models::conformer::Geometry;
use crate::core::models::molecule::Molecule;
use nalgebra::{Point3, Vector3};
use rand::Rng;
use rand::rngs::StdRng;
use std::collections::VecDeque;

const COMPONENT_SPACING: f64 = 8.0;
const OVERLAP_FACTOR: f64 = 0.5;
const ORDER_SHORTENING: f64 = 0.1332;

/// Places atoms breadth-first from a root, putting each new atom at its bond length from
/// the parent in the sampled direction that keeps it farthest from everything placed so far.
///
/// Disconnected components are laid out side by side along the x axis. A geometry in which
/// two non-bonded atoms sit closer than half their covalent radius sum is rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadEmbedder {
    /// Directions sampled per placed atom.
    pub samples: usize,
    /// Maximum random displacement applied to every atom after placement, in Angstroms.
    pub jitter: f64,
}

impl Default for SpreadEmbedder {
    fn default() -> Self {
        Self {
            samples: 12,
            jitter: 0.05,
        }
    }
}

impl Embedder for SpreadEmbedder {
    fn embed(&self, molecule: &Molecule, rng: &mut StdRng) -> Result<Geometry, EmbedError> {
        if molecule.is_empty() {
            return Err(EmbedError::EmptyMolecule);
        }

        let n = molecule.atom_count();
        let components = molecule.components();
        let mut positions: Vec<Option<Point3<f64>>> = vec![None; n];
        let mut placed: Vec<usize> = Vec::with_capacity(n);

        for root in 0..n {
            if positions[root].is_some() {
                continue;
            }
            let offset = components[root] as f64 * COMPONENT_SPACING;
            positions[root] = Some(Point3::new(offset, 0.0, 0.0));
            placed.push(root);

            let mut queue = VecDeque::from([root]);
            while let Some(parent) = queue.pop_front() {
                let Some(origin) = positions[parent] else {
                    continue;
                };
                for &child in molecule.neighbors(parent) {
                    if positions[child].is_some() {
                        continue;
                    }
                    let length = rest_length(molecule, parent, child);
                    let position = (0..self.samples.max(1))
                        .map(|_| origin + random_unit_vector(rng) * length)
                        .map(|candidate| (clearance(&candidate, &positions, &placed, parent), candidate))
                        .max_by(|a, b| a.0.total_cmp(&b.0))
                        .map(|(_, candidate)| candidate)
                        .unwrap_or(origin);
                    positions[child] = Some(position);
                    placed.push(child);
                    queue.push_back(child);
                }
            }
        }

        let mut geometry: Geometry = positions.into_iter().flatten().collect();
        for p in geometry.iter_mut() {
            *p += random_unit_vector(rng) * (self.jitter * rng.r#gen::<f64>());
        }

        check_overlaps(molecule, &geometry)?;
        Ok(geometry)
    }
}

fn rest_length(molecule: &Molecule, a: usize, b: usize) -> f64 {
    let sum = molecule.atoms()[a].element.covalent_radius()
        + molecule.atoms()[b].element.covalent_radius();
    let multiplicity = molecule
        .bond_between(a, b)
        .map_or(1.0, |bond| bond.order.multiplicity());
    sum * (1.0 - ORDER_SHORTENING * multiplicity.ln())
}

fn random_unit_vector(rng: &mut StdRng) -> Vector3<f64> {
    loop {
        let v = Vector3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let norm = v.norm();
        if norm > 1e-3 && norm <= 1.0 {
            return v / norm;
        }
    }
}

/// Distance from `candidate` to the nearest placed atom other than `parent`.
fn clearance(
    candidate: &Point3<f64>,
    positions: &[Option<Point3<f64>>],
    placed: &[usize],
    parent: usize,
) -> f64 {
    placed
        .iter()
        .filter(|&&idx| idx != parent)
        .filter_map(|&idx| positions[idx])
        .map(|p| nalgebra::distance(candidate, &p))
        .fold(f64::INFINITY, f64::min)
}

fn check_overlaps(molecule: &Molecule, geometry: &Geometry) -> Result<(), EmbedError> {
    let atoms = molecule.atoms();
    for i in 0..geometry.len() {
        for j in (i + 1)..geometry.len() {
            if molecule.bond_between(i, j).is_some() {
                continue;
            }
            let limit = OVERLAP_FACTOR
                * (atoms[i].element.covalent_radius() + atoms[j].element.covalent_radius());
            if nalgebra::distance(&geometry[i], &geometry[j]) < limit {
                return Err(EmbedError::Overlap { i, j });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notation::{hydrogens, smiles};
    use rand::SeedableRng;

    fn expanded(notation: &str) -> Molecule {
        hydrogens::add_explicit_hydrogens(&smiles::parse(notation).unwrap())
    }

    #[test]
    fn embeds_every_atom_at_bonded_distances() {
        let molecule = expanded("CCO");
        let mut rng = StdRng::seed_from_u64(7);
        let geometry = SpreadEmbedder::default().embed(&molecule, &mut rng).unwrap();
        assert_eq!(geometry.len(), molecule.atom_count());

        for bond in molecule.bonds() {
            let d = nalgebra::distance(&geometry[bond.i], &geometry[bond.j]);
            let expected = rest_length(&molecule, bond.i, bond.j);
            assert!((d - expected).abs() < 0.2, "bond {:?}: {} vs {}", bond, d, expected);
        }
    }

    #[test]
    fn same_rng_state_gives_same_geometry() {
        let molecule = expanded("c1ccccc1O");
        let embedder = SpreadEmbedder::default();
        let a = embedder
            .embed(&molecule, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = embedder
            .embed(&molecule, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn disconnected_components_are_separated() {
        let molecule = expanded("[Na+].[Cl-]");
        let geometry = SpreadEmbedder::default()
            .embed(&molecule, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert!(nalgebra::distance(&geometry[0], &geometry[1]) > 5.0);
    }

    #[test]
    fn multiple_bonds_are_shorter() {
        let molecule = smiles::parse("CC=CC#C").unwrap();
        assert!(rest_length(&molecule, 1, 2) < rest_length(&molecule, 0, 1));
        assert!(rest_length(&molecule, 3, 4) < rest_length(&molecule, 1, 2));
    }

    #[test]
    fn coincident_atoms_are_reported_as_overlap() {
        let molecule = smiles::parse("C.C").unwrap();
        let geometry = vec![Point3::origin(), Point3::new(0.1, 0.0, 0.0)];
        assert_eq!(
            check_overlaps(&molecule, &geometry),
            Err(EmbedError::Overlap { i: 0, j: 1 })
        );
    }
}
