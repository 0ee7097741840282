use super::params::ForcefieldParams;
use super::potentials;
use super::term::EnergyTerm;
use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use itertools::Itertools;
use nalgebra::{Point3, Vector3};
use std::collections::VecDeque;
use thiserror::Error;

const TETRAHEDRAL_DEG: f64 = 109.4712;
const MIN_SIN_THETA: f64 = 1e-8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForcefieldError {
    #[error("Parameter set '{params}' has no parameters for {element} (atom {atom})")]
    MissingParameters {
        params: String,
        atom: usize,
        element: Element,
    },
    #[error("Coordinate count {actual} does not match atom count {expected}")]
    CoordinateMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BondTerm {
    i: usize,
    j: usize,
    rest_length: f64,
    k: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AngleTerm {
    a: usize,
    center: usize,
    b: usize,
    rest_angle: f64,
    k: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PairTerm {
    i: usize,
    j: usize,
    r_min: f64,
    well_depth: f64,
    charge_product: f64,
    scale: f64,
}

/// A force field instantiated for one molecule: every energy term is precomputed so that
/// evaluating a geometry is a plain loop over terms.
#[derive(Debug, Clone)]
pub struct ForceField {
    atom_count: usize,
    dielectric: f64,
    bonds: Vec<BondTerm>,
    angles: Vec<AngleTerm>,
    pairs: Vec<PairTerm>,
}

impl ForceField {
    pub fn setup(molecule: &Molecule, params: &ForcefieldParams) -> Result<Self, ForcefieldError> {
        let element_params = molecule
            .atoms()
            .iter()
            .enumerate()
            .map(|(idx, atom)| {
                params
                    .element(atom.element)
                    .ok_or_else(|| ForcefieldError::MissingParameters {
                        params: params.name.clone(),
                        atom: idx,
                        element: atom.element,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let globals = &params.globals;

        let bonds = molecule
            .bonds()
            .iter()
            .map(|bond| {
                let multiplicity = bond.order.multiplicity();
                BondTerm {
                    i: bond.i,
                    j: bond.j,
                    rest_length: params.bond_length(
                        element_params[bond.i].bond_radius,
                        element_params[bond.j].bond_radius,
                        multiplicity,
                    ),
                    k: globals.bond_force_constant * multiplicity,
                }
            })
            .collect();

        let mut angles = Vec::new();
        for center in 0..molecule.atom_count() {
            let rest_angle = rest_angle_for(molecule, center).to_radians();
            for (&a, &b) in molecule.neighbors(center).iter().tuple_combinations() {
                angles.push(AngleTerm {
                    a,
                    center,
                    b,
                    rest_angle,
                    k: globals.angle_force_constant,
                });
            }
        }

        let mut pairs = Vec::new();
        for i in 0..molecule.atom_count() {
            let separation = bond_separations(molecule, i, 3);
            for j in (i + 1)..molecule.atom_count() {
                let scale = match separation[j] {
                    Some(1) | Some(2) => continue,
                    Some(3) => globals.scale_14,
                    _ => 1.0,
                };
                let (pi, pj) = (element_params[i], element_params[j]);
                pairs.push(PairTerm {
                    i,
                    j,
                    r_min: (pi.vdw_radius + pj.vdw_radius) / 2.0,
                    well_depth: (pi.well_depth * pj.well_depth).sqrt(),
                    charge_product: f64::from(molecule.atoms()[i].formal_charge)
                        * f64::from(molecule.atoms()[j].formal_charge),
                    scale,
                });
            }
        }

        Ok(Self {
            atom_count: molecule.atom_count(),
            dielectric: globals.dielectric_constant,
            bonds,
            angles,
            pairs,
        })
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    pub fn term_counts(&self) -> (usize, usize, usize) {
        (self.bonds.len(), self.angles.len(), self.pairs.len())
    }

    fn check(&self, positions: &[Point3<f64>]) -> Result<(), ForcefieldError> {
        if positions.len() != self.atom_count {
            return Err(ForcefieldError::CoordinateMismatch {
                expected: self.atom_count,
                actual: positions.len(),
            });
        }
        Ok(())
    }

    pub fn energy(&self, positions: &[Point3<f64>]) -> Result<f64, ForcefieldError> {
        Ok(self.energy_terms(positions)?.total())
    }

    /// Evaluates the energy of a geometry, broken down by term.
    pub fn energy_terms(&self, positions: &[Point3<f64>]) -> Result<EnergyTerm, ForcefieldError> {
        self.check(positions)?;
        let mut term = EnergyTerm::default();

        for bond in &self.bonds {
            let dist = (positions[bond.i] - positions[bond.j]).norm();
            term.bond += potentials::harmonic(dist, bond.rest_length, bond.k);
        }

        for angle in &self.angles {
            let u = positions[angle.a] - positions[angle.center];
            let v = positions[angle.b] - positions[angle.center];
            let theta = u.angle(&v);
            term.angle += potentials::harmonic(theta, angle.rest_angle, angle.k);
        }

        for pair in &self.pairs {
            let dist = (positions[pair.i] - positions[pair.j]).norm();
            term.vdw +=
                pair.scale * potentials::lennard_jones_12_6(dist, pair.r_min, pair.well_depth);
            if pair.charge_product != 0.0 {
                term.coulomb += pair.scale
                    * potentials::coulomb(dist, pair.charge_product, 1.0, self.dielectric);
            }
        }

        Ok(term)
    }

    /// Returns the energy and its gradient with respect to every atom position.
    pub fn energy_and_gradient(
        &self,
        positions: &[Point3<f64>],
    ) -> Result<(f64, Vec<Vector3<f64>>), ForcefieldError> {
        self.check(positions)?;
        let mut total = 0.0;
        let mut gradient = vec![Vector3::zeros(); self.atom_count];

        for bond in &self.bonds {
            let r = positions[bond.i] - positions[bond.j];
            let dist = r.norm();
            total += potentials::harmonic(dist, bond.rest_length, bond.k);
            if dist > 0.0 {
                let g = r * (potentials::harmonic_derivative(dist, bond.rest_length, bond.k) / dist);
                gradient[bond.i] += g;
                gradient[bond.j] -= g;
            }
        }

        for angle in &self.angles {
            let u = positions[angle.a] - positions[angle.center];
            let v = positions[angle.b] - positions[angle.center];
            let (lu, lv) = (u.norm(), v.norm());
            if lu == 0.0 || lv == 0.0 {
                continue;
            }
            let cos_theta = (u.dot(&v) / (lu * lv)).clamp(-1.0, 1.0);
            let theta = cos_theta.acos();
            total += potentials::harmonic(theta, angle.rest_angle, angle.k);

            let sin_theta = (1.0 - cos_theta * cos_theta).sqrt().max(MIN_SIN_THETA);
            let de_dtheta = potentials::harmonic_derivative(theta, angle.rest_angle, angle.k);
            let dcos_du = (v / (lu * lv)) - u * (cos_theta / (lu * lu));
            let dcos_dv = (u / (lu * lv)) - v * (cos_theta / (lv * lv));
            let ga = dcos_du * (-de_dtheta / sin_theta);
            let gb = dcos_dv * (-de_dtheta / sin_theta);
            gradient[angle.a] += ga;
            gradient[angle.b] += gb;
            gradient[angle.center] -= ga + gb;
        }

        for pair in &self.pairs {
            let r = positions[pair.i] - positions[pair.j];
            let dist = r.norm();
            let mut e = potentials::lennard_jones_12_6(dist, pair.r_min, pair.well_depth);
            let mut de = potentials::lennard_jones_12_6_derivative(dist, pair.r_min, pair.well_depth);
            if pair.charge_product != 0.0 {
                e += potentials::coulomb(dist, pair.charge_product, 1.0, self.dielectric);
                de += potentials::coulomb_derivative(dist, pair.charge_product, 1.0, self.dielectric);
            }
            total += pair.scale * e;
            if dist > 0.0 {
                let g = r * (pair.scale * de / dist);
                gradient[pair.i] += g;
                gradient[pair.j] -= g;
            }
        }

        Ok((total, gradient))
    }
}

/// Equilibrium angle at `center`, in degrees, from its coordination and bond orders.
fn rest_angle_for(molecule: &Molecule, center: usize) -> f64 {
    let degree = molecule.neighbors(center).len();
    if degree >= 5 {
        return 90.0;
    }
    if degree == 4 {
        return TETRAHEDRAL_DEG;
    }

    let orders = molecule
        .neighbors(center)
        .iter()
        .filter_map(|&n| molecule.bond_between(center, n))
        .map(|b| b.order);
    let (mut doubles, mut triples, mut aromatic) = (0, 0, 0);
    for order in orders {
        match order {
            BondOrder::Double => doubles += 1,
            BondOrder::Triple => triples += 1,
            BondOrder::Aromatic => aromatic += 1,
            BondOrder::Single => {}
        }
    }

    if triples > 0 || doubles >= 2 {
        180.0
    } else if doubles > 0 || aromatic > 0 || molecule.atoms()[center].aromatic {
        120.0
    } else {
        TETRAHEDRAL_DEG
    }
}

/// Shortest bond-path length from `start` to every atom, up to `max_depth` bonds.
fn bond_separations(molecule: &Molecule, start: usize, max_depth: usize) -> Vec<Option<usize>> {
    let mut depth = vec![None; molecule.atom_count()];
    depth[start] = Some(0);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        let d = depth[current].unwrap_or(0);
        if d == max_depth {
            continue;
        }
        for &n in molecule.neighbors(current) {
            if depth[n].is_none() {
                depth[n] = Some(d + 1);
                queue.push_back(n);
            }
        }
    }
    depth
}
