use super::atom::Atom;
use super::element::Element;
use super::topology::{Bond, BondOrder};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoleculeError {
    #[error("Atom index {0} is out of bounds")]
    AtomOutOfBounds(usize),
    #[error("Atom {0} cannot be bonded to itself")]
    SelfBond(usize),
    #[error("Atoms {0} and {1} are already bonded")]
    DuplicateBond(usize, usize),
}

/// A molecular connectivity graph.
///
/// Atoms are addressed by their insertion index. Adjacency lists are kept in sync with
/// the bond list so neighbor queries do not scan every bond.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<usize>>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    pub fn add_bond(&mut self, a: usize, b: usize, order: BondOrder) -> Result<(), MoleculeError> {
        for idx in [a, b] {
            if idx >= self.atoms.len() {
                return Err(MoleculeError::AtomOutOfBounds(idx));
            }
        }
        if a == b {
            return Err(MoleculeError::SelfBond(a));
        }
        if self.bond_between(a, b).is_some() {
            return Err(MoleculeError::DuplicateBond(a.min(b), a.max(b)));
        }
        self.bonds.push(Bond::new(a, b, order));
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        Ok(())
    }

    #[inline]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    #[inline]
    pub fn atoms_mut(&mut self) -> &mut [Atom] {
        &mut self.atoms
    }

    #[inline]
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    #[inline]
    pub fn atom(&self, idx: usize) -> Option<&Atom> {
        self.atoms.get(idx)
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn neighbors(&self, idx: usize) -> &[usize] {
        self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        let (i, j) = if a <= b { (a, b) } else { (b, a) };
        self.neighbors(a)
            .contains(&b)
            .then(|| self.bonds.iter().find(|bond| bond.i == i && bond.j == j))
            .flatten()
    }

    /// Sum of bond multiplicities of explicit bonds on an atom.
    pub fn bond_order_sum(&self, idx: usize) -> f64 {
        self.bonds
            .iter()
            .filter(|bond| bond.contains(idx))
            .map(|bond| bond.order.multiplicity())
            .sum()
    }

    pub fn count_element(&self, element: Element) -> usize {
        self.atoms.iter().filter(|a| a.element == element).count()
    }

    /// Total hydrogen count, explicit and implicit.
    pub fn hydrogen_count(&self) -> usize {
        self.count_element(Element::H)
            + self
                .atoms
                .iter()
                .map(|a| a.implicit_hydrogens as usize)
                .sum::<usize>()
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| !a.is_hydrogen()).count()
    }

    /// Hill-ordered molecular formula (C first, then H, then alphabetical).
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;

        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.element.symbol()).or_default() += 1;
        }
        let implicit: usize = self.atoms.iter().map(|a| a.implicit_hydrogens as usize).sum();
        if implicit > 0 {
            *counts.entry("H").or_default() += implicit;
        }

        let mut formula = String::new();
        let mut push = |symbol: &str, count: usize| {
            formula.push_str(symbol);
            if count > 1 {
                formula.push_str(&count.to_string());
            }
        };
        let has_carbon = counts.contains_key("C");
        if has_carbon {
            for symbol in ["C", "H"] {
                if let Some(count) = counts.remove(symbol) {
                    push(symbol, count);
                }
            }
        }
        for (symbol, count) in counts {
            push(symbol, count);
        }
        formula
    }

    /// Labels each atom with the index of its connected component.
    pub fn components(&self) -> Vec<usize> {
        let mut labels = vec![usize::MAX; self.atoms.len()];
        let mut next = 0;
        for start in 0..self.atoms.len() {
            if labels[start] != usize::MAX {
                continue;
            }
            let mut stack = vec![start];
            labels[start] = next;
            while let Some(current) = stack.pop() {
                for &n in self.neighbors(current) {
                    if labels[n] == usize::MAX {
                        labels[n] = next;
                        stack.push(n);
                    }
                }
            }
            next += 1;
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethanol_heavy_atoms() -> Molecule {
        let mut mol = Molecule::new();
        let c1 = mol.add_atom(Atom::new(Element::C));
        let c2 = mol.add_atom(Atom::new(Element::C));
        let o = mol.add_atom(Atom::new(Element::O));
        mol.add_bond(c1, c2, BondOrder::Single).unwrap();
        mol.add_bond(c2, o, BondOrder::Single).unwrap();
        mol
    }

    #[test]
    fn add_bond_updates_adjacency_in_both_directions() {
        let mol = ethanol_heavy_atoms();
        assert_eq!(mol.neighbors(1), &[0, 2]);
        assert_eq!(mol.neighbors(0), &[1]);
        assert!(mol.bond_between(2, 1).is_some());
        assert!(mol.bond_between(0, 2).is_none());
    }

    #[test]
    fn add_bond_rejects_invalid_bonds() {
        let mut mol = ethanol_heavy_atoms();
        assert_eq!(
            mol.add_bond(0, 7, BondOrder::Single),
            Err(MoleculeError::AtomOutOfBounds(7))
        );
        assert_eq!(
            mol.add_bond(1, 1, BondOrder::Single),
            Err(MoleculeError::SelfBond(1))
        );
        assert_eq!(
            mol.add_bond(2, 1, BondOrder::Double),
            Err(MoleculeError::DuplicateBond(1, 2))
        );
    }

    #[test]
    fn formula_uses_hill_order_and_counts_implicit_hydrogens() {
        let mut mol = ethanol_heavy_atoms();
        mol.atoms_mut()[0].implicit_hydrogens = 3;
        mol.atoms_mut()[1].implicit_hydrogens = 2;
        mol.atoms_mut()[2].implicit_hydrogens = 1;
        assert_eq!(mol.formula(), "C2H6O");
        assert_eq!(mol.hydrogen_count(), 6);
        assert_eq!(mol.heavy_atom_count(), 3);
    }

    #[test]
    fn components_separate_disconnected_fragments() {
        let mut mol = ethanol_heavy_atoms();
        mol.add_atom(Atom::new(Element::Na));
        assert_eq!(mol.components(), vec![0, 0, 0, 1]);
    }

    #[test]
    fn bond_order_sum_counts_multiplicities() {
        let mut mol = Molecule::new();
        let c = mol.add_atom(Atom::new(Element::C));
        let o = mol.add_atom(Atom::new(Element::O));
        let n = mol.add_atom(Atom::new(Element::N));
        mol.add_bond(c, o, BondOrder::Double).unwrap();
        mol.add_bond(c, n, BondOrder::Single).unwrap();
        assert_eq!(mol.bond_order_sum(c), 3.0);
    }
}
