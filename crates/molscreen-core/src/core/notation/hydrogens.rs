use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;

/// Returns a copy of `molecule` where every implicit hydrogen is an explicit atom.
///
/// Heavy atoms keep their indices; the new hydrogens are appended in heavy-atom order,
/// so the output layout is a deterministic function of the input graph.
pub fn add_explicit_hydrogens(molecule: &Molecule) -> Molecule {
    let mut expanded = molecule.clone();
    for parent in 0..molecule.atom_count() {
        let count = molecule.atoms()[parent].implicit_hydrogens;
        for _ in 0..count {
            let h = expanded.add_atom(Atom::new(Element::H));
            // `h` is a fresh index, so the bond is always valid.
            let _ = expanded.add_bond(parent, h, BondOrder::Single);
        }
        expanded.atoms_mut()[parent].implicit_hydrogens = 0;
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notation::smiles;

    #[test]
    fn ethanol_expands_to_nine_atoms() {
        let mol = add_explicit_hydrogens(&smiles::parse("CCO").unwrap());
        assert_eq!(mol.atom_count(), 9);
        assert_eq!(mol.bond_count(), 8);
        assert_eq!(mol.count_element(Element::H), 6);
        assert!(mol.atoms().iter().all(|a| a.implicit_hydrogens == 0));
        assert_eq!(mol.formula(), "C2H6O");
    }

    #[test]
    fn heavy_atoms_keep_their_indices() {
        let source = smiles::parse("OC=O").unwrap();
        let mol = add_explicit_hydrogens(&source);
        for (idx, atom) in source.atoms().iter().enumerate() {
            assert_eq!(mol.atoms()[idx].element, atom.element);
        }
        assert_eq!(mol.neighbors(0), &[1, 3]);
        assert_eq!(mol.neighbors(1), &[0, 2, 4]);
    }

    #[test]
    fn expansion_is_idempotent() {
        let once = add_explicit_hydrogens(&smiles::parse("c1ccccc1").unwrap());
        let twice = add_explicit_hydrogens(&once);
        assert_eq!(once, twice);
    }
}
