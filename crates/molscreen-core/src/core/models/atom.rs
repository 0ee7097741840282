use super::element::Element;

/// An atom of a molecular graph.
///
/// Coordinates are not stored here; a [`Molecule`](super::molecule::Molecule) is a pure
/// connectivity graph and each [`Conformer`](super::conformer::Conformer) carries its own
/// positions indexed in atom order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// The chemical element of the atom.
    pub element: Element,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Whether the atom was written in lowercase (aromatic) form.
    pub aromatic: bool,
    /// Mass number written in a bracket atom, if any.
    pub isotope: Option<u16>,
    /// Hydrogen count written in a bracket atom. `None` for organic-subset atoms,
    /// whose hydrogen count is derived from their default valence.
    pub bracket_hydrogens: Option<u8>,
    /// Hydrogens attached to this atom that are not yet present as explicit atoms.
    pub implicit_hydrogens: u8,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: 0,
            aromatic: false,
            isotope: None,
            bracket_hydrogens: None,
            implicit_hydrogens: 0,
        }
    }

    pub fn aromatic(element: Element) -> Self {
        Self {
            aromatic: true,
            ..Self::new(element)
        }
    }

    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        self.element == Element::H
    }
}
