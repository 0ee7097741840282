use nalgebra::Point3;

/// One 3D arrangement of a molecule's atoms, positions indexed in atom order.
pub type Geometry = Vec<Point3<f64>>;

/// An optimized conformer with the energy reported by the method that converged on it.
///
/// Energies are only comparable between conformers optimized by the same method.
#[derive(Debug, Clone, PartialEq)]
pub struct Conformer {
    /// Index of the embedding this conformer was optimized from.
    pub embedding_index: usize,
    pub positions: Geometry,
    /// Potential energy in kcal/mol.
    pub energy: f64,
    /// Name of the optimization method that produced `energy`.
    pub method: String,
}
