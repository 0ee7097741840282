use phf::phf_map;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(pub String);

/// Static per-element data used by the notation parser and the force fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementData {
    pub symbol: &'static str,
    pub atomic_mass: f64,
    /// Single-bond covalent radius in Angstroms.
    pub covalent_radius: f64,
    /// Universal van der Waals minimum distance in Angstroms.
    pub vdw_distance: f64,
    /// Universal van der Waals well depth in kcal/mol.
    pub vdw_well_depth: f64,
}

/// Chemical elements up to xenon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    H = 1,
    He,
    Li,
    Be,
    B,
    C,
    N,
    O,
    F,
    Ne,
    Na,
    Mg,
    Al,
    Si,
    P,
    S,
    Cl,
    Ar,
    K,
    Ca,
    Sc,
    Ti,
    V,
    Cr,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    Ga,
    Ge,
    As,
    Se,
    Br,
    Kr,
    Rb,
    Sr,
    Y,
    Zr,
    Nb,
    Mo,
    Tc,
    Ru,
    Rh,
    Pd,
    Ag,
    Cd,
    In,
    Sn,
    Sb,
    Te,
    I,
    Xe,
}

static SYMBOLS: phf::Map<&'static str, Element> = phf_map! {
    "H" => Element::H,
    "He" => Element::He,
    "Li" => Element::Li,
    "Be" => Element::Be,
    "B" => Element::B,
    "C" => Element::C,
    "N" => Element::N,
    "O" => Element::O,
    "F" => Element::F,
    "Ne" => Element::Ne,
    "Na" => Element::Na,
    "Mg" => Element::Mg,
    "Al" => Element::Al,
    "Si" => Element::Si,
    "P" => Element::P,
    "S" => Element::S,
    "Cl" => Element::Cl,
    "Ar" => Element::Ar,
    "K" => Element::K,
    "Ca" => Element::Ca,
    "Sc" => Element::Sc,
    "Ti" => Element::Ti,
    "V" => Element::V,
    "Cr" => Element::Cr,
    "Mn" => Element::Mn,
    "Fe" => Element::Fe,
    "Co" => Element::Co,
    "Ni" => Element::Ni,
    "Cu" => Element::Cu,
    "Zn" => Element::Zn,
    "Ga" => Element::Ga,
    "Ge" => Element::Ge,
    "As" => Element::As,
    "Se" => Element::Se,
    "Br" => Element::Br,
    "Kr" => Element::Kr,
    "Rb" => Element::Rb,
    "Sr" => Element::Sr,
    "Y" => Element::Y,
    "Zr" => Element::Zr,
    "Nb" => Element::Nb,
    "Mo" => Element::Mo,
    "Tc" => Element::Tc,
    "Ru" => Element::Ru,
    "Rh" => Element::Rh,
    "Pd" => Element::Pd,
    "Ag" => Element::Ag,
    "Cd" => Element::Cd,
    "In" => Element::In,
    "Sn" => Element::Sn,
    "Sb" => Element::Sb,
    "Te" => Element::Te,
    "I" => Element::I,
    "Xe" => Element::Xe,
};

impl Element {
    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    pub fn data(&self) -> ElementData {
        let (symbol, atomic_mass, covalent_radius, vdw_distance, vdw_well_depth) = match self {
            Element::H => ("H", 1.008, 0.31, 2.886, 0.044),
            Element::He => ("He", 4.0026, 0.28, 2.362, 0.056),
            Element::Li => ("Li", 6.94, 1.28, 2.451, 0.025),
            Element::Be => ("Be", 9.0122, 0.96, 2.745, 0.085),
            Element::B => ("B", 10.81, 0.84, 4.083, 0.180),
            Element::C => ("C", 12.011, 0.76, 3.851, 0.105),
            Element::N => ("N", 14.007, 0.71, 3.660, 0.069),
            Element::O => ("O", 15.999, 0.66, 3.500, 0.060),
            Element::F => ("F", 18.998, 0.57, 3.364, 0.050),
            Element::Ne => ("Ne", 20.18, 0.58, 3.243, 0.042),
            Element::Na => ("Na", 22.99, 1.66, 2.983, 0.030),
            Element::Mg => ("Mg", 24.305, 1.41, 3.021, 0.111),
            Element::Al => ("Al", 26.982, 1.21, 4.499, 0.505),
            Element::Si => ("Si", 28.085, 1.11, 4.295, 0.402),
            Element::P => ("P", 30.974, 1.07, 4.147, 0.305),
            Element::S => ("S", 32.06, 1.05, 4.035, 0.274),
            Element::Cl => ("Cl", 35.45, 1.02, 3.947, 0.227),
            Element::Ar => ("Ar", 39.948, 1.06, 3.868, 0.185),
            Element::K => ("K", 39.098, 2.03, 3.812, 0.035),
            Element::Ca => ("Ca", 40.078, 1.76, 3.399, 0.238),
            Element::Sc => ("Sc", 44.956, 1.70, 3.295, 0.019),
            Element::Ti => ("Ti", 47.867, 1.60, 3.175, 0.017),
            Element::V => ("V", 50.942, 1.53, 3.144, 0.016),
            Element::Cr => ("Cr", 51.996, 1.39, 3.023, 0.015),
            Element::Mn => ("Mn", 54.938, 1.39, 2.961, 0.013),
            Element::Fe => ("Fe", 55.845, 1.32, 2.912, 0.013),
            Element::Co => ("Co", 58.933, 1.26, 2.872, 0.014),
            Element::Ni => ("Ni", 58.693, 1.24, 2.834, 0.015),
            Element::Cu => ("Cu", 63.546, 1.32, 3.495, 0.005),
            Element::Zn => ("Zn", 65.38, 1.22, 2.763, 0.124),
            Element::Ga => ("Ga", 69.723, 1.22, 4.383, 0.415),
            Element::Ge => ("Ge", 72.63, 1.20, 4.280, 0.379),
            Element::As => ("As", 74.922, 1.19, 4.230, 0.309),
            Element::Se => ("Se", 78.971, 1.20, 4.205, 0.291),
            Element::Br => ("Br", 79.904, 1.20, 4.189, 0.251),
            Element::Kr => ("Kr", 83.798, 1.16, 4.141, 0.220),
            Element::Rb => ("Rb", 85.468, 2.20, 4.114, 0.040),
            Element::Sr => ("Sr", 87.62, 1.95, 3.641, 0.235),
            Element::Y => ("Y", 88.906, 1.90, 3.345, 0.072),
            Element::Zr => ("Zr", 91.224, 1.75, 3.124, 0.069),
            Element::Nb => ("Nb", 92.906, 1.64, 3.165, 0.059),
            Element::Mo => ("Mo", 95.96, 1.54, 3.052, 0.056),
            Element::Tc => ("Tc", 98.0, 1.47, 2.998, 0.048),
            Element::Ru => ("Ru", 101.07, 1.46, 2.963, 0.056),
            Element::Rh => ("Rh", 102.91, 1.42, 2.929, 0.053),
            Element::Pd => ("Pd", 106.42, 1.39, 2.899, 0.048),
            Element::Ag => ("Ag", 107.87, 1.45, 3.148, 0.036),
            Element::Cd => ("Cd", 112.41, 1.44, 2.848, 0.228),
            Element::In => ("In", 114.82, 1.42, 4.463, 0.599),
            Element::Sn => ("Sn", 118.71, 1.39, 4.392, 0.567),
            Element::Sb => ("Sb", 121.76, 1.39, 4.420, 0.449),
            Element::Te => ("Te", 127.6, 1.38, 4.470, 0.398),
            Element::I => ("I", 126.9, 1.39, 4.500, 0.339),
            Element::Xe => ("Xe", 131.29, 1.40, 4.404, 0.332),
        };
        ElementData {
            symbol,
            atomic_mass,
            covalent_radius,
            vdw_distance,
            vdw_well_depth,
        }
    }

    #[inline]
    pub fn symbol(&self) -> &'static str {
        self.data().symbol
    }

    #[inline]
    pub fn covalent_radius(&self) -> f64 {
        self.data().covalent_radius
    }

    /// Allowed valences for atoms written without brackets, lowest first.
    ///
    /// Only the organic subset has default valences; every other element must be
    /// written in brackets and carries no implicit hydrogens.
    pub fn default_valences(&self) -> &'static [u8] {
        match self {
            Element::B => &[3],
            Element::C => &[4],
            Element::N => &[3, 5],
            Element::O => &[2],
            Element::P => &[3, 5],
            Element::S => &[2, 4, 6],
            Element::F | Element::Cl | Element::Br | Element::I => &[1],
            _ => &[],
        }
    }

    pub fn is_organic_subset(&self) -> bool {
        !self.default_valences().is_empty()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SYMBOLS
            .get(s)
            .copied()
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_parse_case_sensitively() {
        assert_eq!("C".parse::<Element>(), Ok(Element::C));
        assert_eq!("Cl".parse::<Element>(), Ok(Element::Cl));
        assert!("cl".parse::<Element>().is_err());
        assert!("Xx".parse::<Element>().is_err());
    }

    #[test]
    fn atomic_numbers_follow_the_periodic_table() {
        assert_eq!(Element::H.atomic_number(), 1);
        assert_eq!(Element::C.atomic_number(), 6);
        assert_eq!(Element::Br.atomic_number(), 35);
        assert_eq!(Element::Xe.atomic_number(), 54);
    }

    #[test]
    fn every_symbol_round_trips_through_display() {
        for (symbol, element) in SYMBOLS.entries() {
            assert_eq!(element.symbol(), *symbol);
            assert_eq!(element.to_string(), *symbol);
        }
    }

    #[test]
    fn only_organic_subset_has_default_valences() {
        assert_eq!(Element::N.default_valences(), &[3, 5]);
        assert!(Element::C.is_organic_subset());
        assert!(!Element::Fe.is_organic_subset());
        assert!(!Element::H.is_organic_subset());
    }
}
