use std::ops::{Add, AddAssign};

/// Force-field energy broken down by contribution, in kcal/mol.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyTerm {
    pub bond: f64,
    pub angle: f64,
    pub vdw: f64,
    pub coulomb: f64,
}

impl EnergyTerm {
    pub fn new(bond: f64, angle: f64, vdw: f64, coulomb: f64) -> Self {
        Self {
            bond,
            angle,
            vdw,
            coulomb,
        }
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.bond + self.angle + self.vdw + self.coulomb
    }

    #[inline]
    pub fn bonded(&self) -> f64 {
        self.bond + self.angle
    }

    #[inline]
    pub fn non_bonded(&self) -> f64 {
        self.vdw + self.coulomb
    }
}

impl Add for EnergyTerm {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            bond: self.bond + rhs.bond,
            angle: self.angle + rhs.angle,
            vdw: self.vdw + rhs.vdw,
            coulomb: self.coulomb + rhs.coulomb,
        }
    }
}

impl AddAssign for EnergyTerm {
    fn add_assign(&mut self, rhs: Self) {
        self.bond += rhs.bond;
        self.angle += rhs.angle;
        self.vdw += rhs.vdw;
        self.coulomb += rhs.coulomb;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_returns_sum_of_all_terms() {
        let term = EnergyTerm::new(1.5, -2.0, 0.5, 1.0);
        assert_eq!(term.total(), 1.0);
        assert_eq!(term.bonded(), -0.5);
        assert_eq!(term.non_bonded(), 1.5);
    }

    #[test]
    fn add_sums_each_field_correctly() {
        let a = EnergyTerm::new(1.0, 2.0, 3.0, 4.0);
        let b = EnergyTerm::new(4.0, 5.0, 6.0, 7.0);
        assert_eq!(a + b, EnergyTerm::new(5.0, 7.0, 9.0, 11.0));
    }

    #[test]
    fn add_assign_accumulates_each_field_correctly() {
        let mut a = EnergyTerm::new(1.0, 2.0, 3.0, 4.0);
        a += EnergyTerm::new(-1.0, 0.5, 6.0, 0.0);
        assert_eq!(a, EnergyTerm::new(0.0, 2.5, 9.0, 4.0));
    }

    #[test]
    fn default_initializes_all_fields_to_zero() {
        let term = EnergyTerm::default();
        assert_eq!(term.total(), 0.0);
    }
}
