const COULOMB_CONSTANT: f64 = 332.0637; // In kcal·Å/(mol·e²)
const MIN_DISTANCE: f64 = 1e-6;

#[inline]
pub fn lennard_jones_12_6(dist: f64, r_min: f64, well_depth: f64) -> f64 {
    if dist < MIN_DISTANCE {
        return 1e10;
    }
    let rho = r_min / dist;
    let rho6 = rho.powi(6);
    let rho12 = rho6 * rho6;
    well_depth * (rho12 - 2.0 * rho6)
}

/// Derivative of [`lennard_jones_12_6`] with respect to distance.
#[inline]
pub fn lennard_jones_12_6_derivative(dist: f64, r_min: f64, well_depth: f64) -> f64 {
    if dist < MIN_DISTANCE {
        return 0.0;
    }
    let rho = r_min / dist;
    let rho6 = rho.powi(6);
    let rho12 = rho6 * rho6;
    12.0 * well_depth * (rho6 - rho12) / dist
}

#[inline]
pub fn coulomb(dist: f64, q1: f64, q2: f64, dielectric: f64) -> f64 {
    if dist < MIN_DISTANCE {
        return q1.signum() * q2.signum() * 1e10;
    }
    COULOMB_CONSTANT * q1 * q2 / (dielectric * dist)
}

#[inline]
pub fn coulomb_derivative(dist: f64, q1: f64, q2: f64, dielectric: f64) -> f64 {
    if dist < MIN_DISTANCE {
        return 0.0;
    }
    -COULOMB_CONSTANT * q1 * q2 / (dielectric * dist * dist)
}

/// Harmonic restraint `k * (x - x0)^2`, used for both bond stretching and angle bending.
#[inline]
pub fn harmonic(x: f64, x0: f64, k: f64) -> f64 {
    let dx = x - x0;
    k * dx * dx
}

#[inline]
pub fn harmonic_derivative(x: f64, x0: f64, k: f64) -> f64 {
    2.0 * k * (x - x0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn numeric_derivative(f: impl Fn(f64) -> f64, x: f64) -> f64 {
        let h = 1e-6;
        (f(x + h) - f(x - h)) / (2.0 * h)
    }

    #[test]
    fn lennard_jones_at_minimum_distance_returns_negative_well_depth() {
        let energy = lennard_jones_12_6(2.0, 2.0, 10.0);
        assert!(f64_approx_equal(energy, -10.0));
    }

    #[test]
    fn lennard_jones_at_very_small_distance_returns_large_positive_energy() {
        let energy = lennard_jones_12_6(1e-7, 2.0, 10.0);
        assert!(f64_approx_equal(energy, 1e10));
    }

    #[test]
    fn lennard_jones_derivative_vanishes_at_minimum_and_matches_finite_difference() {
        assert!(f64_approx_equal(lennard_jones_12_6_derivative(2.0, 2.0, 10.0), 0.0));
        for dist in [1.7, 2.5, 4.0] {
            let analytic = lennard_jones_12_6_derivative(dist, 2.0, 10.0);
            let numeric = numeric_derivative(|d| lennard_jones_12_6(d, 2.0, 10.0), dist);
            assert!((analytic - numeric).abs() < 1e-4, "dist {}", dist);
        }
    }

    #[test]
    fn coulomb_calculates_repulsive_force_correctly() {
        let energy = coulomb(1.0, 1.0, 1.0, 1.0);
        assert!(f64_approx_equal(energy, COULOMB_CONSTANT));
    }

    #[test]
    fn coulomb_calculates_attractive_force_correctly() {
        let energy = coulomb(2.0, 1.0, -1.0, 1.0);
        assert!(f64_approx_equal(energy, -COULOMB_CONSTANT / 2.0));
    }

    #[test]
    fn coulomb_at_very_small_distance_returns_large_energy_with_correct_sign() {
        assert!(f64_approx_equal(coulomb(1e-7, 1.0, 1.0, 1.0), 1e10));
        assert!(f64_approx_equal(coulomb(1e-7, -1.0, 1.0, 1.0), -1e10));
    }

    #[test]
    fn coulomb_derivative_matches_finite_difference() {
        let analytic = coulomb_derivative(3.0, 1.0, -1.0, 4.0);
        let numeric = numeric_derivative(|d| coulomb(d, 1.0, -1.0, 4.0), 3.0);
        assert!((analytic - numeric).abs() < 1e-5);
    }

    #[test]
    fn harmonic_is_zero_at_equilibrium_and_quadratic_elsewhere() {
        assert!(f64_approx_equal(harmonic(1.5, 1.5, 300.0), 0.0));
        assert!(f64_approx_equal(harmonic(1.6, 1.5, 300.0), 3.0));
        assert!(f64_approx_equal(harmonic_derivative(1.6, 1.5, 300.0), 60.0));
        assert!(f64_approx_equal(harmonic_derivative(1.4, 1.5, 300.0), -60.0));
    }
}
