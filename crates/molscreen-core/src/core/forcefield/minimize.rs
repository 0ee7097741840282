use super::energy::{ForceField, ForcefieldError};
use nalgebra::{Point3, Vector3};
use std::time::Instant;

const ARMIJO_C1: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 40;

/// Result of a local minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MinimizationStatus {
    Converged { energy: f64, iterations: usize },
    /// The iteration budget ran out before any convergence criterion was met.
    MaxIterations { energy: f64 },
    /// The energy became non-finite.
    Diverged,
    /// The deadline passed before the minimization finished.
    TimedOut,
}

/// Nonlinear conjugate-gradient minimizer (Polak-Ribière with restarts) using a
/// backtracking Armijo line search.
///
/// The minimization is converged when the largest per-atom gradient drops below
/// `gradient_tolerance`, when an accepted step changes the energy by less than
/// `energy_tolerance` relative to its magnitude, or when no step along the steepest-descent
/// direction lowers the energy at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimizer {
    pub max_iterations: usize,
    pub gradient_tolerance: f64,
    pub energy_tolerance: f64,
    /// Largest displacement of any atom in a single step, in Angstroms.
    pub max_step: f64,
}

impl Default for Minimizer {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            gradient_tolerance: 1e-3,
            energy_tolerance: 1e-8,
            max_step: 0.3,
        }
    }
}

/// A differentiable energy surface over atom positions.
pub trait Objective {
    fn energy(&self, positions: &[Point3<f64>]) -> Result<f64, ForcefieldError>;

    fn energy_and_gradient(
        &self,
        positions: &[Point3<f64>],
    ) -> Result<(f64, Vec<Vector3<f64>>), ForcefieldError>;
}

impl Objective for ForceField {
    fn energy(&self, positions: &[Point3<f64>]) -> Result<f64, ForcefieldError> {
        ForceField::energy(self, positions)
    }

    fn energy_and_gradient(
        &self,
        positions: &[Point3<f64>],
    ) -> Result<(f64, Vec<Vector3<f64>>), ForcefieldError> {
        ForceField::energy_and_gradient(self, positions)
    }
}

impl Minimizer {
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    /// Minimizes `positions` in place.
    pub fn minimize<O: Objective + ?Sized>(
        &self,
        objective: &O,
        positions: &mut [Point3<f64>],
        deadline: Option<Instant>,
    ) -> Result<MinimizationStatus, ForcefieldError> {
        let (mut energy, mut gradient) = objective.energy_and_gradient(positions)?;
        if !energy.is_finite() {
            return Ok(MinimizationStatus::Diverged);
        }
        let mut direction: Vec<Vector3<f64>> = gradient.iter().map(|g| -g).collect();
        let mut steepest = true;
        let mut last_alpha = f64::INFINITY;

        for iteration in 0..self.max_iterations {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Ok(MinimizationStatus::TimedOut);
            }
            if max_norm(&gradient) < self.gradient_tolerance {
                return Ok(MinimizationStatus::Converged {
                    energy,
                    iterations: iteration,
                });
            }

            if dot(&gradient, &direction) >= 0.0 {
                direction = gradient.iter().map(|g| -g).collect();
                steepest = true;
            }

            let mut step =
                self.line_search(objective, positions, &gradient, &direction, energy, last_alpha)?;
            if step.is_none() && !steepest {
                direction = gradient.iter().map(|g| -g).collect();
                steepest = true;
                step = self.line_search(
                    objective, positions, &gradient, &direction, energy, last_alpha,
                )?;
            }
            let Some((trial, new_energy, alpha)) = step else {
                // No descent is possible along the steepest-descent direction.
                return Ok(MinimizationStatus::Converged {
                    energy,
                    iterations: iteration,
                });
            };

            positions.copy_from_slice(&trial);
            last_alpha = alpha;
            let (_, new_gradient) = objective.energy_and_gradient(positions)?;
            let change = energy - new_energy;
            energy = new_energy;

            if change.abs() <= self.energy_tolerance * energy.abs().max(1.0) {
                return Ok(MinimizationStatus::Converged {
                    energy,
                    iterations: iteration + 1,
                });
            }

            let gg = dot(&gradient, &gradient);
            let beta = if gg > 0.0 {
                let diff: f64 = new_gradient
                    .iter()
                    .zip(&gradient)
                    .map(|(n, o)| n.dot(&(n - o)))
                    .sum();
                (diff / gg).max(0.0)
            } else {
                0.0
            };
            for (d, g) in direction.iter_mut().zip(&new_gradient) {
                *d = -g + *d * beta;
            }
            steepest = beta == 0.0;
            gradient = new_gradient;
        }

        Ok(MinimizationStatus::MaxIterations { energy })
    }

    /// Backtracking Armijo search along `direction`, returning the accepted positions,
    /// energy and step length.
    fn line_search<O: Objective + ?Sized>(
        &self,
        objective: &O,
        positions: &[Point3<f64>],
        gradient: &[Vector3<f64>],
        direction: &[Vector3<f64>],
        energy: f64,
        last_alpha: f64,
    ) -> Result<Option<(Vec<Point3<f64>>, f64, f64)>, ForcefieldError> {
        let mut trial = positions.to_vec();
        let slope = dot(gradient, direction);
        let mut alpha = (self.max_step / max_norm(direction)).min(4.0 * last_alpha);
        for _ in 0..MAX_BACKTRACKS {
            for ((t, p), d) in trial.iter_mut().zip(positions).zip(direction) {
                *t = p + d * alpha;
            }
            let trial_energy = objective.energy(&trial)?;
            if trial_energy.is_finite() && trial_energy <= energy + ARMIJO_C1 * alpha * slope {
                return Ok(Some((trial, trial_energy, alpha)));
            }
            alpha *= 0.5;
        }
        Ok(None)
    }
}

fn dot(a: &[Vector3<f64>], b: &[Vector3<f64>]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x.dot(y)).sum()
}

fn max_norm(vectors: &[Vector3<f64>]) -> f64 {
    vectors.iter().map(|v| v.norm()).fold(0.0, f64::max)
}
