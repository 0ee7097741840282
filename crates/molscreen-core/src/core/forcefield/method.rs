use super::energy::ForceField;
use super::minimize::{MinimizationStatus, Minimizer};
use super::params::ForcefieldParams;
use crate::core::models::conformer::Geometry;
use crate::core::models::molecule::Molecule;
use std::time::Instant;
use tracing::trace;

/// What a single optimization attempt produced for one conformer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptimizationOutcome {
    Converged { energy: f64 },
    NotConverged,
    /// The method cannot describe this molecule.
    Unsupported,
    TimedOut,
}

impl OptimizationOutcome {
    /// The converged energy. Only `Converged` carries one.
    pub fn energy(&self) -> Option<f64> {
        match self {
            Self::Converged { energy } => Some(*energy),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

/// A geometry optimizer that may converge a conformer and report its energy.
///
/// Implementations update `positions` in place. The contents of `positions` are
/// unspecified unless the outcome is `Converged`.
pub trait OptimizationMethod: Send + Sync {
    fn name(&self) -> &str;

    fn optimize(
        &self,
        molecule: &Molecule,
        positions: &mut Geometry,
        deadline: Option<Instant>,
    ) -> OptimizationOutcome;
}

/// Minimizes a conformer under the built-in force field with one parameter set.
#[derive(Debug, Clone)]
pub struct ForcefieldMethod {
    params: ForcefieldParams,
    minimizer: Minimizer,
}

impl ForcefieldMethod {
    pub fn new(params: ForcefieldParams, minimizer: Minimizer) -> Self {
        Self { params, minimizer }
    }
}

impl OptimizationMethod for ForcefieldMethod {
    fn name(&self) -> &str {
        &self.params.name
    }

    fn optimize(
        &self,
        molecule: &Molecule,
        positions: &mut Geometry,
        deadline: Option<Instant>,
    ) -> OptimizationOutcome {
        let forcefield = match ForceField::setup(molecule, &self.params) {
            Ok(ff) => ff,
            Err(e) => {
                trace!(method = %self.params.name, error = %e, "Parameter set does not apply");
                return OptimizationOutcome::Unsupported;
            }
        };

        match self.minimizer.minimize(&forcefield, positions, deadline) {
            Ok(MinimizationStatus::Converged { energy, iterations }) => {
                trace!(method = %self.params.name, energy, iterations, "Minimization converged");
                OptimizationOutcome::Converged { energy }
            }
            Ok(MinimizationStatus::TimedOut) => OptimizationOutcome::TimedOut,
            Ok(MinimizationStatus::MaxIterations { .. }) | Ok(MinimizationStatus::Diverged) => {
                OptimizationOutcome::NotConverged
            }
            Err(e) => {
                trace!(method = %self.params.name, error = %e, "Minimization failed");
                OptimizationOutcome::NotConverged
            }
        }
    }
}

/// Result of running a conformer through an ordered list of methods.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyResult {
    pub outcome: OptimizationOutcome,
    /// Index into the method list of the method that produced `outcome`.
    pub method_index: usize,
    pub positions: Geometry,
}

/// Tries each method in order on a fresh copy of `embedded`. The first `Converged` outcome
/// wins and later methods are never consulted. `TimedOut` stops the chain immediately.
///
/// Returns `None` when `methods` is empty.
pub fn optimize_with_fallback(
    methods: &[Box<dyn OptimizationMethod>],
    molecule: &Molecule,
    embedded: &Geometry,
    deadline: Option<Instant>,
) -> Option<StrategyResult> {
    let mut last = None;
    for (method_index, method) in methods.iter().enumerate() {
        let mut positions = embedded.clone();
        let outcome = method.optimize(molecule, &mut positions, deadline);
        let stop = matches!(
            outcome,
            OptimizationOutcome::Converged { .. } | OptimizationOutcome::TimedOut
        );
        last = Some(StrategyResult {
            outcome,
            method_index,
            positions,
        });
        if stop {
            break;
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use nalgebra::Point3;
    use std::sync::Mutex;

    struct Scripted {
        name: &'static str,
        outcome: OptimizationOutcome,
        calls: Mutex<Vec<Geometry>>,
    }

    impl Scripted {
        fn boxed(name: &'static str, outcome: OptimizationOutcome) -> Box<dyn OptimizationMethod> {
            Box::new(Self {
                name,
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    impl OptimizationMethod for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        fn optimize(
            &self,
            _molecule: &Molecule,
            positions: &mut Geometry,
            _deadline: Option<Instant>,
        ) -> OptimizationOutcome {
            self.calls.lock().unwrap().push(positions.clone());
            for p in positions.iter_mut() {
                p.x += 1.0;
            }
            self.outcome
        }
    }

    fn single_atom() -> (Molecule, Geometry) {
        let mut molecule = Molecule::new();
        molecule.add_atom(Atom::new(Element::C));
        (molecule, vec![Point3::origin()])
    }

    #[test]
    fn outcome_only_converged_carries_energy() {
        assert_eq!(
            OptimizationOutcome::Converged { energy: -1.5 }.energy(),
            Some(-1.5)
        );
        assert!(OptimizationOutcome::Converged { energy: 0.0 }.is_success());
        for outcome in [
            OptimizationOutcome::NotConverged,
            OptimizationOutcome::Unsupported,
            OptimizationOutcome::TimedOut,
        ] {
            assert_eq!(outcome.energy(), None);
            assert!(!outcome.is_success());
        }
    }

    #[test]
    fn primary_success_skips_fallback() {
        let (molecule, embedded) = single_atom();
        let methods = vec![
            Scripted::boxed("primary", OptimizationOutcome::Converged { energy: 5.0 }),
            Scripted::boxed("fallback", OptimizationOutcome::Converged { energy: 1.0 }),
        ];
        let result = optimize_with_fallback(&methods, &molecule, &embedded, None).unwrap();
        assert_eq!(result.method_index, 0);
        assert_eq!(result.outcome.energy(), Some(5.0));
    }

    #[test]
    fn fallback_starts_from_embedded_coordinates() {
        let (molecule, embedded) = single_atom();
        let methods = vec![
            Scripted::boxed("primary", OptimizationOutcome::Unsupported),
            Scripted::boxed("fallback", OptimizationOutcome::Converged { energy: 2.0 }),
        ];
        let result = optimize_with_fallback(&methods, &molecule, &embedded, None).unwrap();
        assert_eq!(result.method_index, 1);
        assert_eq!(result.positions[0].x, 1.0);
    }

    #[test]
    fn timeout_stops_the_chain() {
        let (molecule, embedded) = single_atom();
        let methods = vec![
            Scripted::boxed("primary", OptimizationOutcome::TimedOut),
            Scripted::boxed("fallback", OptimizationOutcome::Converged { energy: 2.0 }),
        ];
        let result = optimize_with_fallback(&methods, &molecule, &embedded, None).unwrap();
        assert_eq!(result.outcome, OptimizationOutcome::TimedOut);
        assert_eq!(result.method_index, 0);
    }

    #[test]
    fn all_methods_failing_reports_last_outcome() {
        let (molecule, embedded) = single_atom();
        let methods = vec![
            Scripted::boxed("primary", OptimizationOutcome::Unsupported),
            Scripted::boxed("fallback", OptimizationOutcome::NotConverged),
        ];
        let result = optimize_with_fallback(&methods, &molecule, &embedded, None).unwrap();
        assert_eq!(result.outcome, OptimizationOutcome::NotConverged);
        assert!(optimize_with_fallback(&[], &molecule, &embedded, None).is_none());
    }

    #[test]
    fn forcefield_method_reports_unsupported_for_uncovered_elements() {
        let mut molecule = Molecule::new();
        molecule.add_atom(Atom::new(Element::Fe));
        let mut positions = vec![Point3::origin()];
        let typed = ForcefieldMethod::new(ForcefieldParams::typed(), Minimizer::default());
        assert_eq!(typed.name(), "typed");
        assert_eq!(
            typed.optimize(&molecule, &mut positions, None),
            OptimizationOutcome::Unsupported
        );

        let universal = ForcefieldMethod::new(ForcefieldParams::universal(), Minimizer::default());
        assert!(universal.optimize(&molecule, &mut positions, None).is_success());
    }
}
