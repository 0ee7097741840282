use crate::core::embedding::placement::SpreadEmbedder;
use crate::core::embedding::{Embedder, embed_conformers};
use crate::core::forcefield::method::{
    ForcefieldMethod, OptimizationMethod, OptimizationOutcome, optimize_with_fallback,
};
use crate::core::forcefield::minimize::Minimizer;
use crate::core::io::sdf;
use crate::core::models::conformer::Conformer;
use crate::core::models::molecule::Molecule;
use crate::core::notation::{hydrogens, smiles};
use crate::engine::config::ConformerConfig;
use crate::engine::error::MoleculeError;
use std::time::Instant;
use tracing::{debug, instrument};

/// The embedder and ordered optimization methods used to turn a graph into conformers.
pub struct GeometryOracle {
    pub embedder: Box<dyn Embedder>,
    pub methods: Vec<Box<dyn OptimizationMethod>>,
}

impl GeometryOracle {
    /// The built-in embedder with one force-field method per configured parameter set.
    pub fn from_config(config: &ConformerConfig) -> Self {
        let minimizer = Minimizer::with_max_iterations(config.max_iterations);
        Self {
            embedder: Box::new(SpreadEmbedder::default()),
            methods: config
                .forcefields
                .iter()
                .map(|params| {
                    Box::new(ForcefieldMethod::new(params.clone(), minimizer))
                        as Box<dyn OptimizationMethod>
                })
                .collect(),
        }
    }
}

/// The lowest-energy conformer of a molecule, tagged with its name and notation.
#[derive(Debug, Clone, PartialEq)]
pub struct BestConformer {
    pub name: String,
    pub notation: String,
    /// The hydrogen-expanded molecule the conformer's positions refer to.
    pub molecule: Molecule,
    pub conformer: Conformer,
    /// Candidates that converged under some method.
    pub converged: usize,
}

/// Parses, embeds and optimizes one molecule, returning its lowest-energy conformer.
///
/// Every embedded candidate runs through the oracle's methods in order, each starting
/// from the embedded coordinates; the first convergence wins. Candidates that time out or
/// never converge are discarded. Among the rest the minimum energy wins, ties going to the
/// earliest candidate.
#[instrument(level = "debug", skip(config, oracle), fields(name = %name))]
pub fn generate_best_conformer(
    name: &str,
    notation: &str,
    config: &ConformerConfig,
    oracle: &GeometryOracle,
) -> Result<BestConformer, MoleculeError> {
    let graph = smiles::parse(notation)?;
    let molecule = hydrogens::add_explicit_hydrogens(&graph);
    if !sdf::fits_molblock(&molecule) {
        return Err(MoleculeError::TooLarge {
            atoms: molecule.atom_count(),
            bonds: molecule.bond_count(),
        });
    }

    let candidates = embed_conformers(
        oracle.embedder.as_ref(),
        &molecule,
        config.conformer_count,
        config.seed,
        config.max_embed_attempts,
    )?;
    if candidates.is_empty() {
        return Err(MoleculeError::NothingEmbedded {
            requested: config.conformer_count,
        });
    }

    let deadline = config.time_budget.map(|budget| Instant::now() + budget);
    let attempted = candidates.len();
    let mut best: Option<Conformer> = None;
    let mut converged = 0;

    for candidate in candidates {
        let Some(result) =
            optimize_with_fallback(&oracle.methods, &molecule, &candidate.positions, deadline)
        else {
            break;
        };
        let energy = match result.outcome {
            OptimizationOutcome::Converged { energy } => energy,
            outcome => {
                debug!(candidate = candidate.index, ?outcome, "Discarding conformer");
                continue;
            }
        };
        converged += 1;
        if best.as_ref().is_none_or(|b| energy < b.energy) {
            best = Some(Conformer {
                embedding_index: candidate.index,
                positions: result.positions,
                energy,
                method: oracle.methods[result.method_index].name().to_string(),
            });
        }
    }

    let conformer = best.ok_or(MoleculeError::NoConvergedConformer { attempted })?;
    debug!(
        energy = conformer.energy,
        method = %conformer.method,
        converged,
        "Selected lowest-energy conformer"
    );
    Ok(BestConformer {
        name: name.to_string(),
        notation: notation.to_string(),
        molecule,
        conformer,
        converged,
    })
}
