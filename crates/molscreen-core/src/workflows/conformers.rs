use crate::core::io::notation::MoleculeInput;
use crate::engine::config::ConformerConfig;
use crate::engine::outcome::{EntityOutcome, SkippedEntity};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::conformer_search::{GeometryOracle, generate_best_conformer};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub use crate::engine::tasks::conformer_search::BestConformer;

/// Per-molecule outcomes of a conformer run, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConformerReport {
    pub outcomes: Vec<EntityOutcome<BestConformer>>,
}

impl ConformerReport {
    pub fn written(&self) -> impl Iterator<Item = &BestConformer> {
        self.outcomes.iter().filter_map(EntityOutcome::processed)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SkippedEntity> {
        self.outcomes.iter().filter_map(EntityOutcome::skip)
    }
}

/// Generates the best conformer for every input molecule with the built-in oracle.
#[instrument(skip_all, name = "conformer_workflow", fields(molecules = inputs.len()))]
pub fn run(
    inputs: &[MoleculeInput],
    config: &ConformerConfig,
    reporter: &ProgressReporter,
) -> ConformerReport {
    let oracle = GeometryOracle::from_config(config);
    run_with_oracle(inputs, config, &oracle, reporter)
}

/// Same as [`run`] with a caller-supplied embedder and method chain.
///
/// A molecule that fails is recorded as skipped; the batch never aborts.
pub fn run_with_oracle(
    inputs: &[MoleculeInput],
    config: &ConformerConfig,
    oracle: &GeometryOracle,
    reporter: &ProgressReporter,
) -> ConformerReport {
    info!(
        count = config.conformer_count,
        seed = config.seed,
        methods = oracle.methods.len(),
        "Generating conformers."
    );
    reporter.report(Progress::PhaseStart {
        name: "Conformer Generation",
    });
    reporter.report(Progress::TaskStart {
        total_steps: inputs.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = inputs.iter();

    #[cfg(feature = "parallel")]
    let iterator = inputs.par_iter();

    let outcomes: Vec<EntityOutcome<BestConformer>> = iterator
        .map(|input| {
            let outcome =
                match generate_best_conformer(&input.name, &input.notation, config, oracle) {
                    Ok(best) => EntityOutcome::Processed(best),
                    Err(e) => {
                        warn!(name = %input.name, notation = %input.notation, error = %e, "Skipping molecule");
                        reporter.report(Progress::EntitySkipped {
                            name: input.name.clone(),
                            reason: e.to_string(),
                        });
                        EntityOutcome::skipped(input.name.clone(), e)
                    }
                };
            reporter.report(Progress::TaskIncrement);
            outcome
        })
        .collect();

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let report = ConformerReport { outcomes };
    info!(
        written = report.written().count(),
        skipped = report.skipped().count(),
        "Conformer generation complete."
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::params::ForcefieldParams;
    use crate::core::io::sdf::{SdfRecord, SdfWriter};
    use crate::engine::config::ConformerConfigBuilder;
    use std::sync::Mutex;

    fn config() -> ConformerConfig {
        ConformerConfigBuilder::new()
            .conformer_count(2)
            .seed(42)
            .max_iterations(1000)
            .max_embed_attempts(5)
            .forcefields(vec![ForcefieldParams::typed(), ForcefieldParams::universal()])
            .build()
            .unwrap()
    }

    #[test]
    fn invalid_molecule_is_skipped_and_valid_one_written() {
        let inputs = vec![
            MoleculeInput::new("Molecule_1", "CCO"),
            MoleculeInput::new("Molecule_2", "not_a_molecule"),
        ];
        let skipped_events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::EntitySkipped { name, .. } = event {
                skipped_events.lock().unwrap().push(name);
            }
        }));

        let report = run(&inputs, &config(), &reporter);
        drop(reporter);

        let written: Vec<_> = report.written().collect();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].name, "Molecule_1");
        let skipped: Vec<_> = report.skipped().collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].name, "Molecule_2");
        assert_eq!(skipped_events.into_inner().unwrap(), vec!["Molecule_2"]);

        let mut writer = SdfWriter::new(Vec::new());
        for best in report.written() {
            writer
                .write_record(&SdfRecord {
                    name: &best.name,
                    notation: &best.notation,
                    molecule: &best.molecule,
                    conformer: &best.conformer,
                })
                .unwrap();
        }
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text.matches("$$$$").count(), 1);
        assert!(text.starts_with("Molecule_1\n"));
    }

    #[test]
    fn outcomes_preserve_input_order() {
        let inputs: Vec<_> = ["C", "N", "?", "O", "CC"]
            .iter()
            .enumerate()
            .map(|(i, s)| MoleculeInput::new(MoleculeInput::default_name(i + 1), *s))
            .collect();
        let report = run(&inputs, &config(), &ProgressReporter::new());
        let names: Vec<&str> = report
            .outcomes
            .iter()
            .map(|o| match o {
                EntityOutcome::Processed(best) => best.name.as_str(),
                EntityOutcome::Skipped(s) => s.name.as_str(),
            })
            .collect();
        assert_eq!(
            names,
            ["Molecule_1", "Molecule_2", "Molecule_3", "Molecule_4", "Molecule_5"]
        );
        assert!(!report.outcomes[2].is_processed());
    }

    #[test]
    fn empty_input_produces_empty_report() {
        let report = run(&[], &config(), &ProgressReporter::new());
        assert!(report.outcomes.is_empty());
    }
}
