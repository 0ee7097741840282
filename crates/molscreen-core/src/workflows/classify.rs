use crate::core::ensemble::gate::admit;
use crate::core::ensemble::schema::ReferenceSchema;
use crate::core::ensemble::slot::{Ensemble, ModelSlot};
use crate::core::ensemble::table::DescriptorTable;
use crate::core::ensemble::vote::Label;
use crate::core::io::{artifacts, tables};
use crate::engine::config::ClassifyConfig;
use crate::engine::error::EngineError;
use crate::engine::outcome::{EntityOutcome, SkippedEntity, partition};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::consensus::classify_entity;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub name: String,
    pub label: Label,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassificationReport {
    /// Entities that passed the gate, in input order.
    pub classifications: Vec<Classification>,
    pub skipped: Vec<SkippedEntity>,
}

/// Loads every configured slot: reference schema, scaler and model.
///
/// A reference table is read once even when several slots share it.
#[instrument(skip_all, name = "ensemble_loading", fields(slots = config.slots.len()))]
pub fn load_ensemble(config: &ClassifyConfig) -> Result<Ensemble, EngineError> {
    let mut schemas: HashMap<PathBuf, ReferenceSchema> = HashMap::new();
    let mut slots = Vec::with_capacity(config.slots.len());

    for (index, source) in config.slots.iter().enumerate() {
        let descriptors = match schemas.get(&source.reference) {
            Some(schema) => schema.descriptors().to_vec(),
            None => {
                let headers = tables::read_headers(&source.reference)?;
                let schema = ReferenceSchema::from_headers(&headers, &config.reserved)?;
                debug!(
                    reference = %source.reference.display(),
                    descriptors = schema.len(),
                    "Derived reference schema"
                );
                let descriptors = schema.descriptors().to_vec();
                schemas.insert(source.reference.clone(), schema);
                descriptors
            }
        };

        let scaler = artifacts::load_scaler(&source.scaler)?;
        let model = artifacts::load_model(&source.model)?;
        slots.push(ModelSlot::new(
            index,
            scaler,
            model,
            descriptors,
            &config.labels,
        )?);
    }

    Ok(Ensemble::new(slots)?)
}

/// Classifies every entity of `table` by majority vote of the ensemble.
///
/// Entities failing the data-quality gate are skipped. Any scaler or model error is fatal:
/// it means the ensemble does not fit the data it was given.
#[instrument(skip_all, name = "classify_workflow", fields(entities = table.len(), slots = ensemble.len()))]
pub fn classify(
    table: &DescriptorTable,
    ensemble: &Ensemble,
    config: &ClassifyConfig,
    reporter: &ProgressReporter,
) -> Result<ClassificationReport, EngineError> {
    info!(
        tie_policy = %config.tie_policy,
        imputation = %config.imputation,
        "Classifying entities."
    );
    reporter.report(Progress::PhaseStart {
        name: "Classification",
    });
    reporter.report(Progress::TaskStart {
        total_steps: table.len() as u64,
    });

    let required = ensemble.required_descriptors();
    let identity = Some(config.reserved.identity.as_str());

    #[cfg(not(feature = "parallel"))]
    let iterator = table.entities().iter();

    #[cfg(feature = "parallel")]
    let iterator = table.entities().par_iter();

    let outcomes: Vec<EntityOutcome<Classification>> = iterator
        .map(|entity| {
            let outcome = match admit(table, entity, &required, config.imputation, identity) {
                Ok(row) => {
                    let label = classify_entity(&entity.name, &row, ensemble, config.tie_policy)?;
                    EntityOutcome::Processed(Classification {
                        name: entity.name.clone(),
                        label,
                    })
                }
                Err(exclusion) => {
                    warn!(name = %entity.name, reason = %exclusion, "Excluding entity");
                    reporter.report(Progress::EntitySkipped {
                        name: entity.name.clone(),
                        reason: exclusion.to_string(),
                    });
                    EntityOutcome::skipped(entity.name.clone(), exclusion)
                }
            };
            reporter.report(Progress::TaskIncrement);
            Ok(outcome)
        })
        .collect::<Result<_, EngineError>>()?;

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let (classifications, skipped) = partition(outcomes);
    info!(
        classified = classifications.len(),
        skipped = skipped.len(),
        "Classification complete."
    );
    Ok(ClassificationReport {
        classifications,
        skipped,
    })
}

/// Loads the ensemble and the input table, then classifies.
pub fn run(
    input: &std::path::Path,
    config: &ClassifyConfig,
    reporter: &ProgressReporter,
) -> Result<ClassificationReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Loading Ensemble",
    });
    let ensemble = load_ensemble(config)?;
    let table = tables::read_descriptor_table(input, &config.reserved.identity)?;
    reporter.report(Progress::PhaseFinish);
    classify(&table, &ensemble, config, reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ensemble::gate::ImputationPolicy;
    use crate::core::ensemble::slot::tests::threshold_slot;
    use crate::core::ensemble::table::Cell;
    use crate::core::ensemble::vote::TiePolicy;
    use crate::engine::config::{ClassifyConfigBuilder, SlotSource};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn config_with(slots: Vec<SlotSource>) -> ClassifyConfig {
        ClassifyConfigBuilder::new().slots(slots).build().unwrap()
    }

    fn dummy_config() -> ClassifyConfig {
        config_with(vec![SlotSource {
            reference: PathBuf::from("unused.csv"),
            scaler: PathBuf::from("unused.toml"),
            model: PathBuf::from("unused.toml"),
        }])
    }

    fn table(rows: &[(&str, &str, &str)]) -> DescriptorTable {
        let mut table = DescriptorTable::new(vec!["MolWt".to_string(), "LogP".to_string()]);
        for (name, molwt, logp) in rows {
            table.push(*name, vec![Cell::parse(molwt), Cell::parse(logp)]);
        }
        table
    }

    fn ensemble(thresholds: &[f64]) -> Ensemble {
        Ensemble::new(
            thresholds
                .iter()
                .enumerate()
                .map(|(i, t)| threshold_slot(i, &["MolWt", "LogP"], *t))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn non_finite_entity_is_excluded_and_others_kept_in_order() {
        let t = table(&[("a", "10", "1"), ("b", "10", "inf"), ("c", "0", "1")]);
        let e = ensemble(&[1.0, 2.0, 3.0, 20.0, 30.0]);
        let report = classify(&t, &e, &dummy_config(), &ProgressReporter::new()).unwrap();

        assert_eq!(
            report.classifications,
            vec![
                Classification {
                    name: "a".to_string(),
                    label: Label::Positive
                },
                Classification {
                    name: "c".to_string(),
                    label: Label::Negative
                },
            ]
        );
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "b");
        assert!(report.skipped[0].reason.contains("LogP"));
    }

    #[test]
    fn even_ensemble_tie_follows_configured_policy() {
        let t = table(&[("tie", "5", "0")]);
        let e = ensemble(&[1.0, 2.0, 10.0, 20.0]);

        let negative = classify(&t, &e, &dummy_config(), &ProgressReporter::new()).unwrap();
        assert_eq!(negative.classifications[0].label, Label::Negative);

        let mut config = dummy_config();
        config.tie_policy = TiePolicy::Positive;
        let positive = classify(&t, &e, &config, &ProgressReporter::new()).unwrap();
        assert_eq!(positive.classifications[0].label, Label::Positive);
    }

    #[test]
    fn missing_values_follow_imputation_policy() {
        let t = table(&[("blank", "", "1")]);
        let e = ensemble(&[-1.0]);

        let zero = classify(&t, &e, &dummy_config(), &ProgressReporter::new()).unwrap();
        assert_eq!(zero.classifications[0].label, Label::Positive);

        let mut config = dummy_config();
        config.imputation = ImputationPolicy::Exclude;
        let excluded = classify(&t, &e, &config, &ProgressReporter::new()).unwrap();
        assert!(excluded.classifications.is_empty());
        assert_eq!(excluded.skipped[0].name, "blank");
    }

    fn write_artifacts(dir: &Path, slots: usize) -> Vec<SlotSource> {
        let reference = dir.join("data.csv");
        fs::write(&reference, "Name,MolWt,pIC50,LogP\nref,1,6,1\n").unwrap();
        (0..slots)
            .map(|i| {
                let scaler = dir.join(format!("scaler_{}.toml", i + 1));
                let model = dir.join(format!("model_{}.toml", i + 1));
                fs::write(&scaler, "kind = \"identity\"\nn-features = 2\n").unwrap();
                fs::write(
                    &model,
                    format!(
                        "kind = \"logistic\"\ncoef = [0.0, 1.0]\nintercept = {}\nclasses = [\"below_5\", \"above_5\"]\n",
                        -(i as f64)
                    ),
                )
                .unwrap();
                SlotSource {
                    reference: reference.clone(),
                    scaler,
                    model,
                }
            })
            .collect()
    }

    #[test]
    fn run_loads_artifacts_and_classifies_input_file() {
        let dir = tempdir().unwrap();
        let config = config_with(write_artifacts(dir.path(), 5));
        let input = dir.path().join("input.csv");
        fs::write(
            &input,
            "Name,MolWt,LogP\nstrong,100,3.5\nweak,100,0.5\nbroken,inf,1\n",
        )
        .unwrap();

        let report = run(&input, &config, &ProgressReporter::new()).unwrap();
        let labels: Vec<(&str, Label)> = report
            .classifications
            .iter()
            .map(|c| (c.name.as_str(), c.label))
            .collect();
        assert_eq!(
            labels,
            vec![("strong", Label::Positive), ("weak", Label::Negative)]
        );
        assert_eq!(report.skipped[0].name, "broken");
    }

    #[test]
    fn entity_missing_a_descriptor_column_is_excluded() {
        let dir = tempdir().unwrap();
        let config = config_with(write_artifacts(dir.path(), 3));
        let input = dir.path().join("input.csv");
        fs::write(&input, "Name,MolWt\nonly_molwt,100\n").unwrap();

        let report = run(&input, &config, &ProgressReporter::new()).unwrap();
        assert!(report.classifications.is_empty());
        assert!(report.skipped[0].reason.contains("LogP"));
    }

    #[test]
    fn slot_feature_mismatch_is_fatal() {
        let dir = tempdir().unwrap();
        let mut sources = write_artifacts(dir.path(), 1);
        fs::write(&sources[0].scaler, "kind = \"identity\"\nn-features = 3\n").unwrap();
        sources[0].reference = dir.path().join("data.csv");
        let result = load_ensemble(&config_with(sources));
        assert!(matches!(
            result,
            Err(EngineError::Ensemble(
                crate::core::ensemble::EnsembleError::SlotMismatch { slot: 0, .. }
            ))
        ));
    }

    #[test]
    fn reference_without_target_column_is_fatal() {
        let dir = tempdir().unwrap();
        let sources = write_artifacts(dir.path(), 1);
        fs::write(&sources[0].reference, "Name,MolWt,LogP\n").unwrap();
        let result = load_ensemble(&config_with(sources));
        assert!(matches!(result, Err(EngineError::Ensemble(_))));
    }
}
