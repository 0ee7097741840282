mod defaults;
mod file;

pub use defaults::DefaultsConfig;
pub use file::FileConfig;

use crate::cli::{ClassifyArgs, ConformersArgs};
use crate::error::{CliError, Result};
use molscreen::core::ensemble::gate::ImputationPolicy;
use molscreen::core::ensemble::vote::TiePolicy;
use molscreen::core::forcefield::params::ForcefieldParams;
use molscreen::engine::config::{
    ClassifyConfig, ClassifyConfigBuilder, ConformerConfig, ConformerConfigBuilder, SlotSource,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// A fully merged `conformers` run: CLI flags over the config file over the defaults.
#[derive(Debug)]
pub struct ConformerRun {
    pub output: PathBuf,
    pub config: ConformerConfig,
}

#[derive(Debug)]
pub struct ClassifyRun {
    pub output: PathBuf,
    pub config: ClassifyConfig,
}

impl FileConfig {
    pub fn merge_conformers(
        &self,
        args: &ConformersArgs,
        defaults: &DefaultsConfig,
    ) -> Result<ConformerRun> {
        let section = self.conformers.clone().unwrap_or_default();

        let output = args
            .output
            .clone()
            .or_else(|| section.output.as_deref().map(|p| self.resolve(p)))
            .unwrap_or_else(|| defaults.conformer_output.clone());

        let time_budget = match args.time_budget.or(section.time_budget) {
            Some(secs) => Some(Duration::try_from_secs_f64(secs).map_err(|_| {
                CliError::Config(format!(
                    "`time-budget` must be a non-negative number of seconds, got {}",
                    secs
                ))
            })?),
            None => None,
        };

        let names = if !args.forcefields.is_empty() {
            args.forcefields
                .iter()
                .map(|name| (name.clone(), PathBuf::new()))
                .collect::<Vec<_>>()
        } else if let Some(names) = section.forcefields {
            names
                .into_iter()
                .map(|name| (name, self.base_dir.clone()))
                .collect()
        } else {
            defaults
                .forcefields
                .iter()
                .map(|name| (name.clone(), PathBuf::new()))
                .collect()
        };
        let forcefields = names
            .iter()
            .map(|(name, base)| resolve_forcefield(name, base))
            .collect::<Result<Vec<_>>>()?;

        let config = ConformerConfigBuilder::new()
            .conformer_count(
                args.num_conformers
                    .or(section.num_conformers)
                    .unwrap_or(defaults.num_conformers),
            )
            .seed(args.seed.or(section.seed).unwrap_or(defaults.seed))
            .max_iterations(
                args.max_iterations
                    .or(section.max_iterations)
                    .unwrap_or(defaults.max_iterations),
            )
            .max_embed_attempts(
                args.max_embed_attempts
                    .or(section.max_embed_attempts)
                    .unwrap_or(defaults.max_embed_attempts),
            )
            .time_budget(time_budget)
            .forcefields(forcefields)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(ConformerRun { output, config })
    }

    pub fn merge_classify(
        &self,
        args: &ClassifyArgs,
        defaults: &DefaultsConfig,
    ) -> Result<ClassifyRun> {
        let section = self.classify.clone().unwrap_or_default();

        let output = args
            .output
            .clone()
            .or_else(|| section.output.as_deref().map(|p| self.resolve(p)))
            .unwrap_or_else(|| defaults.predictions_output.clone());

        let slots: Vec<SlotSource> = match section.slots {
            Some(slots) => slots
                .iter()
                .map(|slot| SlotSource {
                    reference: self.resolve(&slot.reference),
                    scaler: self.resolve(&slot.scaler),
                    model: self.resolve(&slot.model),
                })
                .collect(),
            None => defaults
                .slot_paths()
                .into_iter()
                .map(|(reference, scaler, model)| SlotSource {
                    reference,
                    scaler,
                    model,
                })
                .collect(),
        };

        let mut builder = ClassifyConfigBuilder::new().slots(slots);
        if let Some(labels) = section.labels {
            builder = builder.labels(labels);
        }
        if let Some(reserved) = section.reserved {
            builder = builder.reserved(reserved);
        }
        if let Some(policy) = args.tie_policy.map(TiePolicy::from).or(section.tie_policy) {
            builder = builder.tie_policy(policy);
        }
        if let Some(policy) = args.imputation.map(ImputationPolicy::from).or(section.imputation) {
            builder = builder.imputation(policy);
        }
        let config = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(ClassifyRun { output, config })
    }
}

/// `typed` and `universal` name the built-in parameter sets; anything else is a file path.
fn resolve_forcefield(name_or_path: &str, base_dir: &Path) -> Result<ForcefieldParams> {
    match name_or_path {
        "typed" => Ok(ForcefieldParams::typed()),
        "universal" => Ok(ForcefieldParams::universal()),
        path => {
            let path = base_dir.join(path);
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Unknown force field '{}': not a built-in name and no such file",
                    name_or_path
                )));
            }
            debug!("Loading force-field parameters from {:?}", path);
            ForcefieldParams::load(&path).map_err(|e| CliError::FileParsing {
                path,
                source: e.into(),
            })
        }
    }
}
