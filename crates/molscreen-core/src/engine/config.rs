use crate::core::ensemble::gate::ImputationPolicy;
use crate::core::ensemble::schema::ReservedColumns;
use crate::core::ensemble::vote::{LabelSet, TiePolicy};
use crate::core::forcefield::params::ForcefieldParams;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConformerConfig {
    /// Candidates embedded per molecule.
    pub conformer_count: usize,
    pub seed: u64,
    /// Iteration budget of each minimization.
    pub max_iterations: usize,
    /// Tries per candidate before it is dropped.
    pub max_embed_attempts: usize,
    /// Wall-clock budget for optimizing all candidates of one molecule.
    pub time_budget: Option<Duration>,
    /// Parameter sets tried in order: the primary first, then the fallbacks.
    pub forcefields: Vec<ForcefieldParams>,
}

#[derive(Default)]
pub struct ConformerConfigBuilder {
    conformer_count: Option<usize>,
    seed: Option<u64>,
    max_iterations: Option<usize>,
    max_embed_attempts: Option<usize>,
    time_budget: Option<Duration>,
    forcefields: Option<Vec<ForcefieldParams>>,
}

impl ConformerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conformer_count(mut self, count: usize) -> Self {
        self.conformer_count = Some(count);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn max_embed_attempts(mut self, attempts: usize) -> Self {
        self.max_embed_attempts = Some(attempts);
        self
    }
    pub fn time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }
    pub fn forcefields(mut self, forcefields: Vec<ForcefieldParams>) -> Self {
        self.forcefields = Some(forcefields);
        self
    }

    pub fn build(self) -> Result<ConformerConfig, ConfigError> {
        let conformer_count = self
            .conformer_count
            .ok_or(ConfigError::MissingParameter("conformer_count"))?;
        if conformer_count == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "conformer_count",
                reason: "at least one conformer is required".to_string(),
            });
        }
        let forcefields = self
            .forcefields
            .ok_or(ConfigError::MissingParameter("forcefields"))?;
        if forcefields.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "forcefields",
                reason: "at least one parameter set is required".to_string(),
            });
        }
        Ok(ConformerConfig {
            conformer_count,
            seed: self.seed.ok_or(ConfigError::MissingParameter("seed"))?,
            max_iterations: self
                .max_iterations
                .ok_or(ConfigError::MissingParameter("max_iterations"))?,
            max_embed_attempts: self
                .max_embed_attempts
                .ok_or(ConfigError::MissingParameter("max_embed_attempts"))?,
            time_budget: self.time_budget,
            forcefields,
        })
    }
}

/// Files making up one ensemble member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSource {
    /// Table whose headers, minus the reserved columns, are the slot's descriptors.
    pub reference: PathBuf,
    pub scaler: PathBuf,
    pub model: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyConfig {
    pub slots: Vec<SlotSource>,
    pub labels: LabelSet,
    pub reserved: ReservedColumns,
    pub tie_policy: TiePolicy,
    pub imputation: ImputationPolicy,
}

#[derive(Default)]
pub struct ClassifyConfigBuilder {
    slots: Option<Vec<SlotSource>>,
    labels: Option<LabelSet>,
    reserved: Option<ReservedColumns>,
    tie_policy: Option<TiePolicy>,
    imputation: Option<ImputationPolicy>,
}

impl ClassifyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(mut self, slots: Vec<SlotSource>) -> Self {
        self.slots = Some(slots);
        self
    }
    pub fn labels(mut self, labels: LabelSet) -> Self {
        self.labels = Some(labels);
        self
    }
    pub fn reserved(mut self, reserved: ReservedColumns) -> Self {
        self.reserved = Some(reserved);
        self
    }
    pub fn tie_policy(mut self, policy: TiePolicy) -> Self {
        self.tie_policy = Some(policy);
        self
    }
    pub fn imputation(mut self, policy: ImputationPolicy) -> Self {
        self.imputation = Some(policy);
        self
    }

    pub fn build(self) -> Result<ClassifyConfig, ConfigError> {
        let slots = self.slots.ok_or(ConfigError::MissingParameter("slots"))?;
        if slots.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "slots",
                reason: "at least one model slot is required".to_string(),
            });
        }
        Ok(ClassifyConfig {
            slots,
            labels: self.labels.unwrap_or_default(),
            reserved: self.reserved.unwrap_or_default(),
            tie_policy: self.tie_policy.unwrap_or_default(),
            imputation: self.imputation.unwrap_or_default(),
        })
    }
}
