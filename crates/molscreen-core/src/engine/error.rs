use thiserror::Error;

use super::config::ConfigError;
use crate::core::embedding::EmbedError;
use crate::core::ensemble::EnsembleError;
use crate::core::io::artifacts::ArtifactError;
use crate::core::io::tables::TableError;
use crate::core::notation::smiles::ParseError;

/// Failures that abort a whole run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Ensemble setup failed: {0}")]
    Ensemble(#[from] EnsembleError),

    #[error("Scoring '{entity}' with slot {slot} failed: {source}")]
    Scoring {
        entity: String,
        slot: usize,
        source: EnsembleError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

/// Failures confined to one molecule. The batch continues without it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoleculeError {
    #[error("Invalid notation: {0}")]
    Parse(#[from] ParseError),

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbedError),

    #[error("Molecule has {atoms} atoms and {bonds} bonds after adding hydrogens; SD output holds at most 999 of each")]
    TooLarge { atoms: usize, bonds: usize },

    #[error("None of the {requested} requested conformers could be embedded")]
    NothingEmbedded { requested: usize },

    #[error("No conformer converged under any optimization method ({attempted} attempted)")]
    NoConvergedConformer { attempted: usize },
}
