//! # Ensemble Module
//!
//! Building blocks of the consensus classifier: descriptor tables, the data-quality gate,
//! opaque scaler and model artifacts, model slots and the majority vote.
//!
//! ## Overview
//!
//! An [`slot::Ensemble`] holds N [`slot::ModelSlot`]s. Each slot pairs a [`scaler::Scaler`]
//! with a [`model::Classifier`] and the ordered descriptor list they were fit on (derived
//! from a reference table through [`schema::ReferenceSchema`]). An entity is first run
//! through [`gate::admit`]; every slot then scores the admitted row and
//! [`vote::majority_vote`] combines the N labels.

pub mod gate;
pub mod model;
pub mod scaler;
pub mod schema;
pub mod slot;
pub mod table;
pub mod vote;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnsembleError {
    #[error("Reference table is missing the reserved column '{column}'")]
    MissingReservedColumn { column: String },
    #[error("Slot {slot}: {component} expects {actual} features but the descriptor list has {expected}")]
    SlotMismatch {
        slot: usize,
        component: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Slot {slot}: model declares classes {declared}, expected {expected}")]
    ClassMismatch {
        slot: usize,
        declared: String,
        expected: String,
    },
    #[error("The {component} received {actual} features, expected {expected}")]
    FeatureCount {
        component: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),
    #[error("An ensemble needs at least one model slot")]
    EmptyEnsemble,
}
