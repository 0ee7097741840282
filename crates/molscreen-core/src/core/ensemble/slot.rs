use super::EnsembleError;
use super::model::Classifier;
use super::scaler::Scaler;
use super::vote::{Label, LabelSet};

/// One ensemble member: a scaler, a model and the ordered descriptor list they were fit on.
#[derive(Debug)]
pub struct ModelSlot {
    index: usize,
    scaler: Box<dyn Scaler>,
    model: Box<dyn Classifier>,
    descriptors: Vec<String>,
}

impl ModelSlot {
    /// Builds a slot, checking that every part agrees on the feature count and that the
    /// model's declared classes are the configured labels.
    pub fn new(
        index: usize,
        scaler: Box<dyn Scaler>,
        model: Box<dyn Classifier>,
        descriptors: Vec<String>,
        labels: &LabelSet,
    ) -> Result<Self, EnsembleError> {
        let expected = descriptors.len();
        for (component, actual) in [("scaler", scaler.n_features()), ("model", model.n_features())] {
            if actual != expected {
                return Err(EnsembleError::SlotMismatch {
                    slot: index,
                    component,
                    expected,
                    actual,
                });
            }
        }

        let [negative, positive] = model.classes();
        if negative != labels.negative || positive != labels.positive {
            return Err(EnsembleError::ClassMismatch {
                slot: index,
                declared: format!("[{}, {}]", negative, positive),
                expected: format!("[{}, {}]", labels.negative, labels.positive),
            });
        }

        Ok(Self {
            index,
            scaler,
            model,
            descriptors,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn descriptors(&self) -> &[String] {
        &self.descriptors
    }

    /// Scores one row given in this slot's descriptor order.
    pub fn predict(&self, row: &[f64]) -> Result<Label, EnsembleError> {
        let scaled = self.scaler.transform(row)?;
        self.model.predict(&scaled)
    }
}

/// An ordered, non-empty collection of model slots.
#[derive(Debug)]
pub struct Ensemble {
    slots: Vec<ModelSlot>,
}

impl Ensemble {
    pub fn new(slots: Vec<ModelSlot>) -> Result<Self, EnsembleError> {
        if slots.is_empty() {
            return Err(EnsembleError::EmptyEnsemble);
        }
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[ModelSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every descriptor used by any slot, in first-use order without duplicates.
    pub fn required_descriptors(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.slots
            .iter()
            .flat_map(|slot| slot.descriptors.iter().map(String::as_str))
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::ensemble::model::LogisticModel;
    use crate::core::ensemble::scaler::IdentityScaler;

    /// A slot whose model votes positive iff the first descriptor is above `threshold`.
    pub(crate) fn threshold_slot(index: usize, descriptors: &[&str], threshold: f64) -> ModelSlot {
        let mut coef = vec![0.0; descriptors.len()];
        coef[0] = 1.0;
        ModelSlot::new(
            index,
            Box::new(IdentityScaler {
                n_features: descriptors.len(),
            }),
            Box::new(LogisticModel {
                coef,
                intercept: -threshold,
                classes: ["below_5".to_string(), "above_5".to_string()],
            }),
            descriptors.iter().map(|d| d.to_string()).collect(),
            &LabelSet::default(),
        )
        .unwrap()
    }

    #[test]
    fn slot_predicts_through_scaler_and_model() {
        let slot = threshold_slot(0, &["MolWt", "LogP"], 100.0);
        assert_eq!(slot.predict(&[150.0, 0.0]).unwrap(), Label::Positive);
        assert_eq!(slot.predict(&[50.0, 0.0]).unwrap(), Label::Negative);
    }

    #[test]
    fn feature_count_mismatch_is_rejected() {
        let result = ModelSlot::new(
            3,
            Box::new(IdentityScaler { n_features: 2 }),
            Box::new(LogisticModel {
                coef: vec![1.0, 1.0],
                intercept: 0.0,
                classes: ["below_5".to_string(), "above_5".to_string()],
            }),
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            &LabelSet::default(),
        );
        assert!(matches!(
            result,
            Err(EnsembleError::SlotMismatch {
                slot: 3,
                component: "scaler",
                expected: 3,
                actual: 2,
            })
        ));
    }

    #[test]
    fn undeclared_classes_are_rejected() {
        let result = ModelSlot::new(
            0,
            Box::new(IdentityScaler { n_features: 1 }),
            Box::new(LogisticModel {
                coef: vec![1.0],
                intercept: 0.0,
                classes: ["inactive".to_string(), "active".to_string()],
            }),
            vec!["a".to_string()],
            &LabelSet::default(),
        );
        assert!(matches!(result, Err(EnsembleError::ClassMismatch { .. })));
    }

    #[test]
    fn ensemble_requires_at_least_one_slot() {
        assert!(matches!(
            Ensemble::new(Vec::new()),
            Err(EnsembleError::EmptyEnsemble)
        ));
    }

    #[test]
    fn required_descriptors_are_deduplicated_in_order() {
        let ensemble = Ensemble::new(vec![
            threshold_slot(0, &["MolWt", "LogP"], 1.0),
            threshold_slot(1, &["TPSA", "MolWt"], 1.0),
        ])
        .unwrap();
        assert_eq!(ensemble.len(), 2);
        assert_eq!(ensemble.required_descriptors(), ["MolWt", "LogP", "TPSA"]);
    }
}
