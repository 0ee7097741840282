use crate::core::ensemble::gate::AdmittedRow;
use crate::core::ensemble::slot::Ensemble;
use crate::core::ensemble::vote::{Label, TiePolicy, majority_vote};
use crate::engine::error::EngineError;

/// Votes of every slot for one admitted entity, in slot order.
pub fn slot_votes(
    entity: &str,
    row: &AdmittedRow,
    ensemble: &Ensemble,
) -> Result<Vec<Label>, EngineError> {
    ensemble
        .slots()
        .iter()
        .map(|slot| {
            let values = row.select(slot.descriptors()).ok_or_else(|| {
                EngineError::Internal(format!(
                    "'{}' was admitted without all descriptors of slot {}",
                    entity,
                    slot.index()
                ))
            })?;
            slot.predict(&values).map_err(|source| EngineError::Scoring {
                entity: entity.to_string(),
                slot: slot.index(),
                source,
            })
        })
        .collect()
}

/// Consensus label of one admitted entity.
pub fn classify_entity(
    entity: &str,
    row: &AdmittedRow,
    ensemble: &Ensemble,
    tie: TiePolicy,
) -> Result<Label, EngineError> {
    let votes = slot_votes(entity, row, ensemble)?;
    Ok(majority_vote(&votes, tie))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ensemble::gate::{ImputationPolicy, admit};
    use crate::core::ensemble::slot::tests::threshold_slot;
    use crate::core::ensemble::table::{Cell, DescriptorTable};

    fn admitted(values: &[f64]) -> AdmittedRow {
        let mut table = DescriptorTable::new(vec!["x".to_string()]);
        table.push("e", values.iter().map(|v| Cell::Value(*v)).collect());
        admit(&table, &table.entities()[0], &["x"], ImputationPolicy::Zero, None).unwrap()
    }

    fn five_slot_ensemble() -> Ensemble {
        // Slot i votes positive iff x > threshold_i.
        Ensemble::new(
            [1.0, 2.0, 3.0, 4.0, 5.0]
                .iter()
                .enumerate()
                .map(|(i, t)| threshold_slot(i, &["x"], *t))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn three_of_five_positive_votes_classify_positive() {
        let ensemble = five_slot_ensemble();
        let row = admitted(&[3.5]);
        assert_eq!(
            slot_votes("e", &row, &ensemble).unwrap(),
            vec![
                Label::Positive,
                Label::Positive,
                Label::Positive,
                Label::Negative,
                Label::Negative
            ]
        );
        assert_eq!(
            classify_entity("e", &row, &ensemble, TiePolicy::Negative).unwrap(),
            Label::Positive
        );
    }

    #[test]
    fn two_of_five_positive_votes_classify_negative() {
        let ensemble = five_slot_ensemble();
        let row = admitted(&[2.5]);
        assert_eq!(
            classify_entity("e", &row, &ensemble, TiePolicy::Positive).unwrap(),
            Label::Negative
        );
    }

    #[test]
    fn row_missing_a_slot_descriptor_is_an_internal_error() {
        let ensemble = Ensemble::new(vec![threshold_slot(0, &["y"], 0.0)]).unwrap();
        let result = slot_votes("e", &admitted(&[1.0]), &ensemble);
        assert!(matches!(result, Err(EngineError::Internal(_))));
    }
}
