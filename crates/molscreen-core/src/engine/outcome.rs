use std::fmt;

/// An entity that was dropped from a batch, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntity {
    pub name: String,
    pub reason: String,
}

impl fmt::Display for SkippedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// Per-entity result of a batch step.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityOutcome<T> {
    Processed(T),
    Skipped(SkippedEntity),
}

impl<T> EntityOutcome<T> {
    pub fn skipped(name: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Skipped(SkippedEntity {
            name: name.into(),
            reason: reason.to_string(),
        })
    }

    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed(_))
    }

    pub fn processed(&self) -> Option<&T> {
        match self {
            Self::Processed(value) => Some(value),
            Self::Skipped(_) => None,
        }
    }

    pub fn skip(&self) -> Option<&SkippedEntity> {
        match self {
            Self::Processed(_) => None,
            Self::Skipped(skipped) => Some(skipped),
        }
    }
}

/// Splits outcomes into processed values and skipped entities, both in input order.
pub fn partition<T>(outcomes: Vec<EntityOutcome<T>>) -> (Vec<T>, Vec<SkippedEntity>) {
    let mut processed = Vec::new();
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            EntityOutcome::Processed(value) => processed.push(value),
            EntityOutcome::Skipped(entity) => skipped.push(entity),
        }
    }
    (processed, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_keeps_input_order() {
        let outcomes = vec![
            EntityOutcome::Processed(1),
            EntityOutcome::skipped("b", "bad"),
            EntityOutcome::Processed(3),
            EntityOutcome::skipped("d", 42),
        ];
        let (processed, skipped) = partition(outcomes);
        assert_eq!(processed, vec![1, 3]);
        assert_eq!(skipped[0].name, "b");
        assert_eq!(skipped[1].reason, "42");
    }

    #[test]
    fn accessors_match_variant() {
        let ok: EntityOutcome<u8> = EntityOutcome::Processed(7);
        let skipped: EntityOutcome<u8> = EntityOutcome::skipped("x", "why");
        assert!(ok.is_processed());
        assert_eq!(ok.processed(), Some(&7));
        assert!(ok.skip().is_none());
        assert!(!skipped.is_processed());
        assert_eq!(skipped.skip().unwrap().to_string(), "x: why");
    }
}
