use super::EnsembleError;
use serde::Deserialize;

/// Columns of a reference table that are not model inputs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReservedColumns {
    /// The training target, e.g. `pIC50`.
    pub target: String,
    /// The entity name column.
    pub identity: String,
}

impl Default for ReservedColumns {
    fn default() -> Self {
        Self {
            target: "pIC50".to_string(),
            identity: "Name".to_string(),
        }
    }
}

/// The ordered descriptor list one ensemble member was trained on: the headers of its
/// reference table with both reserved columns removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSchema {
    descriptors: Vec<String>,
}

impl ReferenceSchema {
    pub fn from_headers<S: AsRef<str>>(
        headers: &[S],
        reserved: &ReservedColumns,
    ) -> Result<Self, EnsembleError> {
        for column in [&reserved.target, &reserved.identity] {
            if !headers.iter().any(|h| h.as_ref() == column) {
                return Err(EnsembleError::MissingReservedColumn {
                    column: column.clone(),
                });
            }
        }
        let descriptors = headers
            .iter()
            .map(AsRef::as_ref)
            .filter(|h| *h != reserved.target && *h != reserved.identity)
            .map(str::to_string)
            .collect();
        Ok(Self { descriptors })
    }

    pub fn descriptors(&self) -> &[String] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
