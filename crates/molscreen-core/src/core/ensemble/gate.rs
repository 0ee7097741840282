use super::table::{Cell, DescriptorTable, Entity};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// How a blank or `NaN` descriptor cell is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImputationPolicy {
    /// Replace the missing value with 0.0.
    #[default]
    Zero,
    /// Drop the entity.
    Exclude,
}

impl fmt::Display for ImputationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "zero"),
            Self::Exclude => write!(f, "exclude"),
        }
    }
}

/// Why an entity did not pass the data-quality gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Exclusion {
    NonFinite { column: String },
    MissingColumn { column: String },
    MissingValue { column: String },
    NotNumeric { column: String, value: String },
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { column } => write!(f, "non-finite value in '{}'", column),
            Self::MissingColumn { column } => {
                write!(f, "required descriptor '{}' is not in the input", column)
            }
            Self::MissingValue { column } => write!(f, "missing value in '{}'", column),
            Self::NotNumeric { column, value } => {
                write!(f, "non-numeric value '{}' in '{}'", value, column)
            }
        }
    }
}

/// Descriptor values of an entity that passed the gate, keyed by descriptor name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdmittedRow {
    values: HashMap<String, f64>,
}

impl AdmittedRow {
    pub fn get(&self, descriptor: &str) -> Option<f64> {
        self.values.get(descriptor).copied()
    }

    /// Values for `descriptors` in the given order. `None` if any was not admitted.
    pub fn select(&self, descriptors: &[String]) -> Option<Vec<f64>> {
        descriptors.iter().map(|d| self.get(d)).collect()
    }
}

/// Applies the data-quality gate to one entity.
///
/// Any infinite value anywhere in the row (other than `skip_column`) excludes the entity,
/// whether or not a model uses that column. The `required` descriptors must all be present
/// as columns and hold numbers; missing cells are handled by `policy`.
pub fn admit(
    table: &DescriptorTable,
    entity: &Entity,
    required: &[&str],
    policy: ImputationPolicy,
    skip_column: Option<&str>,
) -> Result<AdmittedRow, Exclusion> {
    for (column, cell) in table.columns().iter().zip(&entity.cells) {
        if Some(column.as_str()) == skip_column {
            continue;
        }
        if cell.is_non_finite() {
            return Err(Exclusion::NonFinite {
                column: column.clone(),
            });
        }
    }

    let mut values = HashMap::with_capacity(required.len());
    for &descriptor in required {
        let idx = table
            .column_index(descriptor)
            .ok_or_else(|| Exclusion::MissingColumn {
                column: descriptor.to_string(),
            })?;
        let value = match &entity.cells[idx] {
            Cell::Value(v) => *v,
            Cell::Missing => match policy {
                ImputationPolicy::Zero => 0.0,
                ImputationPolicy::Exclude => {
                    return Err(Exclusion::MissingValue {
                        column: descriptor.to_string(),
                    });
                }
            },
            Cell::Invalid(raw) => {
                return Err(Exclusion::NotNumeric {
                    column: descriptor.to_string(),
                    value: raw.clone(),
                });
            }
        };
        values.insert(descriptor.to_string(), value);
    }
    Ok(AdmittedRow { values })
}
