use std::collections::HashMap;

/// One cell of a descriptor table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A parsed number. May be infinite; `NaN` is read as `Missing`.
    Value(f64),
    /// Blank or `NaN`.
    Missing,
    /// Text that is not a number.
    Invalid(String),
}

impl Cell {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_nan() => Cell::Missing,
            Ok(v) => Cell::Value(v),
            Err(_) => Cell::Invalid(trimmed.to_string()),
        }
    }

    pub fn is_non_finite(&self) -> bool {
        matches!(self, Cell::Value(v) if !v.is_finite())
    }
}

/// A named row of descriptor cells, aligned with the owning table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// Descriptor values for a batch of entities, one row per entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DescriptorTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    entities: Vec<Entity>,
}

impl DescriptorTable {
    pub fn new(columns: Vec<String>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self {
            columns,
            index,
            entities: Vec::new(),
        }
    }

    /// Appends a row. Short rows are padded with `Missing`; extra cells are dropped.
    pub fn push(&mut self, name: impl Into<String>, mut cells: Vec<Cell>) {
        cells.resize(self.columns.len(), Cell::Missing);
        self.entities.push(Entity {
            name: name.into(),
            cells,
        });
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn cell(&self, entity: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.entities.get(entity)?.cells.get(col)
    }
}
