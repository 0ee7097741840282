use crate::core::ensemble::table::{Cell, DescriptorTable};
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Table '{path}' has no '{column}' column")]
    MissingIdentityColumn { path: String, column: String },
}

/// Reads only the header row of a CSV file.
pub fn read_headers(path: &Path) -> Result<Vec<String>, TableError> {
    let csv_err = |e| TableError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?;
    Ok(headers.iter().map(str::to_string).collect())
}

/// Reads a descriptor table whose entity names come from `identity_column`.
///
/// Every other column is kept as a descriptor column, parsed cell by cell; the
/// identity column itself is not part of the descriptor columns.
pub fn read_descriptor_table(
    path: &Path,
    identity_column: &str,
) -> Result<DescriptorTable, TableError> {
    let reader = csv::Reader::from_path(path).map_err(|e| TableError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    parse_descriptor_table(reader, identity_column, &path.to_string_lossy())
}

/// Same as [`read_descriptor_table`] over any reader. `source` names it in errors.
pub fn parse_descriptor_table<R: Read>(
    mut reader: csv::Reader<R>,
    identity_column: &str,
    source: &str,
) -> Result<DescriptorTable, TableError> {
    let csv_err = |e| TableError::Csv {
        path: source.to_string(),
        source: e,
    };
    let headers = reader.headers().map_err(csv_err)?.clone();
    let identity = headers
        .iter()
        .position(|h| h == identity_column)
        .ok_or_else(|| TableError::MissingIdentityColumn {
            path: source.to_string(),
            column: identity_column.to_string(),
        })?;

    let columns = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != identity)
        .map(|(_, h)| h.to_string())
        .collect();
    let mut table = DescriptorTable::new(columns);

    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let name = record.get(identity).unwrap_or_default().trim().to_string();
        let cells = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != identity)
            .map(|(_, raw)| Cell::parse(raw))
            .collect();
        table.push(name, cells);
    }
    Ok(table)
}

/// Writes `Name,Classification` rows.
pub fn write_predictions<'a, W: Write>(
    writer: W,
    rows: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["Name", "Classification"])?;
    for (name, label) in rows {
        writer.write_record([name, label])?;
    }
    writer.flush()?;
    Ok(())
}
