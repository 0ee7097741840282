use std::io::{self, BufRead};

/// A molecule to process: its run-unique name and line notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoleculeInput {
    pub name: String,
    pub notation: String,
}

impl MoleculeInput {
    pub fn new(name: impl Into<String>, notation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notation: notation.into(),
        }
    }

    /// Default name of the molecule on 1-based input line `line`.
    pub fn default_name(line: usize) -> String {
        format!("Molecule_{}", line)
    }
}

/// Reads one notation per line. Line `i` (1-based) is named `Molecule_i`; blank lines are
/// skipped but still counted, so names always match line numbers.
pub fn read_notation_list(reader: impl BufRead) -> io::Result<Vec<MoleculeInput>> {
    let mut inputs = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let notation = line.trim();
        if notation.is_empty() {
            continue;
        }
        inputs.push(MoleculeInput::new(
            MoleculeInput::default_name(idx + 1),
            notation,
        ));
    }
    Ok(inputs)
}
