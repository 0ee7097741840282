use crate::core::models::conformer::Conformer;
use crate::core::models::molecule::Molecule;
use std::io::{self, Write};
use thiserror::Error;

const PROGRAM_LINE: &str = "  molscreen3D";

/// Largest atom or bond count a V2000 counts line can hold.
pub const MOLBLOCK_CAPACITY: usize = 999;

/// Whether `molecule` can be written as a V2000 molblock.
pub fn fits_molblock(molecule: &Molecule) -> bool {
    molecule.atom_count() <= MOLBLOCK_CAPACITY && molecule.bond_count() <= MOLBLOCK_CAPACITY
}

#[derive(Debug, Error)]
pub enum SdfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Conformer has {positions} positions but the molecule has {atoms} atoms")]
    CoordinateMismatch { positions: usize, atoms: usize },
    #[error("Molblock V2000 supports at most 999 atoms and bonds, got {atoms} atoms and {bonds} bonds")]
    TooLarge { atoms: usize, bonds: usize },
}

/// One SD file entry: a named molecule with the coordinates of its selected conformer.
#[derive(Debug, Clone, Copy)]
pub struct SdfRecord<'a> {
    pub name: &'a str,
    pub notation: &'a str,
    pub molecule: &'a Molecule,
    pub conformer: &'a Conformer,
}

/// Writes SD records in V2000 format.
///
/// Each record is a molblock titled with the molecule name followed by the `SMILES`,
/// `Energy` and `ForceField` data items and the `$$$$` delimiter.
pub struct SdfWriter<W: Write> {
    writer: W,
    records: usize,
}

impl<W: Write> SdfWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records: 0,
        }
    }

    pub fn records_written(&self) -> usize {
        self.records
    }

    pub fn write_record(&mut self, record: &SdfRecord<'_>) -> Result<(), SdfError> {
        let molecule = record.molecule;
        let positions = &record.conformer.positions;
        let atoms = molecule.atom_count();
        let bonds = molecule.bond_count();
        if positions.len() != atoms {
            return Err(SdfError::CoordinateMismatch {
                positions: positions.len(),
                atoms,
            });
        }
        if !fits_molblock(molecule) {
            return Err(SdfError::TooLarge { atoms, bonds });
        }

        let w = &mut self.writer;
        writeln!(w, "{}", single_line(record.name))?;
        writeln!(w, "{}", PROGRAM_LINE)?;
        writeln!(w)?;
        writeln!(
            w,
            "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
            atoms, bonds
        )?;

        for (atom, p) in molecule.atoms().iter().zip(positions) {
            writeln!(
                w,
                "{:>10.4}{:>10.4}{:>10.4} {:<3} 0{:>3}  0  0  0  0  0  0  0  0  0  0",
                p.x,
                p.y,
                p.z,
                atom.element.symbol(),
                charge_code(atom.formal_charge)
            )?;
        }

        for bond in molecule.bonds() {
            writeln!(
                w,
                "{:>3}{:>3}{:>3}  0  0  0  0",
                bond.i + 1,
                bond.j + 1,
                bond.order.ctfile_code()
            )?;
        }

        let charged: Vec<(usize, i8)> = molecule
            .atoms()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.formal_charge != 0)
            .map(|(i, a)| (i + 1, a.formal_charge))
            .collect();
        for chunk in charged.chunks(8) {
            write!(w, "M  CHG{:>3}", chunk.len())?;
            for (idx, charge) in chunk {
                write!(w, " {:>3} {:>3}", idx, charge)?;
            }
            writeln!(w)?;
        }
        writeln!(w, "M  END")?;

        write_property(w, "SMILES", record.notation)?;
        write_property(w, "Energy", &format!("{:.4}", record.conformer.energy))?;
        write_property(w, "ForceField", &record.conformer.method)?;
        writeln!(w, "$$$$")?;

        self.records += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SdfError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn write_property(w: &mut impl Write, name: &str, value: &str) -> io::Result<()> {
    writeln!(w, ">  <{}>", name)?;
    writeln!(w, "{}", single_line(value))?;
    writeln!(w)
}

fn single_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().to_string()
}

/// Atom-block charge field of the V2000 format; charges outside ±3 only appear in `M  CHG`.
fn charge_code(charge: i8) -> u8 {
    match charge {
        3 => 1,
        2 => 2,
        1 => 3,
        -1 => 5,
        -2 => 6,
        -3 => 7,
        _ => 0,
    }
}
