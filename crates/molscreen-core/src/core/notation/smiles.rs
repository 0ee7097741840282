use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Notation is empty")]
    Empty,
    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("Unknown element '{symbol}' at position {pos}")]
    UnknownElement { symbol: String, pos: usize },
    #[error("Bracket atom starting at position {pos} is never closed")]
    UnclosedBracket { pos: usize },
    #[error("Invalid bracket atom at position {pos}: {reason}")]
    InvalidBracketAtom { pos: usize, reason: &'static str },
    #[error("Unbalanced parenthesis at position {pos}")]
    UnbalancedParenthesis { pos: usize },
    #[error("Bond symbol at position {pos} is not followed by an atom")]
    DanglingBond { pos: usize },
    #[error("Ring bond {label} opened at position {pos} is never closed")]
    UnclosedRing { label: u16, pos: usize },
    #[error("Invalid ring bond {label} at position {pos}: {reason}")]
    InvalidRingBond {
        label: u16,
        pos: usize,
        reason: &'static str,
    },
}

struct RingOpening {
    atom: usize,
    order: Option<BondOrder>,
    pos: usize,
}

struct Parser<'a> {
    chars: &'a [u8],
    pos: usize,
    molecule: Molecule,
    previous: Option<usize>,
    pending_bond: Option<(BondOrder, usize)>,
    branches: Vec<(Option<usize>, usize)>,
    rings: HashMap<u16, RingOpening>,
}

/// Parses a SMILES string into a molecular graph with implicit hydrogen counts assigned.
///
/// Hydrogens stay implicit; see [`super::hydrogens::add_explicit_hydrogens`] to expand them.
pub fn parse(notation: &str) -> Result<Molecule, ParseError> {
    let trimmed = notation.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    if let Some((pos, ch)) = trimmed.char_indices().find(|(_, c)| !c.is_ascii()) {
        return Err(ParseError::UnexpectedChar { ch, pos });
    }

    let mut parser = Parser {
        chars: trimmed.as_bytes(),
        pos: 0,
        molecule: Molecule::new(),
        previous: None,
        pending_bond: None,
        branches: Vec::new(),
        rings: HashMap::new(),
    };
    parser.run()?;
    let mut molecule = parser.finish()?;
    assign_implicit_hydrogens(&mut molecule);
    Ok(molecule)
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.chars.get(self.pos + offset).copied()
    }

    fn unexpected(&self) -> ParseError {
        ParseError::UnexpectedChar {
            ch: self.chars[self.pos] as char,
            pos: self.pos,
        }
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while let Some(c) = self.peek() {
            match c {
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.attach(atom)?;
                }
                b'(' => {
                    if self.previous.is_none() || self.pending_bond.is_some() {
                        return Err(self.unexpected());
                    }
                    self.branches.push((self.previous, self.pos));
                    self.pos += 1;
                }
                b')' => {
                    if let Some((_, bond_pos)) = self.pending_bond {
                        return Err(ParseError::DanglingBond { pos: bond_pos });
                    }
                    let (anchor, _) = self
                        .branches
                        .pop()
                        .ok_or(ParseError::UnbalancedParenthesis { pos: self.pos })?;
                    self.previous = anchor;
                    self.pos += 1;
                }
                b'-' | b'=' | b'#' | b':' | b'/' | b'\\' => {
                    if self.pending_bond.is_some() {
                        return Err(self.unexpected());
                    }
                    if self.previous.is_none() {
                        return Err(ParseError::DanglingBond { pos: self.pos });
                    }
                    let order = match c {
                        b'=' => BondOrder::Double,
                        b'#' => BondOrder::Triple,
                        b':' => BondOrder::Aromatic,
                        _ => BondOrder::Single,
                    };
                    self.pending_bond = Some((order, self.pos));
                    self.pos += 1;
                }
                b'.' => {
                    if let Some((_, bond_pos)) = self.pending_bond {
                        return Err(ParseError::DanglingBond { pos: bond_pos });
                    }
                    self.previous = None;
                    self.pos += 1;
                }
                b'0'..=b'9' | b'%' => self.ring_bond()?,
                _ if c.is_ascii_alphabetic() => {
                    let atom = self.organic_atom()?;
                    self.attach(atom)?;
                }
                _ => return Err(self.unexpected()),
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Molecule, ParseError> {
        if let Some((_, pos)) = self.pending_bond {
            return Err(ParseError::DanglingBond { pos });
        }
        if let Some(&(_, pos)) = self.branches.last() {
            return Err(ParseError::UnbalancedParenthesis { pos });
        }
        if let Some((&label, opening)) = self.rings.iter().min_by_key(|(_, o)| o.pos) {
            return Err(ParseError::UnclosedRing {
                label,
                pos: opening.pos,
            });
        }
        if self.molecule.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(self.molecule)
    }

    fn attach(&mut self, atom: Atom) -> Result<(), ParseError> {
        let idx = self.molecule.add_atom(atom);
        match (self.previous, self.pending_bond.take()) {
            (Some(prev), explicit) => {
                let order = explicit
                    .map(|(order, _)| order)
                    .unwrap_or_else(|| self.default_order(prev, idx));
                // A chain bond always joins a fresh atom, so it can neither be a self bond
                // nor a duplicate.
                let _ = self.molecule.add_bond(prev, idx, order);
            }
            (None, Some((_, pos))) => return Err(ParseError::DanglingBond { pos }),
            (None, None) => {}
        }
        self.previous = Some(idx);
        Ok(())
    }

    fn default_order(&self, a: usize, b: usize) -> BondOrder {
        let atoms = self.molecule.atoms();
        if atoms[a].aromatic && atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn organic_atom(&mut self) -> Result<Atom, ParseError> {
        let start = self.pos;
        let c = self.chars[start];
        let (element, aromatic, len) = match (c, self.peek_at(1)) {
            (b'C', Some(b'l')) => (Element::Cl, false, 2),
            (b'B', Some(b'r')) => (Element::Br, false, 2),
            (b'B', _) => (Element::B, false, 1),
            (b'C', _) => (Element::C, false, 1),
            (b'N', _) => (Element::N, false, 1),
            (b'O', _) => (Element::O, false, 1),
            (b'P', _) => (Element::P, false, 1),
            (b'S', _) => (Element::S, false, 1),
            (b'F', _) => (Element::F, false, 1),
            (b'I', _) => (Element::I, false, 1),
            (b'b', _) => (Element::B, true, 1),
            (b'c', _) => (Element::C, true, 1),
            (b'n', _) => (Element::N, true, 1),
            (b'o', _) => (Element::O, true, 1),
            (b'p', _) => (Element::P, true, 1),
            (b's', _) => (Element::S, true, 1),
            _ if c.is_ascii_uppercase() => {
                return Err(ParseError::UnknownElement {
                    symbol: (c as char).to_string(),
                    pos: start,
                });
            }
            _ => return Err(self.unexpected()),
        };
        self.pos += len;
        Ok(if aromatic {
            Atom::aromatic(element)
        } else {
            Atom::new(element)
        })
    }

    fn bracket_atom(&mut self) -> Result<Atom, ParseError> {
        let open = self.pos;
        let close = self.chars[open..]
            .iter()
            .position(|&c| c == b']')
            .map(|offset| open + offset)
            .ok_or(ParseError::UnclosedBracket { pos: open })?;
        let body = &self.chars[open + 1..close];
        let atom = parse_bracket_body(body, open)?;
        self.pos = close + 1;
        Ok(atom)
    }

    fn ring_bond(&mut self) -> Result<(), ParseError> {
        let pos = self.pos;
        let label = if self.chars[pos] == b'%' {
            let digits = (self.peek_at(1), self.peek_at(2));
            match digits {
                (Some(a @ b'0'..=b'9'), Some(b @ b'0'..=b'9')) => {
                    self.pos += 3;
                    u16::from(a - b'0') * 10 + u16::from(b - b'0')
                }
                _ => return Err(self.unexpected()),
            }
        } else {
            self.pos += 1;
            u16::from(self.chars[pos] - b'0')
        };

        let current = self.previous.ok_or(ParseError::InvalidRingBond {
            label,
            pos,
            reason: "ring bond has no preceding atom",
        })?;
        let explicit = self.pending_bond.take().map(|(order, _)| order);

        match self.rings.remove(&label) {
            None => {
                self.rings.insert(
                    label,
                    RingOpening {
                        atom: current,
                        order: explicit,
                        pos,
                    },
                );
            }
            Some(opening) => {
                let order = match (opening.order, explicit) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(ParseError::InvalidRingBond {
                            label,
                            pos,
                            reason: "conflicting bond orders at ring closure",
                        });
                    }
                    (Some(order), _) | (None, Some(order)) => order,
                    (None, None) => self.default_order(opening.atom, current),
                };
                self.molecule
                    .add_bond(opening.atom, current, order)
                    .map_err(|_| ParseError::InvalidRingBond {
                        label,
                        pos,
                        reason: "ring closure duplicates an existing bond or closes on itself",
                    })?;
            }
        }
        Ok(())
    }
}

const CHIRAL_CLASSES: [&[u8]; 5] = [b"TH", b"AL", b"SP", b"TB", b"OH"];
const MAX_FORMAL_CHARGE: u8 = 15;

fn parse_bracket_body(body: &[u8], open: usize) -> Result<Atom, ParseError> {
    let invalid = |reason| ParseError::InvalidBracketAtom { pos: open, reason };
    let mut i = 0;

    let mut isotope: Option<u16> = None;
    while i < body.len() && body[i].is_ascii_digit() {
        let digit = u16::from(body[i] - b'0');
        isotope = Some(
            isotope
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| invalid("isotope is too large"))?,
        );
        i += 1;
    }

    let first = *body.get(i).ok_or_else(|| invalid("missing element symbol"))?;
    if !first.is_ascii_alphabetic() {
        return Err(invalid("missing element symbol"));
    }
    let aromatic = first.is_ascii_lowercase();
    let upper = first.to_ascii_uppercase() as char;
    let second = body.get(i + 1).copied().filter(u8::is_ascii_lowercase);

    let two_letter = second.and_then(|s| format!("{}{}", upper, s as char).parse::<Element>().ok());
    let element = match two_letter {
        Some(element) => {
            i += 2;
            element
        }
        None => {
            let symbol = upper.to_string();
            let element = symbol
                .parse::<Element>()
                .map_err(|_| ParseError::UnknownElement {
                    symbol: (first as char).to_string(),
                    pos: open + 1 + i,
                })?;
            i += 1;
            element
        }
    };
    let aromatic_capable = matches!(
        element,
        Element::B | Element::C | Element::N | Element::O | Element::P | Element::S | Element::Se | Element::As
    );
    if aromatic && !aromatic_capable {
        return Err(invalid("element cannot be aromatic"));
    }

    // Chirality markers carry no connectivity information.
    if body.get(i) == Some(&b'@') {
        i += 1;
        if body.get(i) == Some(&b'@') {
            i += 1;
        } else if body
            .get(i..i + 2)
            .is_some_and(|class| CHIRAL_CLASSES.contains(&class))
        {
            i += 2;
            let start = i;
            while i < body.len() && body[i].is_ascii_digit() {
                i += 1;
            }
            if i == start {
                return Err(invalid("chirality class requires a number"));
            }
        }
    }

    let mut hydrogens = 0u8;
    if body.get(i) == Some(&b'H') {
        i += 1;
        hydrogens = 1;
        if let Some(&d) = body.get(i).filter(|d| d.is_ascii_digit()) {
            hydrogens = d - b'0';
            i += 1;
        }
    }

    let mut charge: i8 = 0;
    if let Some(&sign) = body.get(i).filter(|c| matches!(**c, b'+' | b'-')) {
        let unit: i8 = if sign == b'+' { 1 } else { -1 };
        i += 1;
        charge = unit;
        if let Some(&d) = body.get(i).filter(|d| d.is_ascii_digit()) {
            charge = unit * (d - b'0') as i8;
            i += 1;
        } else {
            while body.get(i) == Some(&sign) {
                charge = charge
                    .checked_add(unit)
                    .filter(|c| c.unsigned_abs() <= MAX_FORMAL_CHARGE)
                    .ok_or_else(|| invalid("charge is too large"))?;
                i += 1;
            }
        }
    }

    if body.get(i) == Some(&b':') {
        i += 1;
        let start = i;
        while i < body.len() && body[i].is_ascii_digit() {
            i += 1;
        }
        if i == start {
            return Err(invalid("atom class requires digits"));
        }
    }

    if i != body.len() {
        return Err(invalid("unexpected trailing characters"));
    }

    let mut atom = if aromatic {
        Atom::aromatic(element)
    } else {
        Atom::new(element)
    };
    atom.isotope = isotope;
    atom.formal_charge = charge;
    atom.bracket_hydrogens = Some(hydrogens);
    Ok(atom)
}

/// Derives implicit hydrogen counts from default valences.
///
/// Bracket atoms keep exactly the hydrogens written in them. Aromatic bonds count as one
/// bond plus a shared pi contribution per aromatic atom; aromatic oxygen and sulfur donate
/// a lone pair instead and carry no implicit hydrogens.
fn assign_implicit_hydrogens(molecule: &mut Molecule) {
    let counts: Vec<u8> = (0..molecule.atom_count())
        .map(|idx| {
            let atom = &molecule.atoms()[idx];
            if let Some(h) = atom.bracket_hydrogens {
                return h;
            }
            if atom.aromatic && matches!(atom.element, Element::O | Element::S) {
                return 0;
            }

            let mut used: u32 = molecule
                .bonds()
                .iter()
                .filter(|b| b.contains(idx))
                .map(|b| match b.order {
                    BondOrder::Aromatic => 1,
                    other => other.multiplicity() as u32,
                })
                .sum();
            if atom.aromatic {
                used += 1;
            }
            atom.element
                .default_valences()
                .iter()
                .map(|&v| u32::from(v))
                .find(|&v| v >= used)
                .map(|v| (v - used) as u8)
                .unwrap_or(0)
        })
        .collect();

    for (atom, count) in molecule.atoms_mut().iter_mut().zip(counts) {
        atom.implicit_hydrogens = count;
    }
}
