use crate::io::{error::Error, util};
use crate::model::{
    atom::Atom,
    molecule::{Bond, Molecule},
    types::PropertyValue,
};
use std::io::BufRead;

type Line = (usize, String);

/// Reads the first record of an SDF stream.
pub fn read<R: BufRead>(reader: R) -> Result<Molecule, Error> {
    read_all(reader)?.into_iter().next().ok_or(Error::Empty)
}

/// Reads every `$$$$`-separated record of an SDF stream, in file order.
pub fn read_all<R: BufRead>(reader: R) -> Result<Vec<Molecule>, Error> {
    collect_blocks(reader)?
        .iter()
        .map(|block| parse_block(block))
        .collect()
}

fn collect_blocks<R: BufRead>(reader: R) -> Result<Vec<Vec<Line>>, Error> {
    let mut blocks = Vec::new();
    let mut current: Vec<Line> = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let content = line?;
        if content.trim() == "$$$$" {
            blocks.push(std::mem::take(&mut current));
            continue;
        }
        current.push((i + 1, content));
    }
    if current.iter().any(|(_, l)| !l.trim().is_empty()) {
        blocks.push(current);
    }
    Ok(blocks)
}

fn parse_block(lines: &[Line]) -> Result<Molecule, Error> {
    if lines.len() < 4 {
        let line_no = lines.first().map(|(ln, _)| *ln).unwrap_or(1);
        return Err(Error::parse(
            line_no,
            "SDF block must contain at least a header and counts line",
        ));
    }

    let counts_line_no = lines[3].0;
    let counts_line = &lines[3].1;
    if counts_line.contains("V3000") {
        return Err(Error::parse(counts_line_no, "V3000 is not supported"));
    }

    let (atom_count, bond_count) = parse_counts(counts_line, counts_line_no)?;
    let atom_start: usize = 4;
    let (bond_start, tail_start) = atom_start
        .checked_add(atom_count)
        .and_then(|bond_start| Some((bond_start, bond_start.checked_add(bond_count)?)))
        .ok_or_else(|| Error::parse(counts_line_no, "atom/bond counts exceed the block"))?;

    if lines.len() < tail_start {
        return Err(Error::parse(
            lines.last().map(|(ln, _)| *ln).unwrap_or(counts_line_no),
            "SDF block ended before atoms/bonds were fully specified",
        ));
    }

    let title = lines[0].1.trim();
    let mut molecule = Molecule {
        name: (!title.is_empty()).then(|| title.to_string()),
        atoms: parse_atoms(&lines[atom_start..bond_start])?,
        bonds: parse_bonds(&lines[bond_start..tail_start], atom_count)?,
        ..Molecule::default()
    };

    let tail = &lines[tail_start..];
    let data_start = tail
        .iter()
        .position(|(_, l)| l.trim_end() == "M  END")
        .map_or(0, |end| end + 1);
    parse_data_items(&tail[data_start..], &mut molecule)?;

    Ok(molecule)
}

fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize), Error> {
    let field = |range: std::ops::Range<usize>| line.get(range).map(str::trim);
    let (atoms, bonds) = match (field(0..3), field(3..6)) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => (a, b),
        _ => {
            let tokens: Vec<_> = line.split_whitespace().collect();
            if tokens.len() < 2 {
                return Err(Error::parse(
                    line_no,
                    "counts line must contain atom and bond counts",
                ));
            }
            (tokens[0], tokens[1])
        }
    };
    let atoms = atoms
        .parse::<usize>()
        .map_err(|_| Error::parse(line_no, "invalid atom count"))?;
    let bonds = bonds
        .parse::<usize>()
        .map_err(|_| Error::parse(line_no, "invalid bond count"))?;
    Ok((atoms, bonds))
}

fn parse_atoms(lines: &[Line]) -> Result<Vec<Atom>, Error> {
    let mut atoms = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        if !raw.is_ascii() {
            return Err(Error::parse(*ln, "atom line contains non-ASCII characters"));
        }
        let padded = format!("{raw:<40}");
        let coord = |range: std::ops::Range<usize>, axis: &str| {
            padded[range]
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::parse(*ln, format!("invalid {axis} coordinate in atom line")))
        };
        let x = coord(0..10, "x")?;
        let y = coord(10..20, "y")?;
        let z = coord(20..30, "z")?;
        let element = util::element_symbol(&padded[31..34])
            .ok_or_else(|| Error::parse(*ln, "unable to infer element symbol"))?;
        atoms.push(Atom::new(element, [x, y, z]));
    }
    Ok(atoms)
}

fn parse_bonds(lines: &[Line], atom_count: usize) -> Result<Vec<Bond>, Error> {
    let mut bonds = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        let tokens: Vec<_> = raw.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(Error::parse(*ln, "invalid bond line"));
        }

        let a1 = tokens[0]
            .parse::<usize>()
            .map_err(|_| Error::parse(*ln, "invalid first atom index"))?;
        let a2 = tokens[1]
            .parse::<usize>()
            .map_err(|_| Error::parse(*ln, "invalid second atom index"))?;
        let order_val = tokens[2]
            .parse::<i32>()
            .map_err(|_| Error::parse(*ln, "invalid bond order value"))?;

        let order = util::bond_order_from_ctfile(order_val)
            .ok_or_else(|| Error::parse(*ln, "unsupported bond order in bond line"))?;

        if a1 == 0 || a2 == 0 || a1 > atom_count || a2 > atom_count {
            return Err(Error::parse(
                *ln,
                "bond references atom outside declared range",
            ));
        }

        bonds.push(Bond::new(a1 - 1, a2 - 1, order));
    }
    Ok(bonds)
}

fn parse_data_items(lines: &[Line], molecule: &mut Molecule) -> Result<(), Error> {
    let mut rest = lines;
    while let Some(((ln, header), after)) = rest.split_first() {
        rest = after;
        if !header.starts_with('>') {
            continue;
        }
        let tag = util::data_item_tag(header)
            .ok_or_else(|| Error::parse(*ln, "data item header has no <TAG>"))?;

        let value_len = rest
            .iter()
            .position(|(_, l)| l.trim().is_empty())
            .unwrap_or(rest.len());
        let value = rest[..value_len]
            .iter()
            .map(|(_, l)| l.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        rest = &rest[value_len..];

        molecule.set_property(tag, PropertyValue::infer(&value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::BondOrder;
    use std::io::Cursor;

    const TWO_RECORDS: &str = "\
ethanol
  molset

  3  2  0  0  0  0  0  0  0  0999 V2000
   -1.2700    0.2480    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.1390   -0.3080    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.0360    0.7890    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0  0  0  0
  2  3  1  0  0  0  0
M  END
> <SMILES>
CCO

> <score>  (1)
-4.25

$$$$

  molset

  1  0  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 CL  0  0  0  0  0  0  0  0  0  0  0  0
M  END
> <note>
first line
second line

$$$$
";

    #[test]
    fn reads_every_record_with_data_items() {
        let molecules = read_all(Cursor::new(TWO_RECORDS)).unwrap();
        assert_eq!(molecules.len(), 2);

        let ethanol = &molecules[0];
        assert_eq!(ethanol.name.as_deref(), Some("ethanol"));
        assert_eq!(ethanol.atom_count(), 3);
        assert_eq!(ethanol.bonds[1], Bond::new(1, 2, BondOrder::Single));
        assert_eq!(
            ethanol.property("SMILES"),
            Some(&PropertyValue::Str("CCO".to_string()))
        );
        assert_eq!(ethanol.property("score"), Some(&PropertyValue::Double(-4.25)));

        let chloride = &molecules[1];
        assert_eq!(chloride.name, None);
        assert_eq!(chloride.atoms[0].element, "Cl");
        assert_eq!(
            chloride.property("note"),
            Some(&PropertyValue::Str("first line\nsecond line".to_string()))
        );
    }

    #[test]
    fn read_returns_first_record() {
        let first = read(Cursor::new(TWO_RECORDS)).unwrap();
        assert_eq!(first.name.as_deref(), Some("ethanol"));
    }

    #[test]
    fn empty_input_has_no_records() {
        assert!(read_all(Cursor::new("\n\n")).unwrap().is_empty());
        assert!(matches!(read(Cursor::new("")), Err(Error::Empty)));
    }

    #[test]
    fn accepts_last_record_without_terminator() {
        let text = TWO_RECORDS.trim_end().trim_end_matches("$$$$");
        let molecules = read_all(Cursor::new(text)).unwrap();
        assert_eq!(molecules.len(), 2);
    }

    #[test]
    fn rejects_v3000_blocks() {
        let text = "title\n  prog\n\n  0  0  0     0  0            999 V3000\nM  END\n$$$$\n";
        let err = read_all(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 4, .. }));
    }

    #[test]
    fn reports_truncated_blocks() {
        let text = "title\n  prog\n\n  2  0  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    0.0000 C   0\n$$$$\n";
        let err = read_all(Cursor::new(text)).unwrap_err();
        assert!(err.to_string().contains("ended before atoms/bonds"));
    }

    #[test]
    fn rejects_counts_that_overflow_the_block() {
        let text = "t\n  p\n\n   18446744073709551615 1\nM  END\n$$$$\n";
        let err = read_all(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 4, .. }));
        assert!(err.to_string().contains("exceed the block"));
    }

    #[test]
    fn rejects_bonds_to_undeclared_atoms() {
        let text = "\
t
  p

  1  1  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0  0  0  0
M  END
$$$$
";
        let err = read_all(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 6, .. }));
    }

    #[test]
    fn counts_line_supports_fixed_width_fields() {
        assert_eq!(parse_counts("120115  0  0  0  0  0  0  0  0999 V2000", 4).unwrap(), (120, 115));
        assert_eq!(parse_counts("  3  2", 4).unwrap(), (3, 2));
    }
}
