use crate::io::{error::Error, util};
use crate::model::molecule::Molecule;
use std::io::Write;

/// Writes one V2000 record, including its data items and the `$$$$` line.
pub fn write<W: Write>(mut writer: W, molecule: &Molecule) -> Result<(), Error> {
    writeln!(writer, "{}", molecule.name.as_deref().unwrap_or(""))?;
    writeln!(writer, "  molset")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        molecule.atom_count(),
        molecule.bond_count()
    )?;

    for atom in &molecule.atoms {
        writeln!(
            writer,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
            atom.position[0], atom.position[1], atom.position[2], atom.element
        )?;
    }

    for bond in &molecule.bonds {
        writeln!(
            writer,
            "{:>3}{:>3}{:>3}  0  0  0  0",
            bond.i + 1,
            bond.j + 1,
            util::bond_order_to_ctfile(bond.order)
        )?;
    }

    writeln!(writer, "M  END")?;
    for (name, value) in &molecule.properties {
        writeln!(writer, "> <{name}>")?;
        writeln!(writer, "{value}")?;
        writeln!(writer)?;
    }
    writeln!(writer, "$$$$")?;
    Ok(())
}

/// Writes `molecules` back to back as one SDF stream.
pub fn write_all<'a, W, I>(mut writer: W, molecules: I) -> Result<usize, Error>
where
    W: Write,
    I: IntoIterator<Item = &'a Molecule>,
{
    let mut written = 0;
    for molecule in molecules {
        write(&mut writer, molecule)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::sdf::reader;
    use crate::model::{
        atom::Atom,
        molecule::Bond,
        types::{BondOrder, PropertyValue},
    };
    use std::io::Cursor;

    fn formaldehyde() -> Molecule {
        Molecule {
            name: Some("formaldehyde".to_string()),
            atoms: vec![
                Atom::new("C", [0.0, 0.0, 0.0]),
                Atom::new("O", [1.2, 0.0, 0.0]),
                Atom::new("H", [-0.5, 0.9, 0.0]),
            ],
            bonds: vec![
                Bond::new(0, 1, BondOrder::Double),
                Bond::new(0, 2, BondOrder::Single),
            ],
            ..Molecule::default()
        }
        .with_property("SMILES", "C=O")
        .with_property("heavy_atoms", 2)
        .with_property("approved", false)
    }

    #[test]
    fn written_records_read_back_with_properties() {
        let original = formaldehyde();
        let mut unnamed = formaldehyde();
        unnamed.name = None;

        let mut buf = Vec::new();
        let written = write_all(&mut buf, [&original, &unnamed]).expect("write sdf");
        assert_eq!(written, 2);

        let parsed = reader::read_all(Cursor::new(buf)).expect("read sdf");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name.as_deref(), Some("formaldehyde"));
        assert_eq!(parsed[1].name, None);

        let first = &parsed[0];
        assert_eq!(first.bonds, original.bonds);
        for (a, b) in original.atoms.iter().zip(first.atoms.iter()) {
            assert_eq!(a.element, b.element);
            for k in 0..3 {
                assert!((a.position[k] - b.position[k]).abs() < 1e-4);
            }
        }
        assert_eq!(first.properties, original.properties);
        assert_eq!(first.property("approved"), Some(&PropertyValue::Bool(false)));
    }

    #[test]
    fn data_items_follow_the_connection_table() {
        let mut buf = Vec::new();
        write(&mut buf, &formaldehyde()).expect("write sdf");
        let text = String::from_utf8(buf).expect("utf8");

        let end = text.find("M  END").expect("M  END");
        let item = text.find("> <SMILES>\nC=O\n\n").expect("data item");
        assert!(item > end);
        assert!(text.ends_with("$$$$\n"));
    }
}
