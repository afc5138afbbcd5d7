use crate::models::molecule::Molecule;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes `molecule` as an include-topology moleculetype block.
///
/// The `[ atoms ]` section is grouped by residue in residue-id order; the
/// bonded sections are derived from the bond graph: `[ pairs ]` are the 1-4
/// pairs, `[ angles ]` and `[ dihedrals ]` the perceived three- and four-atom
/// terms. Parameter columns are left for the force field to fill in via type
/// lookup (funct 1 bonds and pairs, funct 5 angles, funct 9 dihedrals). The
/// molecule's adjacency cache must be current.
pub fn write_topology(
    molecule: &Molecule,
    name: &str,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer, "[ moleculetype ]")?;
    writeln!(writer, "; Name            nrexcl")?;
    writeln!(writer, "{:<20}3", name)?;
    writeln!(writer)?;

    writeln!(writer, "[ atoms ]")?;
    writeln!(
        writer,
        ";   nr       type  resnr residue  atom   cgnr     charge       mass  typeB    chargeB      massB"
    )?;
    let mut qtot = 0.0;
    for residue_id in 0..=molecule.max_residue_id() {
        let residue: Vec<_> = molecule
            .atoms_iter()
            .map(|(_, atom)| atom)
            .filter(|atom| atom.residue_id == residue_id)
            .collect();
        let Some(first) = residue.first() else {
            continue;
        };
        writeln!(
            writer,
            "; residue {:3} {} rtp {}  q  0.0",
            first.residue_id, first.residue_name, first.residue_name
        )?;
        for atom in residue {
            qtot += atom.charge;
            writeln!(
                writer,
                "{:6} {:>10} {:6} {:>6} {:>6} {:6}      {:>5.2} {:>10.3}   ; qtot {:.2}",
                atom.index,
                atom.atom_type,
                atom.residue_id,
                atom.residue_name,
                atom.name,
                1,
                atom.charge,
                atom.mass,
                qtot
            )?;
        }
    }
    writeln!(writer)?;

    writeln!(writer, "[ bonds ]")?;
    writeln!(
        writer,
        ";  ai    aj funct            c0            c1            c2            c3"
    )?;
    for bond in molecule.bonds() {
        if let (Some(a1), Some(a2)) = (molecule.atom(bond.atom1), molecule.atom(bond.atom2)) {
            writeln!(writer, "{:5} {:5}     1", a1.index, a2.index)?;
        }
    }
    writeln!(writer)?;

    writeln!(writer, "[ pairs ]")?;
    writeln!(
        writer,
        ";  ai    aj funct            c0            c1            c2            c3"
    )?;
    for (id1, id2) in molecule.find_pairs(3) {
        if let (Some(a1), Some(a2)) = (molecule.atom(id1), molecule.atom(id2)) {
            writeln!(writer, "{:5} {:5}     1", a1.index, a2.index)?;
        }
    }
    writeln!(writer)?;

    writeln!(writer, "[ angles ]")?;
    writeln!(
        writer,
        ";  ai    aj    ak funct            c0            c1            c2            c3"
    )?;
    for [id1, id2, id3] in molecule.find_angles() {
        if let (Some(a1), Some(a2), Some(a3)) = (
            molecule.atom(id1),
            molecule.atom(id2),
            molecule.atom(id3),
        ) {
            writeln!(writer, "{:5} {:5} {:5}     5", a1.index, a2.index, a3.index)?;
        }
    }
    writeln!(writer)?;

    writeln!(writer, "[ dihedrals ]")?;
    writeln!(
        writer,
        ";  ai    aj    ak    al funct            c0            c1            c2            c3            c4            c5"
    )?;
    for [id1, id2, id3, id4] in molecule.find_dihedrals() {
        if let (Some(a1), Some(a2), Some(a3), Some(a4)) = (
            molecule.atom(id1),
            molecule.atom(id2),
            molecule.atom(id3),
            molecule.atom(id4),
        ) {
            writeln!(
                writer,
                "{:5} {:5} {:5} {:5}     9",
                a1.index, a2.index, a3.index, a4.index
            )?;
        }
    }
    writeln!(writer)?;

    // Improper dihedrals go here; perception does not derive them, so the
    // section is left for hand-curated entries.
    writeln!(writer, "[ dihedrals ]")?;
    writeln!(
        writer,
        ";  ai    aj    ak    al funct            c0            c1            c2            c3"
    )?;
    Ok(())
}

/// Writes the topology to a new file at `path`.
pub fn write_topology_to_path(
    molecule: &Molecule,
    name: &str,
    path: impl AsRef<Path>,
) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_topology(molecule, name, &mut writer)?;
    writer.flush()
}
