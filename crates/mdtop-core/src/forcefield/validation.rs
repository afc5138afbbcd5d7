use super::table::ForceField;
use crate::models::ids::AtomId;
use crate::models::molecule::Molecule;
use std::fmt;
use tracing::debug;

/// The bonded interaction classes checked by [`validate_topology`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Bond,
    Angle,
    Dihedral,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bond => "bond",
            Self::Angle => "angle",
            Self::Dihedral => "dihedral",
        })
    }
}

/// One cross-validation finding: an interaction present in the bond graph
/// with zero or more than one matching parameter row.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    MissingParameter {
        kind: InteractionKind,
        atom_indices: Vec<usize>,
        atom_types: Vec<String>,
    },
    AmbiguousParameter {
        kind: InteractionKind,
        atom_indices: Vec<usize>,
        atom_types: Vec<String>,
        matches: usize,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter {
                kind,
                atom_indices,
                atom_types,
            } => write!(
                f,
                "no {} type for atoms {:?} with atom types {}",
                kind,
                atom_indices,
                atom_types.join("-")
            ),
            Self::AmbiguousParameter {
                kind,
                atom_indices,
                atom_types,
                matches,
            } => write!(
                f,
                "ambiguous {} type for atoms {:?} with atom types {} ({} found)",
                kind,
                atom_indices,
                atom_types.join("-"),
                matches
            ),
        }
    }
}

/// The outcome of a topology-versus-parameters cross check.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn count(&self) -> usize {
        self.issues.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Checks every bond, perceived angle and perceived dihedral of `molecule`
/// against the parameter database, reporting interactions with no matching
/// row and interactions with more than one. The molecule's adjacency cache
/// must be current ([`Molecule::rebuild_adjacency`]).
pub fn validate_topology(molecule: &Molecule, forcefield: &ForceField) -> ValidationReport {
    let mut report = ValidationReport::default();

    for bond in molecule.bonds() {
        let ids = [bond.atom1, bond.atom2];
        let (indices, types) = describe(molecule, &ids);
        let matches = forcefield.lookup_bond(&types[0], &types[1]).len();
        record(&mut report, InteractionKind::Bond, indices, types, matches);
    }

    for angle in molecule.find_angles() {
        let (indices, types) = describe(molecule, &angle);
        let matches = forcefield
            .lookup_angle(&types[0], &types[1], &types[2])
            .len();
        record(&mut report, InteractionKind::Angle, indices, types, matches);
    }

    for dihedral in molecule.find_dihedrals() {
        let (indices, types) = describe(molecule, &dihedral);
        let matches = forcefield
            .lookup_dihedral(&types[0], &types[1], &types[2], &types[3])
            .len();
        record(
            &mut report,
            InteractionKind::Dihedral,
            indices,
            types,
            matches,
        );
    }

    report
}

fn describe(molecule: &Molecule, ids: &[AtomId]) -> (Vec<usize>, Vec<String>) {
    let mut indices = Vec::with_capacity(ids.len());
    let mut types = Vec::with_capacity(ids.len());
    for &id in ids {
        if let Some(atom) = molecule.atom(id) {
            indices.push(atom.index);
            types.push(atom.atom_type.clone());
        }
    }
    (indices, types)
}

fn record(
    report: &mut ValidationReport,
    kind: InteractionKind,
    atom_indices: Vec<usize>,
    atom_types: Vec<String>,
    matches: usize,
) {
    match matches {
        1 => {}
        0 => {
            debug!(
                "no {} type for atoms {:?} ({})",
                kind,
                atom_indices,
                atom_types.join("-")
            );
            report.issues.push(ValidationIssue::MissingParameter {
                kind,
                atom_indices,
                atom_types,
            });
        }
        n => {
            debug!(
                "{} matching {} types for atoms {:?} ({})",
                n,
                kind,
                atom_indices,
                atom_types.join("-")
            );
            report.issues.push(ValidationIssue::AmbiguousParameter {
                kind,
                atom_indices,
                atom_types,
                matches: n,
            });
        }
    }
}
