use nalgebra::Point3;

/// One atom record within a molecule.
///
/// Carries the identity and the per-atom attributes that coordinate-file
/// readers populate and that topology derivation and parameter lookup consume.
/// Connectivity is not stored here: the owning
/// [`Molecule`](super::molecule::Molecule) keeps the bond list and the
/// adjacency cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// File-assigned atom index. Unique within a molecule, not necessarily
    /// contiguous.
    pub index: usize,
    /// The atom name (e.g. "CA", "OW").
    pub name: String,
    /// Coordinates in Angstroms.
    pub position: Point3<f64>,
    /// Force-field atom type (e.g. "CT", "opls_116").
    pub atom_type: String,
    /// Identifier of the residue this atom belongs to.
    pub residue_id: isize,
    /// Residue name (e.g. "ALA", "SOL").
    pub residue_name: String,
    /// Formal charge in elementary charge units.
    pub charge: f64,
    /// Atomic mass in amu, if known.
    pub mass: f64,
    /// Numeric chain identifier.
    pub chain_id: usize,
    /// Crystallographic occupancy.
    pub occupancy: f64,
    /// Temperature (B) factor.
    pub temp_factor: f64,
    /// Element symbol. Defaults to the atom type when a reader supplies none.
    pub element: String,
}

impl Atom {
    /// Creates an atom with the given identity; the remaining attributes take
    /// neutral defaults and can be filled in by the caller.
    pub fn new(index: usize, name: &str, position: Point3<f64>, atom_type: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            position,
            atom_type: atom_type.to_string(),
            residue_id: 0,
            residue_name: "UNK".to_string(),
            charge: 0.0,
            mass: 0.0,
            chain_id: 0,
            occupancy: 1.0,
            temp_factor: 0.0,
            element: atom_type.to_string(),
        }
    }

    /// Euclidean distance to another atom, in Angstroms.
    pub fn distance(&self, other: &Atom) -> f64 {
        (self.position - other.position).norm()
    }
}
