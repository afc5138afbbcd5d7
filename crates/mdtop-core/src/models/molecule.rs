use super::atom::Atom;
use super::ids::AtomId;
use super::topology::{Bond, BondOrder};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoleculeError {
    #[error("no atom with index {index} in the molecule")]
    AtomNotFound { index: usize },
    #[error("an atom with index {index} is already present")]
    DuplicateAtomIndex { index: usize },
}

/// A molecule: an arena of atoms plus an undirected bond graph over them.
///
/// Atoms live in a slot map and are referenced by [`AtomId`]; bonds and the
/// adjacency cache hold ids, never owning references, so the atom/neighbour
/// relation is cycle-free. External callers address atoms by their
/// file-assigned integer index.
///
/// The adjacency cache is rebuilt in O(bonds) by [`Molecule::rebuild_adjacency`].
/// Readers that populate atoms and bonds must call it once before requesting
/// any enumeration; [`Molecule::add_bond`] does not update it implicitly.
///
/// The enumeration operations (`find_pairs`, `find_angles`, `find_dihedrals`,
/// `find_exclusions`) are deterministic pure functions of the current
/// (atoms, bonds) snapshot. Their canonical ordering conventions are part of
/// the output format: consumers diff derived topology sections line by line.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    atoms: SlotMap<AtomId, Atom>,
    /// Atom ids in insertion order; enumeration follows this order before
    /// sorting, so results are reproducible run to run.
    order: Vec<AtomId>,
    index_map: HashMap<usize, AtomId>,
    bonds: Vec<Bond>,
    adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
    max_residue_id: isize,
    max_chain_id: usize,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an atom. Fails if an atom with the same index is already present.
    pub fn add_atom(&mut self, atom: Atom) -> Result<AtomId, MoleculeError> {
        if self.index_map.contains_key(&atom.index) {
            return Err(MoleculeError::DuplicateAtomIndex { index: atom.index });
        }
        let index = atom.index;
        if atom.residue_id > self.max_residue_id {
            self.max_residue_id = atom.residue_id;
        }
        if atom.chain_id > self.max_chain_id {
            self.max_chain_id = atom.chain_id;
        }
        let id = self.atoms.insert(atom);
        self.order.push(id);
        self.index_map.insert(index, id);
        Ok(id)
    }

    /// Adds a bond between the atoms with the given indices. Insertion is
    /// idempotent over the unordered atom pair: a second bond between the same
    /// two atoms is silently dropped, regardless of direction or order tag.
    pub fn add_bond(
        &mut self,
        index1: usize,
        index2: usize,
        order: BondOrder,
    ) -> Result<(), MoleculeError> {
        let bond = Bond::new(self.atom_id(index1)?, self.atom_id(index2)?, order);
        if !self.bonds.iter().any(|existing| existing.same_pair(&bond)) {
            self.bonds.push(bond);
        }
        Ok(())
    }

    /// Resolves a file-assigned atom index to its arena id.
    pub fn atom_id(&self, index: usize) -> Result<AtomId, MoleculeError> {
        self.index_map
            .get(&index)
            .copied()
            .ok_or(MoleculeError::AtomNotFound { index })
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    pub fn atom_by_index(&self, index: usize) -> Result<&Atom, MoleculeError> {
        Ok(&self.atoms[self.atom_id(index)?])
    }

    /// Iterates atoms in insertion order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.order.iter().map(|&id| (id, &self.atoms[id]))
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom_count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn max_residue_id(&self) -> isize {
        self.max_residue_id
    }

    pub fn max_chain_id(&self) -> usize {
        self.max_chain_id
    }

    /// Rebuilds the neighbour adjacency cache from the bond list. O(bonds).
    pub fn rebuild_adjacency(&mut self) {
        self.adjacency.clear();
        for &id in &self.order {
            self.adjacency.insert(id, Vec::new());
        }
        for bond in &self.bonds {
            if let Some(neighbours) = self.adjacency.get_mut(bond.atom1) {
                neighbours.push(bond.atom2);
            }
            if let Some(neighbours) = self.adjacency.get_mut(bond.atom2) {
                neighbours.push(bond.atom1);
            }
        }
    }

    /// Directly bonded neighbours of an atom, in bond-list order.
    pub fn bonded_neighbours(&self, id: AtomId) -> &[AtomId] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every walk of exactly `length` bond-steps starting at the atom with the
    /// given index, as ordered id tuples including the start atom. Walks may
    /// revisit atoms; every step traverses an edge. A length of zero yields
    /// the singleton walk.
    pub fn walks(&self, index: usize, length: usize) -> Result<Vec<Vec<AtomId>>, MoleculeError> {
        Ok(self.walks_from(self.atom_id(index)?, length))
    }

    fn walks_from(&self, id: AtomId, length: usize) -> Vec<Vec<AtomId>> {
        if length == 0 {
            return vec![vec![id]];
        }
        let mut walks = Vec::new();
        for &neighbour in self.bonded_neighbours(id) {
            for mut tail in self.walks_from(neighbour, length - 1) {
                let mut walk = Vec::with_capacity(tail.len() + 1);
                walk.push(id);
                walk.append(&mut tail);
                walks.push(walk);
            }
        }
        walks
    }

    /// Atoms reachable by a simple path of exactly `steps` bonds from the atom
    /// with the given index (walks that revisit an atom are discarded).
    pub fn neighbours(&self, index: usize, steps: usize) -> Result<Vec<AtomId>, MoleculeError> {
        Ok(self.simple_endpoints(self.atom_id(index)?, steps))
    }

    fn simple_endpoints(&self, id: AtomId, steps: usize) -> Vec<AtomId> {
        self.walks_from(id, steps)
            .into_iter()
            .filter(|walk| all_distinct(walk))
            .filter_map(|walk| walk.last().copied())
            .collect()
    }

    fn index_of(&self, id: AtomId) -> usize {
        self.atoms[id].index
    }

    /// Unordered atom pairs connected by a simple path of exactly `steps`
    /// bonds. Each pair appears once, lower atom index first, sorted by
    /// `1000 * index(first) + index(second)`.
    pub fn find_pairs(&self, steps: usize) -> Vec<(AtomId, AtomId)> {
        let mut pairs: Vec<(AtomId, AtomId)> = Vec::new();
        for &a in &self.order {
            for endpoint in self.simple_endpoints(a, steps) {
                if !pairs.contains(&(a, endpoint)) && !pairs.contains(&(endpoint, a)) {
                    pairs.push((a, endpoint));
                }
            }
        }
        for pair in &mut pairs {
            if self.index_of(pair.0) > self.index_of(pair.1) {
                *pair = (pair.1, pair.0);
            }
        }
        pairs.sort_by_key(|&(a, b)| pair_sort_key(self.index_of(a), self.index_of(b)));
        pairs
    }

    /// The exclusion pair list: all `find_pairs(d)` results for `d` below
    /// `max_distance`, concatenated and re-sorted. Distance zero contributes
    /// each atom paired with itself; pairs reachable at several distances
    /// (rings) appear once per distance.
    pub fn find_exclusions(&self, max_distance: usize) -> Vec<(AtomId, AtomId)> {
        let mut exclusions = Vec::new();
        for distance in 0..max_distance {
            exclusions.extend(self.find_pairs(distance));
        }
        exclusions.sort_by_key(|&(a, b)| pair_sort_key(self.index_of(a), self.index_of(b)));
        exclusions
    }

    /// Every bonded angle (three pairwise-distinct atoms connected by two
    /// bonds), one canonical tuple per angle: reversed when the first atom's
    /// index exceeds the last one's, sorted by
    /// `100000*i1 + 1000*i2 + i3`.
    pub fn find_angles(&self) -> Vec<[AtomId; 3]> {
        let mut angles: Vec<[AtomId; 3]> = Vec::new();
        for &a in &self.order {
            for walk in self.walks_from(a, 2) {
                if !all_distinct(&walk) {
                    continue;
                }
                let route = [walk[0], walk[1], walk[2]];
                let reversed = [walk[2], walk[1], walk[0]];
                if !angles.contains(&route) && !angles.contains(&reversed) {
                    angles.push(route);
                }
            }
        }
        for angle in &mut angles {
            if self.index_of(angle[0]) > self.index_of(angle[2]) {
                angle.reverse();
            }
        }
        angles.sort_by_key(|angle| {
            100_000 * self.index_of(angle[0]) as i64
                + 1000 * self.index_of(angle[1]) as i64
                + self.index_of(angle[2]) as i64
        });
        angles
    }

    /// Every proper dihedral (four pairwise-distinct atoms connected by three
    /// bonds), one canonical tuple per dihedral. A dihedral is directed by its
    /// two central atoms, so the tuple is reversed when the second atom's
    /// index exceeds the third one's - the terminal atoms play no part in the
    /// canonical direction. Sorted by `1e8*i2 + 1e6*i3 + 1000*i1 + i4`.
    pub fn find_dihedrals(&self) -> Vec<[AtomId; 4]> {
        let mut dihedrals: Vec<[AtomId; 4]> = Vec::new();
        for &a in &self.order {
            for walk in self.walks_from(a, 3) {
                if !all_distinct(&walk) {
                    continue;
                }
                let route = [walk[0], walk[1], walk[2], walk[3]];
                let reversed = [walk[3], walk[2], walk[1], walk[0]];
                if !dihedrals.contains(&route) && !dihedrals.contains(&reversed) {
                    dihedrals.push(route);
                }
            }
        }
        for dihedral in &mut dihedrals {
            if self.index_of(dihedral[1]) > self.index_of(dihedral[2]) {
                dihedral.reverse();
            }
        }
        dihedrals.sort_by_key(|d| {
            100_000_000 * self.index_of(d[1]) as i64
                + 1_000_000 * self.index_of(d[2]) as i64
                + 1000 * self.index_of(d[0]) as i64
                + self.index_of(d[3]) as i64
        });
        dihedrals
    }

    /// The sub-molecule containing the atoms of one residue and the bonds
    /// between them.
    pub fn residue(&self, residue_id: isize) -> Molecule {
        self.subset(|atom| atom.residue_id == residue_id)
    }

    /// The sub-molecule containing the atoms of one chain and the bonds
    /// between them.
    pub fn chain(&self, chain_id: usize) -> Molecule {
        self.subset(|atom| atom.chain_id == chain_id)
    }

    fn subset(&self, keep: impl Fn(&Atom) -> bool) -> Molecule {
        let mut sub = Molecule::new();
        for (_, atom) in self.atoms_iter() {
            if keep(atom) {
                // Indices are unique in self, so insertion cannot collide.
                let _ = sub.add_atom(atom.clone());
            }
        }
        for bond in &self.bonds {
            let index1 = self.index_of(bond.atom1);
            let index2 = self.index_of(bond.atom2);
            if sub.index_map.contains_key(&index1) && sub.index_map.contains_key(&index2) {
                let _ = sub.add_bond(index1, index2, bond.order);
            }
        }
        sub.rebuild_adjacency();
        sub
    }

    /// Renumbers both residues to the smaller of the two residue ids.
    pub fn merge_residues(&mut self, residue1: isize, residue2: isize) {
        let target = residue1.min(residue2);
        for (_, atom) in self.atoms.iter_mut() {
            if atom.residue_id == residue1 || atom.residue_id == residue2 {
                atom.residue_id = target;
            }
        }
        self.max_residue_id = self
            .atoms
            .values()
            .map(|atom| atom.residue_id)
            .max()
            .unwrap_or(0);
    }

    /// Renumbers both chains to the smaller of the two chain ids.
    pub fn merge_chains(&mut self, chain1: usize, chain2: usize) {
        let target = chain1.min(chain2);
        for (_, atom) in self.atoms.iter_mut() {
            if atom.chain_id == chain1 || atom.chain_id == chain2 {
                atom.chain_id = target;
            }
        }
        self.max_chain_id = self
            .atoms
            .values()
            .map(|atom| atom.chain_id)
            .max()
            .unwrap_or(0);
    }
}

fn all_distinct(walk: &[AtomId]) -> bool {
    let mut seen = HashSet::with_capacity(walk.len());
    walk.iter().all(|id| seen.insert(*id))
}

/// Composite sort key for canonical pairs. The decimal encoding is a fixed
/// convention shared with downstream topology writers; do not change it.
fn pair_sort_key(index1: usize, index2: usize) -> i64 {
    1000 * index1 as i64 + index2 as i64
}
