//! # Molecular Data Model
//!
//! Data structures for representing a molecule as a bond graph, plus the
//! perception algorithms that derive bonded interaction lists from it.
//!
//! ## Key components
//!
//! - [`atom::Atom`] - One atom record with identity, coordinates and
//!   force-field attributes
//! - [`topology::Bond`] / [`topology::BondOrder`] - Undirected connectivity
//!   between two atoms
//! - [`molecule::Molecule`] - Arena-backed container owning atoms and bonds,
//!   with adjacency caching and the pair/angle/dihedral/exclusion enumeration
//!   operations
//! - [`ids::AtomId`] - Opaque arena key for atoms
//!
//! Atoms are addressed two ways: externally by their file-assigned integer
//! index (unique but not necessarily contiguous), internally by [`ids::AtomId`]
//! arena keys. Adjacency is stored as index lists on the arena, so the
//! atom/neighbour relation contains no cyclic ownership.

pub mod atom;
pub mod ids;
pub mod molecule;
pub mod topology;
