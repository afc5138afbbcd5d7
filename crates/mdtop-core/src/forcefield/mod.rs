//! # Force-Field Parameter Database
//!
//! Sectioned force-field parameter rows (`[ bondtypes ]`, `[ angletypes ]`,
//! `[ dihedraltypes ]`, ...) loaded through the conditional preprocessor, with
//! symmetric and wildcard-aware lookups keyed by atom-type tuples, and a
//! cross-validation pass that checks a molecule's bonds and derived angles and
//! dihedrals against the database.

pub mod params;
pub mod table;
pub mod validation;

pub use params::{
    AngleTypeRow, AtomTypeRow, BondTypeRow, CmapTypeRow, ConstraintTypeRow, Defaults,
    DihedralTypeRow, GenBornRow, NonbondParamRow, PairTypeRow, Section, WILDCARD_ATOM_TYPE,
};
pub use table::{ForceField, ForceFieldError};
pub use validation::{InteractionKind, ValidationIssue, ValidationReport, validate_topology};
