//! # mdtop Core Library
//!
//! Building blocks for preparing molecular-dynamics topology input: a C-style
//! conditional text preprocessor for topology and force-field files, a
//! bond-graph perception engine that derives bonded interaction lists from
//! molecular connectivity, and a sectioned force-field parameter database with
//! wildcard-aware lookups.
//!
//! ## Architecture
//!
//! The library is organized into focused modules with a strict dependency
//! direction (later modules build on earlier ones):
//!
//! - **[`preprocess`]: Directive-aware line source.** Resolves `#include`,
//!   `#ifdef`/`#ifndef`/`#else`/`#endif`, `#define`/`#undef` and
//!   `#error`/`#warning` directives over a lazily-iterated tree of files,
//!   yielding logical lines tagged with their originating file and line number.
//!
//! - **[`models`]: Molecular data model.** Atoms, bonds and the [`models::molecule::Molecule`]
//!   container, including exact combinatorial enumeration of pairs, angles,
//!   dihedrals and exclusions over the bond graph with deterministic canonical
//!   ordering.
//!
//! - **[`forcefield`]: Parameter database.** Sectioned force-field parameter
//!   rows loaded through the preprocessor, symmetric and wildcard-aware
//!   lookups, and cross-validation of a molecule's derived interactions
//!   against the database.
//!
//! - **[`io`]: Topology output.** Serialization of a molecule and its derived
//!   interaction lists into the `[ bonds ]`/`[ pairs ]`/`[ angles ]`/`[ dihedrals ]`
//!   section layout consumed by simulation engines.

pub mod forcefield;
pub mod io;
pub mod models;
pub mod preprocess;
