//! # Topology File Output
//!
//! Writers for processed-topology output. Currently a single format: the
//! include-topology (`.top`/`.itp`) layout, with bonded terms derived from the
//! molecule's bond graph.

pub mod top;

pub use top::{write_topology, write_topology_to_path};
