//! # Core Models Module
//!
//! Data structures describing a parsed receptor structure. The model is
//! thin: it carries what grid computation needs (chain/residue identity and atom
//! coordinates) and nothing about force fields or bonding.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom with serial, name, element and coordinates
//! - [`residue`] - Residue identity (sequence number, insertion code) and its atoms
//! - [`chain`] - Chain identity and its ordered residues
//! - [`structure`] - The complete structure with lookup maps
//! - [`builder`] - Incremental construction from file records
//! - [`ids`] - Stable arena keys for atoms, residues and chains
//!
//! ## Usage
//!
//! ```ignore
//! use dockpilot::core::models::{builder::StructureBuilder, atom::RecordKind};
//!
//! let mut builder = StructureBuilder::new();
//! builder.start_chain("A").start_residue(12, None, "SER");
//! builder.add_atom(1, "OG", Some("O"), RecordKind::Atom, 1.0, Point3::new(1.0, 2.0, 3.0));
//! let structure = builder.build();
//! ```

pub mod atom;
pub mod builder;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod structure;
