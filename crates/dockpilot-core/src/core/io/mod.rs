//! Provides input functionality for molecular structure file formats.
//!
//! Structures are read through the [`traits::StructureFile`] interface; the PDB reader
//! is the structure provider used by grid computation.

pub mod pdb;
pub mod traits;
