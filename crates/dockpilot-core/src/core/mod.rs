//! # Core Module
//!
//! Stateless building blocks for docking preparation: the parsed structure model, the
//! structure readers, and the pure bounding-box math behind search grids.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues and chains of a receptor
//! - **File I/O** ([`io`]) - Reading structure files into the model
//! - **Search Grids** ([`grid`]) - Axis-aligned boxes, padding and their serialized forms
//!
//! Nothing in this layer touches processes or workspace directories; that is the job of
//! the [`crate::engine`] layer.

pub mod grid;
pub mod io;
pub mod models;
