//! # Engine Module
//!
//! Stateful orchestration on top of the [`crate::core`] layer: turning requests into
//! validated selections and parameters, computing grids over parsed structures,
//! consolidating the job descriptor, and supervising external docking processes.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Residue selections and docking parameters with validation
//! - **Selection** ([`selection`]) - Resolving `chain + residue number` to atom coordinates
//! - **Grid Computation** ([`grid`]) - Padded search boxes for blind and targeted selections
//! - **Descriptor** ([`descriptor`]) - Merging grid, parameters and paths into `config.json`
//! - **Supervision** ([`supervisor`]) - One engine process per workspace, outcomes reported once
//! - **Log Tailing** ([`log_tail`]) - Whole-file and incremental reads of the run log
//! - **Progress** ([`progress`]) - Phase and engine-output events for front ends
//! - **Workspaces** ([`workspace`]) - Project directory layout and file import
//! - **Error Handling** ([`error`]) - Engine error taxonomy and its classification

pub mod config;
pub mod descriptor;
pub mod error;
pub mod grid;
pub mod log_tail;
pub(crate) mod persist;
pub mod progress;
pub mod selection;
pub mod supervisor;
pub mod workspace;
