//! # DockPilot Core Library
//!
//! Preparation and supervision of molecular docking runs: search-grid computation over
//! receptor structures, consolidation of the engine configuration, and lifecycle
//! tracking of external docking processes.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`), the PDB reader,
//!   and the pure bounding-box math behind `GridBox`.
//!
//! - **[`engine`]: The Logic Core.** Validated selections and parameters, grid
//!   computation, the job descriptor, workspaces, and the `JobSupervisor` that runs at
//!   most one engine process per workspace.
//!
//! - **[`workflows`]: The Public API.** End-to-end operations a front end calls: compute
//!   and save a grid, save parameters, start, poll and stop a run.

pub mod core;
pub mod engine;
pub mod workflows;
