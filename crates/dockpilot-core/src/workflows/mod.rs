//! # Workflows Module
//!
//! High-level entry points that tie the [`crate::engine`] and [`crate::core`] layers
//! together for a front end.
//!
//! ## Architecture
//!
//! - **Grid Workflow** ([`grid`]) - Structure path and selection to a search box, plus the
//!   grid artifacts stored in a workspace
//! - **Run Workflow** ([`run`]) - Saving parameters, then starting, polling, following and
//!   stopping a workspace's docking run

pub mod grid;
pub mod run;
