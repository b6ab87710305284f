use super::config::DockingParameters;
use super::error::EngineError;
use super::persist;
use crate::core::grid::GridBox;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

const PATH_KEYS: [&str; 3] = ["receptor", "ligand_dir", "results_dir"];

/// The single configuration document handed to the docking engine.
///
/// Serialized as one flat JSON object: the three absolute paths, the six grid
/// dimensions, and the docking parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub receptor: PathBuf,
    pub ligand_dir: PathBuf,
    pub results_dir: PathBuf,
    #[serde(flatten)]
    pub grid: GridBox,
    #[serde(flatten)]
    pub parameters: DockingParameters,
}

impl JobDescriptor {
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, EngineError> {
        persist::to_pretty_json(self, "job descriptor")
    }

    pub fn write_to(&self, path: &Path) -> Result<(), EngineError> {
        persist::write_json(path, self)
    }

    /// Loads a descriptor and re-checks its parameters.
    pub fn read_from(path: &Path) -> Result<Self, EngineError> {
        let descriptor: Self = persist::read_json(path)?;
        descriptor.parameters.validate()?;
        Ok(descriptor)
    }
}

/// Merges a grid, docking parameters and run paths into a [`JobDescriptor`].
///
/// Paths are made absolute against the current directory without touching the
/// filesystem. Every section is flattened into one key space; a key contributed by
/// more than one section is rejected instead of silently overwritten.
///
/// # Errors
///
/// - [`EngineError::IncompleteParameters`] / [`EngineError::InvalidParameter`] when the
///   parameters fail validation.
/// - [`EngineError::ConflictingKeys`] when sections overlap.
/// - [`EngineError::Io`] when the current directory cannot be determined.
pub fn consolidate(
    grid: &GridBox,
    parameters: &DockingParameters,
    receptor: &Path,
    ligand_dir: &Path,
    results_dir: &Path,
) -> Result<JobDescriptor, EngineError> {
    parameters.validate()?;

    let sections = [
        ("paths", PATH_KEYS.iter().map(|k| k.to_string()).collect()),
        ("grid", section_keys("grid", grid)?),
        ("docking", section_keys("docking", parameters)?),
    ];
    ensure_disjoint(&sections)?;

    let descriptor = JobDescriptor {
        receptor: absolutize(receptor)?,
        ligand_dir: absolutize(ligand_dir)?,
        results_dir: absolutize(results_dir)?,
        grid: *grid,
        parameters: parameters.clone(),
    };
    debug!(receptor = %descriptor.receptor.display(), "Consolidated job descriptor");
    Ok(descriptor)
}

fn absolutize(path: &Path) -> Result<PathBuf, EngineError> {
    std::path::absolute(path).map_err(EngineError::io(path))
}

fn section_keys<T: Serialize>(name: &str, value: &T) -> Result<Vec<String>, EngineError> {
    let value = serde_json::to_value(value).map_err(|source| EngineError::Json {
        context: format!("{name} section"),
        source,
    })?;
    Ok(match value {
        Value::Object(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    })
}

fn ensure_disjoint(sections: &[(&str, Vec<String>)]) -> Result<(), EngineError> {
    let mut seen = HashSet::new();
    let mut conflicts = BTreeSet::new();
    for (_, keys) in sections {
        for key in keys {
            if !seen.insert(key.as_str()) {
                conflicts.insert(key.clone());
            }
        }
    }
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(EngineError::ConflictingKeys {
            keys: conflicts.into_iter().collect(),
        })
    }
}
