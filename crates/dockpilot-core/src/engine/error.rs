use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::config::ConfigError;
use crate::core::grid::GridBoxError;
use crate::core::io::pdb::PdbError;

/// Coarse classification of an [`EngineError`], used by callers to pick a response
/// (reject the input, ask for a missing prerequisite, report a busy workspace, or
/// report an internal fault).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Validation,
    Precondition,
    Conflict,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorClass::Validation => "validation",
            ErrorClass::Precondition => "precondition",
            ErrorClass::Conflict => "conflict",
            ErrorClass::Internal => "internal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid residue selection: {0}")]
    InvalidSelection(String),

    #[error("Missing docking parameters: {}", .missing.join(", "))]
    IncompleteParameters { missing: Vec<&'static str> },

    #[error("Invalid value for docking parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Invalid grid: {0}")]
    InvalidGrid(#[from] GridBoxError),

    #[error("Conflicting configuration keys: {}", .keys.join(", "))]
    ConflictingKeys { keys: Vec<String> },

    #[error("Invalid workspace name '{0}'")]
    InvalidWorkspaceName(String),

    #[error("Unsupported file '{}': expected a .{expected} file", .path.display())]
    UnsupportedFile {
        path: PathBuf,
        expected: &'static str,
    },

    #[error("No atoms matched the selection")]
    NoAtomsSelected,

    #[error("Required file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("No receptor structure (*.pdb) found in {}", .0.display())]
    MissingReceptor(PathBuf),

    #[error("Workspace '{0}' does not exist")]
    WorkspaceNotFound(String),

    #[error("Workspace '{0}' already exists")]
    WorkspaceExists(String),

    #[error("Failed to read structure from {}: {source}", .path.display())]
    Structure { path: PathBuf, source: PdbError },

    #[error("A docking run is already registered for workspace '{0}'")]
    AlreadyRunning(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to launch docking engine '{}': {source}", .program.display())]
    Spawn { program: PathBuf, source: io::Error },

    #[error("Invalid JSON in {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },
}

impl EngineError {
    pub fn class(&self) -> ErrorClass {
        match self {
            EngineError::InvalidSelection(_)
            | EngineError::IncompleteParameters { .. }
            | EngineError::InvalidParameter { .. }
            | EngineError::InvalidGrid(_)
            | EngineError::ConflictingKeys { .. }
            | EngineError::InvalidWorkspaceName(_)
            | EngineError::UnsupportedFile { .. } => ErrorClass::Validation,

            EngineError::NoAtomsSelected
            | EngineError::MissingFile(_)
            | EngineError::MissingReceptor(_)
            | EngineError::WorkspaceNotFound(_)
            | EngineError::WorkspaceExists(_)
            | EngineError::Structure { .. } => ErrorClass::Precondition,

            EngineError::AlreadyRunning(_) => ErrorClass::Conflict,

            EngineError::Io { .. } | EngineError::Spawn { .. } | EngineError::Json { .. } => {
                ErrorClass::Internal
            }
        }
    }

    /// Returns a closure that wraps an [`io::Error`] with the path it occurred on,
    /// for use with `map_err`.
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> EngineError + '_ {
        move |source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path) -> impl FnOnce(serde_json::Error) -> EngineError + '_ {
        move |source| EngineError::Json {
            context: path.display().to_string(),
            source,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingParameters(missing) => EngineError::IncompleteParameters { missing },
            ConfigError::InvalidParameter { name, reason } => {
                EngineError::InvalidParameter { name, reason }
            }
            selection @ (ConfigError::InvalidResidueSpecifier { .. }
            | ConfigError::UnknownSelectionMode(_)
            | ConfigError::EmptySelection) => EngineError::InvalidSelection(selection.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_map_to_validation_failures() {
        let err: EngineError = ConfigError::MissingParameters(vec!["num_modes", "search_mode"]).into();
        assert!(matches!(
            &err,
            EngineError::IncompleteParameters { missing } if missing == &["num_modes", "search_mode"]
        ));
        assert_eq!(err.class(), ErrorClass::Validation);
        assert_eq!(
            err.to_string(),
            "Missing docking parameters: num_modes, search_mode"
        );

        let err: EngineError = ConfigError::EmptySelection.into();
        assert!(matches!(err, EngineError::InvalidSelection(_)));
        assert_eq!(err.class(), ErrorClass::Validation);
    }

    #[test]
    fn classes_cover_each_category() {
        assert_eq!(EngineError::NoAtomsSelected.class(), ErrorClass::Precondition);
        assert_eq!(
            EngineError::WorkspaceNotFound("p".into()).class(),
            ErrorClass::Precondition
        );
        assert_eq!(
            EngineError::AlreadyRunning("p".into()).class(),
            ErrorClass::Conflict
        );
        let io_err = EngineError::io(Path::new("/tmp/x"))(io::Error::other("boom"));
        assert_eq!(io_err.class(), ErrorClass::Internal);
        assert!(io_err.to_string().contains("/tmp/x"));
    }

    #[test]
    fn grid_errors_are_validation_failures() {
        let err: EngineError = GridBoxError::InvalidPadding(-1.0).into();
        assert_eq!(err.class(), ErrorClass::Validation);
        assert_eq!(ErrorClass::Validation.to_string(), "validation");
    }
}
