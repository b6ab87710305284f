use super::error::EngineError;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const RECEPTOR_DIR: &str = "receptor";
pub const LIGAND_DIR: &str = "ligand";
pub const PARAMS_DIR: &str = "params";
pub const RESULTS_DIR: &str = "results";

const GRID_FILE: &str = "grid.json";
const PARAMS_FILE: &str = "param.json";
const DESCRIPTOR_FILE: &str = "config.json";
const LOG_FILE: &str = "docking_run.log";
const RUN_LOCK_FILE: &str = ".run.lock";

const RECEPTOR_EXT: &str = "pdb";
const LIGAND_EXT: &str = "pdbqt";

/// Maps a user-supplied name onto `[A-Za-z0-9_-]`.
///
/// Surrounding whitespace is trimmed first; every other disallowed character becomes
/// `_`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidWorkspaceName`] when nothing is left after trimming.
pub fn sanitize_name(raw: &str) -> Result<String, EngineError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidWorkspaceName(raw.to_string()));
    }
    Ok(trimmed
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect())
}

/// A project directory holding one receptor, its ligands, parameters and run results.
///
/// ```text
/// <projects_dir>/<key>/
///     receptor/   params/grid.json    config.json
///     ligand/     params/param.json   results/docking_run.log
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    key: String,
    root: PathBuf,
}

impl Workspace {
    /// Creates a new workspace and its subdirectories.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WorkspaceExists`] if the directory is already present.
    pub fn create(projects_dir: &Path, name: &str) -> Result<Self, EngineError> {
        let key = sanitize_name(name)?;
        fs::create_dir_all(projects_dir).map_err(EngineError::io(projects_dir))?;
        let root = std::path::absolute(projects_dir.join(&key)).map_err(EngineError::io(projects_dir))?;

        match fs::create_dir(&root) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(EngineError::WorkspaceExists(key));
            }
            Err(e) => return Err(EngineError::io(&root)(e)),
        }
        for sub in [RECEPTOR_DIR, LIGAND_DIR, PARAMS_DIR, RESULTS_DIR] {
            let dir = root.join(sub);
            fs::create_dir_all(&dir).map_err(EngineError::io(&dir))?;
        }

        info!(workspace = %key, path = %root.display(), "Created workspace");
        Ok(Self { key, root })
    }

    /// Opens an existing workspace.
    ///
    /// Missing subdirectories are recreated, so workspaces made by hand still work.
    pub fn open(projects_dir: &Path, name: &str) -> Result<Self, EngineError> {
        let key = sanitize_name(name)?;
        let root = std::path::absolute(projects_dir.join(&key)).map_err(EngineError::io(projects_dir))?;
        if !root.is_dir() {
            return Err(EngineError::WorkspaceNotFound(key));
        }
        for sub in [RECEPTOR_DIR, LIGAND_DIR, PARAMS_DIR, RESULTS_DIR] {
            let dir = root.join(sub);
            fs::create_dir_all(&dir).map_err(EngineError::io(&dir))?;
        }
        Ok(Self { key, root })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn receptor_dir(&self) -> PathBuf {
        self.root.join(RECEPTOR_DIR)
    }

    pub fn ligand_dir(&self) -> PathBuf {
        self.root.join(LIGAND_DIR)
    }

    pub fn params_dir(&self) -> PathBuf {
        self.root.join(PARAMS_DIR)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root.join(RESULTS_DIR)
    }

    pub fn grid_path(&self) -> PathBuf {
        self.params_dir().join(GRID_FILE)
    }

    pub fn params_path(&self) -> PathBuf {
        self.params_dir().join(PARAMS_FILE)
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.root.join(DESCRIPTOR_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.results_dir().join(LOG_FILE)
    }

    /// File locked for the lifetime of a run, shared by every process that opens the
    /// workspace.
    pub fn run_lock_path(&self) -> PathBuf {
        self.root.join(RUN_LOCK_FILE)
    }

    /// Path of a timestamped grid text file, `config_<mode>_<timestamp>.txt`.
    pub fn grid_config_path(&self, mode: &str, timestamp: i64) -> PathBuf {
        self.root.join(format!("config_{mode}_{timestamp}.txt"))
    }

    /// Copies a receptor structure into `receptor/`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnsupportedFile`] unless the file has a `.pdb` extension, and
    /// [`EngineError::MissingFile`] if the source does not exist.
    pub fn import_receptor(&self, source: &Path) -> Result<PathBuf, EngineError> {
        let dest = self.receptor_dir().join(import_name(source, RECEPTOR_EXT)?);
        copy_file(source, &dest)?;
        info!(workspace = %self.key, receptor = %dest.display(), "Imported receptor");
        Ok(dest)
    }

    /// Copies ligand files into `ligand/`.
    ///
    /// Every source is checked before anything is copied, so a rejected file leaves the
    /// workspace untouched.
    pub fn import_ligands<P: AsRef<Path>>(&self, sources: &[P]) -> Result<Vec<PathBuf>, EngineError> {
        let ligand_dir = self.ligand_dir();
        let planned = sources
            .iter()
            .map(|source| {
                let source = source.as_ref();
                import_name(source, LIGAND_EXT).map(|name| (source, ligand_dir.join(name)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut imported = Vec::with_capacity(planned.len());
        for (source, dest) in planned {
            copy_file(source, &dest)?;
            debug!(ligand = %dest.display(), "Imported ligand");
            imported.push(dest);
        }
        info!(workspace = %self.key, count = imported.len(), "Imported ligands");
        Ok(imported)
    }

    /// Returns the receptor structure: the first `*.pdb` in `receptor/` by name.
    pub fn locate_receptor(&self) -> Result<PathBuf, EngineError> {
        let dir = self.receptor_dir();
        list_with_extension(&dir, RECEPTOR_EXT)?
            .into_iter()
            .next()
            .ok_or(EngineError::MissingReceptor(dir))
    }

    pub fn ligands(&self) -> Result<Vec<PathBuf>, EngineError> {
        list_with_extension(&self.ligand_dir(), LIGAND_EXT)
    }
}

fn import_name(source: &Path, expected: &'static str) -> Result<String, EngineError> {
    let unsupported = || EngineError::UnsupportedFile {
        path: source.to_path_buf(),
        expected,
    };
    let ext_ok = source
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(expected));
    if !ext_ok {
        return Err(unsupported());
    }
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = sanitize_name(&stem).map_err(|_| unsupported())?;
    Ok(format!("{stem}.{expected}"))
}

fn copy_file(source: &Path, dest: &Path) -> Result<(), EngineError> {
    if !source.is_file() {
        return Err(EngineError::MissingFile(source.to_path_buf()));
    }
    fs::copy(source, dest).map_err(EngineError::io(dest))?;
    Ok(())
}

fn list_with_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>, EngineError> {
    let pattern = format!(
        "{}/*.{ext}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let entries = glob::glob(&pattern).map_err(|e| EngineError::io(dir)(io::Error::other(e)))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| {
                EngineError::io(e.path())(io::Error::new(e.error().kind(), e.to_string()))
            })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
