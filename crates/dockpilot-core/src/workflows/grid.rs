use crate::core::grid::GridBox;
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::engine::config::SelectionSpec;
use crate::engine::error::EngineError;
use crate::engine::grid;
use crate::engine::persist;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::workspace::Workspace;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Reads a PDB structure and computes the search box for `selection`.
#[instrument(skip_all, name = "grid_workflow", fields(structure = %path.display(), mode = selection.mode_name()))]
pub fn compute_from_path(
    path: &Path,
    selection: &SelectionSpec,
    margin: f64,
    reporter: &ProgressReporter,
) -> Result<GridBox, EngineError> {
    if !path.is_file() {
        return Err(EngineError::MissingFile(path.to_path_buf()));
    }

    reporter.report(Progress::PhaseStart {
        name: "Reading structure",
    });
    let structure = PdbFile::read_from_path(path).map_err(|source| EngineError::Structure {
        path: path.to_path_buf(),
        source,
    })?;
    reporter.report(Progress::PhaseFinish);
    reporter.report(Progress::Message(format!(
        "Read {} atoms from {}",
        structure.atom_count(),
        path.display()
    )));

    reporter.report(Progress::PhaseStart {
        name: "Computing grid",
    });
    let grid = grid::compute(&structure.positions(), selection, &structure, margin)?;
    reporter.report(Progress::PhaseFinish);

    info!(
        atoms = structure.atom_count(),
        center = ?grid.center(),
        size = ?grid.size(),
        "Grid computed"
    );
    Ok(grid)
}

/// Computes the search box over the workspace's receptor.
pub fn compute_for_workspace(
    workspace: &Workspace,
    selection: &SelectionSpec,
    margin: f64,
    reporter: &ProgressReporter,
) -> Result<GridBox, EngineError> {
    let receptor = workspace.locate_receptor()?;
    compute_from_path(&receptor, selection, margin, reporter)
}

/// Stores the grid the next run will use, as `params/grid.json`.
pub fn save_grid(workspace: &Workspace, grid: &GridBox) -> Result<PathBuf, EngineError> {
    let path = workspace.grid_path();
    persist::write_json(&path, grid)?;
    info!(workspace = workspace.key(), path = %path.display(), "Saved grid");
    Ok(path)
}

/// Loads the saved grid, re-validating every dimension.
pub fn load_grid(workspace: &Workspace) -> Result<GridBox, EngineError> {
    persist::read_json(&workspace.grid_path())
}

/// Writes the grid as an engine-readable text file named after the selection mode
/// and the current Unix time.
pub fn write_grid_config(
    workspace: &Workspace,
    grid: &GridBox,
    selection: &SelectionSpec,
) -> Result<PathBuf, EngineError> {
    let path = workspace.grid_config_path(selection.mode_name(), Utc::now().timestamp());
    fs::write(&path, grid.to_engine_config()).map_err(EngineError::io(&path))?;
    Ok(path)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::config::ResidueSpecifier;
    use nalgebra::{Point3, Vector3};
    use tempfile::tempdir;

    fn atom_line(serial: usize, res: &str, chain: char, seq: isize, pos: [f64; 3]) -> String {
        format!(
            "ATOM  {serial:>5} {name:<4} {res:>3} {chain}{seq:>4}    {x:>8.3}{y:>8.3}{z:>8.3}  1.00  0.00",
            name = "CA",
            x = pos[0],
            y = pos[1],
            z = pos[2],
        )
    }

    /// Four atoms on the corners of a tetrahedron, spread over two chains.
    pub(crate) fn tetrahedron_pdb() -> String {
        [
            atom_line(1, "SER", 'A', 12, [0.0, 0.0, 0.0]),
            atom_line(2, "GLY", 'A', 13, [10.0, 0.0, 0.0]),
            atom_line(3, "ALA", 'B', 7, [0.0, 10.0, 0.0]),
            atom_line(4, "LEU", 'B', 8, [0.0, 0.0, 10.0]),
            "END".to_string(),
        ]
        .join("\n")
    }

    #[test]
    fn blind_grid_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("protein.pdb");
        fs::write(&path, tetrahedron_pdb()).unwrap();

        let grid = compute_from_path(&path, &SelectionSpec::Blind, 5.0, &ProgressReporter::new())
            .unwrap();
        assert!((grid.size() - Vector3::new(20.0, 20.0, 20.0)).norm() < 1e-9);
        assert!((grid.center() - Point3::new(5.0, 5.0, 5.0)).norm() < 1e-9);
    }

    #[test]
    fn reports_the_atom_count_it_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("protein.pdb");
        fs::write(&path, tetrahedron_pdb()).unwrap();

        let messages = std::sync::Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Message(text) = event {
                messages.lock().unwrap().push(text);
            }
        }));
        compute_from_path(&path, &SelectionSpec::Blind, 5.0, &reporter).unwrap();
        drop(reporter);

        assert_eq!(
            messages.into_inner().unwrap(),
            vec![format!("Read 4 atoms from {}", path.display())]
        );
    }

    #[test]
    fn targeted_grid_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("protein.pdb");
        fs::write(&path, tetrahedron_pdb()).unwrap();

        let selection = SelectionSpec::Targeted(vec![
            ResidueSpecifier::new("A", 12),
            ResidueSpecifier::new("B", 7),
        ]);
        let grid = compute_from_path(&path, &selection, 5.0, &ProgressReporter::new()).unwrap();
        assert!((grid.center() - Point3::new(0.0, 5.0, 0.0)).norm() < 1e-9);
        assert!((grid.size() - Vector3::new(10.0, 20.0, 10.0)).norm() < 1e-9);
    }

    #[test]
    fn blind_grid_encloses_every_model() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ensemble.pdb");
        let text = [
            "MODEL        1".to_string(),
            atom_line(1, "ALA", 'A', 1, [0.0, 0.0, 0.0]),
            "ENDMDL".to_string(),
            "MODEL        2".to_string(),
            atom_line(1, "ALA", 'A', 1, [30.0, 30.0, 30.0]),
            "ENDMDL".to_string(),
            "END".to_string(),
        ]
        .join("\n");
        fs::write(&path, text).unwrap();

        let grid = compute_from_path(&path, &SelectionSpec::Blind, 5.0, &ProgressReporter::new())
            .unwrap();
        assert!((grid.center() - Point3::new(15.0, 15.0, 15.0)).norm() < 1e-9);
        assert!((grid.size() - Vector3::new(40.0, 40.0, 40.0)).norm() < 1e-9);

        let targeted = SelectionSpec::Targeted(vec![ResidueSpecifier::new("A", 1)]);
        let grid = compute_from_path(&path, &targeted, 0.0, &ProgressReporter::new()).unwrap();
        assert!((grid.size() - Vector3::new(30.0, 30.0, 30.0)).norm() < 1e-9);
    }

    #[test]
    fn missing_structure_file_is_a_precondition_failure() {
        let dir = tempdir().unwrap();
        let err = compute_from_path(
            &dir.path().join("absent.pdb"),
            &SelectionSpec::Blind,
            5.0,
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::MissingFile(_)));
    }

    #[test]
    fn unparsable_structure_is_reported_with_its_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.pdb");
        fs::write(&path, "HEADER    NOTHING\nEND\n").unwrap();
        let err = compute_from_path(&path, &SelectionSpec::Blind, 5.0, &ProgressReporter::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::Structure { path: p, .. } if p == path));
    }

    #[test]
    fn saved_grid_round_trips_and_config_text_is_written() {
        let dir = tempdir().unwrap();
        let ws = Workspace::create(dir.path(), "grid").unwrap();
        fs::write(ws.receptor_dir().join("protein.pdb"), tetrahedron_pdb()).unwrap();

        let grid = compute_for_workspace(&ws, &SelectionSpec::Blind, 5.0, &ProgressReporter::new())
            .unwrap();
        let saved = save_grid(&ws, &grid).unwrap();
        assert_eq!(saved, ws.grid_path());
        assert_eq!(load_grid(&ws).unwrap(), grid);

        let text_path = write_grid_config(&ws, &grid, &SelectionSpec::Blind).unwrap();
        let name = text_path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("config_blind_") && name.ends_with(".txt"));
        assert!(fs::read_to_string(&text_path).unwrap().contains("size_x = 20"));
    }

    #[test]
    fn loading_grid_before_saving_is_missing_file() {
        let dir = tempdir().unwrap();
        let ws = Workspace::create(dir.path(), "nogrid").unwrap();
        assert!(matches!(
            load_grid(&ws).unwrap_err(),
            EngineError::MissingFile(_)
        ));
    }
}
