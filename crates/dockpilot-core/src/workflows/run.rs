use super::grid::load_grid;
use crate::engine::config::DockingParameters;
use crate::engine::descriptor::consolidate;
use crate::engine::error::EngineError;
use crate::engine::log_tail::LogCursor;
use crate::engine::persist;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::supervisor::{JobStatus, JobSupervisor, JobTicket};
use crate::engine::workspace::Workspace;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Validates and stores docking parameters as `params/param.json`.
pub fn save_parameters(
    workspace: &Workspace,
    parameters: &DockingParameters,
) -> Result<PathBuf, EngineError> {
    parameters.validate()?;
    let path = workspace.params_path();
    persist::write_json(&path, parameters)?;
    info!(workspace = workspace.key(), path = %path.display(), "Saved docking parameters");
    Ok(path)
}

pub fn load_parameters(workspace: &Workspace) -> Result<DockingParameters, EngineError> {
    let parameters: DockingParameters = persist::read_json(&workspace.params_path())?;
    parameters.validate()?;
    Ok(parameters)
}

/// Starts a docking run from the workspace's saved grid and parameters.
///
/// # Errors
///
/// - [`EngineError::AlreadyRunning`] if the workspace's previous run has not been
///   reported yet.
/// - [`EngineError::MissingFile`] if the grid or the parameters were never saved.
/// - [`EngineError::MissingReceptor`] if no receptor was imported.
#[instrument(skip_all, name = "run_workflow", fields(workspace = workspace.key()))]
pub fn start(
    supervisor: &JobSupervisor,
    workspace: &Workspace,
    reporter: &ProgressReporter,
) -> Result<JobTicket, EngineError> {
    if supervisor.is_registered(workspace.key()) {
        return Err(EngineError::AlreadyRunning(workspace.key().to_string()));
    }

    reporter.report(Progress::PhaseStart {
        name: "Consolidating configuration",
    });
    let grid = load_grid(workspace)?;
    let parameters = load_parameters(workspace)?;
    let receptor = workspace.locate_receptor()?;
    let descriptor = consolidate(
        &grid,
        &parameters,
        &receptor,
        &workspace.ligand_dir(),
        &workspace.results_dir(),
    )?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Launching docking engine",
    });
    let ticket = supervisor.start(workspace, &descriptor)?;
    reporter.report(Progress::PhaseFinish);

    info!(run_id = %ticket.run_id, "Docking run started");
    Ok(ticket)
}

pub fn poll(supervisor: &JobSupervisor, workspace: &Workspace) -> Result<JobStatus, EngineError> {
    supervisor.poll(workspace.key())
}

/// Polls once and reports log output appended since the cursor's last read.
///
/// Output is read after the status, so a terminal status is always followed by the
/// rest of the log. A failed log read is reported as a message and never replaces the
/// status, which may be the only report of the run's outcome.
pub fn follow(
    supervisor: &JobSupervisor,
    workspace: &Workspace,
    cursor: &mut LogCursor,
    reporter: &ProgressReporter,
) -> Result<JobStatus, EngineError> {
    let status = supervisor.poll(workspace.key())?;
    match cursor.read_new() {
        Ok(fresh) if !fresh.is_empty() => reporter.report(Progress::Output(fresh)),
        Ok(_) => {}
        Err(err) => {
            warn!(workspace = workspace.key(), error = %err, "Could not read new run output");
            reporter.report(Progress::Message(format!("Could not read run output: {err}")));
        }
    }
    Ok(status)
}

/// Terminates the workspace's run, if any.
#[instrument(skip_all, name = "run_stop", fields(workspace = workspace.key()))]
pub fn stop(
    supervisor: &JobSupervisor,
    workspace: &Workspace,
) -> Result<Option<JobStatus>, EngineError> {
    let status = supervisor.terminate(workspace.key())?;
    if status.is_some() {
        info!("Docking run stopped");
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::DEFAULT_PADDING;
    use crate::engine::config::{DockingParametersBuilder, SelectionSpec};
    use crate::workflows::grid::{compute_for_workspace, save_grid, tests::tetrahedron_pdb};
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn parameters() -> DockingParameters {
        DockingParametersBuilder::new()
            .search_mode("balance")
            .scoring_method("vina")
            .num_modes(9)
            .gpu_enabled(false)
            .build()
            .unwrap()
    }

    fn prepared_workspace() -> (TempDir, Workspace) {
        let dir = tempdir().unwrap();
        let ws = Workspace::create(dir.path(), "pipeline").unwrap();
        let source = dir.path().join("protein.pdb");
        fs::write(&source, tetrahedron_pdb()).unwrap();
        ws.import_receptor(&source).unwrap();
        let reporter = ProgressReporter::new();
        let grid = compute_for_workspace(&ws, &SelectionSpec::Blind, DEFAULT_PADDING, &reporter)
            .unwrap();
        save_grid(&ws, &grid).unwrap();
        save_parameters(&ws, &parameters()).unwrap();
        (dir, ws)
    }

    #[test]
    fn parameters_round_trip_through_workspace() {
        let dir = tempdir().unwrap();
        let ws = Workspace::create(dir.path(), "params").unwrap();
        save_parameters(&ws, &parameters()).unwrap();
        assert_eq!(load_parameters(&ws).unwrap(), parameters());
    }

    #[test]
    fn invalid_parameters_are_not_saved() {
        let dir = tempdir().unwrap();
        let ws = Workspace::create(dir.path(), "params").unwrap();
        let mut params = parameters();
        params.num_modes = 0;
        assert!(matches!(
            save_parameters(&ws, &params).unwrap_err(),
            EngineError::InvalidParameter { .. }
        ));
        assert!(!ws.params_path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn start_requires_saved_grid_and_parameters() {
        let dir = tempdir().unwrap();
        let ws = Workspace::create(dir.path(), "bare").unwrap();
        let supervisor = JobSupervisor::new(
            crate::engine::supervisor::EngineCommand::new("sh").args(["-c", "exit 0", "engine"]),
        );
        let err = start(&supervisor, &ws, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::MissingFile(p) if p == ws.grid_path()));
        assert!(!supervisor.is_registered(ws.key()));
    }

    #[cfg(unix)]
    #[test]
    fn full_pipeline_streams_output_and_completes() {
        let (_dir, ws) = prepared_workspace();
        let supervisor = JobSupervisor::new(
            crate::engine::supervisor::EngineCommand::new("sh")
                .args(["-c", "echo reading \"$1\"; grep -c center_x \"$1\"", "engine"]),
        );

        let streamed = std::sync::Mutex::new(String::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Output(text) = event {
                streamed.lock().unwrap().push_str(&text);
            }
        }));

        start(&supervisor, &ws, &reporter).unwrap();
        let mut cursor = LogCursor::new(ws.log_path());
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        let status = loop {
            let status = follow(&supervisor, &ws, &mut cursor, &reporter).unwrap();
            if status.is_terminal() || std::time::Instant::now() > deadline {
                break status;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        };
        drop(reporter);

        let expected_log = format!("reading {}\n1\n", ws.descriptor_path().display());
        assert_eq!(
            status,
            JobStatus::Completed {
                log: expected_log.clone(),
                results_path: ws.results_dir(),
            }
        );
        assert_eq!(streamed.into_inner().unwrap(), expected_log);
        assert_eq!(poll(&supervisor, &ws).unwrap(), JobStatus::NotFound);
    }

    #[test]
    fn unreadable_output_does_not_hide_the_status() {
        let dir = tempdir().unwrap();
        let ws = Workspace::create(dir.path(), "unreadable").unwrap();
        let supervisor =
            JobSupervisor::new(crate::engine::supervisor::EngineCommand::new("unused"));
        let not_a_dir = dir.path().join("plain");
        fs::write(&not_a_dir, "").unwrap();
        let mut cursor = LogCursor::new(not_a_dir.join("run.log"));

        let messages = std::sync::Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Message(text) = event {
                messages.lock().unwrap().push(text);
            }
        }));

        let status = follow(&supervisor, &ws, &mut cursor, &reporter).unwrap();
        drop(reporter);
        assert_eq!(status, JobStatus::NotFound);
        let messages = messages.into_inner().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Could not read run output"));
    }

    #[cfg(unix)]
    #[test]
    fn stop_terminates_a_running_engine() {
        let (_dir, ws) = prepared_workspace();
        let supervisor = JobSupervisor::new(
            crate::engine::supervisor::EngineCommand::new("sh").args(["-c", "sleep 30", "engine"]),
        );
        start(&supervisor, &ws, &ProgressReporter::new()).unwrap();
        assert!(matches!(
            start(&supervisor, &ws, &ProgressReporter::new()).unwrap_err(),
            EngineError::AlreadyRunning(_)
        ));

        let stopped = stop(&supervisor, &ws).unwrap();
        assert!(matches!(stopped, Some(JobStatus::Failed { .. })));
        assert_eq!(stop(&supervisor, &ws).unwrap(), None);
    }
}
