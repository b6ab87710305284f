use crate::cli::RunArgs;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use dockpilot::engine::log_tail::LogCursor;
use dockpilot::engine::progress::{Progress, ProgressReporter};
use dockpilot::engine::supervisor::{JobStatus, JobSupervisor};
use dockpilot::engine::workspace::Workspace;
use dockpilot::workflows;
use std::time::Instant;
use tracing::{info, warn};

/// Launches the engine for the project and follows its log until the run ends.
///
/// Ctrl-C terminates the engine before returning.
pub async fn run(args: RunArgs, config: &AppConfig) -> Result<()> {
    let workspace = Workspace::open(&config.projects_dir, &args.project)?;
    let supervisor = JobSupervisor::new(config.engine.clone());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let ticket = workflows::run::start(&supervisor, &workspace, &reporter)?;
    println!(
        "Docking run {} started (pid {}), logging to {}",
        ticket.run_id,
        ticket.pid,
        ticket.log_path.display()
    );

    let started = Instant::now();
    let mut cursor = LogCursor::new(ticket.log_path.clone());
    let mut ticker = tokio::time::interval(config.poll_interval);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    reporter.report(Progress::PhaseStart { name: "Docking" });
    let status = loop {
        tokio::select! {
            _ = ticker.tick() => {
                let status = workflows::run::follow(&supervisor, &workspace, &mut cursor, &reporter)?;
                match status {
                    JobStatus::Running { .. } => {
                        progress_handler.set_status(format!(
                            "Docking ({}s)",
                            started.elapsed().as_secs()
                        ));
                    }
                    JobStatus::NotFound => {
                        return Err(CliError::Other(anyhow::anyhow!(
                            "run for project '{}' is no longer tracked",
                            workspace.key()
                        )));
                    }
                    terminal => break terminal,
                }
            }
            signal = &mut ctrl_c => {
                signal?;
                warn!(workspace = workspace.key(), "Interrupt received, terminating docking engine");
                workflows::run::stop(&supervisor, &workspace)?;
                let rest = cursor.read_new()?;
                if !rest.is_empty() {
                    reporter.report(Progress::Output(rest));
                }
                progress_handler.finish_with_message("✗ Docking interrupted");
                return Err(CliError::Interrupted);
            }
        }
    };

    let elapsed = started.elapsed().as_secs_f64();
    match status {
        JobStatus::Completed { results_path, .. } => {
            progress_handler.finish_with_message(format!("✓ Docking completed in {:.1}s", elapsed));
            info!(run_id = %ticket.run_id, elapsed, "Docking run completed");
            println!("Results: {}", results_path.display());
            Ok(())
        }
        JobStatus::Failed { exit_code, .. } => {
            progress_handler.finish_with_message(format!("✗ Docking failed after {:.1}s", elapsed));
            Err(CliError::RunFailed { exit_code })
        }
        JobStatus::Running { .. } | JobStatus::NotFound => Err(CliError::Other(anyhow::anyhow!(
            "unexpected run status for project '{}'",
            workspace.key()
        ))),
    }
}
