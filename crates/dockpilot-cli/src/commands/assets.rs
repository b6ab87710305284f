use crate::cli::{LigandArgs, LigandCommands, ReceptorArgs, ReceptorCommands};
use crate::config::AppConfig;
use crate::error::Result;
use dockpilot::engine::workspace::Workspace;
use tracing::info;

pub fn run_receptor(args: ReceptorArgs, config: &AppConfig) -> Result<()> {
    let ReceptorCommands::Add { project, file } = args.command;
    let workspace = Workspace::open(&config.projects_dir, &project)?;
    let stored = workspace.import_receptor(&file)?;
    info!(workspace = workspace.key(), path = %stored.display(), "Receptor imported");
    println!("✓ Receptor stored at {}", stored.display());
    Ok(())
}

pub fn run_ligand(args: LigandArgs, config: &AppConfig) -> Result<()> {
    let LigandCommands::Add { project, files } = args.command;
    let workspace = Workspace::open(&config.projects_dir, &project)?;
    let stored = workspace.import_ligands(&files)?;
    info!(workspace = workspace.key(), count = stored.len(), "Ligands imported");
    println!("✓ Stored {} ligand(s):", stored.len());
    for path in &stored {
        println!("  - {}", path.display());
    }
    Ok(())
}
