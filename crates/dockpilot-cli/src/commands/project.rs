use crate::cli::{ProjectArgs, ProjectCommands};
use crate::config::AppConfig;
use crate::error::Result;
use dockpilot::engine::error::EngineError;
use dockpilot::engine::workspace::Workspace;
use dockpilot::workflows;
use tracing::info;

pub fn run(args: ProjectArgs, config: &AppConfig) -> Result<()> {
    match args.command {
        ProjectCommands::Create { name } => create(&name, config),
        ProjectCommands::Show { name } => show(&name, config),
    }
}

fn create(name: &str, config: &AppConfig) -> Result<()> {
    let workspace = Workspace::create(&config.projects_dir, name)?;
    info!(workspace = workspace.key(), root = %workspace.root().display(), "Project created");
    println!(
        "✓ Created project '{}' at {}",
        workspace.key(),
        workspace.root().display()
    );
    Ok(())
}

fn show(name: &str, config: &AppConfig) -> Result<()> {
    let workspace = Workspace::open(&config.projects_dir, name)?;
    println!("Project:   {}", workspace.key());
    println!("Location:  {}", workspace.root().display());

    match workspace.locate_receptor() {
        Ok(path) => println!("Receptor:  {}", path.display()),
        Err(EngineError::MissingReceptor(_)) => println!("Receptor:  (none)"),
        Err(e) => return Err(e.into()),
    }

    let ligands = workspace.ligands()?;
    println!("Ligands:   {}", ligands.len());
    for ligand in &ligands {
        println!("  - {}", ligand.display());
    }

    match workflows::grid::load_grid(&workspace) {
        Ok(grid) => {
            let d = grid.dimensions();
            println!(
                "Grid:      center ({:.3}, {:.3}, {:.3}), size ({:.3}, {:.3}, {:.3})",
                d.center_x, d.center_y, d.center_z, d.size_x, d.size_y, d.size_z
            );
        }
        Err(EngineError::MissingFile(_)) => println!("Grid:      (not saved)"),
        Err(e) => return Err(e.into()),
    }

    match workflows::run::load_parameters(&workspace) {
        Ok(p) => println!(
            "Params:    search_mode={}, scoring_method={}, num_modes={}, gpu={}",
            p.search_mode, p.scoring_method, p.num_modes, p.gpu_enabled
        ),
        Err(EngineError::MissingFile(_)) => println!("Params:    (not saved)"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
