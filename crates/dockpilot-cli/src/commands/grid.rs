use crate::cli::{GridArgs, GridSetArgs};
use crate::config::AppConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use dockpilot::core::grid::GridBox;
use dockpilot::engine::config::SelectionSpec;
use dockpilot::engine::error::EngineError;
use dockpilot::engine::progress::ProgressReporter;
use dockpilot::engine::workspace::Workspace;
use dockpilot::workflows;
use tracing::info;

pub async fn run(args: GridArgs, config: &AppConfig) -> Result<()> {
    let workspace = Workspace::open(&config.projects_dir, &args.project)?;
    let selection =
        SelectionSpec::from_request(&args.mode, &args.residues).map_err(EngineError::from)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!(mode = selection.mode_name(), padding = config.padding, "Computing grid");
    let grid = tokio::task::block_in_place(|| match &args.structure {
        Some(path) => workflows::grid::compute_from_path(path, &selection, config.padding, &reporter),
        None => workflows::grid::compute_for_workspace(
            &workspace,
            &selection,
            config.padding,
            &reporter,
        ),
    })?;

    print_grid(&grid);
    let text_path = workflows::grid::write_grid_config(&workspace, &grid, &selection)?;
    println!("✓ Engine grid config written to {}", text_path.display());

    if args.save {
        let saved = workflows::grid::save_grid(&workspace, &grid)?;
        println!("✓ Grid saved to {}", saved.display());
    }
    Ok(())
}

pub fn run_set(args: GridSetArgs, config: &AppConfig) -> Result<()> {
    let workspace = Workspace::open(&config.projects_dir, &args.project)?;
    let grid = GridBox::new(args.center.into(), args.size.into()).map_err(EngineError::from)?;

    let saved = workflows::grid::save_grid(&workspace, &grid)?;
    print_grid(&grid);
    println!("✓ Grid saved to {}", saved.display());
    Ok(())
}

fn print_grid(grid: &GridBox) {
    let d = grid.dimensions();
    println!(
        "Center: ({:.3}, {:.3}, {:.3})",
        d.center_x, d.center_y, d.center_z
    );
    println!("Size:   ({:.3}, {:.3}, {:.3})", d.size_x, d.size_y, d.size_z);
}
