use crate::cli::ParamsArgs;
use crate::config::AppConfig;
use crate::error::Result;
use dockpilot::engine::config::DockingParametersBuilder;
use dockpilot::engine::error::EngineError;
use dockpilot::engine::workspace::Workspace;
use dockpilot::workflows;
use tracing::debug;

/// Saves docking parameters. Flags left out keep the values saved earlier, if any.
pub fn run(args: ParamsArgs, config: &AppConfig) -> Result<()> {
    let workspace = Workspace::open(&config.projects_dir, &args.project)?;

    let mut builder = DockingParametersBuilder::new().gpu_enabled(args.gpu);
    match workflows::run::load_parameters(&workspace) {
        Ok(previous) => {
            debug!(?previous, "Merging with previously saved parameters");
            builder = builder
                .search_mode(previous.search_mode)
                .scoring_method(previous.scoring_method)
                .num_modes(previous.num_modes);
        }
        Err(EngineError::MissingFile(_)) => {}
        Err(e) => return Err(e.into()),
    }
    if let Some(mode) = args.search_mode {
        builder = builder.search_mode(mode);
    }
    if let Some(method) = args.scoring_method {
        builder = builder.scoring_method(method);
    }
    if let Some(n) = args.num_modes {
        builder = builder.num_modes(n);
    }

    let parameters = builder.build().map_err(EngineError::from)?;
    let path = workflows::run::save_parameters(&workspace, &parameters)?;
    println!(
        "✓ Parameters saved to {} (search_mode={}, scoring_method={}, num_modes={}, gpu={})",
        path.display(),
        parameters.search_mode,
        parameters.scoring_method,
        parameters.num_modes,
        parameters.gpu_enabled
    );
    Ok(())
}
