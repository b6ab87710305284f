mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("DockPilot CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let app_config = config::build_config(&cli)?;
    debug!(?app_config, "Effective configuration");

    let command_result = match cli.command {
        Commands::Project(args) => commands::project::run(args, &app_config),
        Commands::Receptor(args) => commands::assets::run_receptor(args, &app_config),
        Commands::Ligand(args) => commands::assets::run_ligand(args, &app_config),
        Commands::Grid(args) => commands::grid::run(args, &app_config).await,
        Commands::GridSet(args) => commands::grid::run_set(args, &app_config),
        Commands::Params(args) => commands::params::run(args, &app_config),
        Commands::Run(args) => {
            info!("Dispatching to 'run' command.");
            commands::run::run(args, &app_config).await
        }
    };

    match &command_result {
        Ok(()) => info!("Command completed successfully."),
        Err(CliError::Core(e)) => error!(class = %e.class(), "Command failed: {}", e),
        Err(e) => error!("Command failed: {}", e),
    }
    command_result
}
