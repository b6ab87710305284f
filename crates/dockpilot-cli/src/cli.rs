use crate::utils::parser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "DockPilot Developers",
    version,
    about = "DockPilot CLI - Prepare docking projects, compute search grids, and supervise external docking engine runs.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory that holds the project workspaces.
    #[arg(long, global = true, env = "DOCKPILOT_PROJECTS_DIR", value_name = "PATH")]
    pub projects_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S grid.padding=4.0
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or inspect a project workspace.
    Project(ProjectArgs),
    /// Import the receptor structure (.pdb) into a project.
    Receptor(ReceptorArgs),
    /// Import ligand structures (.pdbqt) into a project.
    Ligand(LigandArgs),
    /// Compute a docking search grid from the receptor structure.
    Grid(GridArgs),
    /// Save a manually adjusted search grid for the next run.
    GridSet(GridSetArgs),
    /// Save the docking search parameters for the next run.
    Params(ParamsArgs),
    /// Launch the docking engine and follow it until it finishes.
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a new project workspace.
    Create {
        /// Project name. Characters outside [A-Za-z0-9_-] are replaced by '_'.
        #[arg(required = true)]
        name: String,
    },
    /// Show a project's files, saved grid and parameters.
    Show {
        #[arg(required = true)]
        name: String,
    },
}

#[derive(Args, Debug)]
pub struct ReceptorArgs {
    #[command(subcommand)]
    pub command: ReceptorCommands,
}

#[derive(Subcommand, Debug)]
pub enum ReceptorCommands {
    /// Copy a receptor structure into the project.
    Add {
        #[arg(short, long, required = true, value_name = "NAME")]
        project: String,
        /// Path to the receptor structure (e.g., protein.pdb).
        #[arg(required = true, value_name = "PATH")]
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct LigandArgs {
    #[command(subcommand)]
    pub command: LigandCommands,
}

#[derive(Subcommand, Debug)]
pub enum LigandCommands {
    /// Copy one or more ligand structures into the project.
    Add {
        #[arg(short, long, required = true, value_name = "NAME")]
        project: String,
        /// Paths to the ligand structures (e.g., ligand.pdbqt).
        #[arg(required = true, num_args = 1.., value_name = "PATH")]
        files: Vec<PathBuf>,
    },
}

/// Arguments for the `grid` subcommand.
#[derive(Args, Debug)]
pub struct GridArgs {
    #[arg(short, long, required = true, value_name = "NAME")]
    pub project: String,

    /// Structure to compute the grid from. Defaults to the project's receptor.
    #[arg(short, long, value_name = "PATH")]
    pub structure: Option<PathBuf>,

    /// Selection mode: 'blind' encloses every atom, 'targeted' only the listed residues.
    #[arg(short, long, default_value = "blind", value_name = "MODE")]
    pub mode: String,

    /// Residues for targeted mode as CHAIN:NUMBER, comma separated (e.g., A:12,B:7).
    #[arg(short, long, value_delimiter = ',', value_name = "CHAIN:NUMBER")]
    pub residues: Vec<String>,

    /// Override the padding added around the selected atoms, in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub padding: Option<f64>,

    /// Save the computed grid as the project's grid for the next run.
    #[arg(long)]
    pub save: bool,
}

/// Arguments for the `grid-set` subcommand.
#[derive(Args, Debug)]
pub struct GridSetArgs {
    #[arg(short, long, required = true, value_name = "NAME")]
    pub project: String,

    /// Grid center as X,Y,Z.
    #[arg(long, required = true, value_parser = parser::parse_triple, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub center: [f64; 3],

    /// Grid edge lengths as X,Y,Z.
    #[arg(long, required = true, value_parser = parser::parse_triple, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub size: [f64; 3],
}

/// Arguments for the `params` subcommand.
#[derive(Args, Debug)]
pub struct ParamsArgs {
    #[arg(short, long, required = true, value_name = "NAME")]
    pub project: String,

    /// Search exhaustiveness preset understood by the engine (e.g., 'balance').
    #[arg(long, value_name = "MODE")]
    pub search_mode: Option<String>,

    /// Scoring function understood by the engine (e.g., 'vina').
    #[arg(long, value_name = "METHOD")]
    pub scoring_method: Option<String>,

    /// Number of binding modes to generate.
    #[arg(short, long, value_name = "INT")]
    pub num_modes: Option<u32>,

    /// Ask the engine to run on the GPU.
    #[arg(long)]
    pub gpu: bool,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[arg(short, long, required = true, value_name = "NAME")]
    pub project: String,

    /// Override the docking engine program.
    #[arg(long, value_name = "PATH")]
    pub engine: Option<PathBuf>,

    /// Argument passed to the engine before the descriptor path. Can be used multiple times.
    #[arg(long = "engine-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,

    /// Override the interval between status polls, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,
}
