use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use directories::ProjectDirs;
use dockpilot::engine::supervisor::EngineCommand;
use std::path::PathBuf;
use std::time::Duration;

/// Merges compiled defaults, the optional TOML file, `--set` values and command flags,
/// in increasing order of precedence.
pub fn build_config(cli: &Cli) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &cli.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    let mut file_config = apply_set_values(file_config, &cli.set_values)?;

    let (cli_padding, cli_engine, cli_engine_args, cli_poll) = match &cli.command {
        Commands::Grid(args) => (args.padding, None, Vec::new(), None),
        Commands::Run(args) => (
            None,
            args.engine.clone(),
            args.engine_args.clone(),
            args.poll_interval_ms,
        ),
        _ => (None, None, Vec::new(), None),
    };

    let projects_dir = match cli.projects_dir.clone().or(file_config.projects_dir.take()) {
        Some(dir) => dir,
        None => default_projects_dir()?,
    };

    let engine_file = file_config.engine.take().unwrap_or_default();
    let program = cli_engine
        .or(engine_file.program.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(&defaults.engine_program));
    let args = if !cli_engine_args.is_empty() {
        cli_engine_args
    } else {
        engine_file.args.unwrap_or(defaults.engine_args)
    };

    let padding = cli_padding
        .or(file_config.grid.take().and_then(|g| g.padding))
        .unwrap_or(defaults.padding);
    if !(padding.is_finite() && padding >= 0.0) {
        return Err(CliError::Config(format!(
            "grid padding must be a non-negative number, got {}",
            padding
        )));
    }

    let poll_interval_ms = cli_poll
        .or(file_config.run.take().and_then(|r| r.poll_interval_ms))
        .unwrap_or(defaults.poll_interval_ms);
    if poll_interval_ms == 0 {
        return Err(CliError::Config(
            "run poll interval must be at least 1 ms".to_string(),
        ));
    }

    Ok(AppConfig {
        projects_dir,
        engine: EngineCommand::new(program).args(args),
        padding,
        poll_interval: Duration::from_millis(poll_interval_ms),
    })
}

fn default_projects_dir() -> Result<PathBuf> {
    ProjectDirs::from("org", "dockpilot", "dockpilot")
        .map(|dirs| dirs.data_dir().join("projects"))
        .ok_or_else(|| {
            CliError::Config(
                "Could not determine a default projects directory. Use --projects-dir.".to_string(),
            )
        })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "projects-dir" => {
                config.projects_dir = Some(PathBuf::from(value_str));
            }
            "engine.program" => {
                config
                    .engine
                    .get_or_insert_with(Default::default)
                    .program = Some(value_str.to_string());
            }
            "grid.padding" => {
                config.grid.get_or_insert_with(Default::default).padding =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                    })?);
            }
            "run.poll-interval-ms" => {
                config
                    .run
                    .get_or_insert_with(Default::default)
                    .poll_interval_ms = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dockpilot").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let cli = parse(&["--projects-dir", "/tmp/projects", "run", "-p", "kinase"]);
        let config = build_config(&cli).unwrap();
        let defaults = DefaultsConfig::default();

        assert_eq!(config.projects_dir, PathBuf::from("/tmp/projects"));
        assert_eq!(config.engine.program, PathBuf::from(defaults.engine_program));
        assert!(config.engine.args.is_empty());
        assert_eq!(config.padding, defaults.padding);
        assert_eq!(
            config.poll_interval,
            Duration::from_millis(defaults.poll_interval_ms)
        );
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("dockpilot.toml");
        fs::write(
            &cfg_path,
            r#"
            projects-dir = "/srv/docking"

            [engine]
            program = "python3"
            args = ["-u", "run_docking.py"]

            [grid]
            padding = 3.5

            [run]
            poll-interval-ms = 100
            "#,
        )
        .unwrap();

        let cli = parse(&["-c", cfg_path.to_str().unwrap(), "run", "-p", "kinase"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.projects_dir, PathBuf::from("/srv/docking"));
        assert_eq!(
            config.engine,
            EngineCommand::new("python3").args(["-u", "run_docking.py"])
        );
        assert_eq!(config.padding, 3.5);
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn cli_flags_override_file_values() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("dockpilot.toml");
        fs::write(
            &cfg_path,
            "projects-dir = \"/srv/docking\"\n[engine]\nprogram = \"python3\"\nargs = [\"a.py\"]\n[grid]\npadding = 3.5\n",
        )
        .unwrap();
        let cfg = cfg_path.to_str().unwrap();

        let cli = parse(&[
            "-c", cfg, "--projects-dir", "/tmp/override", "run", "-p", "kinase", "--engine",
            "/opt/bin/vina-runner", "--engine-arg", "--fast", "--poll-interval-ms", "50",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.projects_dir, PathBuf::from("/tmp/override"));
        assert_eq!(
            config.engine,
            EngineCommand::new("/opt/bin/vina-runner").arg("--fast")
        );
        assert_eq!(config.poll_interval, Duration::from_millis(50));

        let cli = parse(&["-c", cfg, "grid", "-p", "kinase", "--padding", "8"]);
        assert_eq!(build_config(&cli).unwrap().padding, 8.0);
    }

    #[test]
    fn set_values_override_file_values() {
        let cli = parse(&[
            "--projects-dir",
            "/tmp/projects",
            "-S",
            "grid.padding=2.5",
            "-S",
            "run.poll-interval-ms=75",
            "-S",
            "engine.program=sh",
            "grid",
            "-p",
            "kinase",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.padding, 2.5);
        assert_eq!(config.poll_interval, Duration::from_millis(75));
        assert_eq!(config.engine.program, PathBuf::from("sh"));
    }

    #[test]
    fn invalid_set_values_are_rejected() {
        for bad in ["grid.padding", "grid.padding=wide", "grid.margin=1"] {
            let cli = parse(&["--projects-dir", "/tmp/p", "-S", bad, "grid", "-p", "k"]);
            assert!(
                matches!(build_config(&cli), Err(CliError::Config(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn negative_padding_and_zero_interval_are_rejected() {
        let cli = parse(&["--projects-dir", "/tmp/p", "grid", "-p", "k", "--padding=-1"]);
        assert!(matches!(build_config(&cli), Err(CliError::Config(_))));

        let cli = parse(&["--projects-dir", "/tmp/p", "run", "-p", "k", "--poll-interval-ms", "0"]);
        assert!(matches!(build_config(&cli), Err(CliError::Config(_))));
    }
}
