use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub projects_dir: Option<PathBuf>,
    pub engine: Option<FileEngineConfig>,
    pub grid: Option<FileGridConfig>,
    pub run: Option<FileRunConfig>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileEngineConfig {
    pub program: Option<String>,
    pub args: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileGridConfig {
    pub padding: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileRunConfig {
    pub poll_interval_ms: Option<u64>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration file {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_every_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dockpilot.toml");
        fs::write(
            &path,
            r#"
            projects-dir = "/srv/docking"

            [engine]
            program = "python3"
            args = ["-u", "/opt/engine/run_docking.py"]

            [grid]
            padding = 4.0

            [run]
            poll-interval-ms = 250
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(config.projects_dir, Some(PathBuf::from("/srv/docking")));
        let engine = config.engine.unwrap();
        assert_eq!(engine.program.as_deref(), Some("python3"));
        assert_eq!(engine.args.unwrap().len(), 2);
        assert_eq!(config.grid.unwrap().padding, Some(4.0));
        assert_eq!(config.run.unwrap().poll_interval_ms, Some(250));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dockpilot.toml");
        fs::write(&path, "[grid]\nmargin = 4.0\n").unwrap();
        assert!(matches!(
            FileConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_parsing_error_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        match FileConfig::from_file(&path) {
            Err(CliError::FileParsing { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
