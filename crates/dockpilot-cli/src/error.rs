use dockpilot::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Exit status for any command error.
pub const EXIT_ERROR: i32 = 1;
/// Exit status when a docking run finished but the engine reported failure.
pub const EXIT_RUN_FAILED: i32 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Cannot open log file '{path}': {source}", path = path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Docking engine failed ({})", describe_exit(*exit_code))]
    RunFailed { exit_code: Option<i32> },

    #[error("Docking run was interrupted and terminated")]
    Interrupted,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::RunFailed { .. } => EXIT_RUN_FAILED,
            _ => EXIT_ERROR,
        }
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by a signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_runs_have_their_own_exit_status() {
        assert_eq!(CliError::RunFailed { exit_code: Some(3) }.exit_code(), EXIT_RUN_FAILED);
        assert_eq!(CliError::Interrupted.exit_code(), EXIT_ERROR);
        assert_eq!(
            CliError::Core(EngineError::NoAtomsSelected).exit_code(),
            EXIT_ERROR
        );
    }

    #[test]
    fn messages_describe_the_failure() {
        assert_eq!(
            CliError::RunFailed { exit_code: Some(3) }.to_string(),
            "Docking engine failed (exit code 3)"
        );
        assert_eq!(
            CliError::RunFailed { exit_code: None }.to_string(),
            "Docking engine failed (terminated by a signal)"
        );
        assert_eq!(
            CliError::Core(EngineError::NoAtomsSelected).to_string(),
            "No atoms matched the selection"
        );
    }
}
