use dockpilot::engine::supervisor::EngineCommand;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub projects_dir: PathBuf,
    pub engine: EngineCommand,
    pub padding: f64,
    pub poll_interval: Duration,
}
