use dockpilot::core::grid::DEFAULT_PADDING;

pub struct DefaultsConfig {
    pub engine_program: String,
    pub engine_args: Vec<String>,
    pub padding: f64,
    pub poll_interval_ms: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            engine_program: "dockpilot-engine".to_string(),
            engine_args: Vec::new(),
            padding: DEFAULT_PADDING,
            poll_interval_ms: 500,
        }
    }
}
