use crate::config::Config;
use crate::render::RenderEnv;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Handed to every render call; never mutated after startup.
    pub render_env: RenderEnv,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let render_env = RenderEnv {
            scratch_dir: config.scratch_dir.clone(),
        };
        Self { config, render_env }
    }
}

#[cfg(test)]
pub fn test_state(scratch_dir: &std::path::Path) -> AppState {
    AppState::new(Config {
        scratch_dir: scratch_dir.to_path_buf(),
        ..Config::default()
    })
}
