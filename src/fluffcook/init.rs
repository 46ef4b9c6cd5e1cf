use crate::api::{FluffApi, FluffPaths};
use crate::config::AppConfig;
use crate::error::{FluffError, Result};
use crate::state::AppState;
use crate::store::fs::FileStore;
use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Overrides the platform data directory. Used by tests and portable installs.
pub const HOME_ENV: &str = "FLUFFCOOK_HOME";

pub struct FluffContext {
    pub api: FluffApi<FileStore>,
    pub config: AppConfig,
}

pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "fluffcook", "fluffcook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| FluffError::Store("Could not determine data directory".to_string()))
}

pub fn initialize() -> Result<FluffContext> {
    let dir = data_dir()?;
    debug!(data_dir = %dir.display(), "initializing");

    let config = AppConfig::load(&dir)?;
    let state = AppState::load(FileStore::new(dir.clone()))?;
    let api = FluffApi::new(state, FluffPaths::new(dir));

    Ok(FluffContext { api, config })
}
