use std::{
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use super::compiled::{compile_config, CompiledConfig};
use super::error::ConfigError;
use super::resolver::{load_config, resolve_config_references};
use crate::http::router::{get_routes_from_config, RoutesData};

/// A fully loaded API: its resource registry and the routes that reach it.
#[derive(Debug)]
pub struct ApiSnapshot {
    pub config: CompiledConfig,
    pub routes: RoutesData,
}

pub type SharedApi = Arc<RwLock<Option<Arc<ApiSnapshot>>>>;

/// Load, inline and compile the configuration at `config_path`.
pub fn load_api(config_path: &Path) -> Result<ApiSnapshot, ConfigError> {
    let root_folder = config_root(config_path);
    let raw = load_config(config_path)?;
    let resolved = resolve_config_references(raw, &root_folder)?;
    let config = compile_config(resolved)?;
    let routes = get_routes_from_config(&config);
    Ok(ApiSnapshot { config, routes })
}

fn config_root(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    root_folder: PathBuf,
    api: SharedApi,
    port: u16,
}

impl ConfigManager {
    /// Initial load + compile
    pub fn new(config_path: PathBuf) -> Result<Self, ConfigError> {
        let root_folder = config_root(&config_path);
        let snapshot = load_api(&config_path)?;
        let port = snapshot.config.port;
        let api = Arc::new(RwLock::new(Some(Arc::new(snapshot))));

        Ok(ConfigManager {
            config_path,
            root_folder,
            api,
            port,
        })
    }

    /// Reload on file change. The previous snapshot stays in place on failure.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let snapshot = load_api(&self.config_path)?;
        let mut guard = match self.api.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(Arc::new(snapshot));
        Ok(())
    }

    pub fn api_handle(&self) -> SharedApi {
        Arc::clone(&self.api)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }
}

/// Current snapshot behind a shared handle.
pub fn current(api: &SharedApi) -> Option<Arc<ApiSnapshot>> {
    match api.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
