//! Configuration, data and cache directories for `livequery`.
//!
//! Each directory can be pinned with an environment variable; otherwise the
//! platform location from `directories` is used.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "livequery";
const APPLICATION: &str = "livequery";

pub const CONFIG_DIR_ENV: &str = "LIVEQUERY_CONFIG_DIR";
pub const DATA_DIR_ENV: &str = "LIVEQUERY_DATA_DIR";
pub const CACHE_DIR_ENV: &str = "LIVEQUERY_CACHE_DIR";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| anyhow!("no home directory, cannot place livequery directories"))
}

/// An empty variable counts as unset.
fn dir_from_env(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Directory holding `config.toml`.
pub fn get_config_dir() -> Result<PathBuf> {
    match dir_from_env(CONFIG_DIR_ENV) {
        Some(dir) => Ok(dir),
        None => Ok(project_dirs()?.config_local_dir().to_path_buf()),
    }
}

/// Directory where replay scripts are looked up by default.
pub fn get_data_dir() -> Result<PathBuf> {
    match dir_from_env(DATA_DIR_ENV) {
        Some(dir) => Ok(dir),
        None => Ok(project_dirs()?.data_local_dir().to_path_buf()),
    }
}

pub fn get_cache_dir() -> Result<PathBuf> {
    match dir_from_env(CACHE_DIR_ENV) {
        Some(dir) => Ok(dir),
        None => Ok(project_dirs()?.cache_dir().to_path_buf()),
    }
}
