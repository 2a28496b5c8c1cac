//! Configuration file loading.

use std::path::{Path, PathBuf};

use super::types::{Config, ConfigFile, Environment};
use crate::error::{NovaError, Result};

impl Config {
    /// Get the explicit ~/.config/nova/nova.kdl path (XDG-style, cross-platform)
    fn xdg_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".config/nova/nova.kdl"))
    }

    /// Get the list of config file search paths in priority order
    fn get_config_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. ./nova.kdl (current directory)
        paths.push(PathBuf::from("nova.kdl"));

        // 2. ~/.config/nova/nova.kdl
        if let Some(xdg_path) = Self::xdg_config_path() {
            paths.push(xdg_path);
        }

        // 3. Platform-native config directory, unless it is the XDG path again
        if let Some(config_dir) = dirs::config_dir() {
            let native_path = config_dir.join("nova/nova.kdl");
            if Self::xdg_config_path().as_ref() != Some(&native_path) {
                paths.push(native_path);
            }
        }

        paths
    }

    /// Find existing config file by searching all standard locations
    pub fn find_existing_config() -> Option<PathBuf> {
        Self::get_config_search_paths()
            .into_iter()
            .find(|path| path.exists())
    }

    /// Parse nova.kdl content.
    pub fn parse_file(name: &str, content: &str) -> Result<ConfigFile> {
        knuffel::parse::<ConfigFile>(name, content)
            .map_err(|e| NovaError::config(format!("{}: {}", name, e)))
    }

    /// Load nova.kdl from a specific path
    fn load_from_path(path: &Path) -> Result<ConfigFile> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_file(&path.display().to_string(), &content)
    }

    /// Load configuration: the first nova.kdl found (if any) overlaid with
    /// the process environment.
    pub fn load() -> Result<Self> {
        let file = match Self::find_existing_config() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                Self::load_from_path(&path)?
            }
            None => ConfigFile::default(),
        };

        Ok(Config::new(file.defaults, Environment::from_process()))
    }
}
