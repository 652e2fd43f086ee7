use crate::domain::{config::CrowComConfig, error::{CrowComError, CrowComResult}};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration manager
pub struct ConfigManager {
    global_config_path: Option<PathBuf>,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> Self {
        Self {
            global_config_path: Self::get_global_config_path(),
            project_config_path: Self::find_project_config_path(),
        }
    }

    /// Create a manager that reads from explicit locations only
    pub fn with_paths(global: Option<PathBuf>, project: Option<PathBuf>) -> Self {
        Self {
            global_config_path: global,
            project_config_path: project,
        }
    }

    /// Load configuration from files
    ///
    /// Both files are optional. Keys from the project file override the
    /// same keys from the global one; anything unset falls back to defaults.
    pub fn load_config(&self) -> CrowComResult<CrowComConfig> {
        let mut merged = toml::Table::new();

        for path in [&self.global_config_path, &self.project_config_path]
            .into_iter()
            .flatten()
        {
            if path.exists() {
                debug!("Loading configuration from {}", path.display());
                merge_tables(&mut merged, Self::read_table(path)?);
            }
        }

        let config = toml::Value::Table(merged)
            .try_into::<CrowComConfig>()
            .map_err(|e| CrowComError::Config {
                message: format!("Invalid configuration: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn read_table(path: &Path) -> CrowComResult<toml::Table> {
        let content = fs::read_to_string(path).map_err(|e| CrowComError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| CrowComError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Get global configuration path
    fn get_global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("crowcom").join("config.toml"))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut path = current_dir.as_path();

        loop {
            let config_path = path.join(".crowcom").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }

    /// Load configuration from specific path, ignoring the global and project files
    pub fn load_config_from_path(&self, path: &Path) -> CrowComResult<CrowComConfig> {
        let content = fs::read_to_string(path).map_err(|e| CrowComError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: CrowComConfig = toml::from_str(&content).map_err(|e| CrowComError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Get the current project config path (if any)
    pub fn project_config_path(&self) -> Option<&PathBuf> {
        self.project_config_path.as_ref()
    }

    /// Get the global config path (if the platform has one)
    pub fn global_config_path(&self) -> Option<&PathBuf> {
        self.global_config_path.as_ref()
    }
}

/// Overlay `overlay` onto `base`, descending into nested tables.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(incoming) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge_tables(existing, incoming);
                } else {
                    base.insert(key, toml::Value::Table(incoming));
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_without_files_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_paths(
            Some(temp_dir.path().join("missing.toml")),
            None,
        );

        let config = manager.load_config().unwrap();
        assert_eq!(config.scripts.default, "./sketch.lua");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_project_overrides_global() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("global.toml");
        let project = temp_dir.path().join("project.toml");
        fs::write(&global, "[scripts]\ndefault = \"global.lua\"\n[ui]\ntab_width = 4\n").unwrap();
        fs::write(&project, "[scripts]\ndefault = \"project.lua\"\n").unwrap();

        let manager = ConfigManager::with_paths(Some(global), Some(project));
        let config = manager.load_config().unwrap();
        assert_eq!(config.scripts.default, "project.lua");
        // untouched keys from the global file survive
        assert_eq!(config.ui.tab_width, 4);
        assert_eq!(config.ui.history_limit, 1000);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[scripts\n").unwrap();

        let manager = ConfigManager::with_paths(None, None);
        let err = manager.load_config_from_path(&path).unwrap_err();
        assert!(matches!(err, CrowComError::Config { .. }));
    }

    #[test]
    fn test_session_settings_are_validated_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("slow.toml");
        fs::write(&path, "[session]\npoll_interval_us = 5000000\n").unwrap();

        let manager = ConfigManager::with_paths(None, None);
        let err = manager.load_config_from_path(&path).unwrap_err();
        assert!(matches!(err, CrowComError::Config { .. }));

        // a valid global file cannot be broken by the project file unnoticed
        let global = temp_dir.path().join("global.toml");
        let project = temp_dir.path().join("project.toml");
        fs::write(&global, "[session]\nread_chunk_size = 512\n").unwrap();
        fs::write(&project, "[session]\nread_chunk_size = 0\n").unwrap();
        let manager = ConfigManager::with_paths(Some(global), Some(project));
        assert!(matches!(manager.load_config(), Err(CrowComError::Config { .. })));
    }
}
