//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::settings::ConfigFile;
use crate::{
    ConfigError, ConfigResult, MachineConfig, DEFAULT_EXECUTION_LIMIT, DEFAULT_PROGRAM_CAPACITY,
    DEFAULT_STACK_CAPACITY,
};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Project configuration file name
pub const PROJECT_CONFIG_FILE: &str = "bm.toml";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.bm/config.toml) - lowest priority
/// 2. Project config (./bm.toml) - overrides global
/// 3. Environment variables (BM_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Merged settings
    pub settings: ConfigFile,

    /// Directory where bm.toml was found
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Use an explicit global config path instead of ~/.bm/config.toml
    pub fn with_global_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find bm.toml, layers it over the
    /// global config, then applies environment overrides.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project) = find_project_config(start_dir)?;

        let mut settings = self.load_global_config()?;
        settings.merge(&project);
        apply_env_overrides(&mut settings)?;
        settings.validate()?;

        Ok(Config {
            settings,
            project_root,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project = ConfigFile::load_from_file(config_path)?;

        let mut settings = self.load_global_config()?;
        settings.merge(&project);
        apply_env_overrides(&mut settings)?;
        settings.validate()?;

        Ok(Config {
            settings,
            project_root: config_path.parent().map(|p| p.to_path_buf()),
        })
    }

    /// Load global configuration; a missing file yields the defaults
    fn load_global_config(&mut self) -> ConfigResult<ConfigFile> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => match Self::global_config_dir() {
                Ok(dir) => dir.join("config.toml"),
                // No home directory means no global config
                Err(ConfigError::HomeNotFound) => return Ok(ConfigFile::default()),
                Err(e) => return Err(e),
            },
        };
        self.global_config_path = Some(path.clone());

        if !path.exists() {
            return Ok(ConfigFile::default());
        }

        ConfigFile::load_from_file(&path)
    }

    /// Get the global configuration directory (~/.bm)
    pub fn global_config_dir() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".bm"))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Find project configuration by walking up directory tree
fn find_project_config(start_dir: &Path) -> ConfigResult<(Option<PathBuf>, ConfigFile)> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(PROJECT_CONFIG_FILE);

        if config_path.is_file() {
            let config = ConfigFile::load_from_file(&config_path)?;
            return Ok((Some(current), config));
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return Ok((None, ConfigFile::default())),
        }
    }
}

/// Apply environment variable overrides
///
/// - BM_STACK_CAPACITY
/// - BM_PROGRAM_CAPACITY
/// - BM_EXECUTION_LIMIT
fn apply_env_overrides(config: &mut ConfigFile) -> ConfigResult<()> {
    if let Some(capacity) = env_value::<usize>("BM_STACK_CAPACITY")? {
        config
            .machine
            .get_or_insert_with(Default::default)
            .stack_capacity = Some(capacity);
    }

    if let Some(capacity) = env_value::<usize>("BM_PROGRAM_CAPACITY")? {
        config
            .machine
            .get_or_insert_with(Default::default)
            .program_capacity = Some(capacity);
    }

    if let Some(limit) = env_value::<i64>("BM_EXECUTION_LIMIT")? {
        config.run.get_or_insert_with(Default::default).limit = Some(limit);
    }

    Ok(())
}

fn env_value<T: FromStr>(name: &str) -> ConfigResult<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                field: name.to_string(),
                reason: format!("`{}` is not a valid number", raw),
            }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Effective machine limits
    pub fn machine(&self) -> MachineConfig {
        MachineConfig {
            stack_capacity: self
                .settings
                .stack_capacity()
                .unwrap_or(DEFAULT_STACK_CAPACITY),
            program_capacity: self
                .settings
                .program_capacity()
                .unwrap_or(DEFAULT_PROGRAM_CAPACITY),
        }
    }

    /// Effective execution step limit
    pub fn execution_limit(&self) -> i64 {
        self.settings.limit().unwrap_or(DEFAULT_EXECUTION_LIMIT)
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }
}
