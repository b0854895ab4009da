//! Byte Machine Configuration System
//!
//! Provides configuration for the VM and its tools:
//! - Machine limits (stack and program capacity)
//! - Default execution step limit
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Global config (~/.bm/config.toml)
//! 2. Project config (./bm.toml, searched upwards)
//! 3. Environment variables (BM_*)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use bm_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! let machine = config.machine();
//! ```

pub mod loader;
pub mod settings;

use std::path::PathBuf;
use thiserror::Error;

/// Default maximum stack depth
pub const DEFAULT_STACK_CAPACITY: usize = 1024;

/// Default maximum number of program instructions
pub const DEFAULT_PROGRAM_CAPACITY: usize = 1024;

/// Default execution step limit (negative means unbounded)
pub const DEFAULT_EXECUTION_LIMIT: i64 = -1;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Resolved machine limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    pub stack_capacity: usize,
    pub program_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            stack_capacity: DEFAULT_STACK_CAPACITY,
            program_capacity: DEFAULT_PROGRAM_CAPACITY,
        }
    }
}

// Re-export main types
pub use loader::{Config, ConfigLoader};
pub use settings::ConfigFile;
