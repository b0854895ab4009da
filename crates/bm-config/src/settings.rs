//! Configuration file schema (bm.toml, ~/.bm/config.toml)
//!
//! Both files share one schema; every field is optional.
//!
//! ```toml
//! [machine]
//! stack-capacity = 1024
//! program-capacity = 1024
//!
//! [run]
//! limit = -1
//! ```

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parsed configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Machine limits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine: Option<MachineSection>,

    /// Execution settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunSection>,
}

/// `[machine]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct MachineSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_capacity: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_capacity: Option<usize>,
}

/// `[run]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    /// Step limit; negative runs until halt or fault
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl ConfigFile {
    /// Load a configuration file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(machine) = &self.machine {
            validate_capacity("machine.stack-capacity", machine.stack_capacity)?;
            validate_capacity("machine.program-capacity", machine.program_capacity)?;
        }
        Ok(())
    }

    pub fn stack_capacity(&self) -> Option<usize> {
        self.machine.as_ref().and_then(|m| m.stack_capacity)
    }

    pub fn program_capacity(&self) -> Option<usize> {
        self.machine.as_ref().and_then(|m| m.program_capacity)
    }

    pub fn limit(&self) -> Option<i64> {
        self.run.as_ref().and_then(|r| r.limit)
    }

    /// Merge another config into this one
    /// Other config takes precedence for values it sets
    pub fn merge(&mut self, other: &ConfigFile) {
        if let Some(other_machine) = &other.machine {
            let machine = self.machine.get_or_insert_with(Default::default);
            if other_machine.stack_capacity.is_some() {
                machine.stack_capacity = other_machine.stack_capacity;
            }
            if other_machine.program_capacity.is_some() {
                machine.program_capacity = other_machine.program_capacity;
            }
        }
        if let Some(limit) = other.limit() {
            self.run.get_or_insert_with(Default::default).limit = Some(limit);
        }
    }
}

fn validate_capacity(field: &str, value: Option<usize>) -> ConfigResult<()> {
    if value == Some(0) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(())
}
