//! CLI configuration via environment variables
//!
//! Machine settings come from bm-config; this only covers presentation.

use log::LevelFilter;
use std::env;
use std::str::FromStr;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level from BM_LOG (error, warn, info, debug, trace, off)
    pub log_level: Option<LevelFilter>,
    /// Disable colored output (BM_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("BM_LOG")
                .ok()
                .and_then(|v| LevelFilter::from_str(v.trim()).ok()),
            no_color: env::var("BM_NO_COLOR").is_ok() || env::var("NO_COLOR").is_ok(),
        }
    }

    /// Effective log level
    ///
    /// `-v` flags win over BM_LOG; the default is `warn`.
    pub fn log_level(&self, verbose: u8) -> LevelFilter {
        match verbose {
            0 => self.log_level.unwrap_or(LevelFilter::Warn),
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_log_level_from_env() {
        env::set_var("BM_LOG", "TRACE");
        let config = Config::from_env();
        assert_eq!(config.log_level, Some(LevelFilter::Trace));

        env::set_var("BM_LOG", "loud");
        let config = Config::from_env();
        assert_eq!(config.log_level, None);
        env::remove_var("BM_LOG");
    }

    #[test]
    #[serial]
    fn test_no_color() {
        env::set_var("BM_NO_COLOR", "1");
        let config = Config::from_env();
        assert!(config.no_color);
        env::remove_var("BM_NO_COLOR");
    }

    #[test]
    fn test_verbose_overrides_env_level() {
        let config = Config {
            log_level: Some(LevelFilter::Error),
            no_color: true,
        };
        assert_eq!(config.log_level(0), LevelFilter::Error);
        assert_eq!(config.log_level(1), LevelFilter::Debug);
        assert_eq!(config.log_level(3), LevelFilter::Trace);
    }

    #[test]
    fn test_default_level_is_warn() {
        let config = Config {
            log_level: None,
            no_color: false,
        };
        assert_eq!(config.log_level(0), LevelFilter::Warn);
    }
}
