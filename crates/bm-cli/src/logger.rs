//! Stderr logger for the `log` facade

use colored::Colorize;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Writes `LEVEL: message` lines to stderr
struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", format_record(record.level(), &record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

fn format_record(level: Level, message: &str) -> String {
    let label = match level {
        Level::Error => "ERROR".red().bold(),
        Level::Warn => "WARN".yellow().bold(),
        Level::Info => "INFO".green(),
        Level::Debug => "DEBUG".blue(),
        Level::Trace => "TRACE".dimmed(),
    };
    format!("{}: {}", label, message)
}

/// Install the logger; call once at startup
pub fn init(level: LevelFilter, color: bool) -> Result<(), SetLoggerError> {
    if !color {
        colored::control::set_override(false);
    }
    log::set_boxed_logger(Box::new(StderrLogger { level }))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record_plain() {
        colored::control::set_override(false);
        assert_eq!(format_record(Level::Warn, "careful"), "WARN: careful");
        assert_eq!(format_record(Level::Trace, "ip=0"), "TRACE: ip=0");
    }

    #[test]
    fn test_enabled_respects_level() {
        let logger = StderrLogger {
            level: LevelFilter::Info,
        };
        let info = Metadata::builder().level(Level::Info).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&info));
        assert!(!logger.enabled(&debug));
    }
}
