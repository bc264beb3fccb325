//! Kernel Log Sink
//!
//! Routes the `log` facade to the debug console. Each record becomes one
//! console write of the form `[LEVEL target] message`.

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::services::Console;

/// A `log::Log` implementation writing to a [`Console`].
pub struct ConsoleLogger {
    console: Arc<dyn Console>,
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(console: Arc<dyn Console>, level: LevelFilter) -> Self {
        Self { console, level }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut line = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(line, "[{} {}] {}", record.level(), record.target(), record.args());
        self.console.write(line.as_bytes());
    }

    fn flush(&self) {}
}

/// Install `logger` as the global logger.
///
/// Fails if a logger is already installed.
pub fn init(logger: &'static ConsoleLogger) -> Result<(), SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(logger.level());
    Ok(())
}
