use std::sync::{Mutex, PoisonError};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Destination for the lines written by an [`HttpLogger`](crate::logging::HttpLogger).
pub trait LogHandler: Send + Sync {
    fn handle(&self, level: LogLevel, msg: &str);
}

/// Forwards every line to `tracing` under the `reqlog::http` target.
pub struct TracingLogger;

impl LogHandler for TracingLogger {
    fn handle(&self, level: LogLevel, msg: &str) {
        match level {
            LogLevel::Info => tracing::info!(target: "reqlog::http", "{msg}"),
            LogLevel::Warning => tracing::warn!(target: "reqlog::http", "{msg}"),
            LogLevel::Error => tracing::error!(target: "reqlog::http", "{msg}"),
        }
    }
}

/// Prints `[LEVEL] line` to stdout, errors to stderr.
pub struct ConsoleLogger;

impl ConsoleLogger {
    fn format(level: LogLevel, msg: &str) -> String {
        format!("[{}] {}", level.as_str(), msg)
    }
}

impl LogHandler for ConsoleLogger {
    fn handle(&self, level: LogLevel, msg: &str) {
        if level == LogLevel::Error {
            eprintln!("{}", Self::format(level, msg));
            return;
        }
        println!("{}", Self::format(level, msg));
    }
}

/// Keeps every line in memory, with the level it was written at.
#[derive(Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries().into_iter().map(|(_, line)| line).collect()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
            .into_iter()
            .map(|(_, line)| line)
            .collect()
    }
}

impl LogHandler for MemoryLogger {
    fn handle(&self, level: LogLevel, msg: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, msg.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_logger_keeps_order() {
        let logger = MemoryLogger::new();
        logger.handle(LogLevel::Info, "first");
        logger.handle(LogLevel::Error, "second");

        assert_eq!(logger.lines(), ["first", "second"]);
        assert_eq!(logger.take(), ["first", "second"]);
        assert!(logger.lines().is_empty());
    }

    #[test]
    fn memory_logger_records_levels() {
        let logger = MemoryLogger::new();
        logger.handle(LogLevel::Warning, "careful");
        assert_eq!(logger.entries(), [(LogLevel::Warning, "careful".to_string())]);
    }

    #[test]
    fn console_lines_carry_the_level() {
        assert_eq!(ConsoleLogger::format(LogLevel::Info, "--> GET /"), "[INFO] --> GET /");
        assert_eq!(ConsoleLogger::format(LogLevel::Warning, "odd"), "[WARN] odd");
        assert_eq!(ConsoleLogger::format(LogLevel::Error, "down"), "[ERROR] down");
    }

    #[test]
    fn levels_are_ordered() {
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }
}
