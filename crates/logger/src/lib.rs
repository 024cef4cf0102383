use std::{fmt::Display, sync::Mutex};

use anyhow::anyhow;

mod srcfile;

pub use srcfile::{SrcFileLogger, WrapFileLogger};

/// Severity attached to every message that reaches a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        })
    }
}

pub trait Logger {
    fn log_at(&self, level: Level, message: impl Display);

    fn log(&self, message: impl Display) {
        self.log_at(Level::Info, message);
    }
    fn debug(&self, message: impl Display) {
        self.log_at(Level::Debug, message);
    }
    fn warn(&self, message: impl Display) {
        self.log_at(Level::Warn, message);
    }
    fn error(&self, message: impl Display) {
        self.log_at(Level::Error, message);
    }
}

/// Formats and logs a message at debug level, only in debug builds.
#[macro_export]
macro_rules! debug_logf {
    ($logger:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        if cfg!(debug_assertions) {
            $crate::Logger::debug($logger, format!($fmt $(, $arg)*));
        }
    };
}

impl<T: Logger> Logger for &T {
    fn log_at(&self, level: Level, message: impl Display) {
        (*self).log_at(level, message);
    }
}

/// Writes to stderr, prefixed with the time since the logger was created.
///
/// Messages below `min_level` are dropped.
pub struct StdioLogger {
    zero_time: std::time::Instant,
    min_level: Level,
}

impl StdioLogger {
    pub fn new() -> Self {
        Self::with_level(Level::Info)
    }

    pub fn with_level(min_level: Level) -> Self {
        Self {
            zero_time: std::time::Instant::now(),
            min_level,
        }
    }
}

impl Default for StdioLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for StdioLogger {
    fn log_at(&self, level: Level, message: impl Display) {
        if level < self.min_level {
            return;
        }
        let delta_time = self.zero_time.elapsed();
        eprintln!("[{:.04}] {}: {}", delta_time.as_secs_f64(), level, message);
    }
}

/// Collects every message in memory. Used by tests to assert on log output.
pub struct VecLogger {
    logs: Mutex<Vec<(Level, String)>>,
}

impl VecLogger {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
        }
    }

    pub fn get_logs(self) -> Result<Vec<(Level, String)>, anyhow::Error> {
        self.logs
            .into_inner()
            .map_err(|err| anyhow!("error unlocking VecLogger logs: {err}"))
    }

    /// Messages logged at exactly `level`, in order.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        match self.logs.lock() {
            Ok(logs) => logs
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, m)| m.clone())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Default for VecLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for VecLogger {
    fn log_at(&self, level: Level, message: impl Display) {
        // a poisoned lock only means another test thread panicked mid-push
        let mut logs = match self.logs.lock() {
            Ok(logs) => logs,
            Err(poisoned) => poisoned.into_inner(),
        };
        logs.push((level, message.to_string()));
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Level, Logger, VecLogger};

    #[test]
    fn vec_logger_keeps_levels_in_order() {
        let logger = VecLogger::new();
        logger.log("hello");
        logger.warn("careful");
        crate::debug_logf!(&logger, "value is {}", 3);

        assert_eq!(logger.messages_at(Level::Warn), vec!["careful".to_string()]);

        let logs = logger.get_logs().unwrap();
        assert_eq!(logs[0], (Level::Info, "hello".to_string()));
        assert_eq!(logs[1], (Level::Warn, "careful".to_string()));
        if cfg!(debug_assertions) {
            assert_eq!(logs[2], (Level::Debug, "value is 3".to_string()));
        }
    }

    #[test]
    fn logger_is_usable_through_a_reference() {
        fn log_twice(logger: impl Logger) {
            logger.error("one");
            logger.error("two");
        }

        let logger = VecLogger::new();
        log_twice(&logger);
        assert_eq!(
            logger.messages_at(Level::Error),
            vec!["one".to_string(), "two".to_string()]
        );
    }
}
