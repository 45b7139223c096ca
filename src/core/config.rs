//! Logger configuration

use super::level::Level;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the logger.
///
/// All fields have working defaults; construct with `Config::default()`
/// and override with the builder-style setters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory log files are written to
    pub log_dir: PathBuf,
    /// Log file name prefix
    pub file_prefix: String,
    /// Maximum size of a single log file in bytes
    pub max_file_size: u64,
    /// Maximum number of log files kept in the directory
    pub max_files: usize,
    /// Minimum severity written to any sink
    pub min_level: Level,
    /// Enable console output
    pub console_output: bool,
    /// Enable file output
    pub file_output: bool,
    /// Colorize console output
    pub use_colors: bool,
    /// Show timestamp field
    pub show_timestamp: bool,
    /// Show thread id field
    pub show_thread_id: bool,
    /// Show source location field
    pub show_source_location: bool,
    /// Show module name field
    pub show_module: bool,
    /// Keep the full source path instead of the basename
    pub show_full_path: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            file_prefix: String::from("app"),
            max_file_size: 10 * 1024 * 1024, // 10 MiB
            max_files: 5,
            min_level: Level::Info,
            console_output: true,
            file_output: true,
            use_colors: true,
            show_timestamp: true,
            show_thread_id: true,
            show_source_location: true,
            show_module: true,
            show_full_path: false,
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_files(mut self, count: usize) -> Self {
        self.max_files = count;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_console_output(mut self, enabled: bool) -> Self {
        self.console_output = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_file_output(mut self, enabled: bool) -> Self {
        self.file_output = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.use_colors = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_timestamp(mut self, enabled: bool) -> Self {
        self.show_timestamp = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_thread_id(mut self, enabled: bool) -> Self {
        self.show_thread_id = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_source_location(mut self, enabled: bool) -> Self {
        self.show_source_location = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_module(mut self, enabled: bool) -> Self {
        self.show_module = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_full_path(mut self, enabled: bool) -> Self {
        self.show_full_path = enabled;
        self
    }

    /// Coerce out-of-range values into their minimal legal form.
    pub fn normalize(&mut self) {
        if self.max_files == 0 {
            self.max_files = 1;
        }
        if self.max_file_size == 0 {
            self.max_file_size = 1;
        }
    }
}
