//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ANSI SGR reset sequence appended after every colored record.
pub const COLOR_RESET: &str = "\x1b[0m";

/// Terminal color table, indexed by [`Level::color_index`].
pub const COLORS: [&str; 10] = [
    "\x1b[0m",    // reset
    "\x1b[30m",   // black
    "\x1b[31m",   // red
    "\x1b[32m",   // green
    "\x1b[33m",   // yellow
    "\x1b[34m",   // blue
    "\x1b[35m",   // magenta
    "\x1b[36m",   // cyan
    "\x1b[37m",   // white
    "\x1b[1;31m", // bold red
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warning = 3,
    Error = 4,
    Fatal = 5,
    Step = 6,
}

impl Level {
    /// Display token used in formatted output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Step => "STEP",
        }
    }

    /// Index into [`COLORS`] for this level.
    pub fn color_index(&self) -> usize {
        match self {
            Level::Trace => 7,   // cyan
            Level::Debug => 6,   // magenta
            Level::Info => 3,    // green
            Level::Warning => 4, // yellow
            Level::Error => 2,   // red
            Level::Fatal => 9,   // bold red
            Level::Step => 5,    // blue
        }
    }

    /// ANSI SGR prefix for this level.
    pub fn color(&self) -> &'static str {
        COLORS[self.color_index()]
    }

    /// Stable ordinal used for severity comparison.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    pub(crate) fn from_ordinal(ordinal: u8) -> Level {
        match ordinal {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warning,
            4 => Level::Error,
            5 => Level::Fatal,
            _ => Level::Step,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "FATAL" => Ok(Level::Fatal),
            "STEP" => Ok(Level::Step),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
