//! Logging macros for ergonomic log message formatting.
//!
//! The macros expand format arguments at the call site, capture the
//! source location with `file!()`/`line!()`, and consult the severity
//! filter before any formatting work happens. They are no-ops until
//! [`initialize`](crate::initialize) has installed the process-wide
//! logger.
//!
//! # Examples
//!
//! ```no_run
//! use blitzlog::{info, warning, Config};
//!
//! blitzlog::initialize(Config::default()).unwrap();
//!
//! info!("Server listening on port {}", 8080);
//! warning!("Retry attempt {} of {}", 3, 5);
//!
//! blitzlog::shutdown();
//! ```

/// Log a message at an explicit level with automatic formatting.
///
/// # Examples
///
/// ```no_run
/// # blitzlog::initialize(blitzlog::Config::default()).unwrap();
/// use blitzlog::{log, Level};
/// log!(Level::Info, "Simple message");
/// log!(Level::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)+) => {{
        if let Some(__logger) = $crate::logger() {
            let __level = $level;
            if __logger.enabled(__level) {
                __logger.log(
                    __level,
                    $crate::CallSite::new(file!(), line!()),
                    format!($($arg)+),
                );
            }
        }
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Fatal, $($arg)+)
    };
}

/// Log a step marker: `step!(2, "load {}", name)` emits a STEP record
/// whose message is prefixed with `[Step 2] `.
#[macro_export]
macro_rules! step {
    ($n:expr, $($arg:tt)+) => {{
        if let Some(__logger) = $crate::logger() {
            if __logger.enabled($crate::Level::Step) {
                __logger.step(
                    $n,
                    $crate::CallSite::new(file!(), line!()),
                    format!($($arg)+),
                );
            }
        }
    }};
}
