//! Log record structure and per-thread context

use super::level::Level;
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// Thread-local context so producers never contend for it. The thread id
// hash is computed once per thread; the module name is settable at any
// time and read on every emission.
thread_local! {
    static THREAD_ID_HASH: Cell<Option<u64>> = const { Cell::new(None) };
    static MODULE_NAME: RefCell<String> = RefCell::new(String::from("Default Module"));
}

/// Stable per-thread identifier: a hash of the platform thread id,
/// cached on first use.
pub(crate) fn current_thread_id() -> u64 {
    THREAD_ID_HASH.with(|cache| match cache.get() {
        Some(id) => id,
        None => {
            let mut hasher = DefaultHasher::new();
            std::thread::current().id().hash(&mut hasher);
            let id = hasher.finish();
            cache.set(Some(id));
            id
        }
    })
}

/// Set the module name attached to records emitted by the calling thread.
pub fn set_module(name: impl Into<String>) {
    MODULE_NAME.with(|module| *module.borrow_mut() = name.into());
}

pub(crate) fn current_module() -> String {
    MODULE_NAME.with(|module| module.borrow().clone())
}

/// Source location of a logging call, captured by the macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }
}

/// The unit of transport between a producer thread and the drain thread.
///
/// A record is movable, never copied: it is owned by exactly one ring
/// slot until popped, then by the drain batch until formatted.
#[derive(Debug)]
pub struct LogRecord {
    pub message: String,
    pub level: Level,
    pub timestamp: DateTime<Utc>,
    pub module: String,
    pub file: &'static str,
    pub line: u32,
    pub thread_id: u64,
}

impl LogRecord {
    pub fn new(level: Level, site: CallSite, message: String) -> Self {
        Self {
            message,
            level,
            timestamp: Utc::now(),
            module: current_module(),
            file: site.file,
            line: site.line,
            thread_id: current_thread_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_captures_call_site() {
        let record = LogRecord::new(Level::Info, CallSite::new("src/net.rs", 42), "up".into());
        assert_eq!(record.file, "src/net.rs");
        assert_eq!(record.line, 42);
        assert_eq!(record.level, Level::Info);
        assert_eq!(record.message, "up");
    }

    #[test]
    fn test_default_module_name() {
        let record = LogRecord::new(Level::Debug, CallSite::new("a.rs", 1), "x".into());
        assert_eq!(record.module, "Default Module");
    }

    #[test]
    fn test_set_module_is_thread_local() {
        set_module("worker");
        let record = LogRecord::new(Level::Debug, CallSite::new("a.rs", 1), "x".into());
        assert_eq!(record.module, "worker");

        let other = std::thread::spawn(|| {
            let record = LogRecord::new(Level::Debug, CallSite::new("a.rs", 1), "y".into());
            record.module
        })
        .join()
        .unwrap();
        assert_eq!(other, "Default Module");

        set_module("Default Module");
    }

    #[test]
    fn test_thread_id_stable_within_thread() {
        let a = current_thread_id();
        let b = current_thread_id();
        assert_eq!(a, b);

        let remote = std::thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(a, remote);
    }
}
