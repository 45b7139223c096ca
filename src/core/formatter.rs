//! Log line formatting
//!
//! Renders a record into the line grammar consumed by external tooling:
//!
//! ```text
//! [2025-01-08 10:30:45.123] [INFO] [T-140243] [Default Module] [main.rs:42] message
//! ```
//!
//! Field visibility follows the configuration; a disabled field removes
//! its brackets and the trailing space. The formatter never fails: a
//! field that cannot be rendered is replaced with `<?>`.

use super::config::Config;
use super::record::LogRecord;
use chrono::Local;
use std::fmt::Write;

/// Append the formatted record (no trailing newline) to `out`.
pub fn format_record(config: &Config, record: &LogRecord, out: &mut String) {
    if config.show_timestamp {
        out.push('[');
        let local = record.timestamp.with_timezone(&Local);
        if write!(out, "{}", local.format("%Y-%m-%d %H:%M:%S%.3f")).is_err() {
            out.push_str("<?>");
        }
        out.push_str("] ");
    }

    out.push('[');
    out.push_str(record.level.as_str());
    out.push_str("] ");

    if config.show_thread_id {
        out.push_str("[T-");
        if write!(out, "{}", record.thread_id).is_err() {
            out.push_str("<?>");
        }
        out.push_str("] ");
    }

    if config.show_module && !record.module.is_empty() {
        out.push('[');
        out.push_str(&record.module);
        out.push_str("] ");
    }

    if config.show_source_location {
        out.push('[');
        out.push_str(display_path(config, record.file));
        out.push(':');
        if write!(out, "{}", record.line).is_err() {
            out.push_str("<?>");
        }
        out.push_str("] ");
    }

    out.push_str(&record.message);
}

/// Reduce the source path to its basename unless full paths are requested.
fn display_path<'a>(config: &Config, file: &'a str) -> &'a str {
    if config.show_full_path {
        file
    } else {
        file.rsplit(['/', '\\']).next().unwrap_or(file)
    }
}
