//! Console sink

use crate::core::level::{Level, COLOR_RESET};
use std::io::{self, Write};

/// Stdout writer. Records are color-wrapped individually (a batch may
/// mix levels) and the whole batch goes out in one write.
pub struct ConsoleSink {
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Append one formatted record line to the batch buffer, wrapped in
    /// the level's SGR sequence when colors are enabled.
    pub fn encode_record(&self, line: &str, level: Level, out: &mut Vec<u8>) {
        if self.use_colors {
            out.extend_from_slice(level.color().as_bytes());
            out.extend_from_slice(line.as_bytes());
            out.extend_from_slice(COLOR_RESET.as_bytes());
        } else {
            out.extend_from_slice(line.as_bytes());
        }
        out.push(b'\n');
    }

    /// Write an encoded batch to stdout and flush.
    pub fn write(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        let _ = handle.write_all(bytes);
        let _ = handle.flush();
    }
}
