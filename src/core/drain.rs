//! Background drain loop
//!
//! The single consumer: it snapshots the registry, round-robins over the
//! producer buffers with a per-buffer quota so one chatty thread cannot
//! starve the rest, formats the batch into one contiguous buffer per
//! sink, and writes each sink once per batch.

use crate::core::config::Config;
use crate::core::formatter::format_record;
use crate::core::record::LogRecord;
use crate::sinks::{ConsoleSink, FileSink};
use crate::transport::BufferRegistry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Cap on records pulled per iteration across all buffers.
pub(crate) const BATCH_SIZE: usize = 16_384;

/// Sub-batch size used while draining everything at shutdown.
const SHUTDOWN_BATCH_SIZE: usize = 4_096;

/// Idle sleep when no records were obtained.
const IDLE_SLEEP: Duration = Duration::from_micros(100);

/// Shorter sleep when a producer is close to overflowing.
const BUSY_SLEEP: Duration = Duration::from_micros(10);

const OUTPUT_BUFFER_CAPACITY: usize = 1024 * 1024;

pub(crate) struct DrainLoop {
    config: Arc<Config>,
    registry: Arc<BufferRegistry>,
    running: Arc<AtomicBool>,
    file: Option<FileSink>,
    console: Option<ConsoleSink>,
    batch: Vec<LogRecord>,
    line: String,
    file_buf: Vec<u8>,
    console_buf: Vec<u8>,
}

impl DrainLoop {
    pub(crate) fn new(
        config: Arc<Config>,
        registry: Arc<BufferRegistry>,
        running: Arc<AtomicBool>,
        file: Option<FileSink>,
        console: Option<ConsoleSink>,
    ) -> Self {
        Self {
            config,
            registry,
            running,
            file,
            console,
            batch: Vec::with_capacity(BATCH_SIZE),
            line: String::with_capacity(256),
            file_buf: Vec::with_capacity(OUTPUT_BUFFER_CAPACITY),
            console_buf: Vec::with_capacity(OUTPUT_BUFFER_CAPACITY),
        }
    }

    /// Consume until the running flag clears, then drain every buffer
    /// fully and flush the file sink.
    pub(crate) fn run(&mut self) {
        loop {
            let (got_records, nearly_full) = self.drain_once();

            if !got_records {
                thread::sleep(if nearly_full { BUSY_SLEEP } else { IDLE_SLEEP });
            }

            if !self.running.load(Ordering::Acquire) {
                break;
            }
        }

        self.drain_remaining();
        if let Some(file) = self.file.as_mut() {
            file.flush();
        }
    }

    /// One iteration: pull up to [`BATCH_SIZE`] records round-robin and
    /// write them out. Returns whether anything was obtained and whether
    /// any producer is close to overflowing.
    fn drain_once(&mut self) -> (bool, bool) {
        let buffers = self.registry.snapshot();
        let quota = BATCH_SIZE / buffers.len().max(1);
        let mut nearly_full = false;

        for buffer in &buffers {
            for _ in 0..quota {
                match buffer.pop() {
                    Some(record) => self.batch.push(record),
                    None => break,
                }
            }
            nearly_full |= buffer.nearly_full();
            if self.batch.len() >= BATCH_SIZE {
                break;
            }
        }

        // A deactivated buffer stays registered until drained so records
        // emitted just before thread exit are not lost.
        for buffer in &buffers {
            if !buffer.is_active() && buffer.is_empty() {
                self.registry.unregister(buffer);
            }
        }

        let got_records = !self.batch.is_empty();
        if got_records {
            self.flush_batch();
        }
        (got_records, nearly_full)
    }

    /// Shutdown path: empty every buffer, flushing in sub-batches.
    fn drain_remaining(&mut self) {
        let buffers = self.registry.snapshot();
        for buffer in &buffers {
            while let Some(record) = buffer.pop() {
                self.batch.push(record);
                if self.batch.len() >= SHUTDOWN_BATCH_SIZE {
                    self.flush_batch();
                }
            }
        }
        if !self.batch.is_empty() {
            self.flush_batch();
        }
    }

    /// Format the batch into the per-sink buffers and write each sink
    /// once, file before console.
    fn flush_batch(&mut self) {
        let mut batch = std::mem::take(&mut self.batch);
        self.file_buf.clear();
        self.console_buf.clear();

        for record in &batch {
            self.line.clear();
            format_record(&self.config, record, &mut self.line);

            if self.file.is_some() {
                self.file_buf.extend_from_slice(self.line.as_bytes());
                self.file_buf.push(b'\n');
            }
            if let Some(console) = &self.console {
                console.encode_record(&self.line, record.level, &mut self.console_buf);
            }
        }

        if let Some(file) = self.file.as_mut() {
            file.write(&self.file_buf);
            file.rotate_if_needed();
        }
        if let Some(console) = self.console.as_mut() {
            console.write(&self.console_buf);
        }

        batch.clear();
        self.batch = batch;
    }

    /// Best-effort flush used after a drain-thread panic.
    pub(crate) fn recover_flush(&mut self) {
        if let Some(file) = self.file.as_mut() {
            file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::core::record::CallSite;
    use crate::transport::ProducerBuffer;
    use std::fs;
    use tempfile::tempdir;

    fn test_setup(dir: &std::path::Path) -> (DrainLoop, Arc<BufferRegistry>) {
        let config = Arc::new(
            Config::new()
                .with_log_dir(dir)
                .with_file_prefix("drain")
                .with_timestamp(false)
                .with_console_output(false),
        );
        let registry = Arc::new(BufferRegistry::new());
        let running = Arc::new(AtomicBool::new(true));
        let file = FileSink::new(&config).unwrap();
        let drain = DrainLoop::new(
            Arc::clone(&config),
            Arc::clone(&registry),
            running,
            Some(file),
            None,
        );
        (drain, registry)
    }

    fn push(buffer: &ProducerBuffer, message: &str) {
        let record = LogRecord::new(Level::Info, CallSite::new("drain.rs", 1), message.into());
        buffer.push(record).unwrap();
    }

    #[test]
    fn test_drain_once_writes_batch() {
        let dir = tempdir().unwrap();
        let (mut drain, registry) = test_setup(dir.path());

        let buffer = Arc::new(ProducerBuffer::new(16));
        registry.register(Arc::clone(&buffer));
        push(&buffer, "one");
        push(&buffer, "two");

        let (got, _) = drain.drain_once();
        assert!(got);
        drain.recover_flush();

        let content = fs::read_to_string(dir.path().join("drain.log")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("one"));
        assert!(lines[1].ends_with("two"));
    }

    #[test]
    fn test_drain_once_reports_idle() {
        let dir = tempdir().unwrap();
        let (mut drain, registry) = test_setup(dir.path());
        registry.register(Arc::new(ProducerBuffer::new(16)));

        let (got, nearly_full) = drain.drain_once();
        assert!(!got);
        assert!(!nearly_full);
    }

    #[test]
    fn test_deactivated_buffer_drained_then_pruned() {
        let dir = tempdir().unwrap();
        let (mut drain, registry) = test_setup(dir.path());

        let buffer = Arc::new(ProducerBuffer::new(16));
        registry.register(Arc::clone(&buffer));
        push(&buffer, "parting");
        buffer.deactivate();

        // The same pass drains the leftover record first, so nothing is
        // lost, then prunes the now-empty inactive buffer.
        let (got, _) = drain.drain_once();
        assert!(got);
        assert!(registry.is_empty());

        drain.recover_flush();
        let content = fs::read_to_string(dir.path().join("drain.log")).unwrap();
        assert!(content.contains("parting"));
    }

    #[test]
    fn test_drain_remaining_empties_everything() {
        let dir = tempdir().unwrap();
        let (mut drain, registry) = test_setup(dir.path());

        let buffer = Arc::new(ProducerBuffer::new(1 << 10));
        registry.register(Arc::clone(&buffer));
        for i in 0..500 {
            push(&buffer, &format!("msg {}", i));
        }

        drain.drain_remaining();
        drain.recover_flush();

        let content = fs::read_to_string(dir.path().join("drain.log")).unwrap();
        assert_eq!(content.lines().count(), 500);
        assert!(buffer.is_empty());
    }
}
