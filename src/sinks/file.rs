//! Rotating file sink

use crate::core::config::Config;
use crate::core::error::{LoggerError, Result};
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Append-only log file writer with size-triggered rotation and
/// count-based retention.
///
/// Failures past initialization are absorbed: they are reported once on
/// the diagnostic stream and the sink keeps going with whatever file it
/// has. A failed write marks the sink degraded, suppressing repeat
/// diagnostics until a write succeeds again.
pub struct FileSink {
    dir: PathBuf,
    prefix: String,
    max_file_size: u64,
    max_files: usize,
    file: Option<File>,
    current_size: u64,
    degraded: bool,
}

impl FileSink {
    /// Open `{log_dir}/{file_prefix}.log` for append, creating the
    /// directory if needed. This is the only fallible path.
    pub fn new(config: &Config) -> Result<Self> {
        fs::create_dir_all(&config.log_dir)
            .map_err(|e| LoggerError::create_dir(&config.log_dir, e))?;

        let mut sink = Self {
            dir: config.log_dir.clone(),
            prefix: config.file_prefix.clone(),
            max_file_size: config.max_file_size,
            max_files: config.max_files,
            file: None,
            current_size: 0,
            degraded: false,
        };

        let path = sink.base_path();
        let file = Self::open_append(&path).map_err(|e| LoggerError::open_file(&path, e))?;
        sink.current_size = file.metadata().map(|m| m.len()).unwrap_or(0);
        sink.file = Some(file);
        Ok(sink)
    }

    fn base_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.prefix))
    }

    fn open_append(path: &Path) -> std::io::Result<File> {
        OpenOptions::new().create(true).append(true).open(path)
    }

    /// Append a pre-formatted batch in a single write.
    pub fn write(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let Some(file) = self.file.as_mut() else {
            return;
        };
        match file.write_all(bytes) {
            Ok(()) => {
                self.degraded = false;
                self.current_size += bytes.len() as u64;
            }
            Err(e) => {
                if !self.degraded {
                    eprintln!("blitzlog: file sink write failed: {}", e);
                    self.degraded = true;
                }
            }
        }
    }

    /// Rotate when the size threshold has been crossed.
    pub fn rotate_if_needed(&mut self) {
        if self.current_size >= self.max_file_size {
            self.rotate();
        }
    }

    /// Close the current file, rename it to a timestamped name, reopen
    /// the base name, and apply retention. Errors are reported and the
    /// sink continues with whatever file it can keep open.
    fn rotate(&mut self) {
        // Release the handle before the rename.
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }

        let base = self.base_path();
        if base.exists() {
            let target = self.rotation_target();
            if let Err(e) = fs::rename(&base, &target) {
                eprintln!(
                    "blitzlog: rotation rename to '{}' failed: {}",
                    target.display(),
                    e
                );
            }
        }

        match Self::open_append(&base) {
            Ok(file) => {
                self.file = Some(file);
                self.current_size = 0;
            }
            Err(e) => {
                eprintln!(
                    "blitzlog: failed to reopen '{}' after rotation: {}",
                    base.display(),
                    e
                );
                // Reset the counter anyway so a stuck rename does not
                // retrigger rotation on every batch.
                self.current_size = 0;
            }
        }

        self.apply_retention();
    }

    /// Timestamped rotation name, with a numeric suffix when two
    /// rotations land in the same second.
    fn rotation_target(&self) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let mut target = self.dir.join(format!("{}_{}.log", self.prefix, stamp));
        let mut attempt = 1;
        while target.exists() {
            target = self
                .dir
                .join(format!("{}_{}_{}.log", self.prefix, stamp, attempt));
            attempt += 1;
        }
        target
    }

    /// Delete the oldest `{prefix}*.log` files beyond `max_files`,
    /// newest-first by modification time, ties broken by filename
    /// descending so the outcome is deterministic.
    fn apply_retention(&mut self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!(
                    "blitzlog: retention scan of '{}' failed: {}",
                    self.dir.display(),
                    e
                );
                return;
            }
        };

        let mut matches: Vec<(SystemTime, String, PathBuf)> = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(&self.prefix) || !name.ends_with(".log") {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            matches.push((modified, name, entry.path()));
        }

        matches.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));

        for (_, _, path) in matches.iter().skip(self.max_files) {
            if let Err(e) = fs::remove_file(path) {
                eprintln!(
                    "blitzlog: failed to remove old log '{}': {}",
                    path.display(),
                    e
                );
            }
        }
    }

    pub fn flush(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
    }

    /// Bytes written since the last rotation.
    pub fn current_size(&self) -> u64 {
        self.current_size
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        self.flush();
    }
}
