//! Main logger facade
//!
//! A [`Logger`] is an explicitly owned object: it opens the sinks, owns
//! the buffer registry, and runs the drain thread from construction to
//! [`Logger::shutdown`]. [`initialize`] installs one instance into a
//! process-wide handle for the logging macros; producer threads find
//! their ring through the instance's registry, never through a bare
//! global pointer.

use super::config::Config;
use super::drain::DrainLoop;
use super::error::{LoggerError, Result};
use super::level::Level;
use super::record::{self, CallSite, LogRecord};
use crate::sinks::{ConsoleSink, FileSink};
use crate::transport::{BufferRegistry, ProducerBuffer};
use parking_lot::Mutex;
use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};

/// Spin attempts on a full ring before falling back to yielding.
const SPIN_RETRIES: usize = 64;

static INSTANCE: OnceLock<Logger> = OnceLock::new();
static NEXT_LOGGER_ID: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    // One transport ring per (thread, logger) pair, registered lazily on
    // the first emission and deactivated when the thread exits.
    static PRODUCERS: RefCell<Vec<ProducerSlot>> = const { RefCell::new(Vec::new()) };
}

struct ProducerSlot {
    logger_id: usize,
    guard: ProducerGuard,
}

struct ProducerGuard {
    buffer: Arc<ProducerBuffer>,
}

impl Drop for ProducerGuard {
    fn drop(&mut self) {
        // Thread teardown: stop advertising the ring. The drain thread
        // empties it one more time before dropping it from the registry.
        self.buffer.deactivate();
    }
}

pub struct Logger {
    id: usize,
    config: Arc<Config>,
    min_level: AtomicU8,
    registry: Arc<BufferRegistry>,
    running: Arc<AtomicBool>,
    drain_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Logger {
    /// Open the configured sinks and start the drain thread.
    ///
    /// # Errors
    ///
    /// Fails only when the log directory cannot be created or the log
    /// file cannot be opened.
    pub fn new(mut config: Config) -> Result<Self> {
        config.normalize();

        let file = if config.file_output {
            Some(FileSink::new(&config)?)
        } else {
            None
        };
        let console = if config.console_output {
            Some(ConsoleSink::new(config.use_colors))
        } else {
            None
        };

        let min_level = AtomicU8::new(config.min_level.ordinal());
        let config = Arc::new(config);
        let registry = Arc::new(BufferRegistry::new());
        let running = Arc::new(AtomicBool::new(true));

        let mut drain = DrainLoop::new(
            Arc::clone(&config),
            Arc::clone(&registry),
            Arc::clone(&running),
            file,
            console,
        );
        let handle = thread::spawn(move || {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| drain.run())) {
                eprintln!(
                    "blitzlog: drain thread panicked: {}",
                    panic_message(&panic)
                );
                drain.recover_flush();
            }
        });

        Ok(Self {
            id: NEXT_LOGGER_ID.fetch_add(1, Ordering::Relaxed),
            config,
            min_level,
            registry,
            running,
            drain_handle: Mutex::new(Some(handle)),
        })
    }

    /// Signal the drain thread, wait for it to empty every buffer, and
    /// close the file. Idempotent; the second call is a no-op.
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::Release);
        let handle = self.drain_handle.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                eprintln!("blitzlog: drain thread terminated abnormally during shutdown");
            }
        }
    }

    /// True when records at `level` pass the severity filter.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level.ordinal() >= self.min_level.load(Ordering::Relaxed)
    }

    /// Set the global minimum severity.
    pub fn set_level(&self, level: Level) {
        self.min_level.store(level.ordinal(), Ordering::Relaxed);
    }

    pub fn get_level(&self) -> Level {
        Level::from_ordinal(self.min_level.load(Ordering::Relaxed))
    }

    /// Set the module name for records emitted by the calling thread.
    pub fn set_module(&self, name: impl Into<String>) {
        record::set_module(name);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Emit a record. The message is expected to be fully expanded; the
    /// macros handle format arguments and call-site capture.
    pub fn log(&self, level: Level, site: CallSite, message: impl Into<String>) {
        if !self.enabled(level) {
            return;
        }
        self.push_record(LogRecord::new(level, site, message.into()));
    }

    #[inline]
    pub fn trace(&self, site: CallSite, message: impl Into<String>) {
        self.log(Level::Trace, site, message);
    }

    #[inline]
    pub fn debug(&self, site: CallSite, message: impl Into<String>) {
        self.log(Level::Debug, site, message);
    }

    #[inline]
    pub fn info(&self, site: CallSite, message: impl Into<String>) {
        self.log(Level::Info, site, message);
    }

    #[inline]
    pub fn warning(&self, site: CallSite, message: impl Into<String>) {
        self.log(Level::Warning, site, message);
    }

    #[inline]
    pub fn error(&self, site: CallSite, message: impl Into<String>) {
        self.log(Level::Error, site, message);
    }

    #[inline]
    pub fn fatal(&self, site: CallSite, message: impl Into<String>) {
        self.log(Level::Fatal, site, message);
    }

    /// Emit a step marker: the message is prefixed with `[Step n] `.
    pub fn step(&self, n: usize, site: CallSite, message: impl Into<String>) {
        if !self.enabled(Level::Step) {
            return;
        }
        let message = format!("[Step {}] {}", n, message.into());
        self.push_record(LogRecord::new(Level::Step, site, message));
    }

    /// Push into the calling thread's ring, creating and registering it
    /// on first use. A full ring is retried until the push lands: spin
    /// briefly, then yield between attempts. Records are never dropped.
    fn push_record(&self, mut record: LogRecord) {
        let buffer = self.producer_buffer();

        let mut attempts = 0usize;
        loop {
            match buffer.push(record) {
                Ok(()) => return,
                Err(returned) => {
                    record = returned;
                    if attempts < SPIN_RETRIES {
                        attempts += 1;
                        std::hint::spin_loop();
                    } else {
                        thread::yield_now();
                    }
                }
            }
        }
    }

    fn producer_buffer(&self) -> Arc<ProducerBuffer> {
        PRODUCERS.with(|slots| {
            let mut slots = slots.borrow_mut();
            if let Some(slot) = slots.iter().find(|s| s.logger_id == self.id) {
                return Arc::clone(&slot.guard.buffer);
            }

            let buffer = Arc::new(ProducerBuffer::with_default_capacity());
            self.registry.register(Arc::clone(&buffer));
            slots.push(ProducerSlot {
                logger_id: self.id,
                guard: ProducerGuard {
                    buffer: Arc::clone(&buffer),
                },
            });
            buffer
        })
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("unknown panic")
    }
}

/// Install a logger into the process-wide handle used by the macros.
///
/// # Errors
///
/// Returns [`LoggerError::AlreadyInitialized`] on the second call, or an
/// initialization error when the sinks cannot be opened.
pub fn initialize(config: Config) -> Result<&'static Logger> {
    let logger = Logger::new(config)?;
    match INSTANCE.set(logger) {
        Ok(()) => Ok(INSTANCE.get().expect("instance installed by this call")),
        Err(extra) => {
            extra.shutdown();
            Err(LoggerError::AlreadyInitialized)
        }
    }
}

/// The process-wide logger, if [`initialize`] has been called.
pub fn logger() -> Option<&'static Logger> {
    INSTANCE.get()
}

/// Stop the process-wide logger, draining all queued records first.
pub fn shutdown() {
    if let Some(logger) = logger() {
        logger.shutdown();
    }
}
