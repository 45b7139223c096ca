//! # blitzlog
//!
//! A high-throughput, low-latency in-process logging library.
//!
//! Producer threads push records into private lock-free ring buffers and
//! return immediately; a single background thread drains every ring,
//! formats the records, and writes stdout and/or a size-rotated log
//! file.
//!
//! ## Features
//!
//! - **Wait-free emission**: one single-producer/single-consumer ring
//!   per thread, no locks on the hot path
//! - **Batched output**: one write syscall per sink per drain iteration
//! - **Rotation and retention**: timestamped rollover with a bounded
//!   file count
//! - **Lossless**: producers retry on a full ring and `shutdown()`
//!   drains every queued record
//!
//! ## Usage
//!
//! ```no_run
//! use blitzlog::{info, step, Config, Level};
//!
//! blitzlog::initialize(
//!     Config::default()
//!         .with_log_dir("logs")
//!         .with_min_level(Level::Debug),
//! )
//! .expect("logger init");
//!
//! blitzlog::set_module("startup");
//! step!(1, "configuration loaded");
//! info!("listening on port {}", 8080);
//!
//! blitzlog::shutdown();
//! ```

pub mod core;
pub mod macros;
pub mod sinks;
pub mod transport;

pub mod prelude {
    pub use crate::core::{
        initialize, logger, set_module, shutdown, CallSite, Config, Level, Logger, LoggerError,
        Result,
    };
}

pub use crate::core::{
    format_record, initialize, logger, set_module, shutdown, CallSite, Config, Level, LogRecord,
    Logger, LoggerError, Result, COLORS, COLOR_RESET,
};
pub use crate::sinks::{ConsoleSink, FileSink};
pub use crate::transport::{BufferRegistry, ProducerBuffer};
