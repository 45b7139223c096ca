//! Asynchronous message transport: per-thread rings and their registry

pub mod registry;
pub mod ring;

pub use registry::BufferRegistry;
pub use ring::{ProducerBuffer, DEFAULT_CAPACITY};
