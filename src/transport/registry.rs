//! Registry connecting producer buffers to the drain thread

use super::ring::ProducerBuffer;
use parking_lot::Mutex;
use std::sync::Arc;

/// Ordered collection of live producer buffers.
///
/// Registration happens once per producer thread (on first emission) and
/// the consumer snapshots rarely compared to push/pop traffic, so a
/// short-held mutex around the list is all the coordination needed.
/// The registry holds a strong reference to every buffer, which keeps a
/// deactivated buffer drainable until the consumer has emptied it.
#[derive(Default)]
pub struct BufferRegistry {
    buffers: Mutex<Vec<Arc<ProducerBuffer>>>,
}

impl BufferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a buffer. Called by a producer thread on its first emission.
    pub fn register(&self, buffer: Arc<ProducerBuffer>) {
        self.buffers.lock().push(buffer);
    }

    /// Remove a buffer. Called by the drain thread once a deactivated
    /// buffer has been fully drained.
    pub fn unregister(&self, buffer: &Arc<ProducerBuffer>) {
        self.buffers
            .lock()
            .retain(|candidate| !Arc::ptr_eq(candidate, buffer));
    }

    /// Point-in-time view of the registered buffers, stable under
    /// concurrent registration and deregistration.
    pub fn snapshot(&self) -> Vec<Arc<ProducerBuffer>> {
        self.buffers.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.buffers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_register_and_snapshot() {
        let registry = BufferRegistry::new();
        let a = Arc::new(ProducerBuffer::new(8));
        let b = Arc::new(ProducerBuffer::new(8));

        registry.register(Arc::clone(&a));
        registry.register(Arc::clone(&b));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(Arc::ptr_eq(&snapshot[0], &a));
        assert!(Arc::ptr_eq(&snapshot[1], &b));
    }

    #[test]
    fn test_unregister_removes_only_target() {
        let registry = BufferRegistry::new();
        let a = Arc::new(ProducerBuffer::new(8));
        let b = Arc::new(ProducerBuffer::new(8));

        registry.register(Arc::clone(&a));
        registry.register(Arc::clone(&b));
        registry.unregister(&a);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(Arc::ptr_eq(&snapshot[0], &b));
    }

    #[test]
    fn test_snapshot_survives_unregister() {
        let registry = BufferRegistry::new();
        let a = Arc::new(ProducerBuffer::new(8));
        registry.register(Arc::clone(&a));

        let snapshot = registry.snapshot();
        registry.unregister(&a);

        // The consumer's copy keeps the buffer alive and drainable.
        assert_eq!(snapshot.len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_churn() {
        let registry = Arc::new(BufferRegistry::new());
        let mut handles = vec![];

        for _ in 0..4 {
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    let buffer = Arc::new(ProducerBuffer::new(8));
                    registry.register(Arc::clone(&buffer));
                    let _ = registry.snapshot();
                    registry.unregister(&buffer);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(registry.is_empty());
    }
}
