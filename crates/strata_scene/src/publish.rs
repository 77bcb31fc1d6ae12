//! Snapshot publishing.
//!
//! A [`Published`] cell holds the snapshot readers see. Writers build a
//! complete replacement off to the side and swap it in only after the build
//! succeeded, so readers never observe a partially built table. A failed
//! build leaves the cell untouched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use strata_core::Result;

/// Publish-by-replace cell for immutable snapshots.
pub struct Published<T> {
    current: RwLock<Option<Arc<T>>>,
    // Serializes writers; readers only take `current`.
    writer: Mutex<()>,
    generation: AtomicU64,
}

impl<T> Default for Published<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Published<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
            writer: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// [Read] Returns the current snapshot, if one was ever published.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<T>> {
        self.current.read().clone()
    }

    /// Number of successful publishes so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// [Write] Replaces the snapshot with `value`.
    pub fn publish(&self, value: T) -> Arc<T> {
        let _writer = self.writer.lock();
        self.swap_in(Arc::new(value))
    }

    /// [Write] Runs `build` and publishes its output only if it succeeds.
    ///
    /// On error the previous snapshot stays in effect and the error is returned.
    pub fn try_publish_with<F>(&self, build: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let _writer = self.writer.lock();
        let value = build()?;
        Ok(self.swap_in(Arc::new(value)))
    }

    fn swap_in(&self, value: Arc<T>) -> Arc<T> {
        let previous = self.current.write().replace(Arc::clone(&value));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        log::debug!(
            "Published snapshot generation {generation} (replaced: {})",
            previous.is_some()
        );
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{Error, Table};

    #[test]
    fn starts_empty() {
        let cell: Published<u32> = Published::new();
        assert!(cell.snapshot().is_none());
        assert_eq!(cell.generation(), 0);
    }

    #[test]
    fn publish_replaces_snapshot() {
        let cell = Published::new();
        cell.publish(1);
        let first = cell.snapshot().unwrap();
        cell.publish(2);

        // Readers holding the old snapshot keep it.
        assert_eq!(*first, 1);
        assert_eq!(*cell.snapshot().unwrap(), 2);
        assert_eq!(cell.generation(), 2);
    }

    #[test]
    fn failed_build_keeps_previous_snapshot() {
        let cell = Published::new();
        cell.publish(String::from("stable"));

        let result = cell.try_publish_with(|| Err(Error::out_of_range(Table::Node, 9, 2)));
        assert!(matches!(result, Err(Error::OutOfRange { .. })));
        assert_eq!(cell.snapshot().unwrap().as_str(), "stable");
        assert_eq!(cell.generation(), 1);
    }

    #[test]
    fn concurrent_readers_see_whole_snapshots() {
        let cell = Arc::new(Published::new());
        cell.publish(vec![0u32; 16]);

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cell = Arc::clone(&cell);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let snap = cell.snapshot().unwrap();
                        let first = snap[0];
                        assert!(snap.iter().all(|&v| v == first));
                    }
                })
            })
            .collect();

        for i in 1..50u32 {
            cell.publish(vec![i; 16]);
        }
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(cell.generation(), 50);
    }
}
