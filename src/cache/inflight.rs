//! Per-key fetch locks
//!
//! Concurrent loads of the same source must not fetch it twice. Each cache
//! entry path maps to an async mutex; the first caller holds it for the whole
//! fetch, later callers wait on it and then find the finished entry.
//!
//! The lock is held through an owned [`EntryGuard`] so a fetch running on a
//! blocking thread keeps it even after the caller that started it goes away.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OwnedMutexGuard;

/// Lock for one entry and how many callers hold or wait for it
#[derive(Debug)]
struct Slot {
    lock: Arc<tokio::sync::Mutex<()>>,
    users: usize,
}

type LockTable = Mutex<HashMap<PathBuf, Slot>>;

/// Table of per-entry locks
#[derive(Debug, Default)]
pub struct InFlight {
    locks: Arc<LockTable>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to an entry.
    ///
    /// The table forgets the entry once the last guard or waiter for it is
    /// dropped, including waiters that are cancelled before they get the lock.
    pub async fn acquire(&self, entry: &Path) -> EntryGuard {
        let lock = {
            let mut locks = self.locks.lock();
            let slot = locks.entry(entry.to_path_buf()).or_insert_with(|| Slot {
                lock: Arc::new(tokio::sync::Mutex::new(())),
                users: 0,
            });
            slot.users += 1;
            Arc::clone(&slot.lock)
        };
        let mut held = EntryGuard {
            entry: entry.to_path_buf(),
            guard: None,
            table: Arc::clone(&self.locks),
        };
        held.guard = Some(lock.lock_owned().await);
        held
    }

    /// Number of tracked entries
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive access to one cache entry, released on drop
#[derive(Debug)]
pub struct EntryGuard {
    entry: PathBuf,
    guard: Option<OwnedMutexGuard<()>>,
    table: Arc<LockTable>,
}

impl Drop for EntryGuard {
    fn drop(&mut self) {
        let mut locks = self.table.lock();
        self.guard.take();
        if let Some(slot) = locks.get_mut(&self.entry) {
            slot.users = slot.users.saturating_sub(1);
            if slot.users == 0 {
                locks.remove(&self.entry);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_entries_are_tracked_separately() {
        let table = InFlight::new();
        let a = table.acquire(Path::new("/cache/a")).await;
        let c = table.acquire(Path::new("/cache/c")).await;
        assert_eq!(table.len(), 2);

        drop(a);
        assert_eq!(table.len(), 1);
        drop(c);
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_entry_kept_while_someone_waits() {
        let table = InFlight::new();
        let first = table.acquire(Path::new("/cache/a")).await;
        let mut second = Box::pin(table.acquire(Path::new("/cache/a")));
        assert!(futures::poll!(&mut second).is_pending());

        drop(first);
        assert_eq!(table.len(), 1);

        drop(second.await);
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_waiter_does_not_leak_entry() {
        let table = InFlight::new();
        let first = table.acquire(Path::new("/cache/a")).await;
        let mut waiter = Box::pin(table.acquire(Path::new("/cache/a")));
        assert!(futures::poll!(&mut waiter).is_pending());

        drop(waiter);
        assert_eq!(table.len(), 1);
        drop(first);
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_guard_moves_to_blocking_thread() {
        let table = InFlight::new();
        let guard = table.acquire(Path::new("/cache/a")).await;

        let mut next = Box::pin(table.acquire(Path::new("/cache/a")));
        assert!(futures::poll!(&mut next).is_pending());

        tokio::task::spawn_blocking(move || drop(guard))
            .await
            .expect("join");
        drop(next.await);
        assert!(table.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_lock_serializes_holders() {
        let table = Arc::new(InFlight::new());
        let active = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let table = Arc::clone(&table);
            let active = Arc::clone(&active);
            let max_seen = Arc::clone(&max_seen);
            tasks.push(tokio::spawn(async move {
                let _guard = table.acquire(Path::new("/cache/shared")).await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                active.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for task in tasks {
            task.await.expect("task");
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }
}
