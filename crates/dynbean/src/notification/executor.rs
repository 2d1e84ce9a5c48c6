// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Executors running notification delivery tasks.
//!
//! `WorkerPool` is the default: a fixed set of named threads, each fed by an
//! unbounded crossbeam channel. Tasks carry a shard key; every task with the
//! same key lands on the same worker, so a single subscription observes its
//! notifications in publish order.

use crate::config::NotifierConfig;
use crate::error::Result;
use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

/// A unit of work submitted to an executor.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs notification delivery tasks.
pub trait Executor: Send + Sync {
    /// Run `task`. Tasks submitted with the same `key` must run in
    /// submission order.
    fn execute(&self, key: u64, task: Task);

    /// Stop accepting tasks, drain what is queued and release resources.
    fn shutdown(&self) {}
}

/// Runs every task on the caller's thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, _key: u64, task: Task) {
        task();
    }
}

/// Fixed-size pool of delivery threads sharded by task key.
pub struct WorkerPool {
    senders: RwLock<Vec<Sender<Task>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    name: String,
}

impl WorkerPool {
    /// Spawn `workers` threads named `<thread_name>-<n>`.
    pub fn new(workers: usize, thread_name: &str) -> Result<Self> {
        let workers = workers.max(1);
        let mut senders = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);

        for i in 0..workers {
            let (tx, rx) = unbounded::<Task>();
            let name = format!("{}-{}", thread_name, i);
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || Self::run_worker(rx))?;
            log::debug!("[WorkerPool::new] spawned {}", name);
            senders.push(tx);
            handles.push(handle);
        }

        Ok(Self {
            senders: RwLock::new(senders),
            handles: Mutex::new(handles),
            name: thread_name.to_string(),
        })
    }

    /// Build from notifier settings.
    pub fn with_config(config: &NotifierConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.workers, &config.thread_name)
    }

    /// Number of live worker threads (0 after shutdown).
    pub fn workers(&self) -> usize {
        self.senders.read().len()
    }

    fn run_worker(rx: Receiver<Task>) {
        // Loop ends once every sender is dropped and the queue is drained.
        for task in rx.iter() {
            if catch_unwind(AssertUnwindSafe(task)).is_err() {
                log::warn!("[WorkerPool::run_worker] task panicked");
            }
        }
    }
}

impl Executor for WorkerPool {
    fn execute(&self, key: u64, task: Task) {
        let senders = self.senders.read();
        if senders.is_empty() {
            log::debug!("[WorkerPool::execute] {} is shut down, task dropped", self.name);
            return;
        }
        let shard = (key % senders.len() as u64) as usize;
        if senders[shard].send(task).is_err() {
            log::debug!("[WorkerPool::execute] worker {} gone, task dropped", shard);
        }
    }

    fn shutdown(&self) {
        // Dropping the senders closes the channels; workers drain and exit.
        let senders = std::mem::take(&mut *self.senders.write());
        drop(senders);

        let handles = std::mem::take(&mut *self.handles.lock());
        let current = thread::current().id();
        for handle in handles {
            // A listener may drop the last registry handle from a worker.
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                log::warn!("[WorkerPool::shutdown] {} worker panicked", self.name);
            }
        }
        log::debug!("[WorkerPool::shutdown] {} stopped", self.name);
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("name", &self.name)
            .field("workers", &self.workers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn inline_runs_immediately() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        InlineExecutor.execute(
            0,
            Box::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn pool_preserves_per_key_order() {
        let pool = WorkerPool::new(3, "test-pool").expect("spawn pool");
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        for i in 0..100u64 {
            let seen = seen.clone();
            pool.execute(7, Box::new(move || seen.lock().push(i)));
        }
        pool.shutdown();
        let seen = seen.lock();
        assert_eq!(*seen, (0..100u64).collect::<Vec<_>>());
    }

    #[test]
    fn pool_survives_panicking_task() {
        let pool = WorkerPool::new(1, "test-panic").expect("spawn pool");
        let hits = Arc::new(AtomicUsize::new(0));
        pool.execute(0, Box::new(|| panic!("listener bug")));
        let h = hits.clone();
        pool.execute(
            0,
            Box::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }),
        );
        pool.shutdown();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(pool.workers(), 0);
    }

    #[test]
    fn execute_after_shutdown_is_dropped() {
        let pool = WorkerPool::new(1, "test-closed").expect("spawn pool");
        pool.shutdown();
        pool.execute(0, Box::new(|| panic!("must not run")));
    }
}
