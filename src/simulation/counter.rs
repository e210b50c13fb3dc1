//! Shared highway distance counter
//!
//! Every vehicle worker adds to one [`SharedCounter`]. The counter supports
//! two increment strategies, chosen once per run:
//!
//! - [`CounterStrategy::Unserialized`] reads, yields, then writes back with
//!   no mutual exclusion. Concurrent callers lose updates. This is the
//!   hazard the simulation exists to show, so it is left racy on purpose.
//! - [`CounterStrategy::Serialized`] performs the same read-modify-write
//!   while holding a mutex, so no update is ever lost.
//!
//! The value lives in an atomic so that the racy path is a logical race
//! (lost updates) rather than undefined behaviour. Increments wrap on
//! overflow.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;

/// Synchronization discipline for counter increments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterStrategy {
    /// Plain read-modify-write; updates can be lost
    #[default]
    Unserialized,
    /// Read-modify-write under a mutex
    Serialized,
}

impl fmt::Display for CounterStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterStrategy::Unserialized => f.write_str("unserialized"),
            CounterStrategy::Serialized => f.write_str("serialized"),
        }
    }
}

type IncrementFn = fn(&SharedCounter, u64);

/// Process-wide distance accumulator shared by all vehicle workers
pub struct SharedCounter {
    value: AtomicU64,
    lock: Mutex<()>,
    strategy: CounterStrategy,
    increment_fn: IncrementFn,
}

impl SharedCounter {
    pub fn new(strategy: CounterStrategy) -> Self {
        let increment_fn: IncrementFn = match strategy {
            CounterStrategy::Unserialized => Self::increment_unserialized,
            CounterStrategy::Serialized => Self::increment_serialized,
        };
        Self {
            value: AtomicU64::new(0),
            lock: Mutex::new(()),
            strategy,
            increment_fn,
        }
    }

    pub fn strategy(&self) -> CounterStrategy {
        self.strategy
    }

    /// Add `delta` using this run's strategy
    pub fn increment(&self, delta: u64) {
        (self.increment_fn)(self, delta)
    }

    fn increment_unserialized(&self, delta: u64) {
        let current = self.value.load(Ordering::Relaxed);
        // Widen the window between read and write so the race shows up
        // even on a single core.
        thread::yield_now();
        self.value.store(current.wrapping_add(delta), Ordering::Relaxed);
    }

    fn increment_serialized(&self, delta: u64) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.value.load(Ordering::Relaxed);
        self.value.store(current.wrapping_add(delta), Ordering::Relaxed);
    }

    /// Current value; may trail increments still in flight
    pub fn read(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Zero the counter. Only meaningful while no worker is running.
    pub fn reset(&self) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.value.store(0, Ordering::Relaxed);
    }
}

impl Default for SharedCounter {
    fn default() -> Self {
        Self::new(CounterStrategy::default())
    }
}

impl fmt::Debug for SharedCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCounter")
            .field("value", &self.read())
            .field("strategy", &self.strategy)
            .finish()
    }
}
