//! Optional counters for observing a buffer's acquire/release traffic.
//!
//! A lock-free SPSC primitive has no business logging on its fast path, but
//! it still needs *some* observability surface; this is the teacher's
//! `Metrics`/`MetricsSnapshot` pattern, trimmed down to the one producer and
//! one consumer this buffer actually has.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct Metrics {
    write_acquires: AtomicU64,
    write_capacity_misses: AtomicU64,
    bytes_written: AtomicU64,
    write_wraps: AtomicU64,
    read_acquires: AtomicU64,
    read_empty: AtomicU64,
    bytes_read: AtomicU64,
    read_wraps: AtomicU64,
}

impl Metrics {
    pub(crate) fn record_write_acquire(&self, wrapped: bool) {
        self.write_acquires.fetch_add(1, Ordering::Relaxed);
        if wrapped {
            self.write_wraps.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_write_capacity_miss(&self) {
        self.write_capacity_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write_release(&self, bytes: usize) {
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_read_acquire(&self, wrapped: bool) {
        self.read_acquires.fetch_add(1, Ordering::Relaxed);
        if wrapped {
            self.read_wraps.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_read_empty(&self) {
        self.read_empty.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read_release(&self, bytes: usize) {
        self.bytes_read.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            write_acquires: self.write_acquires.load(Ordering::Relaxed),
            write_capacity_misses: self.write_capacity_misses.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            write_wraps: self.write_wraps.load(Ordering::Relaxed),
            read_acquires: self.read_acquires.load(Ordering::Relaxed),
            read_empty: self.read_empty.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            read_wraps: self.read_wraps.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of a buffer's counters.
///
/// Each field is loaded with `Relaxed` ordering independently, so a
/// snapshot taken concurrently with activity on the buffer is not a
/// consistent cut; it's meant for dashboards and logs, not for driving
/// program logic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Number of successful `write_acquire` calls.
    pub write_acquires: u64,
    /// Number of `write_acquire` calls that returned `None`.
    pub write_capacity_misses: u64,
    /// Total bytes committed via `write_release`.
    pub bytes_written: u64,
    /// Number of `write_acquire` calls that elected to wrap to the head.
    pub write_wraps: u64,
    /// Number of successful `read_acquire` calls.
    pub read_acquires: u64,
    /// Number of `read_acquire` calls that found the buffer empty.
    pub read_empty: u64,
    /// Total bytes released via `read_release`.
    pub bytes_read: u64,
    /// Number of `read_acquire` calls that wrapped to the head.
    pub read_wraps: u64,
}
