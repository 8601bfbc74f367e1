//! Stack-allocated, const-generic sibling of [`crate::BipartiteBuffer`].
//!
//! Grounded on the teacher's `StackRing<T, N>`: the backing storage is
//! embedded directly in the struct instead of borrowed, so the instance can
//! live on the stack (or inside a `static`) with no allocation and no
//! lifetime parameter tying it to a caller-owned slice.
//!
//! Like the teacher's stack variant, this exposes the four operations
//! directly rather than through [`crate::reservation`]'s RAII guards: a
//! `Reservation<'a>` borrowing `self` while `self` is a `[u8; N]` embedded
//! value (not a separately owned allocation) adds a lifetime parameter for
//! no benefit here, so the raw acquire/release pairing, exactly the shape
//! spec.md §4 describes, is the public API instead.

use std::cell::{Cell, UnsafeCell};
use std::sync::atomic::Ordering;

use crate::config::{violate, Config, ContractViolation, MetricsGate};
use crate::invariants::{
    debug_assert_index_bounded, debug_assert_invalidate_ahead, debug_assert_reservation,
};
use crate::layout::Index;
use crate::metrics::{Metrics, MetricsSnapshot};

/// A lock-free SPSC bipartite byte buffer with storage embedded in the
/// struct itself.
///
/// `N` must be at least 2: one byte is reserved to disambiguate empty from
/// full (spec.md §3, invariant 2), so a `StackBipartiteBuffer<1, _>` could
/// never hold data. This is enforced at construction time via
/// [`StackBipartiteBuffer::new`]'s panic rather than a `where` bound, since
/// stable Rust cannot express `N >= 2` as a const-generic constraint.
pub struct StackBipartiteBuffer<const N: usize> {
    data: UnsafeCell<[u8; N]>,
    r: Index,
    w: Index,
    i: Index,
    write_wrapped: Cell<bool>,
    read_wrapped: Cell<bool>,
    metrics: Metrics,
    metrics_gate: MetricsGate,
}

// Safety: same reasoning as `BipartiteBuffer`. The atomics carry
// cross-thread visibility, and `write_wrapped`/`read_wrapped` are each
// touched only from their owning side by protocol.
unsafe impl<const N: usize> Send for StackBipartiteBuffer<N> {}
unsafe impl<const N: usize> Sync for StackBipartiteBuffer<N> {}

impl<const N: usize> StackBipartiteBuffer<N> {
    /// Creates a new, empty instance.
    ///
    /// # Panics
    ///
    /// Panics if `N < 2`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Like [`StackBipartiteBuffer::new`], with explicit [`Config`].
    ///
    /// # Panics
    ///
    /// Panics if `N < 2`.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        assert!(N >= 2, "StackBipartiteBuffer capacity must be at least 2");
        Self {
            data: UnsafeCell::new([0u8; N]),
            r: Index::new(std::sync::atomic::AtomicUsize::new(0)),
            w: Index::new(std::sync::atomic::AtomicUsize::new(0)),
            i: Index::new(std::sync::atomic::AtomicUsize::new(0)),
            write_wrapped: Cell::new(false),
            read_wrapped: Cell::new(false),
            metrics: Metrics::default(),
            metrics_gate: MetricsGate::new(config.metrics),
        }
    }

    /// Returns the capacity `N`.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Returns a snapshot of this instance's metrics counters.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.metrics_gate.enabled() {
            self.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }

    #[inline]
    fn data_ptr(&self) -> *mut u8 {
        self.data.get().cast::<u8>()
    }

    #[inline]
    fn free_space(w: usize, r: usize) -> usize {
        if r > w {
            r - w - 1
        } else {
            N - (w - r) - 1
        }
    }

    /// Producer-side: requests a contiguous writable region of at least `n`
    /// bytes. Returns `None` if unavailable. Must be paired with exactly one
    /// [`StackBipartiteBuffer::write_release`] call before the next acquire.
    ///
    /// # Safety invariant
    ///
    /// The protocol (spec.md §4) guarantees the producer is the sole owner
    /// of `[w, w+n)` until the matching `write_release`, and the consumer
    /// never touches that range, so handing out `&mut [u8]` from `&self`
    /// never aliases a reader's slice.
    #[allow(clippy::mut_from_ref)]
    pub fn write_acquire(&self, n: usize) -> Option<&mut [u8]> {
        if n == 0 || n > N - 1 {
            self.record_write_miss();
            return None;
        }

        let w = self.w.load(Ordering::Relaxed);
        let r = self.r.load(Ordering::Acquire);
        debug_assert_index_bounded!("w", w, N);
        debug_assert_index_bounded!("r", r, N);

        let free = Self::free_space(w, r);
        debug_assert_reservation!(free, N);
        let linear_free = free.min(N - w);

        if n <= linear_free {
            self.record_write_acquire(false);
            // Safety: [w, w + n) is free until the matching write_release.
            return Some(unsafe { std::slice::from_raw_parts_mut(self.data_ptr().add(w), n) });
        }

        if n <= free - linear_free {
            self.write_wrapped.set(true);
            self.record_write_acquire(true);
            // Safety: the head region [0, n) is free by the same argument.
            return Some(unsafe { std::slice::from_raw_parts_mut(self.data_ptr(), n) });
        }

        self.record_write_miss();
        None
    }

    /// Publishes the first `k` bytes of the most recently acquired write
    /// region to the consumer.
    pub fn write_release(&self, k: usize) {
        let mut w = self.w.load(Ordering::Relaxed);
        let mut i = self.i.load(Ordering::Relaxed);

        if self.write_wrapped.get() {
            self.write_wrapped.set(false);
            i = w;
            w = 0;
        }

        let new_w = w + k;
        if new_w > N {
            violate(ContractViolation::IndexExceedsCapacity {
                index: new_w,
                capacity: N,
            });
        }
        w = new_w;

        if w > i {
            i = w;
        }
        debug_assert_invalidate_ahead!(i, w);

        if w == N {
            w = 0;
        }
        debug_assert_index_bounded!("w", w, N);

        self.i.store(i, Ordering::Relaxed);
        self.w.store(w, Ordering::Release);
        self.record_write_release(k);
    }

    /// Consumer-side: returns the next contiguous readable region, or `None`
    /// if empty. Must be paired with exactly one
    /// [`StackBipartiteBuffer::read_release`] call before the next acquire.
    pub fn read_acquire(&self) -> Option<&[u8]> {
        let r = self.r.load(Ordering::Relaxed);
        let w = self.w.load(Ordering::Acquire);
        debug_assert_index_bounded!("r", r, N);
        debug_assert_index_bounded!("w", w, N);

        if r == w {
            self.record_read_empty();
            return None;
        }

        if r < w {
            let available = w - r;
            self.record_read_acquire(false);
            // Safety: published by the producer's Release store on `w`.
            return Some(unsafe { std::slice::from_raw_parts(self.data_ptr().add(r), available) });
        }

        let i = self.i.load(Ordering::Relaxed);
        if r == i {
            self.read_wrapped.set(true);
            self.record_read_acquire(true);
            // Safety: published the same way.
            return Some(unsafe { std::slice::from_raw_parts(self.data_ptr(), w) });
        }

        let available = i - r;
        self.record_read_acquire(false);
        // Safety: published the same way.
        Some(unsafe { std::slice::from_raw_parts(self.data_ptr().add(r), available) })
    }

    /// Returns the first `k` bytes of the most recently acquired read region
    /// to the producer.
    pub fn read_release(&self, k: usize) {
        let mut r = if self.read_wrapped.get() {
            self.read_wrapped.set(false);
            0
        } else {
            self.r.load(Ordering::Relaxed)
        };

        r += k;
        if r > N {
            violate(ContractViolation::IndexExceedsCapacity { index: r, capacity: N });
        }
        if r == N {
            r = 0;
        }
        debug_assert_index_bounded!("r", r, N);

        self.r.store(r, Ordering::Release);
        self.record_read_release(k);
    }

    #[inline]
    fn record_write_acquire(&self, wrapped: bool) {
        if self.metrics_gate.enabled() {
            self.metrics.record_write_acquire(wrapped);
        }
    }

    #[inline]
    fn record_write_miss(&self) {
        if self.metrics_gate.enabled() {
            self.metrics.record_write_capacity_miss();
        }
    }

    #[inline]
    fn record_write_release(&self, bytes: usize) {
        if self.metrics_gate.enabled() {
            self.metrics.record_write_release(bytes);
        }
    }

    #[inline]
    fn record_read_acquire(&self, wrapped: bool) {
        if self.metrics_gate.enabled() {
            self.metrics.record_read_acquire(wrapped);
        }
    }

    #[inline]
    fn record_read_empty(&self) {
        if self.metrics_gate.enabled() {
            self.metrics.record_read_empty();
        }
    }

    #[inline]
    fn record_read_release(&self, bytes: usize) {
        if self.metrics_gate.enabled() {
            self.metrics.record_read_release(bytes);
        }
    }
}

impl<const N: usize> Default for StackBipartiteBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
