//! The bipartite buffer core: three atomic indices coordinating a producer
//! and a consumer over a caller-provided byte array, with no lock and no
//! allocation.
//!
//! =============================================================================
//! MEMORY ORDERING & SYNCHRONIZATION STRATEGY
//! =============================================================================
//!
//! Three indices, `r` (read), `w` (write) and `i` (invalidate mark), are the
//! entire cross-thread contact surface. Two more booleans, `write_wrapped`
//! and `read_wrapped`, are strictly local to their owning side and never
//! observed by the other; sharing them would reintroduce an ABA-like
//! hazard (spec.md §9).
//!
//! **Producer (write path):**
//! 1. Load `w` Relaxed (only the producer writes `w`)
//! 2. Load `r` Acquire (synchronizes with the consumer's Release store)
//! 3. Decide linear vs. wrapped region from the free-space arithmetic
//! 4. Write bytes into the returned region (ordinary, non-atomic stores)
//! 5. On release: store `i` Relaxed, then `w` Release
//!
//! **Consumer (read path):**
//! 1. Load `r` Relaxed (only the consumer writes `r`)
//! 2. Load `w` Acquire (synchronizes with the producer's Release store)
//! 3. Load `i` Relaxed, sound *only* because the Acquire load of `w` above
//!    happens first and `w`'s Release store is preceded by `i`'s store in
//!    program order on the producer side (spec.md §5, footnote 1)
//! 4. Read bytes from the returned region
//! 5. On release: store `r` Release
//!
//! Unlike a masked power-of-two ring buffer, indices here are bounded to
//! `[0, size]` and reset to `0` on wrap instead of counting forever; the
//! `i` index exists precisely to let the consumer tell "wrapped, read from
//! the start" apart from "not wrapped yet, more tail data exists".
//! =============================================================================

use std::cell::Cell;
use std::marker::PhantomData;
use std::sync::atomic::Ordering;

use crate::config::{violate, Config, ContractViolation, InitError, MetricsGate};
use crate::invariants::{
    debug_assert_index_bounded, debug_assert_invalidate_ahead, debug_assert_reservation,
};
use crate::layout::Index;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::reservation::{ReadReservation, WriteReservation};

/// A lock-free single-producer/single-consumer bipartite byte buffer.
///
/// Wraps a caller-provided `&mut [u8]`; never allocates, never blocks, never
/// retries. `write_acquire`/`write_release` are for the producer,
/// `read_acquire`/`read_release` for the consumer; both sides may call
/// into the same `&BipartiteBuffer` from different threads (see
/// [`BipartiteBuffer::split`] for handle types that only expose one side).
pub struct BipartiteBuffer<'a> {
    data: *mut u8,
    size: usize,
    r: Index,
    w: Index,
    i: Index,
    write_wrapped: Cell<bool>,
    read_wrapped: Cell<bool>,
    metrics: Metrics,
    metrics_gate: MetricsGate,
    _data: PhantomData<&'a mut [u8]>,
}

// Safety: `r`/`w`/`i` are atomics; `write_wrapped` is touched only from
// `write_acquire`/`write_release` (producer side), `read_wrapped` only from
// `read_acquire`/`read_release` (consumer side). The protocol, not the type
// system, keeps each side single-threaded, exactly the discipline the
// caller-provided `&mut [u8]` itself depends on.
unsafe impl Send for BipartiteBuffer<'_> {}
unsafe impl Sync for BipartiteBuffer<'_> {}

impl<'a> BipartiteBuffer<'a> {
    /// Binds `data` to a new instance, clearing all indices and flags.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::EmptyData`] if `data` is empty. spec.md §3
    /// requires `size >= 1` so the one-slot reservation can disambiguate
    /// empty from full.
    pub fn new(data: &'a mut [u8]) -> Result<Self, InitError> {
        Self::with_config(data, Config::default())
    }

    /// Like [`BipartiteBuffer::new`], with explicit [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`InitError::EmptyData`] if `data` is empty.
    pub fn with_config(data: &'a mut [u8], config: Config) -> Result<Self, InitError> {
        if data.is_empty() {
            return Err(InitError::EmptyData);
        }

        let size = data.len();
        let ptr = data.as_mut_ptr();

        Ok(Self {
            data: ptr,
            size,
            r: Index::new(std::sync::atomic::AtomicUsize::new(0)),
            w: Index::new(std::sync::atomic::AtomicUsize::new(0)),
            i: Index::new(std::sync::atomic::AtomicUsize::new(0)),
            write_wrapped: Cell::new(false),
            read_wrapped: Cell::new(false),
            metrics: Metrics::default(),
            metrics_gate: MetricsGate::new(config.metrics),
            _data: PhantomData,
        })
    }

    /// Returns the capacity `N` of the backing array.
    ///
    /// At most `N - 1` bytes are ever readable at once (spec.md §3,
    /// invariant 2: one slot is reserved to disambiguate empty from full).
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.size
    }

    /// Splits the buffer into a producer-only [`Writer`](crate::split::Writer)
    /// and consumer-only [`Reader`](crate::split::Reader) handle, both
    /// borrowing `self`.
    ///
    /// This is the idiomatic-Rust alternative to the original C API, where
    /// every caller holds the same instance pointer and programmer
    /// discipline alone keeps producer-only and consumer-only calls apart.
    /// The four raw operations below remain directly callable for callers
    /// that want that literal shared-instance shape (e.g. cooperative
    /// single-thread use, or an FFI boundary).
    #[must_use]
    pub fn split(&self) -> (crate::split::Writer<'_, 'a>, crate::split::Reader<'_, 'a>) {
        crate::split::split(self)
    }

    /// Returns a snapshot of this instance's metrics counters.
    ///
    /// Always a default (all-zero) snapshot if `Config::metrics` was false
    /// at construction.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.metrics_gate.enabled() {
            self.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }

    /// `free(w, r, N)` from spec.md §4.1: contiguous-agnostic free space,
    /// reserving one slot to disambiguate empty (`r == w`) from full.
    #[inline]
    fn free_space(w: usize, r: usize, size: usize) -> usize {
        if r > w {
            r - w - 1
        } else {
            size - (w - r) - 1
        }
    }

    /// Producer-side: requests a contiguous writable region of at least `n`
    /// bytes. Returns `None` if `n` bytes of contiguous free space are not
    /// available in either the tail or the head of the array (spec.md §4.2).
    ///
    /// No atomic store happens here; the decision to wrap (if any) is
    /// carried into [`WriteReservation::commit`] via the producer-local
    /// `write_wrapped` flag. A release must follow each accepted acquire
    /// before the next acquire is issued, or the flag is overwritten and the
    /// invalidate semantics break (spec.md §4.2).
    pub fn write_acquire(&self, n: usize) -> Option<WriteReservation<'_, 'a>> {
        if n == 0 || n > self.size - 1 {
            self.record_write_miss();
            return None;
        }

        let w = self.w.load(Ordering::Relaxed);
        let r = self.r.load(Ordering::Acquire);
        debug_assert_index_bounded!("w", w, self.size);
        debug_assert_index_bounded!("r", r, self.size);

        let free = Self::free_space(w, r, self.size);
        debug_assert_reservation!(free, self.size);

        let linear_free = free.min(self.size - w);

        if n <= linear_free {
            // SAFETY: [w, w + n) is free, not readable by the consumer
            // until a matching `write_release` publishes a new `w` past it.
            let slice = unsafe { std::slice::from_raw_parts_mut(self.data.add(w), n) };
            self.record_write_acquire(false);
            return Some(WriteReservation::new(slice, self, n));
        }

        if n <= free - linear_free {
            self.write_wrapped.set(true);
            // SAFETY: the head region [0, n) is free by the same argument;
            // the producer elected to skip the insufficient tail.
            let slice = unsafe { std::slice::from_raw_parts_mut(self.data, n) };
            self.record_write_acquire(true);
            return Some(WriteReservation::new(slice, self, n));
        }

        self.record_write_miss();
        None
    }

    /// Called by [`WriteReservation`] on commit (or by its `Drop` with
    /// `k == 0` if the caller abandoned the reservation without an explicit
    /// commit. spec.md §9, Open Question 2, treats this as legal and as
    /// clearing the wrap flag).
    pub(crate) fn write_release(&self, k: usize) {
        let mut w = self.w.load(Ordering::Relaxed);
        let mut i = self.i.load(Ordering::Relaxed);

        if self.write_wrapped.get() {
            self.write_wrapped.set(false);
            i = w;
            w = 0;
        }

        let new_w = w + k;
        if new_w > self.size {
            violate(ContractViolation::IndexExceedsCapacity {
                index: new_w,
                capacity: self.size,
            });
        }
        w = new_w;

        if w > i {
            i = w;
        }
        debug_assert_invalidate_ahead!(i, w);

        if w == self.size {
            w = 0;
        }
        debug_assert_index_bounded!("w", w, self.size);

        self.i.store(i, Ordering::Relaxed);
        self.w.store(w, Ordering::Release);
        self.record_write_release(k);
    }

    /// Consumer-side: requests the next contiguous readable region. Returns
    /// `None` (with zero available bytes) if the buffer is empty (spec.md
    /// §4.3).
    pub fn read_acquire(&self) -> Option<ReadReservation<'_, 'a>> {
        let r = self.r.load(Ordering::Relaxed);
        let w = self.w.load(Ordering::Acquire);
        debug_assert_index_bounded!("r", r, self.size);
        debug_assert_index_bounded!("w", w, self.size);

        if r == w {
            self.record_read_empty();
            return None;
        }

        if r < w {
            let available = w - r;
            // SAFETY: [r, w) was published by the producer's Release store
            // on `w`, which the Acquire load above synchronizes with.
            let slice = unsafe { std::slice::from_raw_parts(self.data.add(r), available) };
            self.record_read_acquire(false);
            return Some(ReadReservation::new(slice, self, available));
        }

        let i = self.i.load(Ordering::Relaxed);
        if r == i {
            self.read_wrapped.set(true);
            // SAFETY: [0, w) was published the same way; the consumer has
            // caught up to the invalidate mark and wraps to the head.
            let slice = unsafe { std::slice::from_raw_parts(self.data, w) };
            self.record_read_acquire(true);
            return Some(ReadReservation::new(slice, self, w));
        }

        let available = i - r;
        // SAFETY: [r, i) is the remaining tail data before the invalidate
        // mark, published the same way.
        let slice = unsafe { std::slice::from_raw_parts(self.data.add(r), available) };
        self.record_read_acquire(false);
        Some(ReadReservation::new(slice, self, available))
    }

    /// Called by [`ReadReservation`] on release (or by its `Drop` with
    /// `k == 0` for an abandoned reservation).
    pub(crate) fn read_release(&self, k: usize) {
        let mut r = if self.read_wrapped.get() {
            self.read_wrapped.set(false);
            0
        } else {
            self.r.load(Ordering::Relaxed)
        };

        r += k;
        if r > self.size {
            violate(ContractViolation::IndexExceedsCapacity {
                index: r,
                capacity: self.size,
            });
        }
        if r == self.size {
            r = 0;
        }
        debug_assert_index_bounded!("r", r, self.size);

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
