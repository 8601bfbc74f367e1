//! RAII guards returned by [`crate::BipartiteBuffer::write_acquire`] and
//! [`crate::BipartiteBuffer::read_acquire`].
//!
//! Grounded on the teacher's `Reservation<'a, T>`: a slice borrowed from the
//! buffer, paired with a raw pointer back to it so `commit`/`release` can run
//! through an ordinary `&self` call without fighting the borrow checker over
//! two live references to the same instance.

use crate::buffer::BipartiteBuffer;
use crate::config::{violate, ContractViolation};
use crate::invariants::debug_assert_release_fits;

/// A producer-side reservation: a contiguous writable region of exactly the
/// length [`crate::BipartiteBuffer::write_acquire`] decided on.
///
/// Must be consumed with [`WriteReservation::commit`]. Dropping it without
/// committing is equivalent to `commit(0)`; legal (spec.md §9, Open
/// Question 2) and necessary to clear a wrap decision made at acquire time.
pub struct WriteReservation<'r, 'a> {
    slice: &'r mut [u8],
    buf: *const BipartiteBuffer<'a>,
    len: usize,
    committed: bool,
}

// Safety: the raw pointer only ever dereferences back into `&BipartiteBuffer`,
// which is itself `Sync`; moving a `WriteReservation` to another thread does
// not introduce access the buffer's own `Sync` impl doesn't already allow.
unsafe impl Send for WriteReservation<'_, '_> {}

impl<'r, 'a> WriteReservation<'r, 'a> {
    pub(crate) fn new(slice: &'r mut [u8], buf: &BipartiteBuffer<'a>, len: usize) -> Self {
        Self {
            slice,
            buf: std::ptr::from_ref(buf),
            len,
            committed: false,
        }
    }

    /// Returns the acquired region for writing.
    #[inline]
    #[must_use]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        self.slice
    }

    /// Number of bytes this reservation covers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this reservation covers zero bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Publishes the first `k` bytes of the acquired region to the consumer.
    ///
    /// `k` may be less than [`WriteReservation::len`] if fewer bytes were
    /// actually produced than requested.
    ///
    /// # Panics (via the assertion hook)
    ///
    /// Calls the assertion hook, which by default panics, if `k` exceeds the
    /// acquired length (spec.md §6/§7: a release larger than its matching
    /// acquire is a contract violation, not an expected failure).
    pub fn commit(mut self, k: usize) {
        self.commit_internal(k);
    }

    fn commit_internal(&mut self, k: usize) {
        debug_assert_release_fits!(k, self.len);
        if k > self.len {
            violate(ContractViolation::ReleaseExceedsAcquire {
                committed: k,
                acquired: self.len,
            });
        }
        self.committed = true;
        // Safety: `buf` was derived from a live `&BipartiteBuffer` and this
        // reservation cannot outlive it (its lifetime parameter is tied to
        // the same borrow).
        unsafe { (*self.buf).write_release(k) };
    }
}

impl Drop for WriteReservation<'_, '_> {
    fn drop(&mut self) {
        if !self.committed {
            self.commit_internal(0);
        }
    }
}

/// A consumer-side reservation: a contiguous readable region returned by
/// [`crate::BipartiteBuffer::read_acquire`].
///
/// Must be consumed with [`ReadReservation::release`]. Dropping it without
/// releasing is equivalent to `release(0)`; legal, and necessary to clear a
/// wrap decision made at acquire time.
pub struct ReadReservation<'r, 'a> {
    slice: &'r [u8],
    buf: *const BipartiteBuffer<'a>,
    len: usize,
    released: bool,
}

// Safety: see the matching impl on `WriteReservation`.
unsafe impl Send for ReadReservation<'_, '_> {}

impl<'r, 'a> ReadReservation<'r, 'a> {
    pub(crate) fn new(slice: &'r [u8], buf: &BipartiteBuffer<'a>, len: usize) -> Self {
        Self {
            slice,
            buf: std::ptr::from_ref(buf),
            len,
            released: false,
        }
    }

    /// Returns the acquired region for reading.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.slice
    }

    /// Number of bytes available in this reservation.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this reservation covers zero bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the first `k` bytes to the producer for reuse.
    ///
    /// `k` may be less than [`ReadReservation::len`] if the consumer only
    /// processed a prefix of the available data.
    ///
    /// # Panics (via the assertion hook)
    ///
    /// Calls the assertion hook, which by default panics, if `k` exceeds the
    /// acquired length.
    pub fn release(mut self, k: usize) {
        self.release_internal(k);
    }

    fn release_internal(&mut self, k: usize) {
        debug_assert_release_fits!(k, self.len);
        if k > self.len {
            violate(ContractViolation::ReleaseExceedsAcquire {
                committed: k,
                acquired: self.len,
            });
        }
        self.released = true;
        // Safety: see `WriteReservation::commit_internal`.
        unsafe { (*self.buf).read_release(k) };
    }
}

impl Drop for ReadReservation<'_, '_> {
    fn drop(&mut self) {
        if !self.released {
            self.release_internal(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::BipartiteBuffer;

    #[test]
    fn partial_commit_only_publishes_the_committed_prefix() {
        let mut data = [0u8; 64];
        let bb = BipartiteBuffer::new(&mut data).unwrap();

        let mut w = bb.write_acquire(10).unwrap();
        w.bytes_mut().fill(7);
        w.commit(4);

        let r = bb.read_acquire().unwrap();
        assert_eq!(r.bytes().len(), 4);
    }

    #[test]
    fn dropping_a_reservation_without_committing_is_a_zero_byte_commit() {
        let mut data = [0u8; 64];
        let bb = BipartiteBuffer::new(&mut data).unwrap();

        {
            let mut w = bb.write_acquire(10).unwrap();
            w.bytes_mut().fill(9);
            // dropped without commit
        }

        assert!(bb.read_acquire().is_none());
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn commit_beyond_acquired_length_panics() {
        let mut data = [0u8; 64];
        let bb = BipartiteBuffer::new(&mut data).unwrap();
        let w = bb.write_acquire(10).unwrap();
        w.commit(11);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn release_beyond_acquired_length_panics() {
        let mut data = [0u8; 64];
        let bb = BipartiteBuffer::new(&mut data).unwrap();
        let mut w = bb.write_acquire(10).unwrap();
        w.bytes_mut().fill(1);
        w.commit(10);
        let r = bb.read_acquire().unwrap();
        r.release(11);
    }
}
