//! Producer-only and consumer-only handles over a shared [`BipartiteBuffer`].
//!
//! Grounded on the teacher's `Producer<T>`/`Channel<T>` split (each side
//! exposes only the methods it's entitled to call), adapted from an owned
//! `Arc<ChannelInner<T>>` to a borrow; this buffer has no allocation to
//! share ownership of, so `std::thread::scope` is the idiomatic way to get a
//! producer and a consumer onto two threads without one.

use crate::buffer::BipartiteBuffer;
use crate::reservation::{ReadReservation, WriteReservation};

/// Producer-only handle. Exposes only [`BipartiteBuffer::write_acquire`].
pub struct Writer<'r, 'a> {
    buf: &'r BipartiteBuffer<'a>,
}

/// Consumer-only handle. Exposes only [`BipartiteBuffer::read_acquire`].
pub struct Reader<'r, 'a> {
    buf: &'r BipartiteBuffer<'a>,
}

pub(crate) fn split<'r, 'a>(buf: &'r BipartiteBuffer<'a>) -> (Writer<'r, 'a>, Reader<'r, 'a>) {
    (Writer { buf }, Reader { buf })
}

impl<'a> Writer<'_, 'a> {
    /// See [`BipartiteBuffer::write_acquire`].
    pub fn write_acquire(&self, n: usize) -> Option<WriteReservation<'_, 'a>> {
        self.buf.write_acquire(n)
    }

    /// See [`BipartiteBuffer::capacity`].
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }
}

impl<'a> Reader<'_, 'a> {
    /// See [`BipartiteBuffer::read_acquire`].
    pub fn read_acquire(&self) -> Option<ReadReservation<'_, 'a>> {
        self.buf.read_acquire()
    }

    /// See [`BipartiteBuffer::capacity`].
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }
}

#[cfg(test)]
mod tests {
    use crate::BipartiteBuffer;

    #[test]
    fn writer_and_reader_see_the_same_buffer() {
        let mut data = [0u8; 64];
        let bb = BipartiteBuffer::new(&mut data).unwrap();
        let (writer, reader) = bb.split();

        let mut w = writer.write_acquire(8).unwrap();
        w.bytes_mut().fill(42);
        w.commit(8);

        let r = reader.read_acquire().unwrap();
        assert_eq!(r.bytes(), [42u8; 8]);
    }

    #[test]
    fn split_across_scoped_threads() {
        let mut data = [0u8; 256];
        let bb = BipartiteBuffer::new(&mut data).unwrap();
        let (writer, reader) = bb.split();

        std::thread::scope(|s| {
            s.spawn(move || {
                for round in 0..16u8 {
                    loop {
                        if let Some(mut w) = writer.write_acquire(4) {
                            w.bytes_mut().fill(round);
                            w.commit(4);
                            break;
                        }
                        std::thread::yield_now();
                    }
                }
            });

            s.spawn(move || {
                let mut seen = 0;
                while seen < 64 {
                    if let Some(r) = reader.read_acquire() {
                        seen += r.bytes().len();
                        let n = r.bytes().len();
                        r.release(n);
                    } else {
                        std::thread::yield_now();
                    }
                }
            });
        });
    }
}
