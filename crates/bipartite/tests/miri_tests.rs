//! Miri-compatible tests for detecting undefined behavior in the unsafe
//! slicing paths.
//!
//! Run with: `cargo +nightly miri test --test miri_tests`
//!
//! These exercise the raw pointer arithmetic in `write_acquire`/`read_acquire`
//! and the reservation `Drop` paths, the only unsafe surfaces in the crate.

use bipartite_rs::{BipartiteBuffer, StackBipartiteBuffer};

#[test]
fn miri_basic_round_trip() {
    let mut storage = vec![0u8; 16];
    let buffer = BipartiteBuffer::new(&mut storage).unwrap();

    let mut w = buffer.write_acquire(5).unwrap();
    w.bytes_mut().copy_from_slice(b"hello");
    w.commit(5);

    let r = buffer.read_acquire().unwrap();
    assert_eq!(r.bytes(), b"hello");
    r.release(5);
}

#[test]
fn miri_wrap_around_exercises_both_regions() {
    let mut storage = vec![0u8; 16];
    let buffer = BipartiteBuffer::new(&mut storage).unwrap();

    for round in 0..5u8 {
        let mut w = buffer.write_acquire(6).expect("6 <= capacity - 1");
        w.bytes_mut().fill(round);
        w.commit(6);

        let r = buffer.read_acquire().unwrap();
        assert!(r.bytes().iter().all(|&b| b == round));
        let n = r.bytes().len();
        r.release(n);
    }
}

#[test]
fn miri_partial_commit_then_partial_release() {
    let mut storage = vec![0u8; 32];
    let buffer = BipartiteBuffer::new(&mut storage).unwrap();

    let mut w = buffer.write_acquire(10).unwrap();
    w.bytes_mut().fill(7);
    w.commit(4); // commit fewer bytes than acquired

    let r = buffer.read_acquire().unwrap();
    assert_eq!(r.bytes().len(), 4);
    r.release(2); // release fewer bytes than available

    let r2 = buffer.read_acquire().unwrap();
    assert_eq!(r2.bytes().len(), 2);
    r2.release(2);
}

#[test]
fn miri_reservation_drop_without_commit_leaves_nothing_readable() {
    let mut storage = vec![0u8; 16];
    let buffer = BipartiteBuffer::new(&mut storage).unwrap();

    {
        let mut w = buffer.write_acquire(8).unwrap();
        w.bytes_mut().fill(9);
        // dropped without commit
    }

    assert!(buffer.read_acquire().is_none());
}

#[test]
fn miri_read_reservation_drop_without_release_is_retried() {
    let mut storage = vec![0u8; 16];
    let buffer = BipartiteBuffer::new(&mut storage).unwrap();

    let mut w = buffer.write_acquire(8).unwrap();
    w.bytes_mut().fill(3);
    w.commit(8);

    {
        let r = buffer.read_acquire().unwrap();
        assert_eq!(r.bytes().len(), 8);
        // dropped without release; equivalent to release(0)
    }

    let r = buffer.read_acquire().unwrap();
    assert_eq!(r.bytes().len(), 8);
    r.release(8);
}

#[test]
fn miri_stack_buffer_round_trip() {
    let buffer: StackBipartiteBuffer<16> = StackBipartiteBuffer::new();

    let w = buffer.write_acquire(5).unwrap();
    w.copy_from_slice(b"hello");
    buffer.write_release(5);

    let r = buffer.read_acquire().unwrap();
    assert_eq!(r, b"hello");
    buffer.read_release(5);
}

#[test]
fn miri_split_writer_reader_round_trip() {
    let mut storage = vec![0u8; 16];
    let buffer = BipartiteBuffer::new(&mut storage).unwrap();
    let (writer, reader) = buffer.split();

    let mut w = writer.write_acquire(5).unwrap();
    w.bytes_mut().copy_from_slice(b"hello");
    w.commit(5);

    let r = reader.read_acquire().unwrap();
    assert_eq!(r.bytes(), b"hello");
    r.release(5);
}
