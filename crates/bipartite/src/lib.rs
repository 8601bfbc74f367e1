//! Bipartite - a lock-free single-producer/single-consumer byte buffer
//!
//! A ring buffer whose readable and writable regions are always contiguous:
//! every [`BipartiteBuffer::write_acquire`]/[`BipartiteBuffer::read_acquire`]
//! hands back a single linear slice, never one split across the wrap
//! boundary. Three atomic indices (`r`, `w`, an invalidate mark) coordinate
//! one producer and one consumer; two more flags track each side's own wrap
//! decision and are never shared.
//!
//! This is a Rust port of [DNedic/lfbb](https://github.com/DNedic/lfbb).
//!
//! # Key properties
//!
//! - No allocation: wraps a caller-provided `&mut [u8]`, or use
//!   [`StackBipartiteBuffer`] to embed the storage in the struct itself
//! - No locks, no blocking: every operation is wait-free and either
//!   succeeds immediately or returns `None`
//! - Zero-copy: the producer writes directly into the acquired region, the
//!   consumer reads directly from it
//! - Optional cache-line padding on the three indices (`cache-padding`,
//!   `cacheline-128` features) to avoid false sharing across cores
//!
//! # Example
//!
//! ```
//! use bipartite_rs::BipartiteBuffer;
//!
//! let mut storage = [0u8; 256];
//! let buffer = BipartiteBuffer::new(&mut storage).unwrap();
//!
//! let mut reservation = buffer.write_acquire(5).unwrap();
//! reservation.bytes_mut().copy_from_slice(b"hello");
//! reservation.commit(5);
//!
//! let read = buffer.read_acquire().unwrap();
//! assert_eq!(read.bytes(), b"hello");
//! read.release(5);
//! ```
//!
//! Producer and consumer can run on separate threads via [`BipartiteBuffer::split`]:
//!
//! ```
//! use bipartite_rs::BipartiteBuffer;
//!
//! let mut storage = [0u8; 256];
//! let buffer = BipartiteBuffer::new(&mut storage).unwrap();
//! let (writer, reader) = buffer.split();
//!
//! std::thread::scope(|s| {
//!     s.spawn(move || {
//!         let mut r = writer.write_acquire(5).unwrap();
//!         r.bytes_mut().copy_from_slice(b"hello");
//!         r.commit(5);
//!     });
//!     s.spawn(move || loop {
//!         if let Some(r) = reader.read_acquire() {
//!             assert_eq!(r.bytes(), b"hello");
//!             r.release(5);
//!             break;
//!         }
//!     });
//! });
//! ```

mod backoff;
mod buffer;
mod config;
mod invariants;
mod layout;
mod metrics;
mod reservation;
mod split;
mod stack;

pub use backoff::Backoff;
pub use buffer::BipartiteBuffer;
pub use config::{set_assert_hook, Config, ContractViolation, InitError};
pub use metrics::MetricsSnapshot;
pub use reservation::{ReadReservation, WriteReservation};
pub use split::{Reader, Writer};
pub use stack::StackBipartiteBuffer;
