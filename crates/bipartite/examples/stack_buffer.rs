use bipartite_rs::{Backoff, Config, StackBipartiteBuffer};
use std::thread;

const ROUNDS: usize = 10_000;
const MSG_LEN: usize = 24;

fn main() {
    println!("Bipartite Stack-Allocated Buffer Example");
    println!("=========================================\n");

    // Embedded directly in a stack local: no allocation at all. Borrowed by
    // both threads through `thread::scope` rather than shared via `Arc`.
    let buffer: StackBipartiteBuffer<4096> =
        StackBipartiteBuffer::with_config(Config { metrics: true });

    println!("Capacity: {} bytes (no heap allocation)\n", buffer.capacity());

    thread::scope(|s| {
        s.spawn(|| {
            let mut backoff = Backoff::new();
            for round in 0..ROUNDS {
                loop {
                    if let Some(slice) = buffer.write_acquire(MSG_LEN) {
                        slice.fill((round % 256) as u8);
                        buffer.write_release(MSG_LEN);
                        backoff.reset();
                        break;
                    }
                    // Capacity misses are expected and composed with backoff
                    // from the outside, never inside the core operations.
                    backoff.snooze();
                }
            }
        });

        s.spawn(|| {
            let mut backoff = Backoff::new();
            let mut consumed = 0usize;
            while consumed < ROUNDS * MSG_LEN {
                if let Some(slice) = buffer.read_acquire() {
                    let n = slice.len();
                    consumed += n;
                    buffer.read_release(n);
                    backoff.reset();
                } else {
                    backoff.snooze();
                }
            }
        });
    });

    let snapshot = buffer.metrics();
    println!("Done. {} rounds of {MSG_LEN} bytes exchanged.", ROUNDS);
    println!("Metrics: {snapshot:?}");
}
