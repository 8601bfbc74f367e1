use bipartite_rs::{BipartiteBuffer, Config};
use std::thread;
use std::time::Instant;

const TOTAL_BYTES: usize = 256 * 1024 * 1024;
const CHUNK: usize = 4096;
const BUFFER_SIZE: usize = 1 << 20;

fn main() {
    println!("Bipartite Zero-Copy Example");
    println!("===========================\n");

    let mut storage = vec![0u8; BUFFER_SIZE];
    let config = Config { metrics: true };
    let buffer = BipartiteBuffer::with_config(&mut storage, config).unwrap();
    let (writer, reader) = buffer.split();

    println!("Configuration:");
    println!("  Buffer capacity: {} bytes", writer.capacity());
    println!("  Chunk size: {CHUNK} bytes");
    println!("  Total bytes: {TOTAL_BYTES}\n");

    let start = Instant::now();

    thread::scope(|s| {
        s.spawn(move || {
            let mut sent = 0usize;
            while sent < TOTAL_BYTES {
                let want = CHUNK.min(TOTAL_BYTES - sent);
                if let Some(mut reservation) = writer.write_acquire(want) {
                    let slice = reservation.bytes_mut();
                    for (i, byte) in slice.iter_mut().enumerate() {
                        *byte = ((sent + i) % 256) as u8;
                    }
                    let n = slice.len();
                    reservation.commit(n);
                    sent += n;
                } else {
                    thread::yield_now();
                }
            }
        });

        let mut received = 0usize;
        while received < TOTAL_BYTES {
            if let Some(reservation) = reader.read_acquire() {
                let n = reservation.bytes().len();
                let _checksum: u64 = reservation.bytes().iter().map(|&b| b as u64).sum();
                reservation.release(n);
                received += n;
            } else {
                thread::yield_now();
            }
        }
    });

    let duration = start.elapsed();
    let throughput = TOTAL_BYTES as f64 / duration.as_secs_f64() / 1e9;

    println!("Results:");
    println!("  Duration: {duration:.2?}");
    println!("  Throughput: {throughput:.2} GB/sec");
}
