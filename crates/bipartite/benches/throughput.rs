use bipartite_rs::{BipartiteBuffer, Config};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::thread;

const BYTES_TOTAL: u64 = 64 * 1024 * 1024;

fn bench_spsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc");
    group.throughput(Throughput::Bytes(BYTES_TOTAL));

    for chunk in &[64usize, 1024, 16384] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("chunk_{chunk}")),
            chunk,
            |b, &chunk| {
                b.iter(|| {
                    let mut storage = vec![0u8; 1 << 20];
                    let buffer = BipartiteBuffer::with_config(&mut storage, Config::default())
                        .expect("non-empty backing slice");
                    let (writer, reader) = buffer.split();

                    thread::scope(|s| {
                        s.spawn(move || {
                            let mut sent = 0u64;
                            while sent < BYTES_TOTAL {
                                let want = chunk.min((BYTES_TOTAL - sent) as usize);
                                if let Some(mut r) = writer.write_acquire(want) {
                                    let n = r.bytes_mut().len();
                                    r.bytes_mut().fill(0xAB);
                                    r.commit(n);
                                    sent += n as u64;
                                } else {
                                    std::hint::spin_loop();
                                }
                            }
                        });

                        let mut received = 0u64;
                        while received < BYTES_TOTAL {
                            if let Some(r) = reader.read_acquire() {
                                black_box(r.bytes());
                                let n = r.bytes().len();
                                received += n as u64;
                                r.release(n);
                            } else {
                                std::hint::spin_loop();
                            }
                        }
                    });
                });
            },
        );
    }

    group.finish();
}

fn bench_raw_acquire_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("raw_acquire_release");

    group.bench_function("single_thread_roundtrip", |b| {
        let mut storage = vec![0u8; 4096];
        let buffer = BipartiteBuffer::new(&mut storage).unwrap();
        b.iter(|| {
            let mut w = buffer.write_acquire(256).unwrap();
            w.bytes_mut().fill(1);
            w.commit(256);
            let r = buffer.read_acquire().unwrap();
            black_box(r.bytes());
            r.release(256);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_spsc, bench_raw_acquire_release);
criterion_main!(benches);
