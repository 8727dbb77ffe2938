//! Wire codec benchmarks for huddle-protocol.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use huddle_protocol::{codec, ServerMessage};

fn bench_encode_init(c: &mut Criterion) {
    let message = ServerMessage::init_connection(7);

    c.bench_function("encode_init_connection", |b| {
        b.iter(|| codec::encode(black_box(&message)))
    });
}

fn bench_echo_flag(c: &mut Criterion) {
    let plain = r#"{"action":"move","x":12,"y":34}"#;
    let flagged = r#"{"action":"move","x":12,"y":34,"server-echo":true}"#;

    let mut group = c.benchmark_group("echo_requested");
    group.throughput(Throughput::Bytes(plain.len() as u64));
    group.bench_function("without_flag", |b| {
        b.iter(|| codec::echo_requested(black_box(plain)))
    });
    group.bench_function("with_flag", |b| {
        b.iter(|| codec::echo_requested(black_box(flagged)))
    });
    group.finish();
}

criterion_group!(benches, bench_encode_init, bench_echo_flag);
criterion_main!(benches);
