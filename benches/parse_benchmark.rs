//! Performance benchmarks for chunk parsing
//!
//! Tests parse time for records of different sizes and for keep-alives.
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use signal_relay::parser::{classify_chunk, parse_chunk};

/// Generate one stream record with a text of roughly `text_len` bytes
fn generate_record(text_len: usize, rules: usize) -> Vec<u8> {
    let text: String = "relay ".repeat(text_len / 6 + 1);
    let matching_rules: Vec<_> = (0..rules)
        .map(|i| serde_json::json!({ "id": format!("rule-{}", i), "tag": "bench" }))
        .collect();
    let record = serde_json::json!({
        "data": { "id": "1456", "author_id": "42", "text": text },
        "matching_rules": matching_rules
    });
    format!("{}\r\n", record).into_bytes()
}

/// Benchmark parsing complete records
fn bench_parse_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_record");

    for size in [64, 280, 1024, 4096].iter() {
        let chunk = generate_record(*size, 2);
        group.throughput(Throughput::Bytes(chunk.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_bytes", size)),
            &chunk,
            |b, chunk| {
                b.iter(|| {
                    let event = parse_chunk(black_box(chunk));
                    black_box(event)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the keep-alive fast path
fn bench_keep_alive(c: &mut Criterion) {
    c.bench_function("keep_alive", |b| {
        b.iter(|| black_box(classify_chunk(black_box(b"\r\n"))));
    });
}

/// Benchmark malformed chunks, which take the error path
fn bench_malformed(c: &mut Criterion) {
    let chunk = generate_record(280, 2);
    let (head, _) = chunk.split_at(chunk.len() / 2);

    c.bench_function("malformed_half_record", |b| {
        b.iter(|| black_box(classify_chunk(black_box(head))));
    });
}

criterion_group!(benches, bench_parse_record, bench_keep_alive, bench_malformed);
criterion_main!(benches);
