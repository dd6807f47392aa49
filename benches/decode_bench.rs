//! Benchmarks for frame accumulation and field extraction.
//!
//! ```sh
//! cargo bench --bench decode_bench
//! cargo bench --bench decode_bench -- extract
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use wiegand_core::{Codeword, Line, LineEvent, extract};
use wiegand_decoder::{FrameAccumulator, Transition};

const CARDS: [(&str, &str); 4] = [
    ("h10301", "00010101000000101001110011"),
    ("corporate_1000", "00000000000001000000101000001111110"),
    ("h10304", "0000000101001101000001111010011010010"),
    ("unknown_99", "111111111111111111111111111111111111111111111111111111111111111111111111111111111111111111111111111"),
];

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    group.throughput(Throughput::Elements(1));

    for (name, bits) in CARDS {
        let codeword = Codeword::from_bit_str(bits).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &codeword, |b, codeword| {
            b.iter(|| black_box(extract(black_box(codeword))));
        });
    }

    group.finish();
}

fn bench_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulate");

    for (name, bits) in CARDS {
        let events: Vec<LineEvent> = Codeword::from_bit_str(bits)
            .unwrap()
            .bits()
            .iter()
            .map(|&bit| LineEvent::edge(if bit { Line::One } else { Line::Zero }))
            .chain([LineEvent::timeout(Line::Zero), LineEvent::timeout(Line::One)])
            .collect();

        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &events, |b, events| {
            b.iter(|| {
                let mut acc = FrameAccumulator::new();
                let mut out = None;
                for &event in events {
                    if let Transition::FrameCompleted(codeword) = acc.handle(black_box(event)) {
                        out = Some(codeword);
                    }
                }
                black_box(out)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract, bench_accumulate);
criterion_main!(benches);
