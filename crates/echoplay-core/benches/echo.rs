use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use echoplay_core::{AudioBlock, EchoProcessor};

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("echo_process");

    for block_len in [128usize, 512, 2048] {
        group.throughput(Throughput::Elements(block_len as u64));
        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(format!("block_len={block_len}")),
            &block_len,
            |b, &block_len| {
                let mut processor = EchoProcessor::builder()
                    .max_delay_seconds(2.0)
                    .delay_time_ms(350.0)
                    .feedback_gain(0.8)
                    .input_write_gain(0.3)
                    .build();
                processor.prepare(48_000.0, block_len);

                let mut input = AudioBlock::new(2, block_len);
                for ch in 0..input.channel_count() {
                    for (i, sample) in input.channel_mut(ch).iter_mut().enumerate() {
                        *sample = (i as f32 * 0.01).sin() * 0.5;
                    }
                }
                let mut block = AudioBlock::new(2, block_len);

                b.iter(|| {
                    for ch in 0..block.channel_count() {
                        block.channel_mut(ch).copy_from_slice(input.channel(ch));
                    }
                    processor.process(&mut block);
                    black_box(block.channel(0)[0]);
                });
            },
        );
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
