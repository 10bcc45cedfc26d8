use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;

pub fn dispatch_throughput_bench(c: &mut Criterion) {
    let weights = performance::Weights {
        command: 40,
        ..Default::default()
    };
    let mut rng = rand::prelude::StdRng::seed_from_u64(43);
    let input = performance::generate_random_document(&mut rng, 20_000, (60, 100), &weights);
    let map = quill_stdlib::registry();
    let (tokens, _) = performance::run_tokenizer(&map, &input);

    let mut group = c.benchmark_group("dispatch-throughput");
    group.sample_size(10);
    group.bench_function("dispatch_throughput", |b| {
        b.iter(|| performance::run_dispatch(&tokens))
    });
}

criterion_group!(benches, dispatch_throughput_bench);
criterion_main!(benches);
