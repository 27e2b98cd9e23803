use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigUint;
use paillier_tally::math::EntropySource;
use paillier_tally::paillier::{decrypt, encrypt, fold, fold_parallel, generate, Ciphertext};

fn keygen_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("keygen");
    group.sample_size(10);

    for bits in [512usize, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(bits), &bits, |b, &bits| {
            let mut rng = EntropySource::with_seed(1);
            b.iter(|| generate(bits, &mut rng).unwrap());
        });
    }

    group.finish();
}

fn encrypt_decrypt_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt_decrypt");

    for bits in [512usize, 1024, 2048] {
        let mut rng = EntropySource::with_seed(2);
        let keys = generate(bits, &mut rng).unwrap();
        let m = BigUint::from(123_456u32);
        let ct = encrypt(&keys.public, &m, &mut rng).unwrap();

        group.bench_with_input(BenchmarkId::new("encrypt", bits), &bits, |b, _| {
            b.iter(|| encrypt(&keys.public, &m, &mut rng).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("decrypt", bits), &bits, |b, _| {
            b.iter(|| decrypt(&ct, &keys.secret, &keys.public));
        });
    }

    group.finish();
}

fn fold_benchmark(c: &mut Criterion) {
    let mut rng = EntropySource::with_seed(3);
    let keys = generate(2048, &mut rng).unwrap();

    let mut group = c.benchmark_group("fold");

    for batch in [64usize, 512] {
        let cts: Vec<Ciphertext> = (0..batch)
            .map(|i| encrypt(&keys.public, &BigUint::from(i), &mut rng).unwrap())
            .collect();

        group.bench_with_input(BenchmarkId::new("parallel", batch), &batch, |b, _| {
            b.iter(|| fold_parallel(&keys.public, &cts));
        });

        group.bench_with_input(BenchmarkId::new("sequential", batch), &batch, |b, _| {
            b.iter(|| fold(&keys.public, &cts));
        });
    }

    group.finish();
}

criterion_group!(benches, keygen_benchmark, encrypt_decrypt_benchmark, fold_benchmark);
criterion_main!(benches);
