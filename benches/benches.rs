// Copyright 2022 Sebastian Ramacher
// SPDX-License-Identifier: MIT

use criterion::{
    black_box, criterion_group, criterion_main, Bencher, BenchmarkId, Criterion, Throughput,
};
use isap_lwc::aead::{generic_array::typenum::Unsigned, Aead, AeadInPlace, KeyInit};
use isap_lwc::{IsapA128, IsapA128A, IsapK128, IsapK128A};
use rand::{rngs::StdRng, RngCore, SeedableRng};

const KB: usize = 1024;

fn bench_for_size<A: KeyInit + Aead>(b: &mut Bencher<'_>, rng: &mut dyn RngCore, size: usize) {
    let mut key = vec![0u8; A::KeySize::USIZE];
    rng.fill_bytes(key.as_mut_slice());
    let mut nonce = vec![0u8; A::NonceSize::USIZE];
    rng.fill_bytes(nonce.as_mut_slice());
    let mut plaintext = vec![0u8; size];
    rng.fill_bytes(plaintext.as_mut_slice());

    let cipher = A::new(key.as_slice().into());
    let nonce = nonce.as_slice().into();

    b.iter(|| black_box(cipher.encrypt(nonce, plaintext.as_slice())));
}

fn bench_for_size_inplace<A: KeyInit + AeadInPlace>(
    b: &mut Bencher<'_>,
    rng: &mut dyn RngCore,
    size: usize,
) {
    let mut key = vec![0u8; A::KeySize::USIZE];
    rng.fill_bytes(key.as_mut_slice());
    let mut nonce = vec![0u8; A::NonceSize::USIZE];
    rng.fill_bytes(nonce.as_mut_slice());
    let mut buffer = vec![0u8; size + 16];
    rng.fill_bytes(buffer.as_mut_slice());

    let cipher = A::new(key.as_slice().into());
    let nonce = nonce.as_slice().into();

    b.iter(|| black_box(cipher.encrypt_in_place(nonce, b"", &mut buffer)));
}

fn criterion_benchmark<A: KeyInit + Aead>(c: &mut Criterion, name: &str) {
    let mut rng = StdRng::seed_from_u64(0x0123456789abcdef);
    let mut group = c.benchmark_group(name);
    for size in [KB, 2 * KB, 4 * KB, 8 * KB, 16 * KB, 32 * KB, 64 * KB].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            bench_for_size::<A>(b, &mut rng, size)
        });
    }
    group.finish();
}

fn criterion_benchmark_inplace<A: KeyInit + AeadInPlace>(c: &mut Criterion, name: &str) {
    let mut rng = StdRng::seed_from_u64(0x0123456789abcdef);
    let mut group = c.benchmark_group(name);
    for size in [KB, 2 * KB, 4 * KB, 8 * KB, 16 * KB, 32 * KB, 64 * KB].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            bench_for_size_inplace::<A>(b, &mut rng, size)
        });
    }
    group.finish();
}

fn criterion_bench_isap_a_128(c: &mut Criterion) {
    criterion_benchmark::<IsapA128>(c, "ISAP-A-128");
}

fn criterion_bench_isap_a_128a(c: &mut Criterion) {
    criterion_benchmark::<IsapA128A>(c, "ISAP-A-128A");
}

fn criterion_bench_isap_a_128_inplace(c: &mut Criterion) {
    criterion_benchmark_inplace::<IsapA128>(c, "ISAP-A-128 (inplace)");
}

fn criterion_bench_isap_a_128a_inplace(c: &mut Criterion) {
    criterion_benchmark_inplace::<IsapA128A>(c, "ISAP-A-128A (inplace)");
}

fn criterion_bench_isap_k_128(c: &mut Criterion) {
    criterion_benchmark::<IsapK128>(c, "ISAP-K-128");
}

fn criterion_bench_isap_k_128a(c: &mut Criterion) {
    criterion_benchmark::<IsapK128A>(c, "ISAP-K-128A");
}

fn criterion_bench_isap_k_128_inplace(c: &mut Criterion) {
    criterion_benchmark_inplace::<IsapK128>(c, "ISAP-K-128 (inplace)");
}

fn criterion_bench_isap_k_128a_inplace(c: &mut Criterion) {
    criterion_benchmark_inplace::<IsapK128A>(c, "ISAP-K-128A (inplace)");
}

criterion_group!(
    bench_isap_a_128,
    criterion_bench_isap_a_128,
    criterion_bench_isap_a_128_inplace,
);
criterion_group!(
    bench_isap_a_128a,
    criterion_bench_isap_a_128a,
    criterion_bench_isap_a_128a_inplace,
);
criterion_group!(
    bench_isap_k_128,
    criterion_bench_isap_k_128,
    criterion_bench_isap_k_128_inplace,
);
criterion_group!(
    bench_isap_k_128a,
    criterion_bench_isap_k_128a,
    criterion_bench_isap_k_128a_inplace,
);
criterion_main!(
    bench_isap_a_128,
    bench_isap_a_128a,
    bench_isap_k_128,
    bench_isap_k_128a
);
