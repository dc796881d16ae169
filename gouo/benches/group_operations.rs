use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gouo::{GroupOps, RsaGroup};
use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

const MODULUS_HEX: &[u8] = b"c56fdb33f2441a8056018bc6dfb0c131659ae2da6c6f80367176aaef3cbe9ca297eafa5096297961782dbfaea3baec9f04401080fb3a0f353556d1fd94fe0967b9162a7d98ebde8c5038941d329db523eb5bf0820e45f5d0d4b98a94790ed8f7af32c732189f3b2ea01437f6da590c38f2cdfa40f62b8bde54c08ec0da15a880a3b0c2baf05de4f2a653231607e47f04c898aed4163fb8fd4a0f666e24574cddfecaf4e59ef7c553dcbbe21080f2347a8b93bd4d90e31b01d779a09d24b71b4943dfcc5d3ef8155bc6df727bf001808114330d5ca2121b7773c99cf7fc55c8bc84864b079df13449715f14a1ec68449ab00355b1b4d0d88548c00cbcb94482ab";

const TIERS: [usize; 3] = [136, 2048, 4353];

fn random_exponent(rng: &mut StdRng, bits: usize) -> BigUint {
    let mut buf = vec![0u8; bits.div_ceil(8)];
    rng.fill_bytes(&mut buf);
    BigUint::from_bytes_be(&buf) >> (buf.len() * 8 - bits)
}

fn setup() -> RsaGroup {
    let n = BigUint::parse_bytes(MODULUS_HEX, 16).expect("modulus");
    RsaGroup::new(n, BigUint::from(2u32), BigUint::from(3u32), &TIERS, 512).expect("group")
}

fn bench_powgh(c: &mut Criterion) {
    let group = setup();
    let mut rng = StdRng::seed_from_u64(42);
    let mut bench = c.benchmark_group("powgh");

    for bits in TIERS {
        let e1 = random_exponent(&mut rng, bits);
        let e2 = random_exponent(&mut rng, bits);
        bench.bench_with_input(BenchmarkId::from_parameter(bits), &bits, |bencher, _| {
            bencher.iter(|| black_box(group.powgh(black_box(&e1), black_box(&e2)).expect("powgh")))
        });
    }
    bench.finish();
}

fn bench_naive_powgh(c: &mut Criterion) {
    let group = setup();
    let mut rng = StdRng::seed_from_u64(42);
    let (g, h) = group.generators();
    let n = group.modulus();
    let e1 = random_exponent(&mut rng, 2048);
    let e2 = random_exponent(&mut rng, 2048);

    c.bench_function("naive_powgh_2048", |bencher| {
        bencher.iter(|| black_box((g.modpow(black_box(&e1), n) * h.modpow(black_box(&e2), n)) % n))
    });
}

fn bench_pow2(c: &mut Criterion) {
    let group = setup();
    let mut rng = StdRng::seed_from_u64(7);
    let b1 = group.reduce(&random_exponent(&mut rng, 2040));
    let b2 = group.reduce(&random_exponent(&mut rng, 2040));
    let (i1, i2) = group.inv2(&b1, &b2).expect("inverse");
    let e1 = random_exponent(&mut rng, 136);
    let e2 = random_exponent(&mut rng, 128);

    c.bench_function("pow2_136", |bencher| {
        bencher.iter(|| {
            black_box(group.pow2(
                black_box(&b1),
                &i1,
                black_box(&e1),
                black_box(&b2),
                &i2,
                black_box(&e2),
            ))
        })
    });
}

fn bench_inv_batch(c: &mut Criterion) {
    let group = setup();
    let mut rng = StdRng::seed_from_u64(9);
    let xs: [BigUint; 7] = core::array::from_fn(|_| group.reduce(&random_exponent(&mut rng, 2040)));

    c.bench_function("inv_batch_7", |bencher| {
        bencher.iter(|| black_box(group.inv_batch(black_box(&xs)).expect("inverse")))
    });
}

criterion_group!(benches, bench_powgh, bench_naive_powgh, bench_pow2, bench_inv_batch);
criterion_main!(benches);
