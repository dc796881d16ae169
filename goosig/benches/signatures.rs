use criterion::{Criterion, black_box, criterion_group, criterion_main};
use goosig::{Goo, GooConfig, RsaPrivateKey};
use num_bigint::BigUint;

const MODULUS_HEX: &[u8] = b"c4245fc604aa8464c14a75eb6777a6456225dfde64f0aa3ad2109d067bd326f2121eb2757134818a7b8649aca2eb88ae3e4e5d8a530cf0ff75231e5a6f2fe89abb4aeba94c6c2fc69b935a558ddda91b72b04246af58ce5446df07c7e5d8ba80a41c4267f57c2b12dc881c5127e463ad157eb5b6398c91fcb21064a817cb5bf5";
const KEY_P: &[u8] = b"d28760ef9506638db175fe91be734122e49bec562b042161d1857d02f52435b58d7eaeea5569ec0810d555f2753d1d8b74c7d32222b2f1e9cfcafd579dba66b7";
const KEY_Q: &[u8] = b"cb169a27e285089e6a032f49383becf2b193a548686ccada7a90476bd5c29880c1b66c6aeb9e0dca408fe6a37692ffe54cbc6d37cb1dd9c46443517f2453e85b";

fn setup() -> (Goo, RsaPrivateKey) {
    let modulus = BigUint::parse_bytes(MODULUS_HEX, 16).expect("modulus");
    let config = GooConfig {
        exp_bits: 1024,
        ..GooConfig::default()
    };
    let goo = Goo::new(modulus, &config).expect("goo");
    let key = RsaPrivateKey::new(
        BigUint::parse_bytes(KEY_P, 16).expect("p"),
        BigUint::parse_bytes(KEY_Q, 16).expect("q"),
        BigUint::from(65537u32),
    );
    (goo, key)
}

fn bench_setup(c: &mut Criterion) {
    let modulus = BigUint::parse_bytes(MODULUS_HEX, 16).expect("modulus");
    let config = GooConfig {
        exp_bits: 1024,
        ..GooConfig::default()
    };

    c.bench_function("goo_new", |bencher| {
        bencher.iter(|| black_box(Goo::new(black_box(modulus.clone()), &config).expect("goo")))
    });
}

fn bench_sign(c: &mut Criterion) {
    let (goo, key) = setup();
    let seed = [7u8; 32];

    c.bench_function("goo_sign", |bencher| {
        bencher.iter(|| {
            let sig = goo.sign(black_box(b"bench"), &seed, &key).expect("sign");
            black_box(sig);
        })
    });
}

fn bench_verify(c: &mut Criterion) {
    let (goo, key) = setup();
    let seed = [7u8; 32];
    let c1 = goo.challenge(&seed, &key.public()).expect("challenge");
    let sig = goo
        .sign(b"bench", &seed, &key)
        .expect("sign")
        .encode(&goo.signature_layout())
        .expect("encode");

    c.bench_function("goo_verify", |bencher| {
        bencher.iter(|| {
            let ok = goo.verify(black_box(b"bench"), black_box(&sig), &c1);
            black_box(ok);
        })
    });
}

criterion_group!(benches, bench_setup, bench_sign, bench_verify);
criterion_main!(benches);
