use goosig::{Goo, GooConfig, RsaPrivateKey, RsaPublicKey};
use num_bigint::BigUint;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MODULUS_HEX: &[u8] = b"c56fdb33f2441a8056018bc6dfb0c131659ae2da6c6f80367176aaef3cbe9ca297eafa5096297961782dbfaea3baec9f04401080fb3a0f353556d1fd94fe0967b9162a7d98ebde8c5038941d329db523eb5bf0820e45f5d0d4b98a94790ed8f7af32c732189f3b2ea01437f6da590c38f2cdfa40f62b8bde54c08ec0da15a880a3b0c2baf05de4f2a653231607e47f04c898aed4163fb8fd4a0f666e24574cddfecaf4e59ef7c553dcbbe21080f2347a8b93bd4d90e31b01d779a09d24b71b4943dfcc5d3ef8155bc6df727bf001808114330d5ca2121b7773c99cf7fc55c8bc84864b079df13449715f14a1ec68449ab00355b1b4d0d88548c00cbcb94482ab";
const KEY_P: &[u8] = b"d28760ef9506638db175fe91be734122e49bec562b042161d1857d02f52435b58d7eaeea5569ec0810d555f2753d1d8b74c7d32222b2f1e9cfcafd579dba66b7";
const KEY_Q: &[u8] = b"cb169a27e285089e6a032f49383becf2b193a548686ccada7a90476bd5c29880c1b66c6aeb9e0dca408fe6a37692ffe54cbc6d37cb1dd9c46443517f2453e85b";

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let modulus = BigUint::parse_bytes(MODULUS_HEX, 16).expect("modulus");
    let goo = Goo::new(modulus, &GooConfig::default()).expect("goo");

    let sk = RsaPrivateKey::new(
        BigUint::parse_bytes(KEY_P, 16).expect("p"),
        BigUint::parse_bytes(KEY_Q, 16).expect("q"),
        BigUint::from(65537u32),
    );
    let pk = sk.public();

    let sk_bytes = sk.to_bytes().expect("serialize sk");
    let pk_bytes = bincode::serialize(&pk).expect("serialize pk");

    let seed = Goo::generate();
    let c1 = goo.challenge(&seed, &pk).expect("challenge");
    info!(bytes = c1.len(), "published commitment");

    let sk2 = RsaPrivateKey::from_bytes(&sk_bytes).expect("deserialize sk");
    let pk2: RsaPublicKey = bincode::deserialize(&pk_bytes).expect("deserialize pk");
    assert_eq!(pk2, pk);
    assert!(goo.validate(&seed, &c1, &sk2));

    let msg = b"hello goo";
    let sig = goo
        .sign_with_commitment(msg, &seed, &c1, &sk2)
        .expect("sign")
        .encode(&goo.signature_layout())
        .expect("encode");
    info!(bytes = sig.len(), "signed");

    let ok = goo.verify(msg, &sig, &c1);
    info!(ok, "verified");
    assert!(ok);
}
