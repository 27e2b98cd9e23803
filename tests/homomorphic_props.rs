//! Algebraic properties of the cryptosystem over a fixed 128-bit key pair

use std::sync::OnceLock;

use num_bigint::BigUint;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use paillier_tally::paillier::{
    decrypt, encrypt, fold, fold_parallel, generate, homomorphic_add, mul_plain, Ciphertext,
    KeyPair,
};

fn keys() -> &'static KeyPair {
    static KEYS: OnceLock<KeyPair> = OnceLock::new();
    KEYS.get_or_init(|| generate(128, &mut ChaCha20Rng::seed_from_u64(2718)).unwrap())
}

fn enc(m: u64, seed: u64) -> Ciphertext {
    let keys = keys();
    encrypt(&keys.public, &BigUint::from(m), &mut ChaCha20Rng::seed_from_u64(seed)).unwrap()
}

fn dec(c: &Ciphertext) -> BigUint {
    let keys = keys();
    decrypt(c, &keys.secret, &keys.public)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn roundtrip(m in any::<u64>(), seed in any::<u64>()) {
        prop_assert_eq!(dec(&enc(m, seed)), BigUint::from(m));
    }

    #[test]
    fn addition_is_homomorphic(
        m1 in any::<u64>(),
        m2 in any::<u64>(),
        s1 in any::<u64>(),
        s2 in any::<u64>(),
    ) {
        let pk = &keys().public;
        let sum = homomorphic_add(&enc(m1, s1), &enc(m2, s2), pk);
        let expected = (BigUint::from(m1) + BigUint::from(m2)) % pk.n();
        prop_assert_eq!(dec(&sum), expected);
    }

    #[test]
    fn addition_associative_and_commutative(
        a in any::<u32>(),
        b in any::<u32>(),
        c in any::<u32>(),
        seed in any::<u64>(),
    ) {
        let pk = &keys().public;
        let (ca, cb, cc) = (enc(a as u64, seed), enc(b as u64, seed ^ 1), enc(c as u64, seed ^ 2));

        let left = homomorphic_add(&homomorphic_add(&ca, &cb, pk), &cc, pk);
        let right = homomorphic_add(&ca, &homomorphic_add(&cb, &cc, pk), pk);
        let rotated = homomorphic_add(&cc, &homomorphic_add(&ca, &cb, pk), pk);

        prop_assert_eq!(&left, &right);
        prop_assert_eq!(&left, &rotated);
    }

    #[test]
    fn encryption_of_zero_is_identity(m in any::<u64>(), s1 in any::<u64>(), s2 in any::<u64>()) {
        let pk = &keys().public;
        let c = enc(m, s1);
        let shifted = homomorphic_add(&enc(0, s2), &c, pk);
        prop_assert_eq!(dec(&shifted), dec(&c));
    }

    #[test]
    fn scalar_multiplication(m in any::<u32>(), k in any::<u32>(), seed in any::<u64>()) {
        let pk = &keys().public;
        let scaled = mul_plain(&enc(m as u64, seed), &BigUint::from(k), pk);
        prop_assert_eq!(dec(&scaled), BigUint::from(m as u64 * k as u64));
    }

    #[test]
    fn parallel_fold_equals_sequential(
        values in proptest::collection::vec(any::<u32>(), 0..48),
        seed in any::<u64>(),
    ) {
        let pk = &keys().public;
        let cts: Vec<Ciphertext> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| enc(v as u64, seed.wrapping_add(i as u64)))
            .collect();

        let seq = fold(pk, &cts);
        prop_assert_eq!(&seq, &fold_parallel(pk, &cts));

        let expected: u64 = values.iter().map(|&v| v as u64).sum();
        prop_assert_eq!(dec(&seq), BigUint::from(expected));
    }
}

#[test]
fn encryption_is_nondeterministic() {
    let mut rng = ChaCha20Rng::seed_from_u64(31415);
    let pk = &keys().public;
    let m = BigUint::from(123_456u32);

    let c1 = encrypt(pk, &m, &mut rng).unwrap();
    let c2 = encrypt(pk, &m, &mut rng).unwrap();

    assert_ne!(c1, c2);
    assert_eq!(dec(&c1), m);
    assert_eq!(dec(&c2), m);
}
