//! Paillier encryption, decryption, and homomorphic operations

use num_bigint::BigUint;
use rand::Rng;
use rayon::prelude::*;

use crate::error::{Result, TallyError};
use crate::math::{sample_unit, ModN};

use super::types::{Ciphertext, PublicKey, SecretKey};

/// Encrypt a plaintext in [0, n)
///
/// Computes: c = g^m · r^n mod n^2 with a fresh unit r drawn from `rng`,
/// so two encryptions of the same m differ.
///
/// Returns `PlaintextOutOfRange` if m >= n; use [`encrypt_wrapping`] to
/// encrypt m mod n instead.
pub fn encrypt<R: Rng + ?Sized>(pk: &PublicKey, m: &BigUint, rng: &mut R) -> Result<Ciphertext> {
    if !pk.contains_plaintext(m) {
        return Err(TallyError::PlaintextOutOfRange);
    }
    Ok(encrypt_unchecked(pk, m, rng))
}

/// Encrypt m mod n.
///
/// Never fails: a plaintext at or above n silently becomes m mod n, so the
/// decryption will not equal m. Only use when that wrap is intended.
pub fn encrypt_wrapping<R: Rng + ?Sized>(pk: &PublicKey, m: &BigUint, rng: &mut R) -> Ciphertext {
    let reduced = m % pk.n();
    encrypt_unchecked(pk, &reduced, rng)
}

fn encrypt_unchecked<R: Rng + ?Sized>(pk: &PublicKey, m: &BigUint, rng: &mut R) -> Ciphertext {
    let n_sq = pk.n_squared();
    let r = sample_unit(pk.n(), rng);

    let g_m = ModN::pow(pk.g(), m, n_sq);
    let r_n = ModN::pow(&r, pk.n(), n_sq);

    Ciphertext::from_value(ModN::mul(&g_m, &r_n, n_sq))
}

/// Decrypt a ciphertext to recover m in [0, n)
///
/// Computes: m = L(c^lambda mod n^2) · mu mod n, where L(u) = (u - 1) / n
///
/// The ciphertext must come from this exact key pair. A foreign ciphertext
/// decrypts to an unrelated value rather than an error (debug builds trip the
/// L-function divisibility assertion).
pub fn decrypt(c: &Ciphertext, sk: &SecretKey, pk: &PublicKey) -> BigUint {
    let n = pk.n();
    let n_sq = pk.n_squared();
    debug_assert!(pk.contains_ciphertext(c), "ciphertext outside [0, n^2)");

    let u = ModN::pow(c.value(), sk.lambda(), n_sq);
    let l = ModN::l_function(&u, n, n_sq);

    ModN::mul(&l, sk.mu(), n)
}

/// Homomorphic addition of two ciphertexts
///
/// If c1 encrypts m1 and c2 encrypts m2, the result encrypts (m1 + m2) mod n.
/// Deterministic, associative, and commutative on ciphertext values.
pub fn homomorphic_add(c1: &Ciphertext, c2: &Ciphertext, pk: &PublicKey) -> Ciphertext {
    Ciphertext::from_value(ModN::mul(c1.value(), c2.value(), pk.n_squared()))
}

/// Add a public plaintext constant: c · g^k encrypts m + k
pub fn add_plain(c: &Ciphertext, k: &BigUint, pk: &PublicKey) -> Ciphertext {
    let n_sq = pk.n_squared();
    let g_k = ModN::pow(pk.g(), k, n_sq);
    Ciphertext::from_value(ModN::mul(c.value(), &g_k, n_sq))
}

/// Scalar multiplication: c^k encrypts k · m
pub fn mul_plain(c: &Ciphertext, k: &BigUint, pk: &PublicKey) -> Ciphertext {
    Ciphertext::from_value(ModN::pow(c.value(), k, pk.n_squared()))
}

/// Fold ciphertexts with homomorphic addition, starting at the exact identity
pub fn fold<'a, I>(pk: &PublicKey, ciphertexts: I) -> Ciphertext
where
    I: IntoIterator<Item = &'a Ciphertext>,
{
    ciphertexts
        .into_iter()
        .fold(Ciphertext::identity(), |acc, c| homomorphic_add(&acc, c, pk))
}

/// Parallel fold
///
/// Same value as [`fold`]: the reduction order varies across threads, which
/// associativity and commutativity make irrelevant.
pub fn fold_parallel(pk: &PublicKey, ciphertexts: &[Ciphertext]) -> Ciphertext {
    ciphertexts
        .par_iter()
        .fold(Ciphertext::identity, |acc, c| homomorphic_add(&acc, c, pk))
        .reduce(Ciphertext::identity, |a, b| homomorphic_add(&a, &b, pk))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EntropySource;
    use crate::paillier::types::KeyPair;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    fn textbook_keys() -> KeyPair {
        KeyPair::from_primes(&big(11), &big(13)).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip_every_plaintext() {
        let keys = textbook_keys();
        let mut rng = EntropySource::with_seed(1);

        for m in 0..143u64 {
            let c = encrypt(&keys.public, &big(m), &mut rng).unwrap();
            assert!(keys.public.contains_ciphertext(&c));
            assert_eq!(decrypt(&c, &keys.secret, &keys.public), big(m), "Failed for message {}", m);
        }
    }

    #[test]
    fn test_encrypt_known_value() {
        // r^n mod n^2 with r = 1 is 1, so c = g^m = 1 + m·n for this generator
        let keys = textbook_keys();
        let c = add_plain(&Ciphertext::identity(), &big(5), &keys.public);
        assert_eq!(c.value(), &big(1 + 5 * 143));
        assert_eq!(decrypt(&c, &keys.secret, &keys.public), big(5));
    }

    #[test]
    fn test_encrypt_rejects_out_of_range() {
        let keys = textbook_keys();
        let mut rng = EntropySource::with_seed(2);
        assert!(matches!(
            encrypt(&keys.public, &big(143), &mut rng),
            Err(TallyError::PlaintextOutOfRange)
        ));
    }

    #[test]
    fn test_encrypt_wrapping_reduces_mod_n() {
        let keys = textbook_keys();
        let mut rng = EntropySource::with_seed(3);
        for m in [143u64, 150, 1000] {
            let c = encrypt_wrapping(&keys.public, &big(m), &mut rng);
            assert_eq!(decrypt(&c, &keys.secret, &keys.public), big(m % 143));
        }
    }

    #[test]
    fn test_encryption_is_randomized() {
        let keys = textbook_keys();
        let mut rng = EntropySource::with_seed(4);
        let c1 = encrypt(&keys.public, &big(42), &mut rng).unwrap();
        let mut c2 = encrypt(&keys.public, &big(42), &mut rng).unwrap();
        // Only 120 blinding factors exist mod 143, so allow a few redraws
        for _ in 0..8 {
            if c2 != c1 {
                break;
            }
            c2 = encrypt(&keys.public, &big(42), &mut rng).unwrap();
        }
        assert_ne!(c1, c2);
        assert_eq!(decrypt(&c1, &keys.secret, &keys.public), big(42));
        assert_eq!(decrypt(&c2, &keys.secret, &keys.public), big(42));
    }

    #[test]
    fn test_homomorphic_addition() {
        let keys = textbook_keys();
        let mut rng = EntropySource::with_seed(5);

        let c1 = encrypt(&keys.public, &big(100), &mut rng).unwrap();
        let c2 = encrypt(&keys.public, &big(80), &mut rng).unwrap();
        let sum = homomorphic_add(&c1, &c2, &keys.public);

        assert_eq!(decrypt(&sum, &keys.secret, &keys.public), big((100 + 80) % 143));
    }

    #[test]
    fn test_add_plain() {
        let keys = textbook_keys();
        let mut rng = EntropySource::with_seed(6);
        let c = encrypt(&keys.public, &big(30), &mut rng).unwrap();
        let shifted = add_plain(&c, &big(12), &keys.public);
        assert_eq!(decrypt(&shifted, &keys.secret, &keys.public), big(42));
    }

    #[test]
    fn test_mul_plain() {
        let keys = textbook_keys();
        let mut rng = EntropySource::with_seed(7);
        let c = encrypt(&keys.public, &big(9), &mut rng).unwrap();
        let scaled = mul_plain(&c, &big(5), &keys.public);
        assert_eq!(decrypt(&scaled, &keys.secret, &keys.public), big(45));
    }

    #[test]
    fn test_fold_scenario_eight_bit() {
        let keys = crate::paillier::keygen::generate(8, &mut EntropySource::with_seed(8)).unwrap();
        let mut rng = EntropySource::with_seed(9);

        let zero = encrypt(&keys.public, &big(0), &mut rng).unwrap();
        let values: Vec<Ciphertext> = [3u64, 7, 10]
            .iter()
            .map(|&v| encrypt(&keys.public, &big(v), &mut rng).unwrap())
            .collect();

        let total = values
            .iter()
            .fold(zero, |acc, c| homomorphic_add(&acc, c, &keys.public));
        assert_eq!(decrypt(&total, &keys.secret, &keys.public), big(20));
    }

    #[test]
    fn test_fold_parallel_matches_sequential() {
        let mut key_rng = EntropySource::with_seed(10);
        let keys = crate::paillier::keygen::generate(128, &mut key_rng).unwrap();
        let mut rng = EntropySource::with_seed(11);

        let cts: Vec<Ciphertext> = (0..257u64)
            .map(|v| encrypt(&keys.public, &big(v), &mut rng).unwrap())
            .collect();

        let seq = fold(&keys.public, &cts);
        let par = fold_parallel(&keys.public, &cts);
        assert_eq!(seq, par);
        assert_eq!(decrypt(&seq, &keys.secret, &keys.public), big(256 * 257 / 2));
    }

    #[test]
    fn test_fold_empty_is_identity() {
        let keys = textbook_keys();
        assert_eq!(fold(&keys.public, &Vec::new()), Ciphertext::identity());
        assert_eq!(fold_parallel(&keys.public, &[]), Ciphertext::identity());
        assert_eq!(decrypt(&Ciphertext::identity(), &keys.secret, &keys.public), big(0));
    }
}
