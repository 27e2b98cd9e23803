//! Key generation: security parameter → (PublicKey, SecretKey)

use num_bigint::BigUint;
use rand::Rng;
use tracing::debug;

use crate::error::{Result, TallyError};
use crate::math::{random_prime, ModN};
use crate::params::{validate_security_bits, DEFAULT_MAX_KEYGEN_ATTEMPTS};

use super::types::{KeyPair, PublicKey, SecretKey};

impl KeyPair {
    /// Build a key pair from two primes.
    ///
    /// Computes n = p·q, g = n + 1, lambda = (p-1)(q-1), mu = lambda^-1 mod n.
    /// Fails with `KeyGeneration` if p = q or gcd(lambda, n) != 1.
    /// Primality of the inputs is the caller's responsibility.
    pub fn from_primes(p: &BigUint, q: &BigUint) -> Result<Self> {
        if p == q {
            return Err(TallyError::KeyGeneration(
                "primes coincide, n would be a perfect square".into(),
            ));
        }

        let n = p * q;
        let lambda = (p - 1u32) * (q - 1u32);
        let mu = ModN::inverse(&lambda, &n).ok_or_else(|| {
            TallyError::KeyGeneration("lambda is not invertible modulo n".into())
        })?;

        Ok(Self {
            public: PublicKey::from_modulus(n),
            secret: SecretKey::new(lambda, mu),
        })
    }
}

/// Single key generation attempt.
///
/// Draws two independent `bits/2`-bit primes. Returns `KeyGeneration` when the
/// draw is unusable; the caller decides whether to retry.
pub fn try_generate<R: Rng + ?Sized>(bits: usize, rng: &mut R) -> Result<KeyPair> {
    validate_security_bits(bits)?;

    let half = bits / 2;
    let p = random_prime(half, rng)?;
    let q = random_prime(half, rng)?;

    KeyPair::from_primes(&p, &q)
}

/// KeyGen(bits) with the default retry bound
pub fn generate<R: Rng + ?Sized>(bits: usize, rng: &mut R) -> Result<KeyPair> {
    generate_with_attempts(bits, DEFAULT_MAX_KEYGEN_ATTEMPTS, rng)
}

/// KeyGen(bits), retrying retryable failures up to `max_attempts` times.
///
/// Invalid parameters fail immediately. On success gcd(lambda, n) = 1 holds.
pub fn generate_with_attempts<R: Rng + ?Sized>(
    bits: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<KeyPair> {
    validate_security_bits(bits)?;

    let mut last_err = None;
    for attempt in 1..=max_attempts {
        match try_generate(bits, rng) {
            Ok(keys) => {
                debug!(bits, attempt, modulus_bits = keys.public.bits(), "generated key pair");
                return Ok(keys);
            }
            Err(err) if err.is_retryable() => {
                debug!(bits, attempt, %err, "key generation attempt rejected, retrying");
                last_err = Some(err);
            }
            Err(err) => return Err(err),
        }
    }

    Err(match last_err {
        Some(TallyError::KeyGeneration(msg)) => TallyError::KeyGeneration(format!(
            "gave up after {} attempts: {}",
            max_attempts, msg
        )),
        _ => TallyError::KeyGeneration(format!("gave up after {} attempts", max_attempts)),
    })
}
