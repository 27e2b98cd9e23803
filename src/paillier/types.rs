//! Paillier key and ciphertext types

use std::fmt;

use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};
use crate::math::ModN;

/// Public key (n, g) with g = n + 1.
///
/// n^2 is cached because every ciphertext operation reduces modulo it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPublicKey", into = "RawPublicKey")]
pub struct PublicKey {
    n: BigUint,
    g: BigUint,
    n_squared: BigUint,
}

#[derive(Serialize, Deserialize)]
struct RawPublicKey {
    n: BigUint,
    g: BigUint,
}

impl TryFrom<RawPublicKey> for PublicKey {
    type Error = TallyError;

    fn try_from(raw: RawPublicKey) -> Result<Self> {
        Self::from_parts(raw.n, raw.g)
    }
}

impl From<PublicKey> for RawPublicKey {
    fn from(pk: PublicKey) -> Self {
        Self { n: pk.n, g: pk.g }
    }
}

impl PublicKey {
    /// Public key for modulus n with the canonical generator g = n + 1.
    ///
    /// Callers must have checked n > 2; outside the crate use [`Self::from_parts`].
    pub(crate) fn from_modulus(n: BigUint) -> Self {
        let g = &n + 1u32;
        let n_squared = &n * &n;
        Self { n, g, n_squared }
    }

    /// Rebuild a public key from stored parts, checking g = n + 1 and n > 2
    pub fn from_parts(n: BigUint, g: BigUint) -> Result<Self> {
        if n <= BigUint::from(2u32) {
            return Err(TallyError::InvalidParameter(format!(
                "modulus must be greater than 2, got {}",
                n
            )));
        }
        if g != &n + 1u32 {
            return Err(TallyError::InvalidParameter(
                "generator must be n + 1".into(),
            ));
        }
        Ok(Self::from_modulus(n))
    }

    /// Modulus n = p·q
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Generator g = n + 1
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Ciphertext modulus n^2
    pub fn n_squared(&self) -> &BigUint {
        &self.n_squared
    }

    /// Bit length of n
    pub fn bits(&self) -> u64 {
        self.n.bits()
    }

    /// True if `m` is a plaintext this key can encrypt without wrapping
    pub fn contains_plaintext(&self, m: &BigUint) -> bool {
        m < &self.n
    }

    /// True if `c` lies in the ciphertext space [0, n^2)
    pub fn contains_ciphertext(&self, c: &Ciphertext) -> bool {
        c.value() < &self.n_squared
    }

    /// Range-check `c`, then require it to be a unit mod n^2.
    ///
    /// Every honest encryption g^m·r^n is coprime to n, so anything else was not
    /// produced under this key and would corrupt a running total.
    pub fn check_ciphertext(&self, c: &Ciphertext) -> Result<()> {
        if !self.contains_ciphertext(c) {
            return Err(TallyError::CiphertextOutOfRange);
        }
        if !ModN::is_coprime(c.value(), &self.n) {
            return Err(TallyError::CiphertextNotInvertible);
        }
        Ok(())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("n", &self.n)
            .field("bits", &self.bits())
            .finish()
    }
}

/// Secret key (lambda, mu) with lambda = (p-1)(q-1) and mu = lambda^-1 mod n.
///
/// Deliberately has no serde impls and a redacted `Debug`; export goes through
/// the explicit codec only.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    lambda: BigUint,
    mu: BigUint,
}

impl SecretKey {
    pub(crate) fn new(lambda: BigUint, mu: BigUint) -> Self {
        Self { lambda, mu }
    }

    /// Rebuild a secret key, checking that mu inverts lambda modulo the key's n
    pub fn from_parts(lambda: BigUint, mu: BigUint, pk: &PublicKey) -> Result<Self> {
        if !((&lambda * &mu) % pk.n()).is_one() {
            return Err(TallyError::InvalidParameter(
                "mu is not the inverse of lambda modulo n".into(),
            ));
        }
        Ok(Self { lambda, mu })
    }

    /// Carmichael-style exponent (p-1)(q-1)
    pub fn lambda(&self) -> &BigUint {
        &self.lambda
    }

    /// lambda^-1 mod n
    pub fn mu(&self) -> &BigUint {
        &self.mu
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey { .. }")
    }
}

/// Public and secret key generated together
#[derive(Clone, Debug)]
pub struct KeyPair {
    /// Encryption key, safe to hand to submitters
    pub public: PublicKey,
    /// Decryption key, stays with the aggregator
    pub secret: SecretKey,
}

impl KeyPair {
    /// Split into (public, secret)
    pub fn into_parts(self) -> (PublicKey, SecretKey) {
        (self.public, self.secret)
    }
}

/// Paillier ciphertext: an element of Z_{n^2}
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ciphertext(BigUint);

impl Ciphertext {
    /// Wrap a raw value (not checked against any key)
    pub fn from_value(value: BigUint) -> Self {
        Self(value)
    }

    /// Exact identity for homomorphic addition: 1 = g^0 · 1^n, an encryption of 0
    pub fn identity() -> Self {
        Self(BigUint::one())
    }

    /// Underlying value (read-only)
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Consume into the underlying value
    pub fn into_value(self) -> BigUint {
        self.0
    }
}
