//! Encrypted running total for one category

use num_bigint::BigUint;
use rand::Rng;

use crate::error::Result;
use crate::paillier::{decrypt, encrypt, homomorphic_add, Ciphertext, PublicKey, SecretKey};

/// Homomorphic sum of every value folded in so far, plus how many there were
#[derive(Clone, Debug)]
pub struct RunningTotal {
    total: Ciphertext,
    count: u64,
}

impl RunningTotal {
    /// Start from a fresh encryption of zero
    pub fn new<R: Rng + ?Sized>(pk: &PublicKey, rng: &mut R) -> Result<Self> {
        Ok(Self {
            total: encrypt(pk, &BigUint::from(0u32), rng)?,
            count: 0,
        })
    }

    /// Fold in an already-combined batch of `count` ciphertexts
    pub fn absorb(&mut self, batch_sum: &Ciphertext, count: u64, pk: &PublicKey) {
        self.total = homomorphic_add(&self.total, batch_sum, pk);
        self.count += count;
    }

    /// Number of values folded in
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Current encrypted total
    pub fn ciphertext(&self) -> &Ciphertext {
        &self.total
    }

    /// Decrypt, consuming the total
    pub fn finish(self, sk: &SecretKey, pk: &PublicKey) -> (BigUint, u64) {
        (decrypt(&self.total, sk, pk), self.count)
    }
}
