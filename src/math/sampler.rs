//! Entropy source and uniform sampling over Z_n

use num_bigint::{BigUint, RandBigInt};
use rand::{CryptoRng, Error, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::modular::ModN;

/// Injectable entropy source for every randomized operation.
///
/// Any `Rng` works where this crate asks for randomness; this type is the
/// ChaCha20-backed default with an explicit seeding constructor for reproducible runs.
pub struct EntropySource {
    rng: ChaCha20Rng,
}

impl EntropySource {
    /// Create a source seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Create a seeded source for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is given, OS entropy otherwise
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::with_seed)
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for EntropySource {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.rng.try_fill_bytes(dest)
    }
}

impl CryptoRng for EntropySource {}

/// Sample a unit of Z_n: uniform in [1, n) with gcd(r, n) = 1.
///
/// Non-coprime draws are rejected and redrawn. n must be greater than 2.
pub fn sample_unit<R: Rng + ?Sized>(n: &BigUint, rng: &mut R) -> BigUint {
    let one = BigUint::from(1u32);
    loop {
        let r = rng.gen_biguint_range(&one, n);
        if ModN::is_coprime(&r, n) {
            return r;
        }
    }
}
