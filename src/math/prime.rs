//! Random prime generation

use num_bigint::{BigUint, RandBigInt};
use num_prime::nt_funcs::is_prime;
use num_prime::PrimalityTestConfig;
use num_traits::One;
use rand::Rng;

use crate::error::{Result, TallyError};

/// Test primality (deterministic for small values, BPSW-strength otherwise)
pub fn is_probable_prime(candidate: &BigUint) -> bool {
    is_prime(candidate, Some(PrimalityTestConfig::default())).probably()
}

/// Draw a random prime of exactly `bits` bits.
///
/// The top bit is forced so the prime has the full length, and the low bit so
/// only odd candidates are tested.
pub fn random_prime<R: Rng + ?Sized>(bits: usize, rng: &mut R) -> Result<BigUint> {
    if bits < 3 {
        return Err(TallyError::InvalidParameter(format!(
            "prime bit length must be >= 3, got {}",
            bits
        )));
    }

    let top = BigUint::one() << (bits - 1);
    loop {
        let mut candidate = rng.gen_biguint(bits as u64);
        candidate |= &top;
        candidate |= BigUint::one();
        if is_probable_prime(&candidate) {
            return Ok(candidate);
        }
    }
}
