//! Paillier additively homomorphic cryptosystem.
//!
//! # Scheme
//!
//! 1. **KeyGen**: draw distinct primes p, q of `bits/2` bits; n = p·q, g = n + 1,
//!    lambda = (p-1)(q-1), mu = lambda^-1 mod n
//! 2. **Encrypt**: c = g^m · r^n mod n^2 for a random unit r of Z_n
//! 3. **Decrypt**: m = L(c^lambda mod n^2) · mu mod n with L(u) = (u - 1) / n
//! 4. **Add**: c1 · c2 mod n^2 encrypts m1 + m2 mod n
//!
//! # Example
//!
//! ```
//! use num_bigint::BigUint;
//! use paillier_tally::math::EntropySource;
//! use paillier_tally::paillier::{decrypt, encrypt, generate, homomorphic_add};
//!
//! let mut rng = EntropySource::with_seed(7);
//! let keys = generate(128, &mut rng)?;
//!
//! let a = encrypt(&keys.public, &BigUint::from(1200u32), &mut rng)?;
//! let b = encrypt(&keys.public, &BigUint::from(34u32), &mut rng)?;
//! let sum = homomorphic_add(&a, &b, &keys.public);
//!
//! assert_eq!(decrypt(&sum, &keys.secret, &keys.public), BigUint::from(1234u32));
//! # Ok::<(), paillier_tally::TallyError>(())
//! ```

mod codec;
mod enc;
mod keygen;
mod types;

pub use codec::{CODEC_VERSION, MAX_FIELD_LEN};
pub use enc::{
    add_plain, decrypt, encrypt, encrypt_wrapping, fold, fold_parallel, homomorphic_add,
    mul_plain,
};
pub use keygen::{generate, generate_with_attempts, try_generate};
pub use types::{Ciphertext, KeyPair, PublicKey, SecretKey};
