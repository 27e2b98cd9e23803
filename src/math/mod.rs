//! Number-theoretic primitives for the Paillier cryptosystem.
//!
//! - **Modular arithmetic** over Z_n and Z_{n^2} on arbitrary-precision integers
//! - **Prime generation** with a probabilistic primality test
//! - **Uniform sampling** of units of Z_n from an injectable entropy source
//!
//! # Example
//!
//! ```
//! use num_bigint::BigUint;
//! use paillier_tally::math::{random_prime, EntropySource, ModN};
//!
//! let mut rng = EntropySource::with_seed(1);
//! let p = random_prime(32, &mut rng).unwrap();
//! assert!(ModN::inverse(&BigUint::from(2u32), &p).is_some());
//! ```

pub mod modular;
pub mod prime;
pub mod sampler;

pub use modular::ModN;
pub use prime::{is_probable_prime, random_prime};
pub use sampler::{sample_unit, EntropySource};
