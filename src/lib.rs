//! paillier-tally: additively homomorphic encryption for private sums
//!
//! This crate implements the Paillier cryptosystem and a small aggregation
//! protocol on top of it: untrusted reporters encrypt numeric values under an
//! aggregator's public key, the aggregator multiplies ciphertexts together, and
//! only the per-category totals are ever decrypted.
//!
//! Key components:
//! - Key generation over a composite modulus n = p·q with g = n + 1
//! - Encryption, decryption, and homomorphic addition over Z_{n^2}
//! - A single-shot aggregator keeping one encrypted running total per category
//! - Explicit, injectable randomness for reproducible runs
//!
//! Not constant-time; do not use for production without a security review.

pub mod error;
pub mod math;
pub mod paillier;
pub mod params;
pub mod tally;

pub use error::{Result, TallyError};
pub use paillier::{
    add_plain, decrypt, encrypt, encrypt_wrapping, generate, homomorphic_add, mul_plain,
    Ciphertext, KeyPair, PublicKey, SecretKey,
};
pub use params::TallyParams;
pub use tally::{encrypt_batch, Aggregator, Category, Reporter, TallyReport};
