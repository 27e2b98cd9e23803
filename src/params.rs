//! Parameter sets for Paillier key generation and aggregation
//!
//! The security parameter is the bit length of the modulus n = p·q; each
//! prime is drawn at half that length.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};

/// Smallest accepted modulus size in bits (two 4-bit primes)
pub const MIN_SECURITY_BITS: usize = 8;

/// Default bound on key generation attempts before giving up
pub const DEFAULT_MAX_KEYGEN_ATTEMPTS: usize = 64;

/// Batches at least this long are folded with rayon
pub const DEFAULT_PARALLEL_FOLD_THRESHOLD: usize = 64;

/// Validate a security parameter: even and at least [`MIN_SECURITY_BITS`].
///
/// Out-of-range values are rejected, never clamped.
pub fn validate_security_bits(bits: usize) -> Result<()> {
    if bits < MIN_SECURITY_BITS {
        return Err(TallyError::InvalidParameter(format!(
            "security_bits must be >= {}, got {}",
            MIN_SECURITY_BITS, bits
        )));
    }
    if bits % 2 != 0 {
        return Err(TallyError::InvalidParameter(format!(
            "security_bits must be even, got {}",
            bits
        )));
    }
    Ok(())
}

/// Configuration for an aggregator and its key pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyParams {
    /// Bit length of the Paillier modulus n
    pub security_bits: usize,

    /// Key generation retries before reporting `KeyGeneration`
    #[serde(default = "default_max_keygen_attempts")]
    pub max_keygen_attempts: usize,

    /// Minimum batch length folded in parallel on submit
    #[serde(default = "default_parallel_fold_threshold")]
    pub parallel_fold_threshold: usize,
}

fn default_max_keygen_attempts() -> usize {
    DEFAULT_MAX_KEYGEN_ATTEMPTS
}

fn default_parallel_fold_threshold() -> usize {
    DEFAULT_PARALLEL_FOLD_THRESHOLD
}

impl TallyParams {
    /// Parameters with the given modulus size and default tuning
    pub fn with_bits(security_bits: usize) -> Self {
        Self {
            security_bits,
            max_keygen_attempts: DEFAULT_MAX_KEYGEN_ATTEMPTS,
            parallel_fold_threshold: DEFAULT_PARALLEL_FOLD_THRESHOLD,
        }
    }

    /// 2048-bit modulus, the usual Paillier deployment size
    pub fn secure_2048() -> Self {
        Self::with_bits(2048)
    }

    /// 32-bit modulus for demos.
    ///
    /// Large enough to sum a few hundred six-figure salaries without wrapping,
    /// far too small to be secure.
    pub fn demo_32() -> Self {
        Self::with_bits(32)
    }

    /// Largest plaintext sum representable without wrapping mod n, as a bit count.
    ///
    /// n has at least `security_bits - 1` bits, so any sum below
    /// 2^(security_bits - 2) is safe.
    pub fn safe_sum_bits(&self) -> usize {
        self.security_bits.saturating_sub(2)
    }

    /// Check if parameters are valid
    pub fn validate(&self) -> Result<()> {
        validate_security_bits(self.security_bits)?;

        if self.max_keygen_attempts == 0 {
            return Err(TallyError::InvalidParameter(
                "max_keygen_attempts must be at least 1".into(),
            ));
        }

        if self.parallel_fold_threshold == 0 {
            return Err(TallyError::InvalidParameter(
                "parallel_fold_threshold must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

impl Default for TallyParams {
    fn default() -> Self {
        Self::secure_2048()
    }
}
