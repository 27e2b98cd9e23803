//! Error handling for the cryptosystem and the tally protocol
//!
//! A single `TallyError` is shared by every layer so callers match on one type
//! whether a failure came from key generation, encryption, the aggregator, or the codec.

use std::fmt;

/// Operation error
#[derive(Debug)]
pub enum TallyError {
    /// Key generation failed (coincident primes or non-invertible lambda).
    ///
    /// Retry-worthy: drawing fresh primes usually succeeds.
    KeyGeneration(String),
    /// Security parameter or configuration rejected by validation
    InvalidParameter(String),
    /// Aggregator operation invoked outside the phase it is valid in
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// Phase the aggregator was in
        phase: &'static str,
    },
    /// Plaintext is not in `[0, n)`
    PlaintextOutOfRange,
    /// Ciphertext is not in `[0, n^2)`
    CiphertextOutOfRange,
    /// Ciphertext shares a factor with n, so no encryption can produce it
    CiphertextNotInvertible,
    /// Malformed encoded key material or ciphertext
    Codec(String),
    /// Underlying reader or writer failed
    Io(std::io::Error),
}

impl fmt::Display for TallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyGeneration(msg) => write!(f, "key generation failed: {}", msg),
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
            Self::InvalidState { operation, phase } => {
                write!(f, "cannot {} while aggregator is {}", operation, phase)
            }
            Self::PlaintextOutOfRange => write!(f, "plaintext must be less than n"),
            Self::CiphertextOutOfRange => write!(f, "ciphertext must be less than n^2"),
            Self::CiphertextNotInvertible => write!(f, "ciphertext is not coprime to n"),
            Self::Codec(msg) => write!(f, "codec error: {}", msg),
            Self::Io(err) => write!(f, "i/o error: {}", err),
        }
    }
}

impl std::error::Error for TallyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl TallyError {
    /// True for failures that a fresh key generation attempt may resolve
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::KeyGeneration(_))
    }
}

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Result type for all crate operations
pub type Result<T> = std::result::Result<T, TallyError>;

/// Create a `TallyError::Codec` with format string support
macro_rules! codec_err {
    ($($arg:tt)*) => {
        $crate::error::TallyError::Codec(format!($($arg)*))
    };
}

pub(crate) use codec_err;
