//! Encrypted-sum tally protocol
//!
//! # Protocol Overview
//!
//! 1. **Setup**: the aggregator generates a key pair and publishes the public key
//! 2. **Report**: each reporter encrypts its values and submits them per category
//! 3. **Fold**: the aggregator multiplies submissions into per-category running totals
//! 4. **Tally**: the aggregator decrypts each total once and stops accepting input
//!
//! # Example
//!
//! ```
//! use num_bigint::BigUint;
//! use paillier_tally::math::EntropySource;
//! use paillier_tally::params::TallyParams;
//! use paillier_tally::tally::{Aggregator, Category, Reporter};
//!
//! let mut rng = EntropySource::with_seed(42);
//! let aggregator = Aggregator::new(&TallyParams::with_bits(64), &mut rng)?;
//!
//! let reporter = Reporter::for_aggregator(&aggregator);
//! reporter.report(&aggregator, Category::A, [100u64, 200], &mut rng)?;
//! reporter.report(&aggregator, Category::B, [50u64], &mut rng)?;
//!
//! let (a, b) = aggregator.tally()?;
//! assert_eq!((a, b), (BigUint::from(300u32), BigUint::from(50u32)));
//! # Ok::<(), paillier_tally::TallyError>(())
//! ```

mod aggregator;
mod category;
mod running_total;
mod submitter;

pub use aggregator::{Aggregator, CategoryTally, TallyReport};
pub use category::Category;
pub use running_total::RunningTotal;
pub use submitter::{encrypt_batch, Reporter};
