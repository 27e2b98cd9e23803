//! Aggregator: collects encrypted submissions and decrypts only the totals
//!
//! Lifecycle: **Collecting** → `tally` → **Tallied** (terminal). The secret key
//! never leaves this type; submitters only ever see [`Aggregator::public_key`].

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, TallyError};
use crate::paillier::{
    fold, fold_parallel, generate_with_attempts, Ciphertext, PublicKey, SecretKey,
};
use crate::params::TallyParams;

use super::category::Category;
use super::running_total::RunningTotal;

/// Running totals are indexed by [`Category::index`]
enum Phase {
    Collecting(Vec<RunningTotal>),
    Tallied { counts: Vec<u64> },
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Collecting(_) => "collecting",
            Phase::Tallied { .. } => "tallied",
        }
    }
}

/// Decrypted sum and submission count for one category
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryTally {
    /// Plaintext sum of every submitted value
    pub sum: BigUint,
    /// Number of submitted values
    pub count: u64,
}

impl CategoryTally {
    /// Mean of the submitted values, or `None` if nothing was submitted
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum.to_f64()? / self.count as f64)
    }
}

/// Outcome of tallying every category
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TallyReport {
    /// Per-category results
    pub totals: BTreeMap<Category, CategoryTally>,
}

impl TallyReport {
    /// Result for one category
    pub fn get(&self, category: Category) -> Option<&CategoryTally> {
        self.totals.get(&category)
    }

    /// Decrypted sum for one category (zero if absent)
    pub fn sum(&self, category: Category) -> BigUint {
        self.get(category)
            .map(|t| t.sum.clone())
            .unwrap_or_default()
    }

    /// Mean for one category
    pub fn mean(&self, category: Category) -> Option<f64> {
        self.get(category).and_then(CategoryTally::mean)
    }

    /// Sums for (A, B)
    pub fn pair(&self) -> (BigUint, BigUint) {
        (self.sum(Category::A), self.sum(Category::B))
    }
}

/// Tally server holding the key pair and one running total per category
pub struct Aggregator {
    public_key: PublicKey,
    secret_key: SecretKey,
    params: TallyParams,
    phase: Mutex<Phase>,
}

impl Aggregator {
    /// Generate a key pair and start collecting.
    ///
    /// Each category's total starts as a fresh encryption of zero.
    pub fn new<R: Rng + ?Sized>(params: &TallyParams, rng: &mut R) -> Result<Self> {
        params.validate()?;

        let keys = generate_with_attempts(params.security_bits, params.max_keygen_attempts, rng)?;
        let (public_key, secret_key) = keys.into_parts();

        let totals = Category::ALL
            .iter()
            .map(|_| RunningTotal::new(&public_key, &mut *rng))
            .collect::<Result<Vec<_>>>()?;

        info!(
            bits = params.security_bits,
            modulus_bits = public_key.bits(),
            categories = Category::ALL.len(),
            "aggregator ready"
        );

        Ok(Self {
            public_key,
            secret_key,
            params: params.clone(),
            phase: Mutex::new(Phase::Collecting(totals)),
        })
    }

    /// Public key submitters encrypt under
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Parameters this aggregator was built with
    pub fn params(&self) -> &TallyParams {
        &self.params
    }

    fn lock(&self) -> MutexGuard<'_, Phase> {
        // Every mutation swaps whole values, so a poisoned phase is still consistent
        self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// True once `tally` has run
    pub fn is_tallied(&self) -> bool {
        matches!(*self.lock(), Phase::Tallied { .. })
    }

    /// Values submitted to `category` so far (also readable after tallying)
    pub fn submission_count(&self, category: Category) -> u64 {
        match &*self.lock() {
            Phase::Collecting(totals) => totals[category.index()].count(),
            Phase::Tallied { counts } => counts[category.index()],
        }
    }

    /// Fold a batch of ciphertexts into the running total for `category`.
    ///
    /// The batch is combined before taking the lock, so concurrent submitters only
    /// serialize on a single multiplication. A ciphertext outside [0, n^2) or not
    /// coprime to n rejects the whole batch and leaves the total untouched.
    pub fn submit(&self, category: Category, batch: Vec<Ciphertext>) -> Result<()> {
        if self.is_tallied() {
            return Err(TallyError::InvalidState {
                operation: "submit",
                phase: "tallied",
            });
        }

        for c in &batch {
            self.public_key.check_ciphertext(c)?;
        }

        let batch_len = batch.len() as u64;
        let batch_sum = if batch.len() >= self.params.parallel_fold_threshold {
            fold_parallel(&self.public_key, &batch)
        } else {
            fold(&self.public_key, &batch)
        };

        let mut phase = self.lock();
        let total = match &mut *phase {
            Phase::Collecting(totals) => &mut totals[category.index()],
            tallied => {
                return Err(TallyError::InvalidState {
                    operation: "submit",
                    phase: tallied.name(),
                })
            }
        };
        total.absorb(&batch_sum, batch_len, &self.public_key);

        debug!(%category, batch_len, total_count = total.count(), "folded batch");
        Ok(())
    }

    /// Decrypt every running total and stop collecting.
    ///
    /// Single-shot: any later `tally`, `tally_report`, or `submit` fails with
    /// `InvalidState`. Submission counts stay readable afterwards.
    pub fn tally_report(&self) -> Result<TallyReport> {
        let mut phase = self.lock();
        let placeholder = Phase::Tallied { counts: Vec::new() };
        let totals = match std::mem::replace(&mut *phase, placeholder) {
            Phase::Collecting(totals) => totals,
            tallied => {
                let err = TallyError::InvalidState {
                    operation: "tally",
                    phase: tallied.name(),
                };
                *phase = tallied;
                return Err(err);
            }
        };
        *phase = Phase::Tallied {
            counts: totals.iter().map(RunningTotal::count).collect(),
        };
        drop(phase);

        let totals: BTreeMap<Category, CategoryTally> = Category::ALL
            .into_iter()
            .zip(totals)
            .map(|(category, total)| {
                let (sum, count) = total.finish(&self.secret_key, &self.public_key);
                (category, CategoryTally { sum, count })
            })
            .collect();

        info!(categories = totals.len(), "tallied");
        Ok(TallyReport { totals })
    }

    /// Decrypt the totals and return the (A, B) sums; single-shot like [`Self::tally_report`]
    pub fn tally(&self) -> Result<(BigUint, BigUint)> {
        self.tally_report().map(|report| report.pair())
    }
}
