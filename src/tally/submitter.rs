//! Submitter side: encrypt values under the aggregator's public key

use num_bigint::BigUint;
use rand::Rng;

use crate::error::Result;
use crate::paillier::{encrypt, Ciphertext, PublicKey};

use super::aggregator::Aggregator;
use super::category::Category;

/// Encrypt each value independently, preserving order.
///
/// Stops at the first value that is not below n (`PlaintextOutOfRange`).
pub fn encrypt_batch<I, R>(values: I, pk: &PublicKey, rng: &mut R) -> Result<Vec<Ciphertext>>
where
    I: IntoIterator,
    I::Item: Into<BigUint>,
    R: Rng + ?Sized,
{
    values
        .into_iter()
        .map(|v| encrypt(pk, &v.into(), rng))
        .collect()
}

/// Untrusted reporter holding only the aggregator's public key
#[derive(Clone, Debug)]
pub struct Reporter {
    public_key: PublicKey,
}

impl Reporter {
    /// Reporter for a given public key
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    /// Reporter bound to an aggregator's public key
    pub fn for_aggregator(aggregator: &Aggregator) -> Self {
        Self::new(aggregator.public_key().clone())
    }

    /// Key used for encryption
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Encrypt a batch under this reporter's key
    pub fn encrypt_batch<I, R>(&self, values: I, rng: &mut R) -> Result<Vec<Ciphertext>>
    where
        I: IntoIterator,
        I::Item: Into<BigUint>,
        R: Rng + ?Sized,
    {
        encrypt_batch(values, &self.public_key, rng)
    }

    /// Encrypt `values` and submit them to `aggregator` under `category`.
    ///
    /// Returns the number of values submitted. Nothing is submitted if any
    /// value is out of range.
    pub fn report<I, R>(
        &self,
        aggregator: &Aggregator,
        category: Category,
        values: I,
        rng: &mut R,
    ) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<BigUint>,
        R: Rng + ?Sized,
    {
        let batch = self.encrypt_batch(values, rng)?;
        let submitted = batch.len();
        aggregator.submit(category, batch)?;
        Ok(submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TallyError;
    use crate::math::EntropySource;
    use crate::paillier::{decrypt, KeyPair};
    use crate::params::TallyParams;

    #[test]
    fn test_encrypt_batch_preserves_order() {
        let keys = KeyPair::from_primes(&BigUint::from(251u32), &BigUint::from(241u32)).unwrap();
        let mut rng = EntropySource::with_seed(30);

        let values = [5u64, 0, 60_000, 17];
        let batch = encrypt_batch(values, &keys.public, &mut rng).unwrap();
        let decrypted: Vec<BigUint> = batch
            .iter()
            .map(|c| decrypt(c, &keys.secret, &keys.public))
            .collect();
        let expected: Vec<BigUint> = values.iter().map(|&v| BigUint::from(v)).collect();
        assert_eq!(decrypted, expected);
    }

    #[test]
    fn test_encrypt_batch_rejects_out_of_range() {
        let keys = KeyPair::from_primes(&BigUint::from(11u32), &BigUint::from(13u32)).unwrap();
        let mut rng = EntropySource::with_seed(31);
        let err = encrypt_batch([1u32, 500, 2], &keys.public, &mut rng).unwrap_err();
        assert!(matches!(err, TallyError::PlaintextOutOfRange));
    }

    #[test]
    fn test_reporter_report() {
        let mut rng = EntropySource::with_seed(32);
        let agg = Aggregator::new(&TallyParams::with_bits(64), &mut rng).unwrap();
        let reporter = Reporter::for_aggregator(&agg);

        assert_eq!(reporter.report(&agg, Category::A, vec![100u64, 200], &mut rng).unwrap(), 2);
        assert_eq!(reporter.report(&agg, Category::B, [50u64], &mut rng).unwrap(), 1);
        assert_eq!(agg.tally().unwrap(), (BigUint::from(300u32), BigUint::from(50u32)));
    }
}
