//! Modular arithmetic over arbitrary-precision integers

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// Modular arithmetic operations over Z_m for big unsigned integers
pub struct ModN;

impl ModN {
    /// Multiply two values modulo m
    #[inline]
    pub fn mul(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
        (a * b) % m
    }

    /// Raise base to exp modulo m by repeated squaring
    #[inline]
    pub fn pow(base: &BigUint, exp: &BigUint, m: &BigUint) -> BigUint {
        base.modpow(exp, m)
    }

    /// Subtract one modulo m, wrapping 0 to m - 1
    #[inline]
    pub fn dec(a: &BigUint, m: &BigUint) -> BigUint {
        if a.is_zero() {
            m - 1u32
        } else {
            (a - 1u32) % m
        }
    }

    /// Modular inverse of a modulo m, if gcd(a, m) = 1
    pub fn inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
        if m.is_zero() || !Self::is_coprime(a, m) {
            return None;
        }
        if m.is_one() {
            return Some(BigUint::zero());
        }
        a.modinv(m)
    }

    /// True when gcd(a, b) = 1
    #[inline]
    pub fn is_coprime(a: &BigUint, b: &BigUint) -> bool {
        a.gcd(b).is_one()
    }

    /// Paillier's L function: L(u) = (u - 1) / n.
    ///
    /// The division is exact for u ≡ 1 (mod n); debug builds assert it.
    pub fn l_function(u: &BigUint, n: &BigUint, n_squared: &BigUint) -> BigUint {
        let numerator = Self::dec(u, n_squared);
        debug_assert!(
            (&numerator % n).is_zero(),
            "L function input is not 1 mod n; ciphertext or key is inconsistent"
        );
        numerator / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_mul() {
        assert_eq!(ModN::mul(&big(5), &big(7), &big(11)), big(2));
    }

    #[test]
    fn test_pow() {
        assert_eq!(ModN::pow(&big(3), &big(4), &big(7)), big(4));
        assert_eq!(ModN::pow(&big(3), &big(0), &big(7)), big(1));
    }

    #[test]
    fn test_dec() {
        assert_eq!(ModN::dec(&big(5), &big(9)), big(4));
        assert_eq!(ModN::dec(&big(0), &big(9)), big(8));
    }

    #[test]
    fn test_inverse() {
        assert_eq!(ModN::inverse(&big(3), &big(7)), Some(big(5)));
        assert_eq!(ModN::inverse(&big(120), &big(143)), Some(big(87)));
        assert_eq!(ModN::inverse(&big(12), &big(21)), None);
        assert_eq!(ModN::inverse(&big(3), &big(0)), None);
    }

    #[test]
    fn test_is_coprime() {
        assert!(ModN::is_coprime(&big(10), &big(21)));
        assert!(!ModN::is_coprime(&big(12), &big(21)));
    }

    #[test]
    fn test_l_function() {
        // n = 15, u = 1 + 4·15
        let n = big(15);
        let n_sq = big(225);
        assert_eq!(ModN::l_function(&big(61), &n, &n_sq), big(4));
        assert_eq!(ModN::l_function(&big(1), &n, &n_sq), big(0));
    }
}
