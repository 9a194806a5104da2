//! Bounded trial-division factorization.

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use std::collections::BTreeSet;

/// Work limits for [`factorize`].
///
/// Both values are empirical tuning parameters: they bound the latency
/// of a single factorization, and have no number-theoretic meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactorLimits {
    /// Inputs above this are not factored at all.
    pub size_ceiling: u64,
    /// Largest trial divisor.
    pub divisor_cutoff: u64,
}

impl Default for FactorLimits {
    fn default() -> Self {
        Self {
            size_ceiling: 1_000_000_000_000_000,
            divisor_cutoff: 200_000,
        }
    }
}

impl FactorLimits {
    pub fn with_size_ceiling(mut self, ceiling: u64) -> Self {
        self.size_ceiling = ceiling;
        self
    }

    pub fn with_divisor_cutoff(mut self, cutoff: u64) -> Self {
        self.divisor_cutoff = cutoff;
        self
    }
}

/// Outcome of a bounded factorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Factorization {
    /// All distinct prime factors.
    Complete(BTreeSet<u64>),
    /// Input exceeded [`FactorLimits::size_ceiling`]; nothing was tried.
    TooLarge,
    /// Divisor cutoff hit first. Holds the factors found plus the
    /// unresolved remainder, which may be composite.
    CutoffReached(BTreeSet<u64>),
}

impl Factorization {
    /// The factor set, if any division was attempted.
    pub fn factors(&self) -> Option<&BTreeSet<u64>> {
        match self {
            Factorization::Complete(f) | Factorization::CutoffReached(f) => Some(f),
            Factorization::TooLarge => None,
        }
    }

    /// Whether every factor is known to be prime.
    pub fn is_complete(&self) -> bool {
        matches!(self, Factorization::Complete(_))
    }

    /// Largest factor, if any.
    pub fn largest(&self) -> Option<u64> {
        self.factors().and_then(|f| f.last().copied())
    }
}

/// Factors `n` by trial division under `limits`.
///
/// # Examples
///
/// ```
/// use num_bigint::BigUint;
/// use u_primeweb::arith::{factorize, FactorLimits, Factorization};
///
/// let f = factorize(&BigUint::from(1_001u32), &FactorLimits::default());
/// assert_eq!(f, Factorization::Complete([7, 11, 13].into_iter().collect()));
/// ```
pub fn factorize(n: &BigUint, limits: &FactorLimits) -> Factorization {
    if *n > BigUint::from(limits.size_ceiling) {
        return Factorization::TooLarge;
    }
    match n.to_u64() {
        Some(v) => factorize_u64(v, limits),
        None => Factorization::TooLarge,
    }
}

/// [`factorize`] for machine-sized inputs.
pub fn factorize_u64(n: u64, limits: &FactorLimits) -> Factorization {
    if n > limits.size_ceiling {
        return Factorization::TooLarge;
    }

    let mut factors = BTreeSet::new();
    let mut remaining = n;
    let mut d: u64 = 2;
    let mut cut = false;

    while square_at_most(d, remaining) {
        while remaining % d == 0 {
            factors.insert(d);
            remaining /= d;
        }
        d += 1;
        if d > limits.divisor_cutoff {
            cut = square_at_most(d, remaining);
            break;
        }
    }
    if remaining > 1 {
        factors.insert(remaining);
    }

    if cut {
        Factorization::CutoffReached(factors)
    } else {
        Factorization::Complete(factors)
    }
}

fn square_at_most(d: u64, n: u64) -> bool {
    d.checked_mul(d).is_some_and(|sq| sq <= n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(v: &[u64]) -> BTreeSet<u64> {
        v.iter().copied().collect()
    }

    #[test]
    fn test_small_values() {
        let limits = FactorLimits::default();
        assert_eq!(factorize_u64(1, &limits), Factorization::Complete(set(&[])));
        assert_eq!(factorize_u64(2, &limits), Factorization::Complete(set(&[2])));
        assert_eq!(factorize_u64(13, &limits), Factorization::Complete(set(&[13])));
        assert_eq!(factorize_u64(360, &limits), Factorization::Complete(set(&[2, 3, 5])));
    }

    #[test]
    fn test_prime_power_remainder() {
        let limits = FactorLimits::default();
        // 2801 = (7^5 - 1) / 6 is prime.
        assert_eq!(factorize_u64(2801, &limits), Factorization::Complete(set(&[2801])));
        assert_eq!(factorize_u64(121, &limits), Factorization::Complete(set(&[11])));
    }

    #[test]
    fn test_too_large() {
        let limits = FactorLimits::default();
        let n = BigUint::from(10u64).pow(15) + 1u32;
        assert_eq!(factorize(&n, &limits), Factorization::TooLarge);
        assert_eq!(factorize(&n, &limits).factors(), None);

        let at_ceiling = BigUint::from(10u64).pow(15);
        assert_eq!(
            factorize(&at_ceiling, &limits),
            Factorization::Complete(set(&[2, 5]))
        );
    }

    #[test]
    fn test_beyond_u64() {
        let limits = FactorLimits::default().with_size_ceiling(u64::MAX);
        let n = BigUint::from(u64::MAX) * 3u32;
        assert_eq!(factorize(&n, &limits), Factorization::TooLarge);
    }

    #[test]
    fn test_cutoff_keeps_remainder() {
        // 101 * 103: no divisor <= 10 divides it.
        let limits = FactorLimits::default().with_divisor_cutoff(10);
        let f = factorize_u64(101 * 103, &limits);
        assert_eq!(f, Factorization::CutoffReached(set(&[101 * 103])));
        assert!(!f.is_complete());
        assert_eq!(f.largest(), Some(101 * 103));
    }

    #[test]
    fn test_cutoff_partial_factors() {
        let limits = FactorLimits::default().with_divisor_cutoff(10);
        let f = factorize_u64(4 * 101 * 103, &limits);
        assert_eq!(f, Factorization::CutoffReached(set(&[2, 101 * 103])));
    }

    #[test]
    fn test_cutoff_not_reached_when_done() {
        // d passes the cutoff, but 7 is already known to be prime.
        let limits = FactorLimits::default().with_divisor_cutoff(2);
        assert_eq!(factorize_u64(2 * 7, &limits), Factorization::Complete(set(&[2, 7])));
    }

    #[test]
    fn test_sigma_of_three_squared() {
        assert_eq!(
            factorize_u64(13, &FactorLimits::default()).factors(),
            Some(&set(&[13]))
        );
    }
}
