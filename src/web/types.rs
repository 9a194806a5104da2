//! Candidate prime powers and the candidate table.

use num_bigint::BigUint;
use num_rational::BigRational;
use std::collections::{BTreeMap, BTreeSet};

use crate::arith::is_special;

/// A validated prime power `p^k`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    pub prime: u64,
    pub exponent: u32,
    /// Exact σ(p^k) / p^k.
    pub ratio: BigRational,
    /// `floor(ln(ratio) · scale)`.
    pub scaled_log: i64,
    /// σ(p^k).
    pub sigma: BigUint,
    /// Distinct prime factors of σ(p^k), all inside the prime universe.
    pub children: BTreeSet<u64>,
}

impl Candidate {
    /// Whether this is an Euler (special) prime power.
    pub fn is_special(&self) -> bool {
        is_special(self.prime, self.exponent)
    }
}

/// Why a `(p, k)` pair did not become a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Fails the Euler admissibility rule.
    Inadmissible,
    /// σ(p^k) exceeded the factorization size ceiling.
    TooLarge,
    /// Factorization produced no factors.
    NoFactors,
    /// Some factor (or unresolved remainder) lies above the prime limit.
    ChildOutOfRange(u64),
    /// Some factor lies within the limit but is not in the prime universe
    /// (an unresolved composite remainder).
    ChildNotPrime(u64),
}

/// Per-reason rejection counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionStats {
    pub inadmissible: usize,
    pub too_large: usize,
    pub no_factors: usize,
    pub child_out_of_range: usize,
    pub child_not_prime: usize,
}

impl RejectionStats {
    /// Records one rejection.
    pub fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::Inadmissible => self.inadmissible += 1,
            Rejection::TooLarge => self.too_large += 1,
            Rejection::NoFactors => self.no_factors += 1,
            Rejection::ChildOutOfRange(_) => self.child_out_of_range += 1,
            Rejection::ChildNotPrime(_) => self.child_not_prime += 1,
        }
    }

    /// Adds another set of counts.
    pub fn merge(&mut self, other: &RejectionStats) {
        self.inadmissible += other.inadmissible;
        self.too_large += other.too_large;
        self.no_factors += other.no_factors;
        self.child_out_of_range += other.child_out_of_range;
        self.child_not_prime += other.child_not_prime;
    }

    /// Total rejections.
    pub fn total(&self) -> usize {
        self.inadmissible
            + self.too_large
            + self.no_factors
            + self.child_out_of_range
            + self.child_not_prime
    }
}

/// prime → exponent → [`Candidate`], plus the universe it was built over.
///
/// Iteration is ascending by prime, then by exponent.
#[derive(Debug, Clone, Default)]
pub struct CandidateTable {
    prime_limit: u64,
    primes: Vec<u64>,
    entries: BTreeMap<u64, BTreeMap<u32, Candidate>>,
    rejections: RejectionStats,
}

impl CandidateTable {
    pub(crate) fn new(
        prime_limit: u64,
        primes: Vec<u64>,
        entries: BTreeMap<u64, BTreeMap<u32, Candidate>>,
        rejections: RejectionStats,
    ) -> Self {
        Self {
            prime_limit,
            primes,
            entries,
            rejections,
        }
    }

    /// Limit the table was validated against.
    pub fn prime_limit(&self) -> u64 {
        self.prime_limit
    }

    /// The prime universe, ascending.
    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    /// Candidates of one prime, keyed by exponent.
    pub fn candidates_of(&self, prime: u64) -> Option<&BTreeMap<u32, Candidate>> {
        self.entries.get(&prime).filter(|m| !m.is_empty())
    }

    /// Looks up a single candidate.
    pub fn get(&self, prime: u64, exponent: u32) -> Option<&Candidate> {
        self.entries.get(&prime).and_then(|m| m.get(&exponent))
    }

    /// All candidates in (prime, exponent) order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.values().flat_map(|m| m.values())
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Primes with no candidate at all.
    pub fn barren_primes(&self) -> impl Iterator<Item = u64> + '_ {
        self.primes
            .iter()
            .copied()
            .filter(|&p| self.candidates_of(p).is_none())
    }

    /// Rejection counts collected while building.
    pub fn rejections(&self) -> &RejectionStats {
        &self.rejections
    }
}
