//! Candidate table construction.
//!
//! For every prime in the universe and every searched exponent, the
//! builder applies the admissibility rule, factors σ(p^k), and keeps the
//! pair only when every factor is a member of the universe.

use super::config::WebConfig;
use super::types::{Candidate, CandidateTable, Rejection, RejectionStats};
use crate::arith::{
    abundancy_ratio, factorize, is_admissible, primes_up_to, scaled_log_ratio, sigma_of_power,
    Factorization,
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Builds a [`CandidateTable`] from a [`WebConfig`].
///
/// # Examples
///
/// ```
/// use u_primeweb::web::{CandidateBuilder, WebConfig};
///
/// let table = CandidateBuilder::new(&WebConfig::default()).build();
/// // σ(3^2) = 13 and σ(3^4) = 11^2, both inside the universe.
/// assert!(table.get(3, 2).is_some());
/// assert!(table.get(3, 4).is_some());
/// // σ(3^6) = 1093 is prime and above the limit.
/// assert!(table.get(3, 6).is_none());
/// ```
pub struct CandidateBuilder<'a> {
    config: &'a WebConfig,
    primes: Vec<u64>,
}

impl<'a> CandidateBuilder<'a> {
    /// Sieves the prime universe. The configuration is assumed to be
    /// validated.
    pub fn new(config: &'a WebConfig) -> Self {
        Self {
            config,
            primes: primes_up_to(config.prime_limit),
        }
    }

    /// Evaluates a single `(p, k)` pair.
    pub fn evaluate(&self, prime: u64, exponent: u32) -> Result<Candidate, Rejection> {
        if !is_admissible(prime, exponent) {
            return Err(Rejection::Inadmissible);
        }

        let sigma = sigma_of_power(prime, exponent);
        let factorization = factorize(&sigma, &self.config.factor_limits);
        if factorization.factors().is_some() && !factorization.is_complete() {
            debug!(
                prime,
                exponent,
                remainder = ?factorization.largest(),
                "trial division cut off"
            );
        }
        let children = match factorization {
            Factorization::TooLarge => return Err(Rejection::TooLarge),
            Factorization::Complete(f) | Factorization::CutoffReached(f) => f,
        };
        if children.is_empty() {
            return Err(Rejection::NoFactors);
        }
        if let Some(&outside) = children.iter().find(|&&q| q > self.config.prime_limit) {
            return Err(Rejection::ChildOutOfRange(outside));
        }
        // A cut-off remainder may be composite even when it is in range.
        if let Some(&composite) = children
            .iter()
            .find(|&&q| self.primes.binary_search(&q).is_err())
        {
            return Err(Rejection::ChildNotPrime(composite));
        }

        Ok(Candidate {
            prime,
            exponent,
            ratio: abundancy_ratio(prime, exponent),
            scaled_log: scaled_log_ratio(prime, exponent, self.config.scale),
            sigma,
            children,
        })
    }

    /// Builds the full table.
    pub fn build(&self) -> CandidateTable {
        let primes = &self.primes;
        let exponents = self.config.effective_exponents();
        info!(
            prime_limit = self.config.prime_limit,
            primes = primes.len(),
            exponents = ?exponents,
            "building candidate table"
        );

        let per_prime = |&p: &u64| self.build_prime(p, &exponents);
        let rows: Vec<(u64, BTreeMap<u32, Candidate>, RejectionStats)> = if self.config.parallel {
            primes.par_iter().map(per_prime).collect()
        } else {
            primes.iter().map(per_prime).collect()
        };

        let mut entries = BTreeMap::new();
        let mut rejections = RejectionStats::default();
        for (p, row, stats) in rows {
            rejections.merge(&stats);
            if !row.is_empty() {
                entries.insert(p, row);
            }
        }

        let table = CandidateTable::new(
            self.config.prime_limit,
            self.primes.clone(),
            entries,
            rejections,
        );
        info!(
            candidates = table.len(),
            rejected = rejections.total(),
            "candidate table built"
        );
        debug!(
            inadmissible = rejections.inadmissible,
            too_large = rejections.too_large,
            no_factors = rejections.no_factors,
            child_out_of_range = rejections.child_out_of_range,
            child_not_prime = rejections.child_not_prime,
            "rejections by reason"
        );
        table
    }

    fn build_prime(
        &self,
        prime: u64,
        exponents: &[u32],
    ) -> (u64, BTreeMap<u32, Candidate>, RejectionStats) {
        let mut row = BTreeMap::new();
        let mut stats = RejectionStats::default();
        for &k in exponents {
            match self.evaluate(prime, k) {
                Ok(candidate) => {
                    row.insert(k, candidate);
                }
                Err(rejection) => {
                    if let Rejection::ChildOutOfRange(q) | Rejection::ChildNotPrime(q) = rejection {
                        debug!(prime, exponent = k, child = q, "child outside universe");
                    }
                    stats.record(rejection);
                }
            }
        }
        (prime, row, stats)
    }
}
