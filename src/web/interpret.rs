//! Solver verdict interpretation and reporting.

use super::config::WebConfig;
use super::encoder::EncodedWeb;
use super::types::{Candidate, CandidateTable};
use crate::cp::{CpSolution, SolverStatus};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive};
use std::collections::BTreeSet;
use std::fmt;

/// One prime power of a reconstructed structure.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedPower {
    pub prime: u64,
    pub exponent: u32,
    pub children: BTreeSet<u64>,
    pub ratio: BigRational,
    pub scaled_log: i64,
}

/// A selected set of prime powers with its exact abundancy product.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    /// Selected prime powers, ascending by prime.
    pub powers: Vec<SelectedPower>,
    /// Exact product of the abundancy ratios.
    pub product: BigRational,
    /// `|product − 2|`, exact.
    pub deviation: BigRational,
}

impl Structure {
    /// Builds a structure from candidates, sorting them by prime.
    pub fn from_candidates<'a>(candidates: impl IntoIterator<Item = &'a Candidate>) -> Self {
        let mut powers: Vec<SelectedPower> = candidates
            .into_iter()
            .map(|c| SelectedPower {
                prime: c.prime,
                exponent: c.exponent,
                children: c.children.clone(),
                ratio: c.ratio.clone(),
                scaled_log: c.scaled_log,
            })
            .collect();
        powers.sort_by_key(|p| (p.prime, p.exponent));

        let product = powers
            .iter()
            .fold(BigRational::one(), |acc, p| acc * &p.ratio);
        let two = BigRational::from_integer(BigInt::from(2));
        let deviation = (&product - two).abs();
        Self {
            powers,
            product,
            deviation,
        }
    }

    /// Product as a float.
    pub fn product_f64(&self) -> f64 {
        self.product.to_f64().unwrap_or(f64::NAN)
    }

    /// Deviation from 2 as a float.
    pub fn deviation_f64(&self) -> f64 {
        self.deviation.to_f64().unwrap_or(f64::NAN)
    }

    /// Sum of the fixed-point logs the solver saw.
    pub fn scaled_log_sum(&self) -> i64 {
        self.powers.iter().map(|p| p.scaled_log).sum()
    }

    /// `ln(product)` evaluated term by term.
    pub fn ln_product(&self) -> f64 {
        self.powers
            .iter()
            .map(|p| p.ratio.to_f64().unwrap_or(f64::NAN).ln())
            .sum()
    }

    /// Distinct primes of the structure, including children.
    pub fn closure(&self) -> BTreeSet<u64> {
        self.powers
            .iter()
            .flat_map(|p| std::iter::once(p.prime).chain(p.children.iter().copied()))
            .collect()
    }
}

/// Interpreted result of a prime-web search.
#[derive(Debug, Clone, PartialEq)]
pub enum WebOutcome {
    /// The solver returned an assignment.
    Found(Structure),
    /// No assignment satisfies the model. Only a statement about primes
    /// `<= prime_limit` and exponents `<= max_exponent`.
    Infeasible { prime_limit: u64, max_exponent: u32 },
    /// No verdict (timeout, unknown, or a rejected model).
    Inconclusive { status: SolverStatus },
}

impl WebOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, WebOutcome::Found(_))
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, WebOutcome::Infeasible { .. })
    }
}

/// Maps a solver verdict onto a [`WebOutcome`].
pub fn interpret(
    table: &CandidateTable,
    encoded: &EncodedWeb,
    solution: &CpSolution,
    config: &WebConfig,
) -> WebOutcome {
    match solution.status {
        SolverStatus::Optimal | SolverStatus::Feasible => {
            let selected = encoded
                .selection
                .iter()
                .filter(|&(_, &var)| solution.value(var))
                .filter_map(|(&(p, k), _)| table.get(p, k));
            WebOutcome::Found(Structure::from_candidates(selected))
        }
        SolverStatus::Infeasible => WebOutcome::Infeasible {
            prime_limit: config.prime_limit,
            max_exponent: config.max_exponent,
        },
        status @ (SolverStatus::Timeout | SolverStatus::Unknown | SolverStatus::ModelInvalid) => {
            WebOutcome::Inconclusive { status }
        }
    }
}

impl fmt::Display for SelectedPower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children: Vec<String> = self.children.iter().map(u64::to_string).collect();
        write!(
            f,
            "{}^{} (children: {{{}}})",
            self.prime,
            self.exponent,
            children.join(", ")
        )
    }
}

impl fmt::Display for WebOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebOutcome::Found(structure) => {
                writeln!(f, "FOUND: an approximate prime web exists in this range")?;
                writeln!(f, "--- structure ---")?;
                for power in &structure.powers {
                    writeln!(f, "  {power}")?;
                }
                let closure: Vec<String> = structure.closure().iter().map(u64::to_string).collect();
                writeln!(f, "primes touched: {{{}}}", closure.join(", "))?;
                writeln!(f, "abundancy product: {}", structure.product_f64())?;
                writeln!(f, "  exact: {}", structure.product)?;
                write!(f, "deviation from 2: {}", structure.deviation_f64())
            }
            WebOutcome::Infeasible {
                prime_limit,
                max_exponent,
            } => {
                writeln!(
                    f,
                    "INFEASIBLE: no prime web satisfies every constraint for primes <= {prime_limit} \
                     and exponents <= {max_exponent}."
                )?;
                write!(
                    f,
                    "This only covers the truncated search space; it is not a proof about \
                     odd perfect numbers in general."
                )
            }
            WebOutcome::Inconclusive { status } => write!(
                f,
                "INCONCLUSIVE ({status}): no verdict; widen the time budget or shrink the search space."
            ),
        }
    }
}
