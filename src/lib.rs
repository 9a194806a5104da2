//! Prime-web constraint model for bounded odd perfect number searches.
//!
//! Builds a finite universe of prime-power candidates, records which
//! primes each candidate drags in through the factorization of its
//! divisor sum, and encodes the whole structure as a pseudo-boolean
//! constraint problem:
//!
//! - **Arithmetic** ([`arith`]): prime sieve, bounded trial-division
//!   factorization with a tagged result, exact σ(p^k) and abundancy
//!   ratios, fixed-point logarithms.
//! - **CP** ([`cp`]): boolean variables, linear sums, implications, the
//!   [`cp::CpSolver`] trait, and a complete propagating solver.
//! - **Prime web** ([`web`]): candidate table construction, model
//!   encoding, verdict interpretation, and the end-to-end
//!   [`web::PrimeWeb`] pipeline.
//!
//! # Architecture
//!
//! The CP layer knows nothing about number theory; the web layer only
//! talks to it through [`cp::CpModel`] and [`cp::CpSolver`], so an
//! external engine can replace the bundled solver.
//!
//! An infeasible verdict is a statement about the truncated range of
//! primes and exponents only.

pub mod arith;
pub mod cp;
pub mod error;
pub mod web;

pub use error::{ConfigError, Error, Result};
