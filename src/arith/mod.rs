//! Number-theoretic primitives.
//!
//! - [`primes_up_to`]: sieve of Eratosthenes
//! - [`factorize`]: bounded trial division with a tagged [`Factorization`]
//! - [`sigma_of_power`], [`abundancy_ratio`], [`scaled_log_ratio`]: divisor
//!   sums of prime powers, exact and fixed-point

mod factor;
mod sieve;
mod sigma;

pub use factor::{factorize, factorize_u64, FactorLimits, Factorization};
pub use sieve::primes_up_to;
pub use sigma::{
    abundancy_ratio, is_admissible, is_special, scaled_log_ratio, scaled_log_two, sigma_of_power,
};
