//! Error types.

use thiserror::Error;

/// Invalid search configuration, reported before any construction starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("prime_limit must be at least 2, got {0}")]
    PrimeLimitTooSmall(u64),

    #[error("prime_limit {limit} exceeds the sieve bound {max}")]
    PrimeLimitTooLarge { limit: u64, max: u64 },

    #[error("scale must be positive")]
    ZeroScale,

    #[error("max_exponent must be positive")]
    ZeroMaxExponent,

    #[error("exponent set is empty")]
    EmptyExponentSet,

    #[error("exponent set contains 0")]
    ZeroExponent,

    #[error("no exponent in the set is <= max_exponent ({0})")]
    NoUsableExponent(u32),

    #[error("tolerance must be non-negative, got {0}")]
    NegativeTolerance(i64),

    #[error("scale {scale} with tolerance {tolerance} overflows the scaled target")]
    TargetOverflow { scale: u64, tolerance: i64 },

    #[error("min_active_primes {0} does not fit a model coefficient")]
    MinActiveOverflow(usize),

    #[error("time limit must be a positive finite number of seconds, got {0}")]
    InvalidTimeLimit(f64),

    #[error("divisor cutoff must be at least 2, got {0}")]
    DivisorCutoffTooSmall(u64),

    #[error("divisor cutoff {cutoff} is below the square root of prime_limit {prime_limit}")]
    DivisorCutoffBelowRoot { cutoff: u64, prime_limit: u64 },

    #[error("factorization size ceiling must be at least 2, got {0}")]
    SizeCeilingTooSmall(u64),
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
