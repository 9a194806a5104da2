//! Prime-web search configuration.

use crate::arith::FactorLimits;
use crate::error::ConfigError;

/// Largest accepted `prime_limit`; the sieve holds one byte per integer.
pub const MAX_PRIME_LIMIT: u64 = 1_000_000_000;

/// Configuration for a bounded prime-web search.
///
/// Defaults reproduce the reduced reference run: primes up to 150,
/// exponents {1, 2, 4, 6}, at least 5 active primes, tolerance 1000 at
/// scale 10^8, and a 30 second solver budget.
///
/// # Examples
///
/// ```
/// use u_primeweb::web::WebConfig;
///
/// let config = WebConfig::default()
///     .with_prime_limit(500)
///     .with_exponents(vec![1, 2, 4, 6, 8])
///     .with_max_exponent(8)
///     .with_min_active_primes(6);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// Largest prime in the universe; every child must be `<=` this.
    pub prime_limit: u64,

    /// Fixed-point multiplier for logarithms.
    pub scale: u64,

    /// Exponents above this are skipped.
    pub max_exponent: u32,

    /// Candidate exponents, in evaluation order.
    pub exponents: Vec<u32>,

    /// Allowed distance of the scaled log sum from `floor(ln 2 · scale)`.
    pub tolerance: i64,

    /// Minimum number of active primes.
    pub min_active_primes: usize,

    /// Solver wall-clock budget in seconds.
    pub time_limit_secs: f64,

    /// Worker hint passed to the solver.
    pub num_workers: usize,

    /// Build candidates for different primes in parallel using rayon.
    pub parallel: bool,

    /// Factorization work limits.
    pub factor_limits: FactorLimits,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            prime_limit: 150,
            scale: 100_000_000,
            max_exponent: 6,
            exponents: vec![1, 2, 4, 6],
            tolerance: 1000,
            min_active_primes: 5,
            time_limit_secs: 30.0,
            num_workers: 8,
            parallel: false,
            factor_limits: FactorLimits::default(),
        }
    }
}

impl WebConfig {
    pub fn with_prime_limit(mut self, limit: u64) -> Self {
        self.prime_limit = limit;
        self
    }

    pub fn with_scale(mut self, scale: u64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_max_exponent(mut self, k: u32) -> Self {
        self.max_exponent = k;
        self
    }

    pub fn with_exponents(mut self, exponents: Vec<u32>) -> Self {
        self.exponents = exponents;
        self
    }

    pub fn with_tolerance(mut self, tolerance: i64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_min_active_primes(mut self, n: usize) -> Self {
        self.min_active_primes = n;
        self
    }

    pub fn with_time_limit_secs(mut self, secs: f64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    pub fn with_num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_factor_limits(mut self, limits: FactorLimits) -> Self {
        self.factor_limits = limits;
        self
    }

    /// Exponents actually searched: configured order, `<= max_exponent`,
    /// duplicates dropped.
    pub fn effective_exponents(&self) -> Vec<u32> {
        let mut out: Vec<u32> = Vec::with_capacity(self.exponents.len());
        for &k in &self.exponents {
            if k <= self.max_exponent && !out.contains(&k) {
                out.push(k);
            }
        }
        out
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prime_limit < 2 {
            return Err(ConfigError::PrimeLimitTooSmall(self.prime_limit));
        }
        if self.prime_limit > MAX_PRIME_LIMIT {
            return Err(ConfigError::PrimeLimitTooLarge {
                limit: self.prime_limit,
                max: MAX_PRIME_LIMIT,
            });
        }
        if self.scale == 0 {
            return Err(ConfigError::ZeroScale);
        }
        if self.max_exponent == 0 {
            return Err(ConfigError::ZeroMaxExponent);
        }
        if self.exponents.is_empty() {
            return Err(ConfigError::EmptyExponentSet);
        }
        if self.exponents.contains(&0) {
            return Err(ConfigError::ZeroExponent);
        }
        if self.effective_exponents().is_empty() {
            return Err(ConfigError::NoUsableExponent(self.max_exponent));
        }
        if self.tolerance < 0 {
            return Err(ConfigError::NegativeTolerance(self.tolerance));
        }
        // ln(ratio) < ln 2 for every prime power, so the target bounds
        // every coefficient as well.
        let target = std::f64::consts::LN_2 * self.scale as f64;
        if target + self.tolerance as f64 >= i64::MAX as f64 / 2.0 {
            return Err(ConfigError::TargetOverflow {
                scale: self.scale,
                tolerance: self.tolerance,
            });
        }
        if i64::try_from(self.min_active_primes).is_err() {
            return Err(ConfigError::MinActiveOverflow(self.min_active_primes));
        }
        if !self.time_limit_secs.is_finite() || self.time_limit_secs <= 0.0 {
            return Err(ConfigError::InvalidTimeLimit(self.time_limit_secs));
        }
        if self.factor_limits.divisor_cutoff < 2 {
            return Err(ConfigError::DivisorCutoffTooSmall(
                self.factor_limits.divisor_cutoff,
            ));
        }
        // A cut-off remainder then always exceeds the limit, so no
        // unresolved composite can pass as a child.
        let cutoff = self.factor_limits.divisor_cutoff;
        if cutoff.saturating_mul(cutoff) < self.prime_limit {
            return Err(ConfigError::DivisorCutoffBelowRoot {
                cutoff,
                prime_limit: self.prime_limit,
            });
        }
        if self.factor_limits.size_ceiling < 2 {
            return Err(ConfigError::SizeCeilingTooSmall(
                self.factor_limits.size_ceiling,
            ));
        }
        Ok(())
    }

    /// Solver time budget in milliseconds, rounded up so that any
    /// positive budget stays positive.
    pub fn time_limit_ms(&self) -> i64 {
        (self.time_limit_secs * 1000.0).ceil() as i64
    }
}
