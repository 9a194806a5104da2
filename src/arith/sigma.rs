//! Divisor sums of prime powers and their abundancy ratios.
//!
//! Two separate paths are kept: an exact one (`BigUint`/`BigRational`)
//! used for reporting, and a fixed-point `i64` logarithm used as a
//! solver coefficient.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::One;

/// σ(p^k) = 1 + p + … + p^k = (p^(k+1) − 1) / (p − 1).
///
/// # Examples
///
/// ```
/// use num_bigint::BigUint;
/// use u_primeweb::arith::sigma_of_power;
///
/// assert_eq!(sigma_of_power(3, 2), BigUint::from(13u32));
/// assert_eq!(sigma_of_power(2, 4), BigUint::from(31u32));
/// ```
pub fn sigma_of_power(p: u64, k: u32) -> BigUint {
    let base = BigUint::from(p);
    (base.pow(k + 1) - BigUint::one()) / (base - BigUint::one())
}

/// Exact abundancy ratio σ(p^k) / p^k.
pub fn abundancy_ratio(p: u64, k: u32) -> BigRational {
    let numer = BigInt::from(sigma_of_power(p, k));
    let denom = BigInt::from(BigUint::from(p).pow(k));
    BigRational::new(numer, denom)
}

/// `floor(ln(σ(p^k)/p^k) · scale)`.
///
/// The ratio is `1 + Σ_{i=1..k} p^-i`, so the logarithm is evaluated
/// with `ln_1p` on the tail sum to keep precision for large `p`.
pub fn scaled_log_ratio(p: u64, k: u32, scale: u64) -> i64 {
    let inv = 1.0 / p as f64;
    let mut term = 1.0;
    let mut tail = 0.0;
    for _ in 0..k {
        term *= inv;
        tail += term;
    }
    (tail.ln_1p() * scale as f64).floor() as i64
}

/// `floor(ln(2) · scale)`, the scaled abundancy target of a perfect number.
pub fn scaled_log_two(scale: u64) -> i64 {
    (std::f64::consts::LN_2 * scale as f64).floor() as i64
}

/// Euler admissibility: `k` even, or `p ≡ 1 (mod 4)` and `k ≡ 1 (mod 4)`.
///
/// # Examples
///
/// ```
/// use u_primeweb::arith::is_admissible;
///
/// assert!(is_admissible(5, 1));
/// assert!(is_admissible(5, 2));
/// assert!(!is_admissible(5, 3));
/// assert!(!is_admissible(3, 1));
/// ```
pub fn is_admissible(p: u64, k: u32) -> bool {
    k.is_even() || is_special(p, k)
}

/// Whether `(p, k)` has the Euler (special) form.
pub fn is_special(p: u64, k: u32) -> bool {
    p.mod_floor(&4) == 1 && k.mod_floor(&4) == 1
}
