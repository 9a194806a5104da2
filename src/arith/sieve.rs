//! Sieve of Eratosthenes.

/// Returns all primes `<= limit` in ascending order.
///
/// Limits below 2 yield an empty vector.
///
/// # Examples
///
/// ```
/// use u_primeweb::arith::primes_up_to;
///
/// assert_eq!(primes_up_to(30), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
/// assert!(primes_up_to(1).is_empty());
/// ```
pub fn primes_up_to(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }
    let n = limit as usize;
    let mut is_prime = vec![true; n + 1];
    is_prime[0] = false;
    is_prime[1] = false;

    let mut primes = Vec::new();
    for p in 2..=n {
        if !is_prime[p] {
            continue;
        }
        primes.push(p as u64);
        // Composites below p*p were struck by smaller primes.
        let mut multiple = match p.checked_mul(p) {
            Some(sq) => sq,
            None => continue,
        };
        while multiple <= n {
            is_prime[multiple] = false;
            multiple += p;
        }
    }
    primes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_limits() {
        assert!(primes_up_to(0).is_empty());
        assert!(primes_up_to(1).is_empty());
        assert_eq!(primes_up_to(2), vec![2]);
        assert_eq!(primes_up_to(3), vec![2, 3]);
        assert_eq!(primes_up_to(4), vec![2, 3]);
    }

    #[test]
    fn test_sieve_30() {
        assert_eq!(primes_up_to(30), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_prime_counts() {
        assert_eq!(primes_up_to(150).len(), 35);
        assert_eq!(primes_up_to(1000).len(), 168);
        assert_eq!(primes_up_to(10_000).len(), 1229);
    }

    #[test]
    fn test_matches_trial_division() {
        let primes = primes_up_to(500);
        let naive: Vec<u64> = (2..=500u64)
            .filter(|&n| (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0))
            .collect();
        assert_eq!(primes, naive);
    }
}
