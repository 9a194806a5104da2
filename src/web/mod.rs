//! Prime-web search for odd perfect number structure.
//!
//! A perfect number `n` satisfies `σ(n)/n = 2`. For `n = Π p_i^k_i` the
//! abundancy ratio is multiplicative, so a candidate factorization is a
//! set of prime powers whose ratios multiply to 2. Choosing `p^k` also
//! brings in every prime factor of `σ(p^k)`; those dependencies form
//! the *prime web*.
//!
//! The pipeline is:
//!
//! 1. [`CandidateBuilder`]: admissible prime powers whose σ factors stay
//!    inside the prime universe
//! 2. [`encode`]: boolean CP model (exclusivity, web implications, one
//!    Euler prime, minimum size, log-sum target band)
//! 3. any [`CpSolver`]
//! 4. [`interpret`]: [`WebOutcome`] with an exact product on success
//!
//! [`PrimeWeb`] runs all four steps.
//!
//! An [`WebOutcome::Infeasible`] verdict only covers the truncated range
//! of primes and exponents. It is a heuristic check, not a proof about
//! odd perfect numbers.

mod builder;
mod config;
mod encoder;
mod interpret;
mod types;

pub use builder::CandidateBuilder;
pub use config::{WebConfig, MAX_PRIME_LIMIT};
pub use encoder::{encode, EncodedWeb};
pub use interpret::{interpret, SelectedPower, Structure, WebOutcome};
pub use types::{Candidate, CandidateTable, Rejection, RejectionStats};

use crate::cp::{CpSolver, SolverConfig};
use crate::error::Result;
use std::time::{Duration, Instant};
use tracing::info;

/// Summary of one build-encode-solve pass.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: WebOutcome,
    /// Primes in the universe.
    pub primes: usize,
    /// Candidates that survived validation.
    pub candidates: usize,
    /// Web implications in the model.
    pub web_constraints: usize,
    /// Search nodes reported by the solver.
    pub solver_nodes: u64,
    pub build_time: Duration,
    pub encode_time: Duration,
    pub solve_time: Duration,
}

/// Runs the full prime-web pipeline for one configuration.
///
/// # Examples
///
/// ```
/// use u_primeweb::cp::PropagatingSolver;
/// use u_primeweb::web::{PrimeWeb, WebConfig};
///
/// let web = PrimeWeb::new(WebConfig::default()).unwrap();
/// let report = web.run(&PropagatingSolver::new());
/// assert!(report.outcome.is_infeasible());
/// ```
#[derive(Debug, Clone)]
pub struct PrimeWeb {
    config: WebConfig,
}

impl PrimeWeb {
    /// Validates `config` before anything is built.
    pub fn new(config: WebConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Builds the candidate table.
    pub fn build(&self) -> CandidateTable {
        CandidateBuilder::new(&self.config).build()
    }

    /// Builds, encodes, solves, and interprets.
    pub fn run<S: CpSolver>(&self, solver: &S) -> RunReport {
        let started = Instant::now();
        let table = self.build();
        let build_time = started.elapsed();
        info!(
            candidates = table.len(),
            elapsed_ms = build_time.as_millis() as u64,
            "phase 1 done: candidate table"
        );

        let started = Instant::now();
        let encoded = encode(&table, &self.config);
        let encode_time = started.elapsed();
        info!(
            web_constraints = encoded.web_constraints,
            elapsed_ms = encode_time.as_millis() as u64,
            "phase 2 done: model"
        );

        let solver_config = SolverConfig::default()
            .with_time_limit_ms(self.config.time_limit_ms())
            .with_num_workers(self.config.num_workers);
        info!(
            time_limit_ms = solver_config.time_limit_ms,
            workers = solver_config.num_workers,
            "phase 3: solving"
        );
        let started = Instant::now();
        let solution = solver.solve(&encoded.model, &solver_config);
        let solve_time = started.elapsed();
        info!(
            status = %solution.status,
            nodes = solution.nodes,
            solver_ms = solution.solve_time_ms,
            elapsed_ms = solve_time.as_millis() as u64,
            "phase 3 done: solver"
        );

        let outcome = interpret(&table, &encoded, &solution, &self.config);
        RunReport {
            outcome,
            primes: table.primes().len(),
            candidates: table.len(),
            web_constraints: encoded.web_constraints,
            solver_nodes: solution.nodes,
            build_time,
            encode_time,
            solve_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{Constraint, CpModel, CpSolution, PropagatingSolver, SolverStatus};
    use crate::error::{ConfigError, Error};

    /// Solver stub that always returns the same status.
    struct FixedStatus(SolverStatus);

    impl CpSolver for FixedStatus {
        fn solve(&self, _model: &CpModel, _config: &SolverConfig) -> CpSolution {
            CpSolution::empty(self.0)
        }
    }

    #[test]
    fn test_reference_run_is_infeasible() {
        let config = WebConfig::default()
            .with_prime_limit(150)
            .with_max_exponent(6)
            .with_exponents(vec![1, 2, 4, 6])
            .with_min_active_primes(5)
            .with_tolerance(1000)
            .with_scale(100_000_000);
        let web = PrimeWeb::new(config).unwrap();
        let report = web.run(&PropagatingSolver::new());

        assert_eq!(
            report.outcome,
            WebOutcome::Infeasible {
                prime_limit: 150,
                max_exponent: 6
            }
        );
        assert_eq!(report.primes, 35);
        assert_eq!(report.candidates, 37);
        assert!(report.web_constraints > 0);
    }

    #[test]
    fn test_wider_runs_stay_infeasible() {
        // No candidate set below these limits is closed under the web,
        // so a wide band and a trivial size bound do not help.
        for limit in [300, 1000] {
            let config = WebConfig::default()
                .with_prime_limit(limit)
                .with_tolerance(5_000_000)
                .with_min_active_primes(1);
            let report = PrimeWeb::new(config).unwrap().run(&PropagatingSolver::new());
            assert!(report.outcome.is_infeasible(), "limit {limit}");
        }
    }

    #[test]
    fn test_timeout_is_inconclusive() {
        let web = PrimeWeb::new(WebConfig::default()).unwrap();
        let report = web.run(&FixedStatus(SolverStatus::Timeout));
        assert_eq!(
            report.outcome,
            WebOutcome::Inconclusive {
                status: SolverStatus::Timeout
            }
        );
    }

    #[test]
    fn test_config_error_fails_fast() {
        let err = PrimeWeb::new(WebConfig::default().with_prime_limit(1)).unwrap_err();
        assert_eq!(err, Error::Config(ConfigError::PrimeLimitTooSmall(1)));

        let err = PrimeWeb::new(WebConfig::default().with_exponents(vec![])).unwrap_err();
        assert_eq!(err, Error::Config(ConfigError::EmptyExponentSet));
    }

    #[test]
    fn test_solved_structure_lands_in_target_band() {
        // Dropping only the web implications leaves a satisfiable model;
        // the band then bounds the exact log of the reported product.
        let config = WebConfig::default().with_prime_limit(300);
        let table = CandidateBuilder::new(&config).build();
        let mut encoded = encode(&table, &config);
        encoded
            .model
            .constraints
            .retain(|c| !matches!(c, Constraint::Implication { .. }));

        let solution = PropagatingSolver::new().solve(&encoded.model, &SolverConfig::default());
        assert!(solution.is_solution_found());
        assert!(encoded.model.is_satisfied_by(&solution.values));

        let WebOutcome::Found(structure) = interpret(&table, &encoded, &solution, &config) else {
            panic!("expected a structure");
        };
        let n = structure.powers.len() as f64;
        assert!(n >= config.min_active_primes as f64);

        let sum = structure.scaled_log_sum();
        assert!((sum - encoded.scaled_target).abs() <= config.tolerance);

        let off = (structure.ln_product() - std::f64::consts::LN_2).abs() * config.scale as f64;
        assert!(off <= config.tolerance as f64 + n + 1e-3, "off by {off}");
    }

    #[test]
    fn test_solver_assignment_respects_exclusivity() {
        // Without web implications and the target band the model is
        // satisfiable; the per-prime invariant must still hold.
        let config = WebConfig::default().with_prime_limit(300);
        let table = CandidateBuilder::new(&config).build();
        let mut encoded = encode(&table, &config);
        encoded
            .model
            .constraints
            .retain(|c| !matches!(c, Constraint::Implication { .. }));
        encoded.model.constraints.pop();

        let solution = PropagatingSolver::new().solve(&encoded.model, &SolverConfig::default());
        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!(encoded.model.is_satisfied_by(&solution.values));

        let mut active_count = 0;
        for (&p, &active) in &encoded.active {
            let chosen = encoded
                .selections_of(p)
                .filter(|&(_, v)| solution.value(v))
                .count();
            assert!(chosen <= 1, "prime {p}");
            assert_eq!(chosen == 1, solution.value(active), "prime {p}");
            active_count += chosen;
        }
        assert!(active_count >= config.min_active_primes);

        let WebOutcome::Found(structure) = interpret(&table, &encoded, &solution, &config) else {
            panic!("expected a structure");
        };
        assert_eq!(structure.powers.len(), active_count);
        let special = structure
            .powers
            .iter()
            .filter(|p| p.prime % 4 == 1 && p.exponent % 4 == 1)
            .count();
        assert_eq!(special, 1);
    }
}
