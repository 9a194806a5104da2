//! CP solver interface and a propagating backtracking implementation.

use super::model::{Constraint, CpModel};
use super::variables::VarId;
use std::time::{Duration, Instant};

/// Verdict returned by a [`CpSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// An assignment was found and no better one exists.
    Optimal,
    /// An assignment was found.
    Feasible,
    /// Search proved that no assignment satisfies the model.
    Infeasible,
    /// The model references unknown handles or has an empty range.
    ModelInvalid,
    /// The wall-clock budget ran out first.
    Timeout,
    /// The engine stopped without a verdict.
    Unknown,
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolverStatus::Optimal => "OPTIMAL",
            SolverStatus::Feasible => "FEASIBLE",
            SolverStatus::Infeasible => "INFEASIBLE",
            SolverStatus::ModelInvalid => "MODEL_INVALID",
            SolverStatus::Timeout => "TIMEOUT",
            SolverStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Verdict plus assignment.
#[derive(Debug, Clone)]
pub struct CpSolution {
    /// Verdict.
    pub status: SolverStatus,
    /// Boolean assignment indexed by [`VarId::index`]. Empty unless a
    /// solution was found.
    pub values: Vec<bool>,
    /// Number of search nodes explored.
    pub nodes: u64,
    /// Wall-clock time spent in `solve`.
    pub solve_time_ms: i64,
}

impl CpSolution {
    /// A verdict with no assignment attached.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            nodes: 0,
            solve_time_ms: 0,
        }
    }

    /// `true` for [`SolverStatus::Optimal`] and [`SolverStatus::Feasible`].
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    /// Value of a variable in the found assignment.
    ///
    /// Returns `false` when no solution is available.
    pub fn value(&self, var: VarId) -> bool {
        self.values.get(var.index()).copied().unwrap_or(false)
    }
}

/// Resource limits handed to a solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Wall-clock budget. Zero or negative means no time at all.
    pub time_limit_ms: i64,
    /// Worker hint for engines that search in parallel.
    pub num_workers: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
            num_workers: 1,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_ms(mut self, ms: i64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }
}

/// A pseudo-boolean engine.
///
/// Implementations must never report [`SolverStatus::Infeasible`] unless
/// the model is proven unsatisfiable; running out of time is
/// [`SolverStatus::Timeout`].
pub trait CpSolver {
    /// Searches for an assignment satisfying every constraint of `model`.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}

/// A complete depth-first pseudo-boolean solver.
///
/// Each node runs unit propagation to a fixpoint: implications are
/// propagated forward and by contraposition, linear constraints by
/// min/max activity bounds. Branching picks the first unassigned
/// variable in handle order and tries `true` first.
///
/// The model carries no objective, so any solution is reported as
/// [`SolverStatus::Optimal`]. `num_workers` is ignored; search is
/// single-threaded.
pub struct PropagatingSolver;

impl PropagatingSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PropagatingSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CpSolver for PropagatingSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        if model.validate().is_err() {
            return CpSolution::empty(SolverStatus::ModelInvalid);
        }

        let start_time = Instant::now();
        let budget = Duration::from_millis(config.time_limit_ms.max(0) as u64);
        let mut search = Search::new(model, start_time + budget);

        let mut root: Vec<Option<bool>> = model.bool_vars.iter().map(|v| v.fixed).collect();
        let outcome = search.dfs(&mut root);

        let (status, values) = match outcome {
            Outcome::Found(values) => (SolverStatus::Optimal, values),
            Outcome::Exhausted => (SolverStatus::Infeasible, Vec::new()),
            Outcome::TimedOut => (SolverStatus::Timeout, Vec::new()),
        };

        CpSolution {
            status,
            values,
            nodes: search.nodes,
            solve_time_ms: start_time.elapsed().as_millis() as i64,
        }
    }
}

enum Outcome {
    Found(Vec<bool>),
    Exhausted,
    TimedOut,
}

struct Search<'a> {
    model: &'a CpModel,
    /// Constraint indices touching each variable.
    occurrences: Vec<Vec<usize>>,
    deadline: Instant,
    nodes: u64,
}

impl<'a> Search<'a> {
    fn new(model: &'a CpModel, deadline: Instant) -> Self {
        let mut occurrences = vec![Vec::new(); model.bool_vars.len()];
        for (ci, c) in model.constraints.iter().enumerate() {
            for var in c.vars() {
                let occ = &mut occurrences[var.index()];
                if occ.last() != Some(&ci) {
                    occ.push(ci);
                }
            }
        }
        Self {
            model,
            occurrences,
            deadline,
            nodes: 0,
        }
    }

    fn dfs(&mut self, assign: &mut [Option<bool>]) -> Outcome {
        if Instant::now() >= self.deadline {
            return Outcome::TimedOut;
        }
        self.nodes += 1;

        if !self.propagate(assign) {
            return Outcome::Exhausted;
        }

        let Some(branch) = assign.iter().position(Option::is_none) else {
            return Outcome::Found(assign.iter().map(|v| v.unwrap_or(false)).collect());
        };

        for value in [true, false] {
            let mut child = assign.to_vec();
            child[branch] = Some(value);
            match self.dfs(&mut child) {
                Outcome::Exhausted => continue,
                done => return done,
            }
        }
        Outcome::Exhausted
    }

    /// Propagates to a fixpoint. Returns `false` on conflict.
    fn propagate(&self, assign: &mut [Option<bool>]) -> bool {
        let n = self.model.constraints.len();
        let mut queue: Vec<usize> = (0..n).rev().collect();
        let mut queued = vec![true; n];

        while let Some(ci) = queue.pop() {
            queued[ci] = false;
            let mut forced = Vec::new();
            if !propagate_constraint(&self.model.constraints[ci], assign, &mut forced) {
                return false;
            }
            for var in forced {
                for &other in &self.occurrences[var.index()] {
                    if !queued[other] {
                        queued[other] = true;
                        queue.push(other);
                    }
                }
            }
        }
        true
    }
}

/// Propagates one constraint, recording newly assigned variables in
/// `forced`. Returns `false` on conflict.
fn propagate_constraint(
    constraint: &Constraint,
    assign: &mut [Option<bool>],
    forced: &mut Vec<VarId>,
) -> bool {
    match constraint {
        Constraint::Implication {
            premise,
            conclusion,
        } => match (assign[premise.index()], assign[conclusion.index()]) {
            (Some(true), Some(false)) => false,
            (Some(true), None) => {
                assign[conclusion.index()] = Some(true);
                forced.push(*conclusion);
                true
            }
            (None, Some(false)) => {
                assign[premise.index()] = Some(false);
                forced.push(*premise);
                true
            }
            _ => true,
        },
        Constraint::Linear {
            terms,
            lower,
            upper,
        } => {
            let mut min: i128 = 0;
            let mut max: i128 = 0;
            for &(var, coef) in terms {
                let c = coef as i128;
                match assign[var.index()] {
                    Some(true) => {
                        min += c;
                        max += c;
                    }
                    Some(false) => {}
                    None => {
                        min += c.min(0);
                        max += c.max(0);
                    }
                }
            }
            let lo = lower.map(|v| v as i128);
            let hi = upper.map(|v| v as i128);
            if hi.is_some_and(|hi| min > hi) || lo.is_some_and(|lo| max < lo) {
                return false;
            }

            // min/max computed above stay sound (if weaker) while fixing,
            // since each fix only tightens the opposite bound.
            for &(var, coef) in terms {
                if assign[var.index()].is_some() || coef == 0 {
                    continue;
                }
                let c = coef as i128;
                let span = c.abs();
                // Value that contributes the minimum / maximum.
                let min_value = c < 0;
                let max_value = c > 0;

                let must_min = hi.is_some_and(|hi| min + span > hi);
                let must_max = lo.is_some_and(|lo| max - span < lo);
                let value = match (must_min, must_max) {
                    (true, true) => return false,
                    (true, false) => min_value,
                    (false, true) => max_value,
                    (false, false) => continue,
                };
                assign[var.index()] = Some(value);
                forced.push(var);
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::BoolVar;

    fn solve(model: &CpModel) -> CpSolution {
        PropagatingSolver::new().solve(model, &SolverConfig::default())
    }

    #[test]
    fn test_trivial_model() {
        let model = CpModel::new("empty");
        let solution = solve(&model);
        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_implication_chain() {
        let mut model = CpModel::new("chain");
        let a = model.new_bool_var("a");
        let b = model.new_bool_var("b");
        let c = model.new_bool_var("c");
        model.add_implication(a, b);
        model.add_implication(b, c);
        model.add_linear_eq(vec![(a, 1)], 1);

        let solution = solve(&model);
        assert!(solution.is_solution_found());
        assert!(solution.value(a) && solution.value(b) && solution.value(c));
    }

    #[test]
    fn test_contrapositive_conflict() {
        let mut model = CpModel::new("conflict");
        let a = model.add_bool_var(BoolVar::constant("a", true));
        let b = model.add_bool_var(BoolVar::constant("b", false));
        model.add_implication(a, b);

        let solution = solve(&model);
        assert_eq!(solution.status, SolverStatus::Infeasible);
        assert!(!solution.value(a));
    }

    #[test]
    fn test_weighted_sum_requires_search() {
        // Pick a subset of {3, 5, 7, 11} summing to exactly 18.
        let mut model = CpModel::new("subset");
        let weights = [3, 5, 7, 11];
        let vars: Vec<VarId> = weights
            .iter()
            .map(|w| model.new_bool_var(format!("w{w}")))
            .collect();
        let terms: Vec<(VarId, i64)> = vars.iter().copied().zip(weights).collect();
        model.add_linear_eq(terms.clone(), 18);

        let solution = solve(&model);
        assert!(solution.is_solution_found());
        assert!(model.is_satisfied_by(&solution.values));
        let sum: i64 = terms
            .iter()
            .filter(|(v, _)| solution.value(*v))
            .map(|(_, w)| w)
            .sum();
        assert_eq!(sum, 18);
    }

    #[test]
    fn test_infeasible_sum() {
        let mut model = CpModel::new("parity");
        let vars: Vec<VarId> = (0..6).map(|i| model.new_bool_var(format!("x{i}"))).collect();
        model.add_linear_eq(vars.iter().map(|&v| (v, 2)).collect(), 7);

        let solution = solve(&model);
        assert_eq!(solution.status, SolverStatus::Infeasible);
        assert!(solution.nodes > 1);
    }

    #[test]
    fn test_negative_coefficients() {
        // a + b - s == 0, s fixed true, a forbidden: b must hold.
        let mut model = CpModel::new("neg");
        let a = model.new_bool_var("a");
        let b = model.new_bool_var("b");
        let s = model.add_bool_var(BoolVar::constant("s", true));
        model.add_linear_eq(vec![(a, 1), (b, 1), (s, -1)], 0);
        model.fix(a, false);

        let solution = solve(&model);
        assert!(solution.is_solution_found());
        assert!(solution.value(b));
        assert!(!solution.value(a));
    }

    #[test]
    fn test_exactly_one_with_at_least() {
        let mut model = CpModel::new("card");
        let vars: Vec<VarId> = (0..5).map(|i| model.new_bool_var(format!("x{i}"))).collect();
        model.add_linear_le(vars.iter().map(|&v| (v, 1)).collect(), 2);
        model.add_linear_ge(vars.iter().map(|&v| (v, 1)).collect(), 2);
        model.add_implication(vars[0], vars[4]);

        let solution = solve(&model);
        assert!(solution.is_solution_found());
        assert!(model.is_satisfied_by(&solution.values));
        assert_eq!(vars.iter().filter(|&&v| solution.value(v)).count(), 2);
    }

    #[test]
    fn test_invalid_model() {
        let mut model = CpModel::new("bad");
        let a = model.new_bool_var("a");
        model.add_implication(a, VarId(3));

        let solution = solve(&model);
        assert_eq!(solution.status, SolverStatus::ModelInvalid);
    }

    #[test]
    fn test_zero_time_budget() {
        let mut model = CpModel::new("budget");
        let a = model.new_bool_var("a");
        model.add_linear_le(vec![(a, 1)], 1);

        let config = SolverConfig::default().with_time_limit_ms(0);
        let solution = PropagatingSolver::new().solve(&model, &config);
        assert_eq!(solution.status, SolverStatus::Timeout);
        assert!(!solution.is_solution_found());
    }

    #[test]
    fn test_solver_config_default() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit_ms, 60_000);
        assert_eq!(config.num_workers, 1);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SolverStatus::Infeasible.to_string(), "INFEASIBLE");
        assert_eq!(SolverStatus::Timeout.to_string(), "TIMEOUT");
    }
}
