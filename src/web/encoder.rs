//! Encoding of a candidate table as a pseudo-boolean CP model.

use super::config::WebConfig;
use super::types::CandidateTable;
use crate::arith::scaled_log_two;
use crate::cp::{CpModel, VarId};
use std::collections::BTreeMap;
use tracing::info;

/// A CP model together with the handles needed to read a solution back.
#[derive(Debug, Clone)]
pub struct EncodedWeb {
    /// The solver-ready model.
    pub model: CpModel,
    /// prime → "active" variable.
    pub active: BTreeMap<u64, VarId>,
    /// (prime, exponent) → "selection" variable.
    pub selection: BTreeMap<(u64, u32), VarId>,
    /// Number of web implications added.
    pub web_constraints: usize,
    /// Number of special (Euler-form) selections.
    pub special_candidates: usize,
    /// `floor(ln 2 · scale)`.
    pub scaled_target: i64,
}

impl EncodedWeb {
    /// Selection handles of one prime, ascending by exponent.
    pub fn selections_of(&self, prime: u64) -> impl Iterator<Item = (u32, VarId)> + '_ {
        self.selection
            .range((prime, 0)..=(prime, u32::MAX))
            .map(|(&(_, k), &v)| (k, v))
    }
}

/// Builds the CP model for a candidate table.
///
/// Constraints, in order:
///
/// 1. per prime: `Σ sel ≤ 1` and `Σ sel − active = 0` (or `active = 0`
///    when the prime has no candidate)
/// 2. web: `sel(p, k) ⇒ active(q)` for every child `q`
/// 3. exactly one special selection
/// 4. `Σ active ≥ min_active_primes`
/// 5. `target − tol ≤ Σ sel · scaled_log ≤ target + tol`
///
/// # Examples
///
/// ```
/// use u_primeweb::web::{encode, CandidateBuilder, WebConfig};
///
/// let config = WebConfig::default();
/// let table = CandidateBuilder::new(&config).build();
/// let encoded = encode(&table, &config);
/// assert_eq!(encoded.active.len(), table.primes().len());
/// assert_eq!(encoded.selection.len(), table.len());
/// assert!(encoded.model.validate().is_ok());
/// ```
pub fn encode(table: &CandidateTable, config: &WebConfig) -> EncodedWeb {
    let mut model = CpModel::new(format!("prime_web_{}", table.prime_limit()));
    let mut active = BTreeMap::new();
    let mut selection = BTreeMap::new();

    for &p in table.primes() {
        let a = model.new_bool_var(format!("active_{p}"));
        active.insert(p, a);

        match table.candidates_of(p) {
            Some(row) => {
                let sels: Vec<VarId> = row
                    .keys()
                    .map(|&k| {
                        let v = model.new_bool_var(format!("sel_{p}_{k}"));
                        selection.insert((p, k), v);
                        v
                    })
                    .collect();
                let mut terms: Vec<(VarId, i64)> = sels.iter().map(|&v| (v, 1)).collect();
                model.add_linear_le(terms.clone(), 1);
                terms.push((a, -1));
                model.add_linear_eq(terms, 0);
            }
            None => model.fix(a, false),
        }
    }

    let mut web_constraints = 0usize;
    for c in table.iter() {
        let sel = selection[&(c.prime, c.exponent)];
        for q in &c.children {
            if let Some(&child) = active.get(q) {
                model.add_implication(sel, child);
                web_constraints += 1;
            }
        }
    }
    info!(web_constraints, "prime web encoded");

    let special: Vec<(VarId, i64)> = table
        .iter()
        .filter(|c| c.is_special())
        .map(|c| (selection[&(c.prime, c.exponent)], 1))
        .collect();
    let special_candidates = special.len();
    model.add_linear_eq(special, 1);

    let active_terms: Vec<(VarId, i64)> = active.values().map(|&v| (v, 1)).collect();
    let min_active = i64::try_from(config.min_active_primes).unwrap_or(i64::MAX);
    model.add_linear_ge(active_terms, min_active);

    let scaled_target = scaled_log_two(config.scale);
    let log_terms: Vec<(VarId, i64)> = table
        .iter()
        .map(|c| (selection[&(c.prime, c.exponent)], c.scaled_log))
        .collect();
    model.add_linear_range(
        log_terms,
        scaled_target - config.tolerance,
        scaled_target + config.tolerance,
    );

    info!(
        variables = model.bool_var_count(),
        constraints = model.constraint_count(),
        special_candidates,
        "model built"
    );

    EncodedWeb {
        model,
        active,
        selection,
        web_constraints,
        special_candidates,
        scaled_target,
    }
}
