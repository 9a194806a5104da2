//! CP model definition.

use super::variables::{BoolVar, VarId};

/// A constraint in the CP model.
///
/// Only the pseudo-boolean fragment is modeled: linear sums of boolean
/// variables with integer coefficients, and implications between two
/// boolean variables.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Bounded linear sum: `lower <= sum(coef * var) <= upper`.
    ///
    /// A missing bound is unbounded on that side. `==` is expressed
    /// with equal bounds.
    Linear {
        /// (variable, coefficient) pairs.
        terms: Vec<(VarId, i64)>,
        /// Inclusive lower bound.
        lower: Option<i64>,
        /// Inclusive upper bound.
        upper: Option<i64>,
    },

    /// Boolean implication: `premise => conclusion`.
    Implication {
        premise: VarId,
        conclusion: VarId,
    },
}

impl Constraint {
    /// Variables referenced by this constraint.
    pub fn vars(&self) -> Vec<VarId> {
        match self {
            Constraint::Linear { terms, .. } => terms.iter().map(|&(v, _)| v).collect(),
            Constraint::Implication {
                premise,
                conclusion,
            } => vec![*premise, *conclusion],
        }
    }

    /// Whether a full assignment satisfies this constraint.
    ///
    /// `values` is indexed by [`VarId::index`].
    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        match self {
            Constraint::Linear {
                terms,
                lower,
                upper,
            } => {
                let sum: i128 = terms
                    .iter()
                    .filter(|&&(v, _)| values[v.index()])
                    .map(|&(_, c)| c as i128)
                    .sum();
                lower.is_none_or(|lo| sum >= lo as i128) && upper.is_none_or(|hi| sum <= hi as i128)
            }
            Constraint::Implication {
                premise,
                conclusion,
            } => !values[premise.index()] || values[conclusion.index()],
        }
    }
}

/// A constraint programming model over boolean variables.
///
/// # Examples
///
/// ```
/// use u_primeweb::cp::CpModel;
///
/// let mut model = CpModel::new("example");
/// let a = model.new_bool_var("a");
/// let b = model.new_bool_var("b");
/// model.add_implication(a, b);
/// model.add_linear_eq(vec![(a, 1), (b, 1)], 1);
/// assert!(model.validate().is_ok());
/// assert_eq!(model.bool_var_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    /// Boolean variables, indexed by [`VarId`].
    pub bool_vars: Vec<BoolVar>,
    /// Constraints.
    pub constraints: Vec<Constraint>,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bool_vars: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Adds a boolean variable and returns its handle.
    pub fn add_bool_var(&mut self, var: BoolVar) -> VarId {
        self.bool_vars.push(var);
        VarId(self.bool_vars.len() - 1)
    }

    /// Convenience: add an unfixed boolean variable.
    pub fn new_bool_var(&mut self, name: impl Into<String>) -> VarId {
        self.add_bool_var(BoolVar::new(name))
    }

    /// Fixes an existing variable to a value.
    pub fn fix(&mut self, var: VarId, value: bool) {
        if let Some(v) = self.bool_vars.get_mut(var.index()) {
            v.fixed = Some(value);
        }
    }

    /// Returns the variable behind a handle.
    pub fn var(&self, var: VarId) -> Option<&BoolVar> {
        self.bool_vars.get(var.index())
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: `lower <= sum <= upper`.
    pub fn add_linear_range(&mut self, terms: Vec<(VarId, i64)>, lower: i64, upper: i64) {
        self.constraints.push(Constraint::Linear {
            terms,
            lower: Some(lower),
            upper: Some(upper),
        });
    }

    /// Convenience: `sum <= rhs`.
    pub fn add_linear_le(&mut self, terms: Vec<(VarId, i64)>, rhs: i64) {
        self.constraints.push(Constraint::Linear {
            terms,
            lower: None,
            upper: Some(rhs),
        });
    }

    /// Convenience: `sum >= rhs`.
    pub fn add_linear_ge(&mut self, terms: Vec<(VarId, i64)>, rhs: i64) {
        self.constraints.push(Constraint::Linear {
            terms,
            lower: Some(rhs),
            upper: None,
        });
    }

    /// Convenience: `sum == rhs`.
    pub fn add_linear_eq(&mut self, terms: Vec<(VarId, i64)>, rhs: i64) {
        self.add_linear_range(terms, rhs, rhs);
    }

    /// Convenience: `premise => conclusion`.
    pub fn add_implication(&mut self, premise: VarId, conclusion: VarId) {
        self.constraints.push(Constraint::Implication {
            premise,
            conclusion,
        });
    }

    /// Validates the model for consistency.
    ///
    /// Checks that all referenced variables exist and that no linear
    /// constraint has an empty bound range.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.bool_vars.len();
        for constraint in &self.constraints {
            for var in constraint.vars() {
                if var.index() >= n {
                    return Err(format!("undefined variable: #{}", var.index()));
                }
            }
            if let Constraint::Linear {
                lower: Some(lo),
                upper: Some(hi),
                ..
            } = constraint
            {
                if lo > hi {
                    return Err(format!("empty linear range: [{lo}, {hi}]"));
                }
            }
        }
        Ok(())
    }

    /// Whether a full assignment satisfies every constraint and fixing.
    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        values.len() == self.bool_vars.len()
            && self
                .bool_vars
                .iter()
                .zip(values)
                .all(|(var, &value)| var.admits(value))
            && self.constraints.iter().all(|c| c.is_satisfied(values))
    }

    /// Returns the number of boolean variables.
    pub fn bool_var_count(&self) -> usize {
        self.bool_vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
