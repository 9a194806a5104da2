//! Constraint Programming (CP) layer.
//!
//! Provides a domain-agnostic pseudo-boolean model: boolean variables,
//! bounded linear sums with integer coefficients, and implications.
//!
//! # Key Components
//!
//! - **Variables**: [`BoolVar`] addressed through [`VarId`] handles
//! - **Constraints**: [`Constraint`] (linear, implication)
//! - **Model**: [`CpModel`], container for variables and constraints
//! - **Solver**: [`CpSolver`] trait, interface for solver implementations
//!
//! # Design
//!
//! The [`CpSolver`] trait allows plugging in external solvers (OR-Tools
//! CP-SAT, a MIP engine) behind the same status contract. The bundled
//! [`PropagatingSolver`] is a complete search, so its `Infeasible` is a
//! proof for the given model.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod model;
mod solver;
mod variables;

pub use model::{Constraint, CpModel};
pub use solver::{CpSolution, CpSolver, PropagatingSolver, SolverConfig, SolverStatus};
pub use variables::{BoolVar, VarId};
