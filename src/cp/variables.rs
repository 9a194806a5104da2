//! Decision variables and their handles.

/// Handle to a boolean variable inside a [`CpModel`](super::CpModel).
///
/// Handles are dense indices assigned in creation order, so they can be
/// used to index solution vectors directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in its model.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A 0/1 decision, optionally pinned before search starts.
#[derive(Debug, Clone)]
pub struct BoolVar {
    /// Label used in logs and model dumps (`active_7`, `sel_5_1`).
    pub name: String,
    /// Value the variable is pinned to.
    pub fixed: Option<bool>,
}

impl BoolVar {
    /// An unpinned decision.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed: None,
        }
    }

    /// A decision pinned to `value`.
    pub fn constant(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            fixed: Some(value),
        }
    }

    /// Whether `value` is allowed by the pin.
    pub fn admits(&self, value: bool) -> bool {
        self.fixed.is_none_or(|f| f == value)
    }
}
