//! Live-update hooks for stamps whose value is a function of time.

use calc::TimeFunction;

use crate::assemble::MatrixSet;

/// `(row, col, function)` triples recorded while assembling, applied once
/// per time step before the integrator builds its LHS/RHS for that step.
#[derive(Default)]
pub struct UpdateRegistry {
    /// Entries to re-stamp into `M0` each step.
    pub update_m0: Vec<(usize, usize, TimeFunction)>,
    /// Entries to re-stamp into `M1` each step.
    pub update_m1: Vec<(usize, usize, TimeFunction)>,
    /// Entries to re-stamp into the source vector each step.
    pub update_s: Vec<(usize, TimeFunction)>,
}

impl UpdateRegistry {
    /// Re-evaluates every registered function at `t` and writes it into
    /// `matrices`.
    pub fn apply(&self, t: f64, matrices: &mut MatrixSet) {
        for (row, col, f) in &self.update_m0 {
            matrices.m0[(*row, *col)] = f.eval(t);
        }
        for (row, col, f) in &self.update_m1 {
            matrices.m1[(*row, *col)] = f.eval(t);
        }
        for (row, f) in &self.update_s {
            matrices.source[*row] = f.eval(t);
        }
    }

    /// Whether any stamp in this registry needs re-evaluation at all,
    /// letting the solver skip re-assembly work for a fully static system.
    #[must_use]
    pub fn has_updates(&self) -> bool {
        !self.update_m0.is_empty() || !self.update_m1.is_empty() || !self.update_s.is_empty()
    }
}
