//! Backward-difference time integration schemes.

use nalgebra::{DMatrix, DVector};

/// Which backward-difference formula advances the state each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// First-order: `LHS = M0 + M1/dt`.
    Bdf1,
    /// Second-order: `LHS = M0 + 1.5*M1/dt`, needs one step of history.
    Bdf2,
    /// Third-order: `LHS = M0 + (11/6)*M1/dt`, needs two steps of history.
    Bdf3,
}

impl Scheme {
    /// Builds the left-hand-side matrix for this scheme.
    #[must_use]
    pub fn lhs(self, m0: &DMatrix<f64>, m1: &DMatrix<f64>, dt: f64) -> DMatrix<f64> {
        let factor = match self {
            Scheme::Bdf1 => 1.0 / dt,
            Scheme::Bdf2 => 1.5 / dt,
            Scheme::Bdf3 => 11.0 / (6.0 * dt),
        };
        m0 + m1 * factor
    }

    /// Builds the right-hand-side vector for stepping from history columns
    /// of `solution` into `step + 1`. Missing history (negative indices)
    /// is substituted with column 0, matching the documented behavior for
    /// the first one or two steps of BDF2/BDF3.
    ///
    /// `step` may be `-1`, matching the one-off initial diode resistor-probe
    /// solve, which reads history from an all-zero solution matrix before
    /// any step has been taken.
    #[must_use]
    pub fn rhs(
        self,
        m1: &DMatrix<f64>,
        source: &DVector<f64>,
        dt: f64,
        step: i64,
        solution: &DMatrix<f64>,
    ) -> DVector<f64> {
        let col = |idx: i64| -> DVector<f64> {
            let idx = usize::try_from(idx.max(0)).unwrap_or(0);
            solution.column(idx).into_owned()
        };
        let history = match self {
            Scheme::Bdf1 => col(step) / dt,
            Scheme::Bdf2 => (col(step) * 4.0 - col(step - 1)) / (2.0 * dt),
            Scheme::Bdf3 => {
                (col(step) * 18.0 - col(step - 1) * 9.0 + col(step - 2) * 2.0) / (6.0 * dt)
            }
        };
        source + m1 * history
    }
}
